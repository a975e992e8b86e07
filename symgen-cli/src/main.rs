mod cif;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use log::{info, warn, LevelFilter};
use rand::SeedableRng;

use symgen::{generate_structure, GenerationRequest};

/// Generate random crystal structures that obey a chosen space group.
#[derive(Parser, Debug)]
#[command(name = "symgen", author, version, about)]
struct Args {
    /// Space group number (1-230)
    #[arg(short = 's', long = "space-group", default_value_t = 206)]
    space_group: u32,

    /// Comma-separated chemical element symbols
    #[arg(short = 'e', long = "elements", default_value = "Li")]
    elements: String,

    /// Comma-separated atom counts per element, one per primitive cell
    #[arg(short = 'n', long = "num-ions", default_value = "16")]
    num_ions: String,

    /// Target volume, as a multiple of the summed covalent-radius sphere volumes
    #[arg(short = 'f', long = "volume-factor", default_value_t = 2.0 / 3.0)]
    volume_factor: f64,

    /// Verbosity: 0 = warnings only, 1 = info, 2+ = debug
    #[arg(short = 'v', long = "verbosity", default_value_t = 0)]
    verbosity: u8,

    /// Number of independent structures to attempt
    #[arg(short = 'a', long = "attempts", default_value_t = 10)]
    attempts: u32,

    /// Output directory for the CIF files of successful attempts
    #[arg(short = 'o', long = "output", default_value = ".")]
    output: PathBuf,
}

fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(level_filter(args.verbosity))
        .init();

    let species: Vec<String> = args.elements.split(',').map(|s| s.trim().to_string()).collect();
    let counts: Vec<usize> = match args
        .num_ions
        .split(',')
        .map(|s| s.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(counts) => counts,
        Err(err) => {
            eprintln!("could not parse -n/--num-ions '{}': {err}", args.num_ions);
            return;
        }
    };

    if let Err(err) = fs::create_dir_all(&args.output) {
        warn!("could not create output directory {:?}: {err}", args.output);
    }

    info!(
        "requesting sg {} for species [{}] with counts [{}], f={}",
        args.space_group,
        species.iter().join(","),
        counts.iter().join(","),
        args.volume_factor,
    );

    let mut rng = rand::rngs::StdRng::from_entropy();
    let mut successes = 0;

    for attempt in 1..=args.attempts {
        let request = GenerationRequest {
            space_group_number: args.space_group,
            species: &species,
            counts: &counts,
            volume_factor: args.volume_factor,
            distance_factor: 1.0,
        };

        match generate_structure(&request, &mut rng) {
            Ok(structure) => {
                successes += 1;
                let data_block = format!("sg{}_attempt{attempt}", args.space_group);
                let cif_text = cif::to_cif(&structure, cif::DEFAULT_SYMPREC, &data_block);
                let path = args.output.join(format!("{data_block}.cif"));
                match fs::write(&path, cif_text) {
                    Ok(()) => println!(
                        "attempt {attempt}/{}: success, {} atoms, wrote {:?}",
                        args.attempts,
                        structure.num_atoms(),
                        path
                    ),
                    Err(err) => println!(
                        "attempt {attempt}/{}: generated {} atoms but failed to write {:?}: {err}",
                        args.attempts,
                        structure.num_atoms(),
                        path
                    ),
                }
            }
            Err(err) => {
                println!("attempt {attempt}/{}: failed ({err})", args.attempts);
            }
        }
    }

    println!(
        "done: {successes}/{} attempts produced a valid structure",
        args.attempts
    );
}
