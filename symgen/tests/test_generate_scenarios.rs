#[macro_use]
extern crate approx;

use rand::SeedableRng;
use test_log::test;

use symgen::{generate_structure, GenerationRequest, SymgenError};

fn rng(seed: u64) -> rand::rngs::StdRng {
    rand::rngs::StdRng::seed_from_u64(seed)
}

fn assert_valid(structure: &symgen::GeneratedStructure, distance_factor: f64) {
    for p in &structure.positions {
        for c in p.iter() {
            assert!(*c >= 0.0 && *c < 1.0, "fractional coordinate out of [0,1): {c}");
        }
    }
    let elements: Vec<symgen::Element> = structure
        .species
        .iter()
        .map(|s| symgen::Element::lookup(s).unwrap())
        .collect();
    assert!(symgen::distance::verify_distances(
        &structure.lattice,
        &structure.positions,
        &elements,
        distance_factor,
    ));
}

#[test]
fn test_sg206_lithium_cubic() {
    // 8 Li per primitive cell; I-centering doubles this to 16 in the
    // conventional cell, landing exactly on the 16-fold Wyckoff position.
    let species = ["Li".to_string()];
    let counts = [8];
    let request = GenerationRequest {
        space_group_number: 206,
        species: &species,
        counts: &counts,
        volume_factor: 2.0,
        distance_factor: 1.0,
    };
    let structure = generate_structure(&request, &mut rng(10)).unwrap();
    assert_eq!(structure.num_atoms(), 16);
    let params = structure.lattice.parameters();
    assert_relative_eq!(params.a, params.b, epsilon = 1e-6);
    assert_relative_eq!(params.b, params.c, epsilon = 1e-6);
    assert_relative_eq!(params.alpha, std::f64::consts::FRAC_PI_2, epsilon = 1e-6);
    assert_relative_eq!(params.beta, std::f64::consts::FRAC_PI_2, epsilon = 1e-6);
    assert_relative_eq!(params.gamma, std::f64::consts::FRAC_PI_2, epsilon = 1e-6);
    assert_valid(&structure, 1.0);
}

#[test]
fn test_sg225_rock_salt_conventional_cell() {
    let species = ["Na".to_string(), "Cl".to_string()];
    let counts = [1, 1];
    let request = GenerationRequest {
        space_group_number: 225,
        species: &species,
        counts: &counts,
        volume_factor: 2.5,
        distance_factor: 1.0,
    };
    let structure = generate_structure(&request, &mut rng(11)).unwrap();
    // F-centering multiplier is 4: one formula unit per primitive cell
    // becomes 4 Na + 4 Cl in the conventional cell.
    assert_eq!(structure.num_atoms(), 8);
    assert_valid(&structure, 1.0);
}

#[test]
fn test_sg1_triclinic_carbon() {
    let species = ["C".to_string()];
    let counts = [3];
    let request = GenerationRequest {
        space_group_number: 1,
        species: &species,
        counts: &counts,
        volume_factor: 2.0,
        distance_factor: 1.0,
    };
    let structure = generate_structure(&request, &mut rng(12)).unwrap();
    assert_eq!(structure.num_atoms(), 3);
    assert_valid(&structure, 1.0);
}

#[test]
fn test_sg139_tetragonal_iron_oxide() {
    let species = ["Fe".to_string(), "O".to_string()];
    let counts = [2, 4];
    let request = GenerationRequest {
        space_group_number: 139,
        species: &species,
        counts: &counts,
        volume_factor: 2.0,
        distance_factor: 1.0,
    };
    let structure = generate_structure(&request, &mut rng(13)).unwrap();
    // I-centering doubles both species' primitive counts.
    assert_eq!(structure.num_atoms(), 12);
    let params = structure.lattice.parameters();
    assert_relative_eq!(params.a, params.b, epsilon = 1e-6);
    assert!((params.c - params.a).abs() > 1e-6);
    assert_valid(&structure, 1.0);
}

#[test]
fn test_sg194_hexagonal_magnesium() {
    let species = ["Mg".to_string()];
    let counts = [2];
    let request = GenerationRequest {
        space_group_number: 194,
        species: &species,
        counts: &counts,
        volume_factor: 2.0,
        distance_factor: 1.0,
    };
    let structure = generate_structure(&request, &mut rng(14)).unwrap();
    assert_eq!(structure.num_atoms(), 2);
    let params = structure.lattice.parameters();
    assert_relative_eq!(params.gamma, 2.0 * std::f64::consts::FRAC_PI_3, epsilon = 1e-6);
    assert_valid(&structure, 1.0);
}

#[test]
fn test_sg230_silicon_incompatible() {
    let species = ["Si".to_string()];
    let counts = [1];
    let request = GenerationRequest {
        space_group_number: 230,
        species: &species,
        counts: &counts,
        volume_factor: 2.0,
        distance_factor: 1.0,
    };
    let result = generate_structure(&request, &mut rng(15));
    assert_eq!(result.unwrap_err(), SymgenError::IncompatibleCounts);
}
