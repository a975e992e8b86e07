use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;

use symgen::{generate_structure, GenerationRequest};

fn bench_rock_salt(c: &mut Criterion) {
    let species = ["Na".to_string(), "Cl".to_string()];
    let counts = [1, 1];
    c.bench_function("generate sg225 NaCl", |b| {
        b.iter(|| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(0);
            let request = GenerationRequest {
                space_group_number: 225,
                species: &species,
                counts: &counts,
                volume_factor: 2.5,
                distance_factor: 1.0,
            };
            generate_structure(&request, &mut rng).unwrap();
        })
    });
}

fn bench_triclinic_carbon(c: &mut Criterion) {
    let species = ["C".to_string()];
    let counts = [8];
    c.bench_function("generate sg1 carbon", |b| {
        b.iter(|| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(0);
            let request = GenerationRequest {
                space_group_number: 1,
                species: &species,
                counts: &counts,
                volume_factor: 2.0,
                distance_factor: 1.0,
            };
            generate_structure(&request, &mut rng).unwrap();
        })
    });
}

criterion_group!(benches, bench_rock_salt, bench_triclinic_carbon);
criterion_main!(benches);
