//! Constraint-satisfying random crystal structure generator: given a space
//! group, a chemical species list and per-species atom counts, produces a
//! periodic structure in which every atom sits on a Wyckoff position of the
//! group and all interatomic distances respect covalent-radius tolerances.

#[allow(unused_imports)]
#[macro_use]
extern crate approx;

pub mod base;
pub mod data;
pub mod distance;
pub mod generate;
pub mod lattice_sampler;
pub mod symbol;
pub mod wyckoff;

pub use base::{
    Element, GeneratedStructure, Lattice, LatticeParameters, Operation, OperationAnalyzer,
    OperationKind, Orientation, Position, SymgenError,
};
pub use data::{space_group_entry, CrystalFamily, SpaceGroupEntry, WyckoffPosition};
pub use generate::{
    generate_structure, Generator, Generator2D, GenerationRequest, GenerationRequest2D,
};
