mod cell;
mod element;
mod error;
mod lattice;
mod operation;
mod orientation;
mod tolerance;

pub use cell::{GeneratedStructure, Position};
pub use element::Element;
pub use error::SymgenError;
pub use lattice::{Lattice, LatticeParameters};
pub use operation::{
    closure, Operation, OperationAnalyzer, OperationKind, RotationMatrix, Translation,
};
pub use orientation::Orientation;
pub use tolerance::*;
