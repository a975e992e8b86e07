use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
/// Error types for the **symgen** library
pub enum SymgenError {
    #[error("space group number {0} is outside the supported table")]
    UnknownSpaceGroup(u32),
    #[error("chemical species '{0}' is not in the covalent radius table")]
    UnknownElement(String),
    #[error("requested ion counts are incompatible with any Wyckoff packing of this space group")]
    IncompatibleCounts,
    #[error("could not sample a lattice satisfying the geometric constraints")]
    LatticeSamplingExhausted,
    #[error("could not find a valid atomic packing within the attempt budget")]
    StructureGenerationExhausted,
    #[error(
        "symmetry operation has a degenerate (non-orthogonal or irrational-order) rotation part"
    )]
    DegenerateOperation,
    #[error("xyz-string operation '{0}' could not be parsed")]
    OperationParseError(String),
}
