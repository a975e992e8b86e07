use crate::base::SymgenError;

/// The six crystal families used to constrain random lattice sampling. Each
/// family fixes a subset of the six conventional cell parameters (see
/// [`CrystalFamily`]'s use in the lattice sampler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrystalFamily {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Hexagonal,
    Cubic,
}

impl CrystalFamily {
    /// Crystal family of one of the supported space groups. Unsupported
    /// numbers are rejected by the caller before this is reached.
    pub fn from_space_group_number(number: u32) -> Result<Self, SymgenError> {
        match number {
            1 | 2 => Ok(CrystalFamily::Triclinic),
            14 => Ok(CrystalFamily::Monoclinic),
            62 => Ok(CrystalFamily::Orthorhombic),
            139 => Ok(CrystalFamily::Tetragonal),
            194 => Ok(CrystalFamily::Hexagonal),
            206 | 225 | 230 => Ok(CrystalFamily::Cubic),
            other => Err(SymgenError::UnknownSpaceGroup(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_groups() {
        for sg in [206, 225, 230] {
            assert_eq!(
                CrystalFamily::from_space_group_number(sg).unwrap(),
                CrystalFamily::Cubic
            );
        }
    }

    #[test]
    fn test_unsupported_group_errors() {
        assert!(CrystalFamily::from_space_group_number(99).is_err());
    }
}
