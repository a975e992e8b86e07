use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::lattice::Lattice;

/// Fractional coordinates of an atomic site.
pub type Position = Vector3<f64>;

/// A fully assembled, randomly generated crystal structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedStructure {
    pub lattice: Lattice,
    /// `species[i]` is the chemical symbol of the i-th site.
    pub species: Vec<String>,
    /// `positions[i]` is the fractional coordinates of the i-th site.
    pub positions: Vec<Position>,
}

impl GeneratedStructure {
    pub fn new(lattice: Lattice, species: Vec<String>, positions: Vec<Position>) -> Self {
        assert_eq!(
            species.len(),
            positions.len(),
            "species and positions must have the same length"
        );
        Self {
            lattice,
            species,
            positions,
        }
    }

    pub fn num_atoms(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::lattice::LatticeParameters;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_num_atoms() {
        let lattice = Lattice::from_parameters(&LatticeParameters {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            alpha: FRAC_PI_2,
            beta: FRAC_PI_2,
            gamma: FRAC_PI_2,
        });
        let structure = GeneratedStructure::new(
            lattice,
            vec!["Li".to_string(), "Li".to_string()],
            vec![Vector3::zeros(), Vector3::new(0.5, 0.5, 0.5)],
        );
        assert_eq!(structure.num_atoms(), 2);
    }

    #[test]
    #[should_panic]
    fn test_mismatched_length_panics() {
        let lattice = Lattice::from_parameters(&LatticeParameters {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            alpha: FRAC_PI_2,
            beta: FRAC_PI_2,
            gamma: FRAC_PI_2,
        });
        GeneratedStructure::new(lattice, vec!["Li".to_string()], vec![]);
    }
}
