use nalgebra::Vector3;
use strum_macros::EnumIter;

/// Lattice centering type. `order()` gives the number of lattice points per
/// conventional cell, which is also the integer factor by which a Wyckoff
/// orbit's multiplicity is scaled relative to the primitive-cell count.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
pub enum Centering {
    P, // Primitive
    A, // A-face centered
    B, // B-face centered
    C, // C-face centered
    I, // Body centered
    R, // Rhombohedral (obverse setting)
    F, // Face centered
}

impl Centering {
    pub fn order(&self) -> usize {
        match self {
            Centering::P => 1,
            Centering::A => 2,
            Centering::B => 2,
            Centering::C => 2,
            Centering::I => 2,
            Centering::R => 3,
            Centering::F => 4,
        }
    }

    /// Centering translations added to every operation's translation part
    /// to expand a primitive-cell general position into the full
    /// conventional-cell orbit.
    pub fn lattice_points(&self) -> Vec<Vector3<f64>> {
        match self {
            Centering::P => vec![Vector3::new(0.0, 0.0, 0.0)],
            Centering::A => vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 0.5, 0.5),
            ],
            Centering::B => vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.5, 0.0, 0.5),
            ],
            Centering::C => vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.5, 0.5, 0.0),
            ],
            Centering::I => vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.5, 0.5, 0.5),
            ],
            Centering::R => vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(2.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0),
                Vector3::new(1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0),
            ],
            Centering::F => vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 0.5, 0.5),
                Vector3::new(0.5, 0.0, 0.5),
                Vector3::new(0.5, 0.5, 0.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_lattice_points_count_matches_order() {
        for centering in Centering::iter() {
            assert_eq!(centering.lattice_points().len(), centering.order());
        }
    }
}
