use nalgebra::{Matrix3, Vector3};

use super::operation::Operation;

/// Invariant subspace of a site-symmetry group: the set of directions along
/// which a representative point can move while remaining fixed (mod lattice
/// translation) by every operation of the stabilizer. Built once per
/// Wyckoff position and reused whenever a new representative point for that
/// orbit needs to be sampled.
#[derive(Debug, Clone)]
pub struct Orientation {
    /// Projector onto the invariant subspace, `P = (1/|G|) sum_i R_i`.
    projector: Matrix3<f64>,
    /// `trace(P)`, rounded to the nearest integer: 0, 1, 2 or 3.
    pub degrees_of_freedom: u8,
}

impl Orientation {
    /// Derive the invariant subspace from the rotation parts of a site's
    /// stabilizer operations (the translation parts only shift the anchor
    /// point and do not affect the free-parameter subspace).
    pub fn from_site_symmetry(stabilizer: &[Operation]) -> Self {
        assert!(
            !stabilizer.is_empty(),
            "site-symmetry group must contain at least the identity"
        );
        let mut projector = Matrix3::zeros();
        for op in stabilizer {
            projector += op.rotation;
        }
        projector /= stabilizer.len() as f64;

        let trace = projector[(0, 0)] + projector[(1, 1)] + projector[(2, 2)];
        let degrees_of_freedom = trace.round().clamp(0.0, 3.0) as u8;

        Self {
            projector,
            degrees_of_freedom,
        }
    }

    /// Project an arbitrary displacement onto the invariant subspace; adding
    /// the result to the anchor point yields another point fixed by the same
    /// stabilizer.
    pub fn project(&self, displacement: &Vector3<f64>) -> Vector3<f64> {
        self.projector * displacement
    }

    pub fn is_fixed(&self) -> bool {
        self.degrees_of_freedom == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::operation::Operation;
    use approx::assert_relative_eq;

    #[test]
    fn test_general_position_has_full_freedom() {
        let identity = Operation::identity();
        let orientation = Orientation::from_site_symmetry(&[identity]);
        assert_eq!(orientation.degrees_of_freedom, 3);
    }

    #[test]
    fn test_inversion_center_has_no_freedom() {
        let identity = Operation::identity();
        let inversion = Operation::from_xyz_str("-x,-y,-z").unwrap();
        let orientation = Orientation::from_site_symmetry(&[identity, inversion]);
        assert_eq!(orientation.degrees_of_freedom, 0);
        let projected = orientation.project(&Vector3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(projected.norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mirror_plane_has_two_degrees_of_freedom() {
        let identity = Operation::identity();
        let mirror = Operation::from_xyz_str("x,y,-z").unwrap();
        let orientation = Orientation::from_site_symmetry(&[identity, mirror]);
        assert_eq!(orientation.degrees_of_freedom, 2);
    }
}
