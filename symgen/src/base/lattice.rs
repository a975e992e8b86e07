use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::tolerance::EPS;

/// Basis vectors of a periodic lattice, stored as columns of `basis`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    /// `basis.column(i)` is the i-th basis vector.
    pub basis: Matrix3<f64>,
}

/// The six conventional cell parameters: three lengths and three angles
/// (in radians) between the basis vector pairs `(b,c)`, `(a,c)`, `(a,b)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Lattice {
    /// Create a new lattice from row basis vectors.
    pub fn new(row_basis: Matrix3<f64>) -> Self {
        Self {
            basis: row_basis.transpose(),
        }
    }

    /// Build a lower-triangular basis from the conventional cell parameters.
    /// `a` lies along x, `b` lies in the xy-plane, `c` completes the frame.
    pub fn from_parameters(params: &LatticeParameters) -> Self {
        let (a, b, c) = (params.a, params.b, params.c);
        let (alpha, beta, gamma) = (params.alpha, params.beta, params.gamma);

        let cos_alpha = alpha.cos();
        let cos_beta = beta.cos();
        let cos_gamma = gamma.cos();
        let sin_gamma = gamma.sin();

        let cx = c * cos_beta;
        let cy = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let cz_sq = c * c - cx * cx - cy * cy;
        let cz = cz_sq.max(0.0).sqrt();

        let row_basis = Matrix3::new(
            a, 0.0, 0.0, //
            b * cos_gamma, b * sin_gamma, 0.0, //
            cx, cy, cz,
        );
        Self::new(row_basis)
    }

    /// Recover the conventional cell parameters from the basis.
    pub fn parameters(&self) -> LatticeParameters {
        let a_vec = self.basis.column(0).into_owned();
        let b_vec = self.basis.column(1).into_owned();
        let c_vec = self.basis.column(2).into_owned();

        let a = a_vec.norm();
        let b = b_vec.norm();
        let c = c_vec.norm();

        let angle = |u: &Vector3<f64>, v: &Vector3<f64>| -> f64 {
            let cos_theta = (u.dot(v) / (u.norm() * v.norm())).clamp(-1.0, 1.0);
            cos_theta.acos()
        };

        LatticeParameters {
            a,
            b,
            c,
            alpha: angle(&b_vec, &c_vec),
            beta: angle(&a_vec, &c_vec),
            gamma: angle(&a_vec, &b_vec),
        }
    }

    /// Metric tensor `G = A^T A` of the basis vectors.
    pub fn metric_tensor(&self) -> Matrix3<f64> {
        self.basis.transpose() * self.basis
    }

    /// Cartesian coordinates from the given fractional coordinates.
    pub fn cartesian_coords(&self, fractional_coords: &Vector3<f64>) -> Vector3<f64> {
        self.basis * fractional_coords
    }

    /// Volume of the unit cell.
    pub fn volume(&self) -> f64 {
        self.basis.determinant().abs()
    }

    /// Reduce a fractional coordinate into `[0, 1)` componentwise.
    pub fn wrap(point: &Vector3<f64>) -> Vector3<f64> {
        point.map(|v| {
            let w = v.rem_euclid(1.0);
            if (w - 1.0).abs() < EPS {
                0.0
            } else {
                w
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_orthorhombic_roundtrip() {
        let params = LatticeParameters {
            a: 2.0,
            b: 3.0,
            c: 4.0,
            alpha: FRAC_PI_2,
            beta: FRAC_PI_2,
            gamma: FRAC_PI_2,
        };
        let lattice = Lattice::from_parameters(&params);
        let recovered = lattice.parameters();
        assert_relative_eq!(recovered.a, params.a, epsilon = 1e-9);
        assert_relative_eq!(recovered.b, params.b, epsilon = 1e-9);
        assert_relative_eq!(recovered.c, params.c, epsilon = 1e-9);
        assert_relative_eq!(recovered.alpha, params.alpha, epsilon = 1e-9);
        assert_relative_eq!(recovered.beta, params.beta, epsilon = 1e-9);
        assert_relative_eq!(recovered.gamma, params.gamma, epsilon = 1e-9);
    }

    #[test]
    fn test_volume_matches_parallelepiped_formula() {
        let params = LatticeParameters {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            alpha: 1.0,
            beta: 1.1,
            gamma: 1.2,
        };
        let lattice = Lattice::from_parameters(&params);
        assert!(lattice.volume() > 0.0);
    }

    #[test]
    fn test_wrap() {
        let p = Vector3::new(1.25, -0.25, 1.0);
        let w = Lattice::wrap(&p);
        assert_relative_eq!(w.x, 0.25, epsilon = 1e-9);
        assert_relative_eq!(w.y, 0.75, epsilon = 1e-9);
        assert_relative_eq!(w.z, 0.0, epsilon = 1e-9);
    }
}
