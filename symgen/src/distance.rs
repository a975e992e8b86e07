use nalgebra::Vector3;

use crate::base::{Element, Lattice, TOL_M};

/// Minimum-image Cartesian distance between two fractional coordinates
/// under full 3D periodicity, scanning all 27 neighboring images.
pub fn minimum_image_distance(lattice: &Lattice, a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    minimum_image_distance_with_offsets(lattice, a, b, &full_periodic_offsets())
}

/// As [`minimum_image_distance`], but restricted to the offsets relevant
/// for a structure periodic in only the first two lattice directions (the
/// third carries a vacuum gap and must not wrap).
pub fn minimum_image_distance_2d(lattice: &Lattice, a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    minimum_image_distance_with_offsets(lattice, a, b, &planar_periodic_offsets())
}

fn minimum_image_distance_with_offsets(
    lattice: &Lattice,
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    offsets: &[Vector3<f64>],
) -> f64 {
    let diff = a - b;
    offsets
        .iter()
        .map(|offset| lattice.cartesian_coords(&(diff + offset)).norm())
        .fold(f64::MAX, f64::min)
}

fn full_periodic_offsets() -> Vec<Vector3<f64>> {
    let mut offsets = Vec::with_capacity(27);
    for i in -1..=1 {
        for j in -1..=1 {
            for k in -1..=1 {
                offsets.push(Vector3::new(i as f64, j as f64, k as f64));
            }
        }
    }
    offsets
}

fn planar_periodic_offsets() -> Vec<Vector3<f64>> {
    let mut offsets = Vec::with_capacity(9);
    for i in -1..=1 {
        for j in -1..=1 {
            offsets.push(Vector3::new(i as f64, j as f64, 0.0));
        }
    }
    offsets
}

/// Minimum acceptable separation between two species, `factor` times the
/// mean of their covalent radii, floored at [`TOL_M`].
pub fn distance_tolerance(a: &Element, b: &Element, factor: f64) -> f64 {
    (factor * 0.5 * (a.covalent_radius + b.covalent_radius)).max(TOL_M)
}

/// Whether a newly placed species at `candidate` keeps at least
/// `distance_tolerance` away from every already-placed atom.
pub fn check_distance(
    lattice: &Lattice,
    candidate: &Vector3<f64>,
    candidate_element: &Element,
    placed: &[(Vector3<f64>, Element)],
    factor: f64,
) -> bool {
    placed.iter().all(|(position, element)| {
        let tol = distance_tolerance(candidate_element, element, factor);
        minimum_image_distance(lattice, candidate, position) >= tol
    })
}

/// Pairwise-verify every atom in a finished structure against every other,
/// used as a final sanity sweep once a full structure has been assembled.
pub fn verify_distances(
    lattice: &Lattice,
    positions: &[Vector3<f64>],
    elements: &[Element],
    factor: f64,
) -> bool {
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let tol = distance_tolerance(&elements[i], &elements[j], factor);
            if minimum_image_distance(lattice, &positions[i], &positions[j]) < tol {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::LatticeParameters;
    use std::f64::consts::FRAC_PI_2;

    fn cubic(a: f64) -> Lattice {
        Lattice::from_parameters(&LatticeParameters {
            a,
            b: a,
            c: a,
            alpha: FRAC_PI_2,
            beta: FRAC_PI_2,
            gamma: FRAC_PI_2,
        })
    }

    #[test]
    fn test_minimum_image_prefers_wrapped_neighbor() {
        let lattice = cubic(5.0);
        let a = Vector3::new(0.05, 0.0, 0.0);
        let b = Vector3::new(0.95, 0.0, 0.0);
        // direct fractional separation is 0.9 but the periodic image is 0.1
        let d = minimum_image_distance(&lattice, &a, &b);
        assert!((d - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_verify_distances_rejects_overlap() {
        let lattice = cubic(10.0);
        let li = Element::lookup("Li").unwrap();
        let positions = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.001, 0.0, 0.0)];
        let elements = vec![li, li];
        assert!(!verify_distances(&lattice, &positions, &elements, 1.0));
    }
}
