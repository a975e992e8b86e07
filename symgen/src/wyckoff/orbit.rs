use std::collections::HashMap;

use nalgebra::Vector3;
use rand::Rng;

use crate::base::Lattice;
use crate::data::{SpaceGroupEntry, WyckoffPosition};

/// Sample a concrete representative point for a Wyckoff position: a fixed
/// point for zero-degree-of-freedom positions, otherwise the anchor shifted
/// by a random displacement projected onto the position's invariant
/// subspace.
pub fn sample_representative(wp: &WyckoffPosition, rng: &mut impl Rng) -> Vector3<f64> {
    if wp.orientation.is_fixed() {
        return Lattice::wrap(&wp.representative);
    }
    let free = Vector3::new(
        rng.gen_range(0.0..1.0),
        rng.gen_range(0.0..1.0),
        rng.gen_range(0.0..1.0),
    );
    let displacement = wp.orientation.project(&free);
    Lattice::wrap(&(wp.representative + displacement))
}

/// Expand a single representative point into its full orbit under the
/// space group's general position, collapsing the duplicate images that
/// different cosets of the site's stabilizer necessarily produce.
pub fn orbit_points(entry: &SpaceGroupEntry, representative: &Vector3<f64>) -> Vec<Vector3<f64>> {
    let images: Vec<Vector3<f64>> = entry
        .general_positions
        .iter()
        .map(|op| Lattice::wrap(&op.operate(representative)))
        .collect();
    merge_coincident_images(images, 1e-5)
}

fn periodic_separation(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    let mut d = a - b;
    for k in 0..3 {
        d[k] -= d[k].round();
    }
    d
}

fn find(parent: &mut [usize], i: usize) -> usize {
    let mut i = i;
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Collapse numerically-coincident images produced by distinct cosets of a
/// site's stabilizer into one representative per connected component. Uses
/// an iterative union-find instead of recursive flood fill so that large
/// orbits never risk stack depth.
fn merge_coincident_images(images: Vec<Vector3<f64>>, tol: f64) -> Vec<Vector3<f64>> {
    let n = images.len();
    let mut parent: Vec<usize> = (0..n).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if periodic_separation(&images[i], &images[j]).norm() < tol {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[ri] = rj;
                }
            }
        }
    }

    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(i);
    }

    let mut merged: Vec<Vector3<f64>> = groups
        .into_values()
        .map(|members| {
            let base = images[members[0]];
            let mut acc = Vector3::zeros();
            for &idx in &members {
                acc += base + periodic_separation(&images[idx], &base);
            }
            Lattice::wrap(&(acc / members.len() as f64))
        })
        .collect();
    merged.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap()
            .then(a.y.partial_cmp(&b.y).unwrap())
            .then(a.z.partial_cmp(&b.z).unwrap())
    });
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::space_group_entry;

    #[test]
    fn test_orbit_size_matches_multiplicity() {
        let entry = space_group_entry(225).unwrap();
        let wp = entry.wyckoff('a').unwrap();
        let points = orbit_points(entry, &wp.representative);
        assert_eq!(points.len(), wp.multiplicity);
    }

    #[test]
    fn test_general_position_orbit_is_generic() {
        let entry = space_group_entry(2).unwrap();
        let wp = entry.wyckoff('i').unwrap();
        let points = orbit_points(entry, &wp.representative);
        assert_eq!(points.len(), wp.multiplicity);
        assert_eq!(points.len(), 2);
    }
}
