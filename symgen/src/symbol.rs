//! Hermann-Mauguin point-group symbol printer, used only for labeling a
//! generated structure's symmetry; it plays no role in the generator itself.

use std::collections::HashMap;

use nalgebra::Vector3;

use crate::base::{Operation, OperationAnalyzer, OperationKind};
use crate::data::CrystalFamily;

/// One of the 13 crystallographic axis directions: the three principal
/// axes, six face diagonals, and four body diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StandardAxis {
    X,
    Y,
    Z,
    FaceDiagonal(u8),
    BodyDiagonal(u8),
}

const PRINCIPAL: [(f64, f64, f64); 3] = [(1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 0.0, 1.0)];
const FACE_DIAGONALS: [(f64, f64, f64); 6] = [
    (1.0, 1.0, 0.0),
    (1.0, -1.0, 0.0),
    (1.0, 0.0, 1.0),
    (1.0, 0.0, -1.0),
    (0.0, 1.0, 1.0),
    (0.0, 1.0, -1.0),
];
const BODY_DIAGONALS: [(f64, f64, f64); 4] = [
    (1.0, 1.0, 1.0),
    (1.0, -1.0, 1.0),
    (1.0, 1.0, -1.0),
    (-1.0, 1.0, 1.0),
];

fn axis_parallel(a: &Vector3<f64>, b: (f64, f64, f64), tol: f64) -> bool {
    let candidate = Vector3::new(b.0, b.1, b.2).normalize();
    (a - candidate).norm() < tol || (a + candidate).norm() < tol
}

/// Match a rotation axis against the 13 standard crystallographic
/// directions, treating an axis and its negation as the same direction.
fn classify_axis(axis: &Vector3<f64>, tol: f64) -> Option<StandardAxis> {
    let normalized = axis.normalize();
    for (i, direction) in PRINCIPAL.iter().enumerate() {
        if axis_parallel(&normalized, *direction, tol) {
            return Some(match i {
                0 => StandardAxis::X,
                1 => StandardAxis::Y,
                _ => StandardAxis::Z,
            });
        }
    }
    for (i, direction) in FACE_DIAGONALS.iter().enumerate() {
        if axis_parallel(&normalized, *direction, tol) {
            return Some(StandardAxis::FaceDiagonal(i as u8));
        }
    }
    for (i, direction) in BODY_DIAGONALS.iter().enumerate() {
        if axis_parallel(&normalized, *direction, tol) {
            return Some(StandardAxis::BodyDiagonal(i as u8));
        }
    }
    None
}

#[derive(Debug, Clone, Copy, Default)]
struct AxisRecord {
    max_rotation_order: u32,
    mirror: bool,
    rotoinversion_order: Option<u32>,
}

fn render_axis(record: &AxisRecord) -> Option<String> {
    if record.max_rotation_order > 1 {
        if record.mirror {
            Some(format!("{}/m", record.max_rotation_order))
        } else {
            Some(record.max_rotation_order.to_string())
        }
    } else if let Some(order) = record.rotoinversion_order {
        Some(format!("-{order}"))
    } else if record.mirror {
        Some("m".to_string())
    } else {
        None
    }
}

/// Classify every symmetry operation's axis and emit a Hermann-Mauguin
/// point-group symbol. `operations` only needs to supply one representative
/// per distinct rotation (e.g. a space group's general position, or a
/// Wyckoff position's site symmetry); repeated rotations under different
/// translations are harmless since only the rotation part is inspected.
pub fn point_group_symbol(operations: &[Operation], family: CrystalFamily) -> String {
    let mut axes: HashMap<StandardAxis, AxisRecord> = HashMap::new();
    let mut extras: Vec<String> = Vec::new();
    let mut has_inversion = false;

    for op in operations {
        let analysis = OperationAnalyzer::analyze(op);
        match analysis.kind {
            OperationKind::Identity => {}
            OperationKind::Inversion => has_inversion = true,
            OperationKind::Rotation | OperationKind::Rotoinversion => {
                let Some(axis) = analysis.axis else { continue };
                let Some(order) = analysis.order else { continue };
                let rotation_order = analysis.rotation_order.unwrap_or(order);

                match classify_axis(&axis, 1e-3) {
                    Some(standard) => {
                        let record = axes.entry(standard).or_default();
                        if analysis.kind == OperationKind::Rotation {
                            record.max_rotation_order = record.max_rotation_order.max(rotation_order);
                        } else if order == 2 {
                            record.mirror = true;
                        } else {
                            record.rotoinversion_order =
                                Some(record.rotoinversion_order.map_or(order, |o| o.max(order)));
                        }
                    }
                    None => {
                        let label = if analysis.kind == OperationKind::Rotation {
                            rotation_order.to_string()
                        } else {
                            format!("-{order}")
                        };
                        if !extras.contains(&label) {
                            extras.push(label);
                        }
                    }
                }
            }
            OperationKind::General => {}
        }
    }

    let slot = |members: &[StandardAxis]| -> Option<String> {
        members
            .iter()
            .filter_map(|axis| axes.get(axis).and_then(render_axis))
            .max_by_key(|s| s.len())
    };

    let mut parts: Vec<String> = match family {
        CrystalFamily::Orthorhombic => [
            slot(&[StandardAxis::X]),
            slot(&[StandardAxis::Y]),
            slot(&[StandardAxis::Z]),
        ]
        .into_iter()
        .flatten()
        .collect(),
        CrystalFamily::Tetragonal | CrystalFamily::Hexagonal => [
            slot(&[StandardAxis::Z]),
            slot(&[StandardAxis::X, StandardAxis::Y]),
            slot(&all_face_diagonals()),
        ]
        .into_iter()
        .flatten()
        .collect(),
        CrystalFamily::Cubic => [
            slot(&[StandardAxis::X, StandardAxis::Y, StandardAxis::Z]),
            slot(&all_body_diagonals()),
            slot(&all_face_diagonals()),
        ]
        .into_iter()
        .flatten()
        .collect(),
        CrystalFamily::Triclinic | CrystalFamily::Monoclinic => {
            let mut rendered: Vec<String> = axes.values().filter_map(render_axis).collect();
            rendered.sort();
            rendered.dedup();
            rendered
        }
    };

    parts.extend(extras);

    if parts.is_empty() {
        return if has_inversion {
            "-1".to_string()
        } else {
            "1".to_string()
        };
    }
    parts.join("")
}

fn all_face_diagonals() -> [StandardAxis; 6] {
    [
        StandardAxis::FaceDiagonal(0),
        StandardAxis::FaceDiagonal(1),
        StandardAxis::FaceDiagonal(2),
        StandardAxis::FaceDiagonal(3),
        StandardAxis::FaceDiagonal(4),
        StandardAxis::FaceDiagonal(5),
    ]
}

fn all_body_diagonals() -> [StandardAxis; 4] {
    [
        StandardAxis::BodyDiagonal(0),
        StandardAxis::BodyDiagonal(1),
        StandardAxis::BodyDiagonal(2),
        StandardAxis::BodyDiagonal(3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::space_group_entry;

    #[test]
    fn test_trivial_group_is_one() {
        let ops = vec![Operation::identity()];
        assert_eq!(point_group_symbol(&ops, CrystalFamily::Triclinic), "1");
    }

    #[test]
    fn test_inversion_only_is_minus_one() {
        let entry = space_group_entry(2).unwrap();
        assert_eq!(
            point_group_symbol(&entry.general_positions, CrystalFamily::Triclinic),
            "-1"
        );
    }

    #[test]
    fn test_monoclinic_is_two_over_m() {
        let entry = space_group_entry(14).unwrap();
        assert_eq!(
            point_group_symbol(&entry.general_positions, CrystalFamily::Monoclinic),
            "2/m"
        );
    }

    #[test]
    fn test_cubic_symbol_carries_threefold_rotoinversion() {
        let entry = space_group_entry(225).unwrap();
        let symbol = point_group_symbol(&entry.general_positions, CrystalFamily::Cubic);
        assert!(symbol.contains("-3"));
    }
}
