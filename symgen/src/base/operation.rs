use std::collections::VecDeque;
use std::fmt;
use std::ops::Mul;

use nalgebra::base::{Matrix3, Vector3};

use super::error::SymgenError;
use super::tolerance::EPS;

/// Rotation part of an affine symmetry operation, in fractional coordinates.
pub type RotationMatrix = Matrix3<f64>;
/// Translation part of an affine symmetry operation, in fractional coordinates.
pub type Translation = Vector3<f64>;

/// An affine symmetry operation `x' = Rx + t` acting on fractional coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub rotation: RotationMatrix,
    pub translation: Translation,
}

impl Operation {
    pub fn new(rotation: RotationMatrix, translation: Translation) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(RotationMatrix::identity(), Translation::zeros())
    }

    /// Apply the operation to a point in fractional coordinates. Does not
    /// wrap the result back into the unit cell; callers that need a
    /// canonical representative reduce separately.
    pub fn operate(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * point + self.translation
    }

    /// Translation part reduced into `[0, 1)` componentwise.
    pub fn reduced(&self) -> Self {
        let t = self
            .translation
            .map(|v| v.rem_euclid(1.0))
            .map(|v| if (v - 1.0).abs() < EPS { 0.0 } else { v });
        Self::new(self.rotation, t)
    }

    /// Whether `self` and `other` describe the same affine map up to an
    /// integer lattice translation (periodic boundary conditions).
    pub fn equal_mod_pbc(&self, other: &Operation, tol: f64) -> bool {
        if (self.rotation - other.rotation).abs().max() > tol {
            return false;
        }
        let dt = self.translation - other.translation;
        dt.iter().all(|v| (v - v.round()).abs() < tol)
    }

    /// Parse a canonical `"x,y,z"`-style triple (e.g. `"-x+1/2,y,z+1/4"`)
    /// into an affine operation.
    pub fn from_xyz_str(s: &str) -> Result<Self, SymgenError> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(SymgenError::OperationParseError(s.to_string()));
        }

        let mut rotation = RotationMatrix::zeros();
        let mut translation = Translation::zeros();
        for (i, part) in parts.iter().enumerate() {
            let mut row = [0.0f64; 3];
            let mut offset = 0.0f64;
            parse_component(part, &mut row, &mut offset, s)?;
            for j in 0..3 {
                rotation[(i, j)] = row[j];
            }
            translation[i] = offset;
        }

        Ok(Self::new(rotation, translation))
    }

    /// Render back to the canonical `"x,y,z"` triple form.
    pub fn to_xyz_string(&self) -> String {
        format!("{}", self)
    }
}

fn parse_component(
    component: &str,
    row: &mut [f64; 3],
    offset: &mut f64,
    whole: &str,
) -> Result<(), SymgenError> {
    let component = component.trim();
    if component.is_empty() {
        return Err(SymgenError::OperationParseError(whole.to_string()));
    }

    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    for (i, c) in component.char_indices() {
        if (c == '+' || c == '-') && i != 0 {
            tokens.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    tokens.push(current);

    for token in tokens {
        parse_token(&token, row, offset, whole)?;
    }
    Ok(())
}

fn parse_token(
    token: &str,
    row: &mut [f64; 3],
    offset: &mut f64,
    whole: &str,
) -> Result<(), SymgenError> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(());
    }

    let (sign, rest) = if let Some(rest) = token.strip_prefix('-') {
        (-1.0, rest)
    } else if let Some(rest) = token.strip_prefix('+') {
        (1.0, rest)
    } else {
        (1.0, token)
    };
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(SymgenError::OperationParseError(whole.to_string()));
    }

    let err = || SymgenError::OperationParseError(whole.to_string());

    match rest.chars().last() {
        Some(axis @ ('x' | 'y' | 'z')) => {
            let idx = match axis {
                'x' => 0,
                'y' => 1,
                'z' => 2,
                _ => unreachable!(),
            };
            let coeff_str = &rest[..rest.len() - axis.len_utf8()];
            let coeff = if coeff_str.is_empty() {
                1.0
            } else {
                coeff_str.parse::<f64>().map_err(|_| err())?
            };
            row[idx] += sign * coeff;
        }
        _ => {
            let value = if let Some((num, den)) = rest.split_once('/') {
                let n: f64 = num.trim().parse().map_err(|_| err())?;
                let d: f64 = den.trim().parse().map_err(|_| err())?;
                if d == 0.0 {
                    return Err(err());
                }
                n / d
            } else {
                rest.parse::<f64>().map_err(|_| err())?
            };
            *offset += sign * value;
        }
    }
    Ok(())
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = ["x", "y", "z"];
        let rows: Vec<String> = (0..3)
            .map(|i| {
                let linear = (0..3)
                    .filter_map(|j| {
                        let coeff = self.rotation[(i, j)];
                        if coeff.round() == 0.0 || coeff.abs() < EPS {
                            return None;
                        }
                        let rounded = coeff.round();
                        let magnitude = rounded.abs();
                        Some(format!(
                            "{}{}{}",
                            if rounded > 0.0 { "+" } else { "-" },
                            if (magnitude - 1.0).abs() < EPS {
                                String::new()
                            } else {
                                format!("{}", magnitude as i64)
                            },
                            symbols[j]
                        ))
                    })
                    .collect::<Vec<_>>()
                    .concat();
                let t = self.translation[i];
                let frac = if t.abs() < EPS {
                    String::new()
                } else {
                    format!("{}{}", if t > 0.0 { "+" } else { "" }, t)
                };
                format!("{}{}", linear, frac)
            })
            .collect();
        write!(f, "{},{},{}", rows[0], rows[1], rows[2])
    }
}

impl Mul for Operation {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        // (r1, t1) * (r2, t2) = (r1 * r2, r1 * t2 + t1)
        let new_rotation = self.rotation * rhs.rotation;
        let new_translation = self.rotation * rhs.translation + self.translation;
        Self::new(new_rotation, new_translation)
    }
}

impl Mul for &Operation {
    type Output = Operation;

    fn mul(self, rhs: Self) -> Operation {
        self.clone() * rhs.clone()
    }
}

/// Classification of an operation's rotation part, per the crystallographic
/// proper/improper rotation taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Identity,
    Inversion,
    Rotation,
    Rotoinversion,
    /// Rotation part is not an orthogonal matrix, or its angle is not a
    /// rational multiple of a full turn within the supported order range.
    General,
}

/// Axis, angle and order decomposition of an operation's rotation part,
/// following the classification used throughout the International Tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationAnalyzer {
    pub kind: OperationKind,
    pub axis: Option<Vector3<f64>>,
    pub angle: Option<f64>,
    /// Order of the underlying proper rotation (before doubling for odd-order
    /// rotoinversions).
    pub rotation_order: Option<u32>,
    /// Order of the operation itself.
    pub order: Option<u32>,
}

impl OperationAnalyzer {
    pub fn analyze(operation: &Operation) -> Self {
        let r = operation.rotation;

        if !is_orthogonal(&r) {
            return Self {
                kind: OperationKind::General,
                axis: None,
                angle: None,
                rotation_order: None,
                order: None,
            };
        }

        if is_identity(&r) {
            return Self {
                kind: OperationKind::Identity,
                axis: None,
                angle: Some(0.0),
                rotation_order: Some(1),
                order: Some(1),
            };
        }
        if is_identity(&(-r)) {
            return Self {
                kind: OperationKind::Inversion,
                axis: None,
                angle: Some(0.0),
                rotation_order: Some(1),
                order: Some(2),
            };
        }

        let det = r.determinant();
        let proper = if det < 0.0 { -r } else { r };
        let trace = proper[(0, 0)] + proper[(1, 1)] + proper[(2, 2)];

        let angle = rotation_angle(trace);
        let axis = rotation_axis(&proper, angle);

        let rotation_order = match order_from_angle(angle) {
            Some(n) => n,
            None => {
                return Self {
                    kind: OperationKind::General,
                    axis,
                    angle: Some(angle),
                    rotation_order: None,
                    order: None,
                };
            }
        };

        let (kind, order) = if det > 0.0 {
            (OperationKind::Rotation, rotation_order)
        } else {
            // Rotoinversions of odd rotational order double their order
            // (e.g. -3 has order 6), matching the usual convention.
            let order = if rotation_order % 2 == 1 {
                2 * rotation_order
            } else {
                rotation_order
            };
            (OperationKind::Rotoinversion, order)
        };

        Self {
            kind,
            axis,
            angle: Some(angle),
            rotation_order: Some(rotation_order),
            order: Some(order),
        }
    }

    /// Two operations are conjugate when they share kind and order; used to
    /// group symmetry elements when deriving a point-group symbol.
    pub fn is_conjugate(&self, other: &Self) -> bool {
        self.kind == other.kind && self.order == other.order
    }
}

fn is_orthogonal(m: &RotationMatrix) -> bool {
    let prod = m.transpose() * m;
    (prod - RotationMatrix::identity()).abs().max() < 1e-4
}

fn is_identity(m: &RotationMatrix) -> bool {
    (m - RotationMatrix::identity()).abs().max() < 1e-4
}

fn rotation_angle(trace: f64) -> f64 {
    (((trace - 1.0) / 2.0).clamp(-1.0, 1.0)).acos()
}

fn rotation_axis(proper: &RotationMatrix, angle: f64) -> Option<Vector3<f64>> {
    if angle.abs() < 1e-4 {
        return None;
    }
    let antisym = Vector3::new(
        proper[(2, 1)] - proper[(1, 2)],
        proper[(0, 2)] - proper[(2, 0)],
        proper[(1, 0)] - proper[(0, 1)],
    );
    let r = antisym.norm();
    if r > 1e-4 {
        return Some(antisym / r);
    }
    // theta is close to pi: the antisymmetric part vanishes and the axis
    // must be recovered from the symmetric part, (proper + I) / 2 = n n^T.
    let sym = (proper + RotationMatrix::identity()) * 0.5;
    let mut axis = Vector3::new(
        sym[(0, 0)].max(0.0).sqrt(),
        sym[(1, 1)].max(0.0).sqrt(),
        sym[(2, 2)].max(0.0).sqrt(),
    );
    if axis.x > 1e-6 {
        if sym[(0, 1)] < 0.0 {
            axis.y = -axis.y;
        }
        if sym[(0, 2)] < 0.0 {
            axis.z = -axis.z;
        }
    } else if axis.y > 1e-6 && sym[(1, 2)] < 0.0 {
        axis.z = -axis.z;
    }
    let norm = axis.norm();
    if norm < 1e-6 {
        None
    } else {
        Some(axis / norm)
    }
}

/// Smallest `n` in `1..=60` such that `angle` is `2*pi/n` within tolerance,
/// or `None` if the axis is irrational (not a crystallographic rotation).
fn order_from_angle(angle: f64) -> Option<u32> {
    let two_pi = 2.0 * std::f64::consts::PI;
    for n in 1..=60u32 {
        let candidate = two_pi / n as f64;
        if (angle - candidate).abs() < 1e-2 {
            return Some(n);
        }
    }
    None
}

/// Generate the closure of a set of affine generators under composition,
/// with translations reduced into the unit cell. Mirrors the point-group
/// closure used to derive Wyckoff general positions from a compact
/// generator seed, but over the full affine group instead of bare
/// rotations.
pub fn closure(generators: &[Operation], tol: f64) -> Vec<Operation> {
    let mut group: Vec<Operation> = vec![Operation::identity()];
    let mut queue: VecDeque<Operation> = VecDeque::new();
    queue.push_back(Operation::identity());

    while let Some(op) = queue.pop_front() {
        for generator in generators {
            let candidate = (generator.clone() * op.clone()).reduced();
            if group
                .iter()
                .any(|existing| existing.equal_mod_pbc(&candidate, tol))
            {
                continue;
            }
            group.push(candidate.clone());
            queue.push_back(candidate);
        }
    }

    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_identity() {
        let op = Operation::from_xyz_str("x,y,z").unwrap();
        assert_relative_eq!(op.rotation, RotationMatrix::identity());
        assert_relative_eq!(op.translation, Translation::zeros());
    }

    #[test]
    fn test_parse_with_fraction_and_sign() {
        let op = Operation::from_xyz_str("-x+1/2,y,z+1/4").unwrap();
        assert_relative_eq!(op.rotation[(0, 0)], -1.0);
        assert_relative_eq!(op.translation[0], 0.5);
        assert_relative_eq!(op.translation[2], 0.25);
    }

    #[test]
    fn test_parse_coefficient() {
        let op = Operation::from_xyz_str("2x-y,y,z").unwrap();
        assert_relative_eq!(op.rotation[(0, 0)], 2.0);
        assert_relative_eq!(op.rotation[(0, 1)], -1.0);
    }

    #[test]
    fn test_roundtrip_display() {
        let op = Operation::from_xyz_str("-x,-y,z+1/2").unwrap();
        let rendered = op.to_xyz_string();
        let reparsed = Operation::from_xyz_str(&rendered).unwrap();
        assert!(op.equal_mod_pbc(&reparsed, 1e-6));
    }

    #[test]
    fn test_equal_mod_pbc() {
        let a = Operation::from_xyz_str("x,y,z+1/2").unwrap();
        let b = Operation::from_xyz_str("x,y,z-1/2").unwrap();
        assert!(a.equal_mod_pbc(&b, 1e-6));
    }

    #[test]
    fn test_compose() {
        let a = Operation::from_xyz_str("-x,-y,z").unwrap();
        let b = Operation::from_xyz_str("x+1/2,y+1/2,z").unwrap();
        let c = a * b;
        let expect = Operation::from_xyz_str("-x-1/2,-y-1/2,z").unwrap();
        assert!(c.equal_mod_pbc(&expect, 1e-6));
    }

    #[test]
    fn test_classify_identity_and_inversion() {
        let id = Operation::from_xyz_str("x,y,z").unwrap();
        assert_eq!(OperationAnalyzer::analyze(&id).kind, OperationKind::Identity);

        let inv = Operation::from_xyz_str("-x,-y,-z").unwrap();
        assert_eq!(OperationAnalyzer::analyze(&inv).kind, OperationKind::Inversion);
    }

    #[test]
    fn test_classify_twofold_rotation() {
        // twofold rotation about z
        let op = Operation::from_xyz_str("-x,-y,z").unwrap();
        let analysis = OperationAnalyzer::analyze(&op);
        assert_eq!(analysis.kind, OperationKind::Rotation);
        assert_eq!(analysis.order, Some(2));
        let axis = analysis.axis.unwrap();
        assert_relative_eq!(axis.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(axis.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(axis.z.abs(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_classify_threefold_rotation() {
        // threefold rotation permuting x,y,z, as found in cubic space groups
        let op = Operation::from_xyz_str("z,x,y").unwrap();
        let analysis = OperationAnalyzer::analyze(&op);
        assert_eq!(analysis.kind, OperationKind::Rotation);
        assert_eq!(analysis.order, Some(3));
    }

    #[test]
    fn test_closure_generates_expected_order() {
        // P2/m-ish toy group: inversion + twofold rotation generate order 4
        let inversion = Operation::from_xyz_str("-x,-y,-z").unwrap();
        let twofold = Operation::from_xyz_str("-x,y,-z").unwrap();
        let group = closure(&[inversion, twofold], 1e-6);
        assert_eq!(group.len(), 4);
    }
}
