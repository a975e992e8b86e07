use std::collections::HashMap;
use std::sync::OnceLock;

use nalgebra::Vector3;

use crate::base::{closure, Operation, Orientation, SymgenError, EPS};

use super::centering::Centering;

/// One orbit of a space group: a letter, its representative point, the
/// operations of the full space group that fix that point modulo a lattice
/// translation, and the derived degrees of freedom available when sampling
/// a concrete representative at generation time.
#[derive(Debug, Clone)]
pub struct WyckoffPosition {
    pub letter: char,
    pub multiplicity: usize,
    pub representative: Vector3<f64>,
    pub site_symmetry: Vec<Operation>,
    pub orientation: Orientation,
}

/// A fully expanded space group: its general position (with centering
/// translations applied) and the Wyckoff positions derived from it.
pub struct SpaceGroupEntry {
    pub number: u32,
    pub symbol: &'static str,
    pub centering: Centering,
    pub general_positions: Vec<Operation>,
    pub wyckoff_positions: Vec<WyckoffPosition>,
}

impl SpaceGroupEntry {
    pub fn wyckoff(&self, letter: char) -> Option<&WyckoffPosition> {
        self.wyckoff_positions.iter().find(|w| w.letter == letter)
    }
}

/// Compact seed data for one supported space group: a handful of
/// xyz-string generators (which the group closure expands into the full
/// primitive-cell point/space group) and a set of named representative
/// points. Representative points for positions with free coordinates use a
/// generic numeric placeholder for the free component so that the
/// stabilizer search below does not pick up accidental extra symmetry.
struct RawEntry {
    number: u32,
    symbol: &'static str,
    centering: Centering,
    generators: &'static [&'static str],
    points: &'static [(char, f64, f64, f64)],
}

/// A value with no special crystallographic meaning, used in place of a
/// free coordinate so the computed stabilizer reflects only the fixed
/// coordinates of a position.
const GENERIC: f64 = 0.1234;
const GENERIC_2: f64 = 0.2137;
const GENERIC_3: f64 = 0.3191;

const RAW_TABLE: &[RawEntry] = &[
    RawEntry {
        number: 1,
        symbol: "P1",
        centering: Centering::P,
        generators: &[],
        points: &[('a', GENERIC, GENERIC_2, GENERIC_3)],
    },
    RawEntry {
        number: 2,
        symbol: "P-1",
        centering: Centering::P,
        generators: &["-x,-y,-z"],
        points: &[
            ('a', 0.0, 0.0, 0.0),
            ('b', 0.5, 0.0, 0.0),
            ('c', 0.0, 0.5, 0.0),
            ('d', 0.0, 0.0, 0.5),
            ('e', 0.5, 0.5, 0.0),
            ('f', 0.5, 0.0, 0.5),
            ('g', 0.0, 0.5, 0.5),
            ('h', 0.5, 0.5, 0.5),
            ('i', GENERIC, GENERIC_2, GENERIC_3),
        ],
    },
    RawEntry {
        number: 14,
        symbol: "P21/c",
        centering: Centering::P,
        generators: &["-x,y+1/2,-z+1/2", "-x,-y,-z"],
        points: &[
            ('a', 0.0, 0.0, 0.0),
            ('b', 0.5, 0.0, 0.0),
            ('c', 0.0, 0.0, 0.5),
            ('d', 0.5, 0.0, 0.5),
            ('e', GENERIC, GENERIC_2, GENERIC_3),
        ],
    },
    RawEntry {
        number: 62,
        symbol: "Pnma",
        centering: Centering::P,
        generators: &["-x+1/2,-y,z+1/2", "-x,y+1/2,-z", "-x,-y,-z"],
        points: &[
            ('a', 0.0, 0.0, 0.0),
            ('b', 0.0, 0.0, 0.5),
            ('c', GENERIC, 0.25, GENERIC_3),
            ('d', GENERIC, GENERIC_2, GENERIC_3),
        ],
    },
    RawEntry {
        number: 139,
        symbol: "I4/mmm",
        centering: Centering::I,
        generators: &["-y,x,z", "x,-y,z", "-x,-y,-z"],
        points: &[
            ('a', 0.0, 0.0, 0.0),
            ('e', 0.0, 0.0, GENERIC_3),
            ('y', GENERIC, GENERIC_2, GENERIC_3),
        ],
    },
    RawEntry {
        number: 194,
        symbol: "P6_3/mmc",
        centering: Centering::P,
        generators: &["x-y,x,z+1/2", "-x,-y,-z+1/2", "y,x,z"],
        points: &[
            ('a', 0.0, 0.0, 0.0),
            ('b', 0.0, 0.0, 0.25),
            ('c', 1.0 / 3.0, 2.0 / 3.0, 0.25),
            ('h', GENERIC, GENERIC_2, GENERIC_3),
        ],
    },
    RawEntry {
        number: 206,
        symbol: "Ia-3",
        centering: Centering::I,
        generators: &["-x+1/2,-y,z+1/2", "z,x,y", "-x,-y,-z"],
        points: &[
            ('a', 0.0, 0.0, 0.0),
            ('b', 0.25, 0.25, 0.25),
            ('c', GENERIC, GENERIC, GENERIC),
            ('d', GENERIC, GENERIC_2, GENERIC_3),
        ],
    },
    RawEntry {
        number: 225,
        symbol: "Fm-3m",
        centering: Centering::F,
        generators: &["-y,x,z", "z,x,y", "-x,-y,-z"],
        points: &[
            ('a', 0.0, 0.0, 0.0),
            ('b', 0.5, 0.5, 0.5),
            ('c', 0.25, 0.25, 0.25),
            ('x', GENERIC, GENERIC_2, GENERIC_3),
        ],
    },
    RawEntry {
        number: 230,
        symbol: "Ia-3d",
        centering: Centering::I,
        generators: &["z,x,y", "-x+1/2,-y,z+1/2", "-x,-y,-z"],
        points: &[
            ('a', 0.0, 0.0, 0.0),
            ('b', 0.125, 0.125, 0.125),
            ('c', GENERIC, GENERIC, GENERIC),
        ],
    },
];

fn points_equal_mod_one(a: &Vector3<f64>, b: &Vector3<f64>, tol: f64) -> bool {
    (a - b).iter().all(|v| (v - v.round()).abs() < tol)
}

fn dedupe_operations(mut ops: Vec<Operation>, tol: f64) -> Vec<Operation> {
    let mut unique: Vec<Operation> = Vec::with_capacity(ops.len());
    for op in ops.drain(..) {
        if !unique.iter().any(|u| u.equal_mod_pbc(&op, tol)) {
            unique.push(op);
        }
    }
    unique
}

fn build_entry(raw: &RawEntry) -> SpaceGroupEntry {
    let generators: Vec<Operation> = raw
        .generators
        .iter()
        .map(|s| Operation::from_xyz_str(s).expect("built-in generator strings must parse"))
        .collect();
    let primitive_group = closure(&generators, EPS);

    let mut general_positions = Vec::new();
    for lattice_point in raw.centering.lattice_points() {
        for op in &primitive_group {
            let translated =
                Operation::new(op.rotation, op.translation + lattice_point).reduced();
            general_positions.push(translated);
        }
    }
    let general_positions = dedupe_operations(general_positions, EPS);

    let wyckoff_positions = raw
        .points
        .iter()
        .map(|&(letter, x, y, z)| {
            let representative = Vector3::new(x, y, z);
            let site_symmetry: Vec<Operation> = general_positions
                .iter()
                .filter(|op| {
                    let mapped = op.operate(&representative);
                    points_equal_mod_one(&mapped, &representative, 1e-6)
                })
                .cloned()
                .collect();
            let multiplicity = general_positions.len() / site_symmetry.len();
            let orientation = Orientation::from_site_symmetry(&site_symmetry);
            WyckoffPosition {
                letter,
                multiplicity,
                representative,
                site_symmetry,
                orientation,
            }
        })
        .collect();

    SpaceGroupEntry {
        number: raw.number,
        symbol: raw.symbol,
        centering: raw.centering,
        general_positions,
        wyckoff_positions,
    }
}

fn table() -> &'static HashMap<u32, SpaceGroupEntry> {
    static TABLE: OnceLock<HashMap<u32, SpaceGroupEntry>> = OnceLock::new();
    TABLE.get_or_init(|| RAW_TABLE.iter().map(|raw| (raw.number, build_entry(raw))).collect())
}

/// Look up the fully expanded entry for a supported space group number.
pub fn space_group_entry(number: u32) -> Result<&'static SpaceGroupEntry, SymgenError> {
    table()
        .get(&number)
        .ok_or(SymgenError::UnknownSpaceGroup(number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p1_general_position_is_multiplicity_one() {
        let entry = space_group_entry(1).unwrap();
        assert_eq!(entry.general_positions.len(), 1);
        assert_eq!(entry.wyckoff('a').unwrap().multiplicity, 1);
    }

    #[test]
    fn test_fm3m_rock_salt_sites_have_multiplicity_four() {
        let entry = space_group_entry(225).unwrap();
        assert_eq!(entry.general_positions.len(), 192);
        assert_eq!(entry.wyckoff('a').unwrap().multiplicity, 4);
        assert_eq!(entry.wyckoff('b').unwrap().multiplicity, 4);
    }

    #[test]
    fn test_ia3_diagonal_site_has_multiplicity_sixteen() {
        let entry = space_group_entry(206).unwrap();
        assert_eq!(entry.wyckoff('c').unwrap().multiplicity, 16);
    }

    #[test]
    fn test_ia3d_has_no_singleton_wyckoff_position() {
        let entry = space_group_entry(230).unwrap();
        assert!(entry.wyckoff_positions.iter().all(|w| w.multiplicity > 1));
    }

    #[test]
    fn test_unsupported_number_errors() {
        assert!(space_group_entry(4).is_err());
    }
}
