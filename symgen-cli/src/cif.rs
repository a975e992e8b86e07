//! Minimal CIF writer for a generated structure.

use std::fmt::Write as _;

use symgen::GeneratedStructure;

/// Default symmetry precision reported in the CIF header when the caller
/// does not compute one explicitly.
pub const DEFAULT_SYMPREC: f64 = 0.1;

/// Render a structure as a CIF document. Since every atom is already on a
/// known space-group Wyckoff position, the structure is emitted in `P1`
/// setting with one explicit atom per site rather than a symmetry-reduced
/// asymmetric unit.
pub fn to_cif(structure: &GeneratedStructure, symprec: f64, data_block: &str) -> String {
    let params = structure.lattice.parameters();
    let mut out = String::new();

    let _ = writeln!(out, "data_{data_block}");
    let _ = writeln!(out, "_symmetry_cell_setting           triclinic");
    let _ = writeln!(out, "_symmetry_space_group_name_H-M   'P 1'");
    let _ = writeln!(out, "_symgen_symmetry_precision        {symprec:.4}");
    let _ = writeln!(out, "_cell_length_a     {:.6}", params.a);
    let _ = writeln!(out, "_cell_length_b     {:.6}", params.b);
    let _ = writeln!(out, "_cell_length_c     {:.6}", params.c);
    let _ = writeln!(out, "_cell_angle_alpha  {:.6}", params.alpha.to_degrees());
    let _ = writeln!(out, "_cell_angle_beta   {:.6}", params.beta.to_degrees());
    let _ = writeln!(out, "_cell_angle_gamma  {:.6}", params.gamma.to_degrees());
    let _ = writeln!(out);
    let _ = writeln!(out, "loop_");
    let _ = writeln!(out, "_atom_site_label");
    let _ = writeln!(out, "_atom_site_type_symbol");
    let _ = writeln!(out, "_atom_site_fract_x");
    let _ = writeln!(out, "_atom_site_fract_y");
    let _ = writeln!(out, "_atom_site_fract_z");

    for (i, (species, position)) in structure
        .species
        .iter()
        .zip(structure.positions.iter())
        .enumerate()
    {
        let _ = writeln!(
            out,
            "{species}{idx}  {species}  {:.6}  {:.6}  {:.6}",
            position.x,
            position.y,
            position.z,
            idx = i + 1,
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use symgen::{GeneratedStructure, Lattice, LatticeParameters};

    #[test]
    fn test_to_cif_contains_cell_and_atom_loop() {
        let lattice = Lattice::from_parameters(&LatticeParameters {
            a: 3.0,
            b: 3.0,
            c: 3.0,
            alpha: std::f64::consts::FRAC_PI_2,
            beta: std::f64::consts::FRAC_PI_2,
            gamma: std::f64::consts::FRAC_PI_2,
        });
        let structure = GeneratedStructure::new(
            lattice,
            vec!["Li".to_string()],
            vec![Vector3::new(0.0, 0.0, 0.0)],
        );
        let cif = to_cif(&structure, DEFAULT_SYMPREC, "test");
        assert!(cif.contains("_cell_length_a     3.000000"));
        assert!(cif.contains("loop_"));
        assert!(cif.contains("Li1  Li  0.000000  0.000000  0.000000"));
    }
}
