use log::debug;
use nalgebra::Vector3;
use rand::Rng;

use crate::base::{
    Element, GeneratedStructure, Lattice, SymgenError, MAX_ATTEMPTS_INNER,
    MAX_ATTEMPTS_INNER_RIGID, MAX_ATTEMPTS_MIDDLE, MAX_ATTEMPTS_MIDDLE_RIGID, MAX_ATTEMPTS_OUTER,
    MAX_ATTEMPTS_OUTER_RIGID,
};
use crate::data::{space_group_entry, CrystalFamily, SpaceGroupEntry};
use crate::distance::{distance_tolerance, minimum_image_distance, minimum_image_distance_2d};
use crate::lattice_sampler::{sample_lattice, sample_lattice_2d};
use crate::wyckoff::{
    check_compatible, choose_wyckoff_combination, orbit_points, sample_representative,
};

/// A request to assemble a random structure for one space group and ion
/// inventory.
pub struct GenerationRequest<'a> {
    pub space_group_number: u32,
    pub species: &'a [String],
    /// Ion counts per primitive cell; scaled by the centering multiplier
    /// before being checked against the (conventional-cell) Wyckoff table.
    pub counts: &'a [usize],
    /// Target cell volume per atom, expressed as a multiple of the sum of
    /// atomic volumes implied by covalent radii (the `f` factor).
    pub volume_factor: f64,
    /// Minimum-separation tolerance, as a multiple of the mean of two atoms'
    /// covalent radii.
    pub distance_factor: f64,
}

/// Per-request quantities shared by the 3D and 2D orchestrators, derived
/// once so both retry loops see the same compatibility and sizing numbers.
struct Plan<'a> {
    entry: &'a SpaceGroupEntry,
    elements: Vec<Element>,
    counts: Vec<usize>,
    family: CrystalFamily,
    max_outer: usize,
    max_middle: usize,
    max_inner: usize,
    total_atoms: usize,
    volume_per_atom: f64,
    min_vector_length: f64,
}

fn prepare<'a>(request: &GenerationRequest<'a>) -> Result<Plan<'a>, SymgenError> {
    if request.species.len() != request.counts.len() {
        return Err(SymgenError::IncompatibleCounts);
    }

    let entry = space_group_entry(request.space_group_number)?;
    let elements: Vec<Element> = request
        .species
        .iter()
        .map(|s| Element::lookup(s))
        .collect::<Result<_, _>>()?;

    // Requested counts are per primitive cell; scale to the conventional
    // cell before checking against the tabulated (conventional-cell) Wyckoff
    // multiplicities.
    let multiplier = entry.centering.order();
    let counts: Vec<usize> = request.counts.iter().map(|&n| n * multiplier).collect();

    if !check_compatible(entry, &counts) {
        return Err(SymgenError::IncompatibleCounts);
    }

    let family = CrystalFamily::from_space_group_number(entry.number)?;
    let rigid = entry
        .wyckoff_positions
        .iter()
        .all(|w| w.orientation.is_fixed());
    let (max_outer, max_middle, max_inner) = if rigid {
        (
            MAX_ATTEMPTS_OUTER_RIGID,
            MAX_ATTEMPTS_MIDDLE_RIGID,
            MAX_ATTEMPTS_INNER_RIGID,
        )
    } else {
        (MAX_ATTEMPTS_OUTER, MAX_ATTEMPTS_MIDDLE, MAX_ATTEMPTS_INNER)
    };

    let total_atoms: usize = counts.iter().sum();
    let sphere_volume: f64 = elements
        .iter()
        .zip(counts.iter())
        .map(|(el, &count)| {
            count as f64 * (4.0 / 3.0) * std::f64::consts::PI * el.covalent_radius.powi(3)
        })
        .sum();
    let target_volume = request.volume_factor * sphere_volume;
    let volume_per_atom = target_volume / total_atoms.max(1) as f64;
    let min_vector_length = elements
        .iter()
        .map(|el| 2.0 * el.covalent_radius)
        .fold(1.0_f64, f64::max);

    Ok(Plan {
        entry,
        elements,
        counts,
        family,
        max_outer,
        max_middle,
        max_inner,
        total_atoms,
        volume_per_atom,
        min_vector_length,
    })
}

/// Pack atoms onto a fixed `lattice`, retrying Wyckoff selection (middle
/// loop) and per-species placement (inner loop) up to `plan`'s budgets.
/// `distance_fn` abstracts over full 3D periodicity vs. the 2D slab
/// convention used by [`Generator2D`].
fn pack(
    plan: &Plan,
    request: &GenerationRequest,
    lattice: &Lattice,
    distance_fn: impl Fn(&Lattice, &Vector3<f64>, &Vector3<f64>) -> f64 + Copy,
    rng: &mut impl Rng,
) -> Option<(Vec<String>, Vec<Vector3<f64>>)> {
    'middle: for _middle in 0..plan.max_middle {
        let mut combinations = Vec::with_capacity(plan.counts.len());
        for &count in &plan.counts {
            match choose_wyckoff_combination(&plan.entry.wyckoff_positions, count, rng) {
                Some(combo) => combinations.push(combo),
                None => continue 'middle,
            }
        }

        'inner: for _inner in 0..plan.max_inner {
            let mut placed: Vec<(Vector3<f64>, Element)> = Vec::new();
            let mut species_out: Vec<String> = Vec::new();
            let mut positions_out: Vec<Vector3<f64>> = Vec::new();

            for (species_idx, combo) in combinations.iter().enumerate() {
                let element = plan.elements[species_idx];
                for &wp_idx in combo {
                    let wp = &plan.entry.wyckoff_positions[wp_idx];
                    let representative = sample_representative(wp, rng);
                    let orbit = orbit_points(plan.entry, &representative);

                    for point in &orbit {
                        let fits = placed.iter().all(|(position, other)| {
                            let tol = distance_tolerance(&element, other, request.distance_factor);
                            distance_fn(lattice, point, position) >= tol
                        });
                        if !fits {
                            continue 'inner;
                        }
                        placed.push((*point, element));
                        species_out.push(request.species[species_idx].clone());
                        positions_out.push(*point);
                    }
                }
            }

            return Some((species_out, positions_out));
        }
    }
    None
}

/// Assembles a random structure for one space group and ion inventory,
/// retrying lattice sampling, Wyckoff selection and atomic placement at
/// three independent nesting levels before giving up.
pub struct Generator<'a> {
    request: GenerationRequest<'a>,
}

impl<'a> Generator<'a> {
    pub fn new(request: GenerationRequest<'a>) -> Self {
        Self { request }
    }

    pub fn generate(&self, rng: &mut impl Rng) -> Result<GeneratedStructure, SymgenError> {
        let plan = prepare(&self.request)?;
        debug!(
            "generating sg {} for {} species, {} attempts budgeted (outer/middle/inner = {}/{}/{})",
            self.request.space_group_number,
            self.request.species.len(),
            plan.max_outer * plan.max_middle * plan.max_inner,
            plan.max_outer,
            plan.max_middle,
            plan.max_inner,
        );

        let mut lattice_found = false;
        for outer in 0..plan.max_outer {
            let Some(lattice) = sample_lattice(plan.family, plan.total_atoms, plan.volume_per_atom, rng)
                .filter(|lattice| {
                    let params = lattice.parameters();
                    params.a.min(params.b).min(params.c) >= plan.min_vector_length
                })
            else {
                debug!("outer attempt {outer}: lattice sample rejected");
                continue;
            };
            lattice_found = true;

            if let Some((species, positions)) =
                pack(&plan, &self.request, &lattice, minimum_image_distance, rng)
            {
                debug!("outer attempt {outer}: packed {} atoms", positions.len());
                return Ok(GeneratedStructure::new(lattice, species, positions));
            }
        }

        if !lattice_found {
            debug!("exhausted all outer attempts without a geometrically valid lattice");
            return Err(SymgenError::LatticeSamplingExhausted);
        }
        debug!("exhausted all outer attempts without a valid packing");
        Err(SymgenError::StructureGenerationExhausted)
    }
}

/// Top-level convenience wrapper around [`Generator`].
pub fn generate_structure(
    request: &GenerationRequest,
    rng: &mut impl Rng,
) -> Result<GeneratedStructure, SymgenError> {
    Generator::new(GenerationRequest {
        space_group_number: request.space_group_number,
        species: request.species,
        counts: request.counts,
        volume_factor: request.volume_factor,
        distance_factor: request.distance_factor,
    })
    .generate(rng)
}

/// The layer-group analogue of [`GenerationRequest`]: one lattice axis
/// carries a vacuum gap rather than periodic bonding.
pub struct GenerationRequest2D<'a> {
    pub base: GenerationRequest<'a>,
    /// Vacuum gap along the non-periodic axis, in Angstrom.
    pub vacuum: f64,
    /// Canonical slot (0=a, 1=b, 2=c) that the non-periodic axis is
    /// permuted into after sampling, matching how the reference generator
    /// builds "periodic-axes-first" and then rotates the layer into place.
    pub non_periodic_axis: usize,
}

pub struct Generator2D<'a> {
    request: GenerationRequest2D<'a>,
}

impl<'a> Generator2D<'a> {
    pub fn new(request: GenerationRequest2D<'a>) -> Self {
        Self { request }
    }

    pub fn generate(&self, rng: &mut impl Rng) -> Result<GeneratedStructure, SymgenError> {
        let plan = prepare(&self.request.base)?;

        // The 2D sampler makes only a single attempt per call, by design
        // (see `lattice_sampler::sample_lattice_2d`), so the outer loop here
        // exists only to retry a `None` draw, not to retry rejected lattices.
        let mut lattice_found = false;
        for _outer in 0..plan.max_outer {
            let Some(lattice) = sample_lattice_2d(
                plan.family,
                plan.total_atoms,
                plan.volume_per_atom,
                self.request.vacuum,
                rng,
            ) else {
                continue;
            };
            lattice_found = true;

            if let Some((species, positions)) = pack(
                &plan,
                &self.request.base,
                &lattice,
                minimum_image_distance_2d,
                rng,
            ) {
                let (lattice, positions) =
                    permute_non_periodic_axis(lattice, positions, self.request.non_periodic_axis);
                return Ok(GeneratedStructure::new(lattice, species, positions));
            }
        }

        if !lattice_found {
            return Err(SymgenError::LatticeSamplingExhausted);
        }
        Err(SymgenError::StructureGenerationExhausted)
    }
}

/// Rotate the lattice basis and every position's coordinates so the
/// non-periodic axis (built at slot `c`/index 2 by `sample_lattice_2d`)
/// lands in `target_slot` instead.
fn permute_non_periodic_axis(
    lattice: Lattice,
    positions: Vec<Vector3<f64>>,
    target_slot: usize,
) -> (Lattice, Vec<Vector3<f64>>) {
    if target_slot == 2 {
        return (lattice, positions);
    }
    let order: [usize; 3] = match target_slot {
        0 => [2, 0, 1],
        1 => [0, 2, 1],
        _ => [0, 1, 2],
    };
    let permuted_basis = nalgebra::Matrix3::from_columns(&[
        lattice.basis.column(order[0]).into_owned(),
        lattice.basis.column(order[1]).into_owned(),
        lattice.basis.column(order[2]).into_owned(),
    ]);
    let permuted_positions = positions
        .into_iter()
        .map(|p| Vector3::new(p[order[0]], p[order[1]], p[order[2]]))
        .collect();
    (Lattice { basis: permuted_basis }, permuted_positions)
}
