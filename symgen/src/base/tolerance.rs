/// General-purpose floating point comparison tolerance.
pub const EPS: f64 = 1e-8;

/// Minimum interatomic separation tolerance, in Angstrom, used as a floor
/// whenever a species-dependent tolerance (half a covalent radius) would be
/// smaller than this.
pub const TOL_M: f64 = 1.0;

/// Default minimum lattice angle (and, by symmetry, `PI - ANG_MIN` is the
/// default maximum).
pub const ANG_MIN: f64 = std::f64::consts::PI / 6.0;

/// Default maximum allowed ratio between any two lattice vector lengths.
pub const MAX_RATIO: f64 = 10.0;

/// Default outer/middle/inner retry budgets for the generator orchestrator.
pub const MAX_ATTEMPTS_OUTER: usize = 30;
pub const MAX_ATTEMPTS_MIDDLE: usize = 30;
pub const MAX_ATTEMPTS_INNER: usize = 30;

/// Reduced budgets used once `check_compatible` reports zero degrees of freedom.
pub const MAX_ATTEMPTS_OUTER_RIGID: usize = 5;
pub const MAX_ATTEMPTS_MIDDLE_RIGID: usize = 5;
pub const MAX_ATTEMPTS_INNER_RIGID: usize = 5;
