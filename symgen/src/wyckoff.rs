mod compatibility;
mod orbit;
mod select;

pub use compatibility::check_compatible;
pub use orbit::{orbit_points, sample_representative};
pub use select::choose_wyckoff_combination;
