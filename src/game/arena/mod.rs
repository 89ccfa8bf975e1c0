pub mod bounds;
pub mod obstacle;

pub use bounds::{ArenaBounds, spawn_points};
pub use obstacle::{Barrier, generate_barriers};
