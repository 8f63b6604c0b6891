pub mod linear;
pub mod timeseries;

pub use linear::compute_ticks;
pub use timeseries::{label_for, select_ticks};
