mod belief;
mod humidity;
mod map;

#[cfg(test)]
pub(crate) mod testing;

pub use belief::{BeliefState, Candidate, Observation, estimate};
pub use humidity::{MAX_HUMIDITY, humidity};
pub use map::{CellKind, Grid, Neighbors};
