pub mod game;
pub mod infra;
pub mod planners;
pub mod state;

// Re-export commonly used types for convenience
pub use game::Game;
pub use infra::{Config, Direction, Position, WumpusError};
pub use planners::{Agent, AgentResponse, PlanEvaluation, Percept, search, simulate};
pub use state::{BeliefState, CellKind, Grid, Observation, estimate, humidity};
