mod agent;
mod plan_space;
mod search;
mod simulator;

pub use agent::{Agent, AgentResponse, Observations, Percept};
pub use plan_space::{MAX_PLAN_LENGTH, PlanIter, PlanSpace};
pub use search::{
    DEFAULT_MAX_PLAN_LENGTH, PlanEvaluation, PlanSearch, SearchSettings, expected_cost,
    plan_length, search,
};
pub use simulator::{Outcome, SimulatorState, run_plan, simulate};
