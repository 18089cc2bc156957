use serde::{Deserialize, Serialize};

use crate::infra::{Direction, WumpusResult};
use crate::planners::search::{PlanSearch, SearchSettings, plan_length};
use crate::state::{CellKind, Grid, Observation, estimate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    #[serde(rename = "current-cell")]
    pub current_cell: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<u32>,
}

/// One percept delivered by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percept {
    pub map: String,
    pub observations: Observations,
    #[serde(rename = "max-time")]
    pub max_time: f64,
}

/// The plan sent back for a percept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub actions: Vec<Direction>,
    #[serde(rename = "expected-time")]
    pub expected_time: f64,
}

/// Stateless percept-to-plan function.
#[derive(Debug, Clone, Default)]
pub struct Agent {
    search: PlanSearch,
}

impl Agent {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            search: PlanSearch::new(settings),
        }
    }

    pub fn decide(&self, percept: &Percept) -> WumpusResult<AgentResponse> {
        let grid = Grid::parse(&percept.map)?;
        let observation = Observation::new(
            CellKind::parse_observation(&percept.observations.current_cell)?,
            percept.observations.humidity,
        );

        plan_length(percept.max_time)?;
        let time_limit = percept.max_time.floor();

        let belief = estimate(&grid, &observation)?;
        let evaluation = self.search.search(&grid, &belief, time_limit)?;

        tracing::debug!(
            rows = grid.rows,
            cols = grid.cols,
            candidates = belief.len(),
            time_limit = time_limit,
            expected_time = evaluation.expected_cost,
            "Decided plan"
        );

        Ok(AgentResponse {
            actions: evaluation.plan,
            expected_time: evaluation.expected_cost,
        })
    }
}
