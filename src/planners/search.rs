use std::time::Instant;

use rayon::prelude::*;

use crate::infra::{Direction, WumpusError, WumpusResult};
use crate::planners::plan_space::{MAX_PLAN_LENGTH, PlanSpace};
use crate::planners::simulator::simulate;
use crate::state::{BeliefState, Grid};

/// Longest plan searched unless a smaller cap is configured.
pub const DEFAULT_MAX_PLAN_LENGTH: usize = MAX_PLAN_LENGTH;

/// The cheapest plan and its expected time.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEvaluation {
    pub plan: Vec<Direction>,
    pub expected_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Evaluate plans on the rayon pool.
    pub parallel: bool,
    /// Longest plan the search accepts.
    pub max_plan_length: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            max_plan_length: DEFAULT_MAX_PLAN_LENGTH,
        }
    }
}

/// Plan length for a time budget: `floor(time_limit) + 1`.
///
/// Budgets whose plans could never be enumerated are refused before the
/// float is narrowed.
pub fn plan_length(time_limit: f64) -> WumpusResult<usize> {
    if !time_limit.is_finite() || time_limit < 0.0 {
        return Err(WumpusError::InvalidTimeBudget(time_limit));
    }
    let floored = time_limit.floor();
    if floored >= MAX_PLAN_LENGTH as f64 {
        return Err(WumpusError::PlanSpaceTooLarge {
            length: (floored as usize).saturating_add(1),
            limit: MAX_PLAN_LENGTH,
        });
    }
    Ok(floored as usize + 1)
}

/// Probability-weighted simulated time of `plan` over every candidate start.
pub fn expected_cost(grid: &Grid, belief: &BeliefState, plan: &[Direction], time_limit: f64) -> f64 {
    belief
        .iter()
        .map(|candidate| candidate.probability * simulate(grid, candidate.position, plan, time_limit))
        .sum()
}

/// Lower cost wins; equal costs go to the earlier plan.
fn better(a: (f64, u64), b: (f64, u64)) -> (f64, u64) {
    if b.0 < a.0 || (b.0 == a.0 && b.1 < a.1) { b } else { a }
}

/// Exhaustive search over every plan of the budgeted length.
#[derive(Debug, Clone, Default)]
pub struct PlanSearch {
    pub settings: SearchSettings,
}

impl PlanSearch {
    pub fn new(settings: SearchSettings) -> Self {
        Self { settings }
    }

    #[tracing::instrument(level = "debug", skip(self, grid, belief), fields(candidates = belief.len()))]
    pub fn search(
        &self,
        grid: &Grid,
        belief: &BeliefState,
        time_limit: f64,
    ) -> WumpusResult<PlanEvaluation> {
        let length = plan_length(time_limit)?;
        if length > self.settings.max_plan_length {
            return Err(WumpusError::PlanSpaceTooLarge {
                length,
                limit: self.settings.max_plan_length,
            });
        }
        if belief.is_empty() {
            return Err(WumpusError::DegenerateBelief(
                "cannot search without candidate start positions".to_string(),
            ));
        }

        let space = PlanSpace::new(length)?;
        let start_time = Instant::now();

        let (best_cost, index) = if self.settings.parallel {
            Self::search_parallel(grid, belief, &space, time_limit)
        } else {
            Self::search_sequential(grid, belief, &space, time_limit)
        };

        // Plan 0 exists in every space and seeds the argmin.
        let mut plan = vec![Direction::North; length];
        space.fill_plan(index, &mut plan);

        tracing::debug!(
            plans = space.size(),
            plan_length = length,
            best_index = index,
            expected_cost = best_cost,
            parallel = self.settings.parallel,
            elapsed_ms = start_time.elapsed().as_secs_f64() * 1000.0,
            "Plan search completed"
        );

        Ok(PlanEvaluation {
            plan,
            expected_cost: best_cost,
        })
    }

    fn search_sequential(
        grid: &Grid,
        belief: &BeliefState,
        space: &PlanSpace,
        time_limit: f64,
    ) -> (f64, u64) {
        let mut best = (f64::INFINITY, 0);
        for (index, plan) in space.iter().enumerate() {
            let cost = expected_cost(grid, belief, &plan, time_limit);
            tracing::trace!(index = index, cost = cost, "Evaluated plan");
            best = better(best, (cost, index as u64));
        }
        best
    }

    fn search_parallel(
        grid: &Grid,
        belief: &BeliefState,
        space: &PlanSpace,
        time_limit: f64,
    ) -> (f64, u64) {
        (0..space.size())
            .into_par_iter()
            .map_init(
                || vec![Direction::North; space.plan_length()],
                |plan, index| {
                    space.fill_plan(index, plan);
                    (expected_cost(grid, belief, plan, time_limit), index)
                },
            )
            .reduce(|| (f64::INFINITY, 0), better)
    }
}

/// Searches with default settings.
pub fn search(grid: &Grid, belief: &BeliefState, time_limit: f64) -> WumpusResult<PlanEvaluation> {
    PlanSearch::default().search(grid, belief, time_limit)
}
