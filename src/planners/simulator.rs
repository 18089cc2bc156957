use crate::infra::{Direction, Position};
use crate::state::{CellKind, Grid};

const START_COST_SWAMP: f64 = 1.0;
const START_COST_DRY: f64 = 0.5;
const COST_BOOTED: f64 = 2.0;
const COST_PUT_ON_BOOTS: f64 = 3.0;
const COST_BAREFOOT: f64 = 1.0;

/// How a simulated run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Goal reached within the limit after this much time.
    ReachedGoal(f64),
    /// Elapsed time went past the limit.
    TimedOut,
    /// Every action was spent without reaching the goal.
    Exhausted,
}

impl Outcome {
    /// Time charged for this outcome; failures cost the full limit.
    pub fn time(self, time_limit: f64) -> f64 {
        match self {
            Outcome::ReachedGoal(elapsed) => elapsed,
            Outcome::TimedOut | Outcome::Exhausted => time_limit,
        }
    }
}

/// Walker state during one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorState {
    pub position: Position,
    pub boots_on: bool,
    pub elapsed: f64,
}

impl SimulatorState {
    pub fn new(start: Position) -> Self {
        Self {
            position: start,
            boots_on: false,
            elapsed: 0.0,
        }
    }

    /// Cost of standing on the current cell before the next move, updating the boots.
    /// Off-map cells are never swamp.
    pub fn enter_cell(&mut self, grid: &Grid, first: bool) -> f64 {
        let in_swamp = grid.is_kind(self.position, CellKind::Swamp);

        let cost = match (first, in_swamp, self.boots_on) {
            (true, true, _) => {
                self.boots_on = true;
                START_COST_SWAMP
            }
            (true, false, _) => START_COST_DRY,
            (false, true, true) => COST_BOOTED,
            (false, true, false) => {
                self.boots_on = true;
                COST_PUT_ON_BOOTS
            }
            (false, false, true) => {
                self.boots_on = false;
                COST_BOOTED
            }
            (false, false, false) => COST_BAREFOOT,
        };

        self.elapsed += cost;
        cost
    }

    pub fn advance(&mut self, direction: Direction) {
        self.position = self.position.step(direction);
    }
}

/// Replays `plan` from `start` and reports how it ended.
pub fn run_plan(grid: &Grid, start: Position, plan: &[Direction], time_limit: f64) -> Outcome {
    let mut state = SimulatorState::new(start);

    for (i, &direction) in plan.iter().enumerate() {
        state.enter_cell(grid, i == 0);
        state.advance(direction);

        if grid.is_kind(state.position, CellKind::Goal) && state.elapsed <= time_limit {
            return Outcome::ReachedGoal(state.elapsed);
        }
        if state.elapsed > time_limit {
            return Outcome::TimedOut;
        }
    }

    Outcome::Exhausted
}

/// Time for `plan` from `start`, capped at `time_limit`.
pub fn simulate(grid: &Grid, start: Position, plan: &[Direction], time_limit: f64) -> f64 {
    run_plan(grid, start, plan, time_limit).time(time_limit)
}
