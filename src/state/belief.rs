use crate::infra::{Position, WumpusError, WumpusResult};
use crate::state::{CellKind, Grid, humidity};

// Observation model
const MARKER_HIT: f64 = 0.8;
const MARKER_MISS: f64 = 0.2;
const HUMIDITY_HIT: f64 = 0.8;
const HUMIDITY_MISS: f64 = 0.1;

/// What the agent reports about its current cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub cell_kind: CellKind,
    pub humidity: Option<u32>,
}

impl Observation {
    pub fn new(cell_kind: CellKind, humidity: Option<u32>) -> Self {
        Self {
            cell_kind,
            humidity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub position: Position,
    pub probability: f64,
}

/// Posterior over start positions. Probabilities sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefState {
    candidates: Vec<Candidate>,
}

impl BeliefState {
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn probability_of(&self, pos: Position) -> Option<f64> {
        self.candidates
            .iter()
            .find(|c| c.position == pos)
            .map(|c| c.probability)
    }

    /// Candidates normalized from unnormalized scores.
    fn from_scores(scores: Vec<(Position, f64)>) -> WumpusResult<Self> {
        if scores.is_empty() {
            return Err(WumpusError::DegenerateBelief(
                "no candidate start position matches the observation".to_string(),
            ));
        }

        let total: f64 = scores.iter().map(|(_, score)| score).sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(WumpusError::DegenerateBelief(format!(
                "total likelihood mass is {}",
                total
            )));
        }

        let candidates = scores
            .into_iter()
            .map(|(position, score)| Candidate {
                position,
                probability: score / total,
            })
            .collect();

        Ok(Self { candidates })
    }
}

/// Positions the agent could be standing on given what it sees.
fn candidate_positions(grid: &Grid, observed: CellKind) -> Vec<Position> {
    if observed.is_ambiguous_marker() {
        grid.positions_where(CellKind::is_ambiguous_marker)
    } else {
        grid.positions_where(|kind| kind == observed)
    }
}

fn likelihood(actual: CellKind, actual_humidity: Option<u32>, observation: &Observation) -> f64 {
    let cell_match = if actual == observation.cell_kind && observation.cell_kind.is_ambiguous_marker()
    {
        MARKER_HIT
    } else {
        MARKER_MISS
    };

    let humidity_match = match (observation.humidity, actual_humidity) {
        (None, _) => 1.0,
        (Some(observed), Some(actual)) if observed == actual => HUMIDITY_HIT,
        (Some(_), _) => HUMIDITY_MISS,
    };

    cell_match * humidity_match
}

/// Bayesian estimate of where the agent started.
#[tracing::instrument(level = "debug", skip(grid))]
pub fn estimate(grid: &Grid, observation: &Observation) -> WumpusResult<BeliefState> {
    let mut candidates: Vec<(Position, Option<u32>)> = candidate_positions(grid, observation.cell_kind)
        .into_iter()
        .map(|pos| (pos, None))
        .collect();
    let matched = candidates.len();

    if let Some(observed) = observation.humidity {
        let accepted = observed.saturating_sub(1)..=observed.saturating_add(1);
        candidates = candidates
            .into_iter()
            .filter_map(|(pos, _)| {
                let value = humidity(grid, pos);
                accepted.contains(&value).then_some((pos, Some(value)))
            })
            .collect();
    }

    // Constant factor, cancels on normalization.
    let prior = 1.0 / (grid.rows * grid.rows) as f64;

    let scores = candidates
        .into_iter()
        .map(|(pos, actual_humidity)| {
            let actual = grid.get(pos).unwrap_or(CellKind::Meadow);
            (pos, likelihood(actual, actual_humidity, observation) * prior)
        })
        .collect();

    let belief = BeliefState::from_scores(scores)?;
    tracing::debug!(
        matched = matched,
        retained = belief.len(),
        "Estimated start positions"
    );
    for candidate in belief.iter() {
        tracing::trace!(
            position = %candidate.position,
            probability = candidate.probability,
            "Candidate"
        );
    }

    Ok(belief)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::arb_grid_with_marker;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_ambiguous_markers_share_candidates() {
        let grid = Grid::parse("CMM\nMMB\nMMM").unwrap();
        let belief = estimate(&grid, &Observation::new(CellKind::CurrentMarkerC, None)).unwrap();

        assert_eq!(belief.len(), 2);
        // 0.8 vs 0.2 likelihood
        assert!((belief.probability_of(Position::new(0, 0)).unwrap() - 0.8).abs() < EPS);
        assert!((belief.probability_of(Position::new(1, 2)).unwrap() - 0.2).abs() < EPS);
    }

    #[test]
    fn test_exact_kind_candidates_are_uniform() {
        let grid = Grid::parse("SMS\nMMM").unwrap();
        let belief = estimate(&grid, &Observation::new(CellKind::Swamp, None)).unwrap();

        let positions: Vec<_> = belief.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![Position::new(0, 0), Position::new(0, 2)]);
        for candidate in belief.iter() {
            assert!((candidate.probability - 0.5).abs() < EPS);
        }
    }

    #[test]
    fn test_humidity_narrows_candidates() {
        // (0,0) and (3,2) are dry, (1,3) has humidity 3
        let grid = Grid::parse("CMSS\nMMSC\nMMMS\nMMCM").unwrap();
        let belief = estimate(&grid, &Observation::new(CellKind::CurrentMarkerC, Some(1))).unwrap();

        let positions: Vec<_> = belief.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![Position::new(0, 0), Position::new(3, 2)]);
        // Both are off by one: 0.8 * 0.1 each
        assert!((belief.probability_of(Position::new(0, 0)).unwrap() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_exact_humidity_is_preferred() {
        let grid = Grid::parse("CSM\nMMM\nMMC").unwrap();
        let belief = estimate(&grid, &Observation::new(CellKind::CurrentMarkerC, Some(1))).unwrap();

        // (0,0): 0.8 * 0.8, (2,2): 0.8 * 0.1
        let expected = 0.64 / (0.64 + 0.08);
        assert!((belief.probability_of(Position::new(0, 0)).unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn test_unreachable_humidity_is_degenerate() {
        let grid = Grid::parse("CMM\nMSM\nMMB").unwrap();
        let err = estimate(&grid, &Observation::new(CellKind::CurrentMarkerC, Some(6))).unwrap_err();
        assert!(matches!(err, WumpusError::DegenerateBelief(_)));
    }

    #[test]
    fn test_missing_kind_is_degenerate() {
        let grid = Grid::parse("MMM\nMMM").unwrap();
        let err = estimate(&grid, &Observation::new(CellKind::Goal, None)).unwrap_err();
        assert!(matches!(err, WumpusError::DegenerateBelief(_)));
    }

    #[test]
    fn test_zero_humidity_accepts_one() {
        let grid = Grid::parse("CS\nMM").unwrap();
        let belief = estimate(&grid, &Observation::new(CellKind::CurrentMarkerC, Some(0))).unwrap();
        assert_eq!(belief.len(), 1);
    }

    proptest! {
        #[test]
        fn test_probabilities_sum_to_one(
            grid in arb_grid_with_marker(),
            observed in prop_oneof![Just(CellKind::CurrentMarkerC), Just(CellKind::CurrentMarkerB)],
            observed_humidity in proptest::option::of(0u32..7),
        ) {
            let observation = Observation::new(observed, observed_humidity);
            if let Ok(belief) = estimate(&grid, &observation) {
                let total: f64 = belief.iter().map(|c| c.probability).sum();
                prop_assert!((total - 1.0).abs() < EPS);
                prop_assert!(belief.iter().all(|c| c.probability >= 0.0));
            } else {
                prop_assert!(observed_humidity.is_some());
            }
        }
    }
}
