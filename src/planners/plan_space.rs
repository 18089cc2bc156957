use crate::infra::{Direction, WumpusError, WumpusResult};

/// Longest plan whose space size still fits a `u64` counter.
pub const MAX_PLAN_LENGTH: usize = 31;

/// Every plan of a fixed length, addressed by enumeration index.
///
/// Index `i` is read as a base-4 number with the first action as the most
/// significant digit, so increasing indices follow nested loops over
/// `Direction::ALL` with the first action outermost. Nothing is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSpace {
    length: usize,
    size: u64,
}

impl PlanSpace {
    pub fn new(length: usize) -> WumpusResult<Self> {
        let too_large = WumpusError::PlanSpaceTooLarge {
            length,
            limit: MAX_PLAN_LENGTH,
        };
        let exponent = u32::try_from(length).map_err(|_| too_large.clone())?;
        let size = (Direction::ALL.len() as u64)
            .checked_pow(exponent)
            .ok_or(too_large)?;
        Ok(Self { length, size })
    }

    pub fn plan_length(&self) -> usize {
        self.length
    }

    /// Number of plans.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Writes plan `index` into `plan`, which must have the plan length.
    pub fn fill_plan(&self, index: u64, plan: &mut [Direction]) {
        debug_assert!(index < self.size);
        debug_assert_eq!(plan.len(), self.length);

        let mut rest = index;
        for slot in plan.iter_mut().rev() {
            *slot = Direction::ALL[(rest % 4) as usize];
            rest /= 4;
        }
    }

    pub fn plan_at(&self, index: u64) -> Option<Vec<Direction>> {
        if index >= self.size {
            return None;
        }
        let mut plan = vec![Direction::North; self.length];
        self.fill_plan(index, &mut plan);
        Some(plan)
    }

    /// Restartable iterator over all plans in enumeration order.
    pub fn iter(&self) -> PlanIter {
        PlanIter {
            current: Some(vec![Direction::North; self.length]),
        }
    }
}

impl IntoIterator for &PlanSpace {
    type Item = Vec<Direction>;
    type IntoIter = PlanIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over plans; the last action turns fastest.
pub struct PlanIter {
    current: Option<Vec<Direction>>,
}

impl Iterator for PlanIter {
    type Item = Vec<Direction>;

    fn next(&mut self) -> Option<Self::Item> {
        let plan = self.current.take()?;
        let mut successor = plan.clone();

        for slot in successor.iter_mut().rev() {
            match Direction::from_index(slot.index() + 1) {
                Some(next) => {
                    *slot = next;
                    self.current = Some(successor);
                    return Some(plan);
                }
                None => *slot = Direction::North,
            }
        }

        // Every digit wrapped: that was the last plan.
        Some(plan)
    }
}
