use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::debug;

use crate::models::Goal;
use crate::types::{Amount, GoalId};

const MAX_PASSES: usize = 20;
// 0.001 currency units
pub(super) const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 3);
const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
// Divisions leave 28 digits; anything past this is representation noise.
const SUM_PRECISION: u32 = 10;

/// Derived progress of a single goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub goal_id: GoalId,
    pub current_amount: Amount,
    pub is_full: bool
}

/// Result of splitting one balance across a goal set.
///
/// `goals` follows the input order. `converged` is false when the pass cap was
/// hit while passes were still changing state; the amounts are then the last
/// computed ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub goals: Vec<GoalProgress>,
    pub converged: bool,
    pub passes: usize
}

impl Allocation {
    pub fn progress(&self, goal_id: &str) -> Option<&GoalProgress> {
        self.goals.iter().find(|progress| progress.goal_id == goal_id)
    }
}

#[derive(Debug, Clone)]
pub(super) struct WorkingGoal {
    pub(super) target: Decimal,
    pub(super) current: Decimal,
    pub(super) is_full: bool
}

/// Water-filling allocator: every goal starts with an equal share and the
/// surplus of goals that reach their target spills over to the rest.
#[derive(Debug, Clone, Copy)]
pub struct GoalAllocator {
    max_passes: usize
}

impl Default for GoalAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalAllocator {
    pub fn new() -> Self {
        Self {
            max_passes: MAX_PASSES
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn allocate(&self, balance: Amount, goals: &[Goal]) -> Allocation {
        if goals.is_empty() {
            return Allocation { goals: Vec::new(), converged: true, passes: 0 };
        }

        let initial_share = balance.as_decimal() / Decimal::from(goals.len());
        let mut state: Vec<WorkingGoal> = goals.iter()
            .map(|goal| WorkingGoal {
                target: goal.target_amount.as_decimal(),
                current: initial_share,
                is_full: false
            })
            .collect();

        let mut passes = 0;
        let mut converged = false;

        while passes < self.max_passes {
            passes += 1;

            if !fill_pass(&mut state) {
                converged = true;
                break;
            }
        }

        if !converged {
            debug!("Goal allocation did not stabilize within {} passes over {} goals", self.max_passes, goals.len());
        }

        let settled = settle_to_cents(balance.as_decimal(), &state);

        let goals = goals.iter().zip(state).zip(settled)
            .map(|((goal, working), current)| GoalProgress {
                goal_id: goal.id.clone(),
                current_amount: Amount::from_decimal(current),
                is_full: working.is_full
            })
            .collect();

        Allocation { goals, converged, passes }
    }
}

/// Runs one pass in goal order and reports whether anything changed.
pub(super) fn fill_pass(state: &mut [WorkingGoal]) -> bool {
    let mut changed = false;
    let mut overflow = Decimal::ZERO;
    let mut incomplete = Vec::new();

    for (index, goal) in state.iter_mut().enumerate() {
        if goal.is_full {
            continue;
        }

        if goal.current >= goal.target - EPSILON {
            goal.is_full = true;
            overflow += (goal.current - goal.target).max(Decimal::ZERO);
            goal.current = goal.target;
            changed = true;
        } else {
            incomplete.push(index);
        }
    }

    if overflow > EPSILON && !incomplete.is_empty() {
        let portion = overflow / Decimal::from(incomplete.len());

        for index in incomplete {
            state[index].current += portion;
        }

        changed = true;
    }

    changed
}

fn floor_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::ToNegativeInfinity)
}

/// Converts working amounts into reportable cents.
///
/// Full goals report their target. Open goals are floored and the remaining
/// whole cents go to the largest remainders first, ties in goal order. The
/// cents handed out never exceed what the balance leaves after the full goals,
/// so the reported total only goes past the balance when the epsilon clamp
/// itself did.
fn settle_to_cents(balance: Decimal, state: &[WorkingGoal]) -> Vec<Decimal> {
    let full_total: Decimal = state.iter().filter(|goal| goal.is_full).map(|goal| goal.target).sum();
    let open_total: Decimal = state.iter().filter(|goal| !goal.is_full).map(|goal| goal.current).sum();
    let budget = floor_to_cents(open_total.round_dp(SUM_PRECISION)).min(floor_to_cents(balance - full_total));

    let mut settled: Vec<Decimal> = state.iter()
        .map(|goal| if goal.is_full { goal.target } else { floor_to_cents(goal.current) })
        .collect();

    let floored_total: Decimal = state.iter().zip(&settled)
        .filter(|(goal, _)| !goal.is_full)
        .map(|(_, current)| *current)
        .sum();

    let mut by_remainder: Vec<usize> = (0..state.len()).filter(|index| !state[*index].is_full).collect();
    by_remainder.sort_by(|left, right| {
        let remainder = |index: usize| state[index].current - settled[index];
        remainder(*right).cmp(&remainder(*left))
    });

    let mut residue = budget - floored_total;

    for index in by_remainder {
        if residue < CENT {
            break;
        }

        settled[index] += CENT;
        residue -= CENT;
    }

    settled
}
