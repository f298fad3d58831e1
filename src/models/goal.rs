use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::errors::GoalError;
use crate::types::{Amount, GoalId};

/// A named savings target drawing on the account's pooled balance.
///
/// Progress is never stored here; it is recomputed by the allocator from the
/// current balance and the live goal set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub target_amount: Amount,
    /// Display weight only, the allocator ignores it.
    pub allocation_percent: Decimal
}

impl Goal {
    pub fn new(id: impl Into<GoalId>, title: impl Into<String>, target_amount: Amount, allocation_percent: Decimal) -> Result<Self, GoalError> {
        let id = id.into();
        Self::validate(&id, target_amount, allocation_percent)?;

        Ok(Self {
            id,
            title: title.into(),
            target_amount,
            allocation_percent
        })
    }

    pub(crate) fn validate(id: &str, target_amount: Amount, allocation_percent: Decimal) -> Result<(), GoalError> {
        if target_amount.is_negative() || target_amount.is_zero() {
            return Err(GoalError::NonPositiveTarget { goal_id: id.to_string(), target_amount });
        }

        if allocation_percent < Decimal::ZERO || allocation_percent > Decimal::ONE_HUNDRED {
            return Err(GoalError::InvalidPercent { goal_id: id.to_string(), allocation_percent });
        }

        Ok(())
    }
}
