use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Transaction, TransactionType};
use crate::types::{AccountId, Amount, GoalId, TransactionId};

#[derive(Debug, Error)]
pub enum GoalError {
    #[error("Goal [{goal_id}] must have a positive target, got [{target_amount}]")]
    NonPositiveTarget {
        goal_id: GoalId,
        target_amount: Amount
    },
    #[error("Goal [{goal_id}] has an allocation percent outside 0..=100: [{allocation_percent}]")]
    InvalidPercent {
        goal_id: GoalId,
        allocation_percent: Decimal
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Duplicate transaction [{transaction_id}]:[{transaction_type:?}] for account [{account_id}]")]
    DuplicateTransaction {
        account_id: AccountId,
        transaction_id: TransactionId,
        transaction_type: TransactionType
    },
    #[error("Transaction [{transaction_id}]:[{transaction_type:?}] has the wrong sign for account [{account_id}]")]
    InvalidSign {
        account_id: AccountId,
        transaction_id: TransactionId,
        transaction_type: TransactionType
    },
    #[error("Insufficient funds for transaction [{transaction_id}]:[{transaction_type:?}] for account [{account_id}]")]
    InsufficientFunds {
        account_id: AccountId,
        transaction_id: TransactionId,
        transaction_type: TransactionType
    },
    #[error("Numeric overflow occurred for transaction [{transaction_id}]:[{transaction_type:?}] for account [{account_id}]")]
    Overflow {
        account_id: AccountId,
        transaction_id: TransactionId,
        transaction_type: TransactionType
    },
    #[error("Duplicate goal [{goal_id}] for account [{account_id}]")]
    DuplicateGoal {
        account_id: AccountId,
        goal_id: GoalId
    },
    #[error("Goal [{goal_id}] was not found for account [{account_id}]")]
    GoalNotFound {
        account_id: AccountId,
        goal_id: GoalId
    },
    #[error("Goal [{goal_id}] is not fulfilled yet for account [{account_id}]")]
    GoalNotFull {
        account_id: AccountId,
        goal_id: GoalId
    },
    #[error(transparent)]
    InvalidGoal(#[from] GoalError)
}

impl AccountError {
    pub fn duplicate_transaction(account_id: AccountId, tx: &Transaction) -> Self {
        Self::DuplicateTransaction {
            account_id,
            transaction_id: tx.id.clone(),
            transaction_type: tx.transaction_type,
        }
    }

    pub fn invalid_sign(account_id: AccountId, tx: &Transaction) -> Self {
        Self::InvalidSign {
            account_id,
            transaction_id: tx.id.clone(),
            transaction_type: tx.transaction_type,
        }
    }

    pub fn insufficient_funds(account_id: AccountId, tx: &Transaction) -> Self {
        Self::InsufficientFunds {
            account_id,
            transaction_id: tx.id.clone(),
            transaction_type: tx.transaction_type,
        }
    }

    pub fn overflow(account_id: AccountId, tx: &Transaction) -> Self {
        Self::Overflow {
            account_id,
            transaction_id: tx.id.clone(),
            transaction_type: tx.transaction_type,
        }
    }

    pub fn duplicate_goal(account_id: AccountId, goal_id: &str) -> Self {
        Self::DuplicateGoal { account_id, goal_id: goal_id.to_string() }
    }

    pub fn goal_not_found(account_id: AccountId, goal_id: &str) -> Self {
        Self::GoalNotFound { account_id, goal_id: goal_id.to_string() }
    }

    pub fn goal_not_full(account_id: AccountId, goal_id: &str) -> Self {
        Self::GoalNotFull { account_id, goal_id: goal_id.to_string() }
    }
}
