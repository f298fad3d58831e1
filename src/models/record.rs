use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::errors::GoalError;
use crate::models::{Goal, Transaction, TransactionType};
use crate::types::{AccountId, Amount, GoalId, TransactionId};

/// A single row of a ledger import file.
///
/// `amount` is the magnitude as typed by the user. Withdrawals and transfers
/// are negated, nothing is coerced, so a negative magnitude yields a wrongly
/// signed transaction that `PiggyBank::apply` rejects.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerRecord {
    pub account: AccountId,
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub title: String,
    pub amount: Amount
}

impl LedgerRecord {
    pub fn into_transaction(self) -> Transaction {
        let amount = match self.transaction_type {
            TransactionType::Deposit => self.amount,
            TransactionType::Withdrawal | TransactionType::Transfer => -self.amount
        };

        Transaction {
            id: self.id,
            title: self.title,
            amount,
            transaction_type: self.transaction_type,
            occurred_on: self.date
        }
    }
}

/// A single row of a goals import file.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalRecord {
    pub account: AccountId,
    pub id: GoalId,
    pub title: String,
    pub target: Amount,
    pub percent: Decimal
}

impl GoalRecord {
    pub fn into_goal(self) -> Result<Goal, GoalError> {
        Goal::new(self.id, self.title, self.target, self.percent)
    }
}
