use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::TransactionType;
use crate::types::{Amount, TransactionId};

/// An immutable entry in an account's transaction log.
///
/// `amount` is signed: deposits are positive, withdrawals and transfers are
/// negative. `occurred_on` only has day granularity, so same-day entries are
/// ordered by their position in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub title: String,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub occurred_on: NaiveDate
}

impl Transaction {
    pub fn deposit(id: impl Into<TransactionId>, title: impl Into<String>, amount: Amount, occurred_on: NaiveDate) -> Self {
        Self::signed(id, title, amount.abs(), TransactionType::Deposit, occurred_on)
    }

    pub fn withdrawal(id: impl Into<TransactionId>, title: impl Into<String>, amount: Amount, occurred_on: NaiveDate) -> Self {
        Self::signed(id, title, -amount.abs(), TransactionType::Withdrawal, occurred_on)
    }

    pub fn transfer(id: impl Into<TransactionId>, title: impl Into<String>, amount: Amount, occurred_on: NaiveDate) -> Self {
        Self::signed(id, title, -amount.abs(), TransactionType::Transfer, occurred_on)
    }

    fn signed(id: impl Into<TransactionId>, title: impl Into<String>, amount: Amount, transaction_type: TransactionType, occurred_on: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            amount,
            transaction_type,
            occurred_on
        }
    }
}
