mod account;
mod errors;
mod goal;
mod record;
mod transaction;

use serde::{Deserialize, Serialize};

pub use account::PiggyBank;
pub use errors::{AccountError, GoalError};
pub use goal::Goal;
pub use record::{GoalRecord, LedgerRecord};
pub use transaction::Transaction;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer
}
