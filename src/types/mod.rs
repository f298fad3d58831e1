mod amount;
mod errors;

pub use amount::Amount;
pub use errors::AmountError;

pub type AccountId = u16;
pub type TransactionId = String;
pub type GoalId = String;
