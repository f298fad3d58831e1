mod account_storage;
#[cfg(test)]
mod tests;

use crate::models::{Goal, Transaction};
use crate::types::AccountId;

pub use account_storage::AccountStorage;

/// Persisted shape of an account. The balance is kept only as persisted text:
/// an envelope, or a legacy plain decimal written before encryption.
#[derive(Debug, Clone, Default)]
pub struct StoredAccount {
    pub balance: Option<String>,
    pub transactions: Vec<Transaction>,
    pub goals: Vec<Goal>
}

pub trait Storage: Send + Sync + 'static {
    fn load(&self, account_id: AccountId) -> Option<StoredAccount>;
    fn save(&self, account_id: AccountId, account: StoredAccount);
}
