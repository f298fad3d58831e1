use crate::storage::{Storage, StoredAccount};
use crate::types::AccountId;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory stand-in for the persistence collaborator.
pub struct AccountStorage {
    cache: Arc<DashMap<AccountId, StoredAccount>>
}

impl Default for AccountStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStorage {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(DashMap::new())
        }
    }

    /// Account ids currently stored, in ascending order.
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.cache.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }
}

impl Storage for AccountStorage {
    fn load(&self, account_id: AccountId) -> Option<StoredAccount> {
        self.cache.get(&account_id).map(|entry| entry.value().clone())
    }

    fn save(&self, account_id: AccountId, account: StoredAccount) {
        self.cache.insert(account_id, account);
    }
}
