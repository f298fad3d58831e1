pub mod actors;
pub mod allocation;
pub mod codec;
pub mod engine;
pub mod history;
pub mod models;
pub mod storage;
pub mod types;

pub use allocation::{Allocation, GoalAllocator, GoalProgress};
pub use codec::{AmountCodec, KeyCache, KeyMaterial, StoredAmount};
pub use history::{reconstruct, HistorySnapshot};
pub use models::{Goal, PiggyBank, Transaction, TransactionType};
pub use types::Amount;
