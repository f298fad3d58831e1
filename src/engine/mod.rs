mod ledger_engine;

pub use ledger_engine::{LedgerEngine, LedgerReport};
