use chrono::NaiveDate;
use serde::Serialize;
use tracing::trace;

use crate::models::{Transaction, TransactionType};
use crate::types::Amount;

/// One point of the reconstructed "balance over time" series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySnapshot {
    pub label: NaiveDate,
    pub amount: Amount
}

/// Rebuilds the balance series by walking the log backwards from the current balance.
///
/// Transactions are ordered newest first by day. The sort is stable, so entries
/// sharing a day keep the order the caller gave them in, which is read as newest
/// first. Each snapshot records the balance right after its transaction; the
/// transaction is then undone to obtain the balance before it. The result is
/// ordered oldest to newest and its last element always equals `current_balance`.
///
/// An empty log yields an empty series.
pub fn reconstruct<'a, I>(current_balance: Amount, transactions: I) -> Vec<HistorySnapshot>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut ordered: Vec<&Transaction> = transactions.into_iter().collect();
    ordered.sort_by(|left, right| right.occurred_on.cmp(&left.occurred_on));

    let mut running = current_balance;
    let mut snapshots = Vec::with_capacity(ordered.len());

    for transaction in ordered {
        snapshots.push(HistorySnapshot {
            label: transaction.occurred_on,
            amount: running
        });

        match transaction.transaction_type {
            TransactionType::Deposit => running -= transaction.amount,
            TransactionType::Withdrawal | TransactionType::Transfer => running += transaction.amount.abs()
        }

        trace!("Undid transaction [{}] on {}, balance before it: {running}", transaction.id, transaction.occurred_on);
    }

    snapshots.reverse();
    snapshots
}
