use crate::actors::{hydrate, persist, restore, AccountActor};
use crate::allocation::Allocation;
use crate::codec::AmountCodec;
use crate::history::HistorySnapshot;
use crate::models::{AccountError, GoalRecord, LedgerRecord, Transaction};
use crate::storage::{AccountStorage, Storage};
use crate::types::{AccountId, Amount};
use csv::{ReaderBuilder, Trim};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{error, info, warn};

/// Derived views of one account, ready for display.
#[derive(Debug, Clone)]
pub struct LedgerReport {
    pub account_id: AccountId,
    pub balance: Amount,
    pub history: Vec<HistorySnapshot>,
    pub allocation: Allocation
}

/// Streams ledger imports into per-account actors and builds reports from storage.
pub struct LedgerEngine {
    storage: Arc<AccountStorage>,
    codec: AmountCodec,
    backpressure: usize
}

impl LedgerEngine {
    pub fn new(storage: Arc<AccountStorage>, codec: AmountCodec) -> Self {
        Self {
            storage,
            codec,
            backpressure: 256
        }
    }

    /// Applies every transaction of a ledger csv file to its account.
    pub async fn run(&self, path: &str) -> anyhow::Result<()> {
        let (sender, receiver) = mpsc::channel::<LedgerRecord>(self.backpressure);
        let csv_handle = spawn_csv_reader(path.to_string(), sender);
        let processing_result = self.process_transactions(receiver).await;

        if let Err(error) = csv_handle.await {
            error!("CSV ingestion failed: {error}");
        }

        processing_result
    }

    /// Adds the goals of a goals csv file to their accounts, returning how many were added.
    pub async fn import_goals(&self, path: &str) -> anyhow::Result<usize> {
        let (sender, mut receiver) = mpsc::channel::<GoalRecord>(self.backpressure);
        let csv_handle = spawn_csv_reader(path.to_string(), sender);
        let mut by_account = BTreeMap::<AccountId, Vec<GoalRecord>>::new();

        while let Some(record) = receiver.recv().await {
            by_account.entry(record.account).or_default().push(record);
        }

        if let Err(error) = csv_handle.await {
            error!("CSV ingestion failed: {error}");
        }

        let mut imported = 0;

        for (account_id, records) in by_account {
            let mut account = hydrate(account_id, self.storage.as_ref(), &self.codec).await;

            for record in records {
                let result = record.into_goal()
                    .map_err(AccountError::from)
                    .and_then(|goal| account.add_goal(goal));

                match result {
                    Ok(_) => imported += 1,
                    Err(error) => warn!("{error}")
                }
            }

            persist(account, self.storage.as_ref(), &self.codec).await;
        }

        info!("Imported {imported} goals");

        Ok(imported)
    }

    /// Builds the report of one stored account.
    pub async fn report(&self, account_id: AccountId) -> Option<LedgerReport> {
        let stored = self.storage.load(account_id)?;
        let account = restore(account_id, stored, &self.codec).await;

        Some(LedgerReport {
            account_id,
            balance: account.balance,
            history: account.history(),
            allocation: account.goal_progress()
        })
    }

    /// Reports of every stored account, ordered by account id.
    pub async fn reports(&self) -> Vec<LedgerReport> {
        let mut reports = Vec::new();

        for account_id in self.storage.account_ids() {
            if let Some(report) = self.report(account_id).await {
                reports.push(report);
            }
        }

        reports
    }

    async fn process_transactions(&self, mut receiver: mpsc::Receiver<LedgerRecord>) -> anyhow::Result<()> {
        let mut actors = HashMap::<AccountId, AccountActor>::new();

        while let Some(record) = receiver.recv().await {
            let account_id = record.account;
            let transaction: Transaction = record.into_transaction();
            let transaction_id = transaction.id.clone();

            let actor = actors.entry(account_id).or_insert_with(|| {
                AccountActor::new(account_id, self.storage.clone(), self.codec.clone())
            });

            if !actor.accept(transaction) {
                error!("Account actor for account [{account_id}] could not accept transaction [{transaction_id}]");
            }
        }

        //NOTE: every actor encodes and saves its account on despawn, wait for all of them
        let despawns = actors.into_values().map(|actor| actor.despawn());

        for result in join_all(despawns).await {
            if let Err(error) = result {
                error!("An account actor did not despawn gracefully: {error:?}");
            }
        }

        Ok(())
    }
}

fn spawn_csv_reader<R>(path: String, sender: mpsc::Sender<R>) -> JoinHandle<()>
where
    R: DeserializeOwned + Send + 'static,
{
    spawn_blocking(move || {
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(error) => {
                error!("Error opening CSV at path: {path} | {error}");
                return;
            }
        };

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(BufReader::new(file));

        for result in reader.deserialize::<R>() {
            match result {
                Ok(record) => {
                    if sender.blocking_send(record).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    error!("CSV deserialization error: {error}");
                }
            }
        }
    })
}
