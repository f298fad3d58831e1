use std::sync::Arc;

use tokio::spawn;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use crate::codec::{AmountCodec, StoredAmount};
use crate::models::{PiggyBank, Transaction};
use crate::storage::{Storage, StoredAccount};
use crate::types::AccountId;

/// Owns one account while a stream of its transactions is applied.
///
/// The balance is decoded once when the actor starts and encoded once when it
/// is despawned, so the stored value is never read or written mid-stream.
pub struct AccountActor {
    sender: mpsc::UnboundedSender<Transaction>,
    handle: JoinHandle<()>
}

impl AccountActor {
    /// Spawns a new actor for the account.
    pub fn new<S: Storage>(account_id: AccountId, storage: Arc<S>, codec: AmountCodec) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Transaction>();

        let handle = spawn(async move {
            let mut account = hydrate(account_id, storage.as_ref(), &codec).await;

            while let Some(transaction) = receiver.recv().await {
                let transaction_id = transaction.id.clone();

                match account.apply(transaction) {
                    Ok(_) => {
                        debug!("Transaction [{transaction_id}] for account [{account_id}] applied");
                    },
                    Err(error) => {
                        //NOTE: business rule violations only skip the offending transaction
                        warn!("{error}");
                    }
                }
            }

            persist(account, storage.as_ref(), &codec).await;
        });

        Self { sender, handle }
    }

    /// Queues a transaction, false if the actor has already stopped.
    pub fn accept(&self, transaction: Transaction) -> bool {
        self.sender.send(transaction).is_ok()
    }

    /// Closes the queue and waits until the account has been saved.
    pub async fn despawn(self) -> Result<(), JoinError> {
        drop(self.sender);
        self.handle.await
    }
}

/// Loads an account and decodes its stored balance. Unknown accounts start empty.
pub(crate) async fn hydrate<S: Storage + ?Sized>(account_id: AccountId, storage: &S, codec: &AmountCodec) -> PiggyBank {
    restore(account_id, storage.load(account_id).unwrap_or_default(), codec).await
}

/// Decodes an already loaded account.
pub(crate) async fn restore(account_id: AccountId, stored: StoredAccount, codec: &AmountCodec) -> PiggyBank {
    let balance = codec.decode(StoredAmount::from_persisted(stored.balance.as_deref())).await;

    PiggyBank::from_parts(account_id, balance, stored.transactions, stored.goals)
}

/// Encodes the balance and saves the account.
pub(crate) async fn persist<S: Storage + ?Sized>(account: PiggyBank, storage: &S, codec: &AmountCodec) {
    let account_id = account.account_id;
    let (balance, transactions, goals) = account.into_parts();
    let balance = codec.encode(balance).await;

    storage.save(account_id, StoredAccount {
        balance: Some(balance),
        transactions,
        goals
    });
}
