use super::{hydrate, persist, restore, AccountActor};
use crate::codec::{AmountCodec, KeyCache, KeyMaterial};
use crate::models::{PiggyBank, Transaction};
use crate::storage::{AccountStorage, Storage, StoredAccount};
use crate::types::Amount;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::str::FromStr;
use std::sync::Arc;

fn test_codec() -> AmountCodec {
    AmountCodec::new(KeyMaterial::new("actor-pass", b"actor-salt".to_vec()).with_iterations(1_000))
        .with_key_cache(KeyCache::new())
}

fn create_transaction(id: &str, deposit: bool, amount: &str) -> Result<Transaction> {
    let amount = Amount::from_str(amount)?;
    let occurred_on = NaiveDate::from_ymd_opt(2024, 5, 1).ok_or_else(|| anyhow!("invalid date"))?;

    Ok(if deposit {
        Transaction::deposit(id, "in", amount, occurred_on)
    } else {
        Transaction::withdrawal(id, "out", amount, occurred_on)
    })
}

#[tokio::test]
async fn test_actor_isolation_and_encrypted_persistence() -> Result<()> {
    let storage = Arc::new(AccountStorage::new());
    let codec = test_codec();

    let actor_account_1 = AccountActor::new(1, storage.clone(), codec.clone());
    let actor_account_2 = AccountActor::new(2, storage.clone(), codec.clone());

    actor_account_1.accept(create_transaction("1", true, "100.0")?);
    actor_account_2.accept(create_transaction("2", true, "200.0")?);
    actor_account_1.accept(create_transaction("3", false, "50.0")?);

    actor_account_1.despawn().await?;
    actor_account_2.despawn().await?;

    let stored_1 = storage.load(1).ok_or_else(|| anyhow!("Account 1 missing from storage"))?;
    let stored_2 = storage.load(2).ok_or_else(|| anyhow!("Account 2 missing from storage"))?;

    assert!(stored_1.balance.as_deref().is_some_and(|balance| balance.contains(':')));
    assert_eq!(stored_1.transactions.len(), 2);
    assert_eq!(hydrate(1, storage.as_ref(), &codec).await.balance.to_string(), "50.00");
    assert_eq!(hydrate(2, storage.as_ref(), &codec).await.balance.to_string(), "200.00");
    assert_eq!(stored_2.transactions.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_actor_maintains_resilience_to_business_logic_errors() -> Result<()> {
    let storage = Arc::new(AccountStorage::new());
    let codec = test_codec();
    let actor = AccountActor::new(1, storage.clone(), codec.clone());

    // Valid -> Invalid (Insufficient Funds) -> Valid
    actor.accept(create_transaction("1", true, "10.0")?);
    actor.accept(create_transaction("2", false, "999.0")?);
    actor.accept(create_transaction("3", true, "20.0")?);

    actor.despawn().await?;

    let account = hydrate(1, storage.as_ref(), &codec).await;

    assert_eq!(account.balance.to_string(), "30.00");
    assert_eq!(account.transactions().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_actor_continues_from_a_legacy_plain_balance() -> Result<()> {
    let storage = Arc::new(AccountStorage::new());
    let codec = test_codec();
    storage.save(7, StoredAccount { balance: Some("12.50".to_string()), ..StoredAccount::default() });

    let actor = AccountActor::new(7, storage.clone(), codec.clone());
    actor.accept(create_transaction("1", true, "2.50")?);
    actor.despawn().await?;

    let stored = storage.load(7).ok_or_else(|| anyhow!("Account missing from storage"))?;

    assert!(stored.balance.as_deref().is_some_and(|balance| balance.contains(':')));
    assert_eq!(hydrate(7, storage.as_ref(), &codec).await.balance.to_string(), "15.00");

    Ok(())
}

#[tokio::test]
async fn test_persist_and_hydrate_keep_goals_and_log() -> Result<()> {
    let storage = AccountStorage::new();
    let codec = test_codec();
    let mut account = PiggyBank::new(3);
    account.apply(create_transaction("1", true, "40")?)?;
    account.add_goal(crate::models::Goal::new("g", "Game", Amount::from(25), rust_decimal::Decimal::ZERO)?)?;

    persist(account, &storage, &codec).await;
    let restored = hydrate(3, &storage, &codec).await;

    assert_eq!(restored.balance, Amount::from(40));
    assert_eq!(restored.goals().len(), 1);
    assert_eq!(restored.transactions().len(), 1);
    assert!(hydrate(4, &storage, &codec).await.balance.is_zero());

    Ok(())
}

#[tokio::test]
async fn test_restore_decodes_an_already_loaded_account() -> Result<()> {
    let storage = AccountStorage::new();
    let codec = test_codec();
    let mut account = PiggyBank::new(5);
    account.apply(create_transaction("1", true, "12.50")?)?;

    persist(account, &storage, &codec).await;

    let stored = storage.load(5).ok_or_else(|| anyhow!("account 5 not saved"))?;
    let restored = restore(5, stored.clone(), &codec).await;

    assert_eq!(restored.balance, Amount::from_str("12.50")?);
    assert_eq!(restored.transactions(), stored.transactions.as_slice());

    let legacy = StoredAccount { balance: Some("7.25".to_string()), ..StoredAccount::default() };

    assert_eq!(restore(6, legacy, &codec).await.balance, Amount::from_str("7.25")?);

    Ok(())
}
