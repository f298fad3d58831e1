use super::{AccountStorage, Storage, StoredAccount};
use anyhow::{anyhow, Result};

#[test]
fn test_storage_basic_load_and_save_operations() -> Result<()> {
    let storage = AccountStorage::new();

    assert!(storage.load(99).is_none());

    let account = StoredAccount {
        balance: Some("100.00".to_string()),
        ..StoredAccount::default()
    };
    storage.save(1, account);

    let retrieved_account = storage.load(1).ok_or_else(|| anyhow!("Account not found in storage"))?;

    assert_eq!(retrieved_account.balance.as_deref(), Some("100.00"));

    Ok(())
}

#[test]
fn test_storage_lists_account_ids_in_order() {
    let storage = AccountStorage::new();
    storage.save(3, StoredAccount::default());
    storage.save(1, StoredAccount::default());
    storage.save(2, StoredAccount::default());

    assert_eq!(storage.account_ids(), vec![1, 2, 3]);
}

#[test]
fn test_storage_enforces_correct_overwrite_semantics() -> Result<()> {
    let storage = AccountStorage::new();
    storage.save(1, StoredAccount { balance: Some("10.00".to_string()), ..StoredAccount::default() });

    let mut account_version_2 = storage.load(1).ok_or_else(|| anyhow!("Account v1 missing"))?;
    account_version_2.balance = Some("20.00".to_string());
    storage.save(1, account_version_2);

    let final_account = storage.load(1).ok_or_else(|| anyhow!("Final account version missing"))?;

    assert_eq!(final_account.balance.as_deref(), Some("20.00"));

    Ok(())
}
