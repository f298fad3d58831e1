use super::{reconstruct, HistorySnapshot};
use crate::models::{Transaction, TransactionType};
use crate::types::Amount;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::str::FromStr;

fn date(day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, day).ok_or_else(|| anyhow!("invalid day {day}"))
}

fn amount(value: &str) -> Result<Amount> {
    Ok(Amount::from_str(value)?)
}

fn replay_forward(snapshots: &[HistorySnapshot], ordered: &[&Transaction]) -> Amount {
    let mut running = snapshots[0].amount;

    for transaction in ordered.iter().skip(1) {
        match transaction.transaction_type {
            TransactionType::Deposit => running += transaction.amount,
            _ => running -= transaction.amount.abs()
        }
    }

    running
}

#[test]
fn test_reconstruct_matches_the_worked_example() -> Result<()> {
    let transactions = vec![
        Transaction::deposit("t2", "Pocket money", amount("30")?, date(2)?),
        Transaction::withdrawal("t1", "Sweets", amount("10")?, date(1)?),
    ];

    let snapshots = reconstruct(amount("100")?, &transactions);

    assert_eq!(snapshots, vec![
        HistorySnapshot { label: date(1)?, amount: amount("70")? },
        HistorySnapshot { label: date(2)?, amount: amount("100")? },
    ]);

    Ok(())
}

#[test]
fn test_reconstruct_of_empty_log_is_empty() -> Result<()> {
    let transactions: Vec<Transaction> = Vec::new();

    assert!(reconstruct(amount("250.00")?, &transactions).is_empty());

    Ok(())
}

#[test]
fn test_reconstruct_sorts_unordered_input_oldest_to_newest() -> Result<()> {
    let transactions = vec![
        Transaction::deposit("a", "Birthday", amount("50")?, date(3)?),
        Transaction::deposit("b", "Chores", amount("5")?, date(1)?),
        Transaction::transfer("c", "Bike fund", amount("20")?, date(5)?),
        Transaction::withdrawal("d", "Comic", amount("7.50")?, date(2)?),
    ];

    let snapshots = reconstruct(amount("27.50")?, &transactions);
    let labels: Vec<NaiveDate> = snapshots.iter().map(|snapshot| snapshot.label).collect();

    assert_eq!(labels, vec![date(1)?, date(2)?, date(3)?, date(5)?]);
    assert_eq!(snapshots[0].amount, amount("5.00")?);
    assert_eq!(snapshots[1].amount, amount("-2.50")?);
    assert_eq!(snapshots[2].amount, amount("47.50")?);
    assert_eq!(snapshots[3].amount, amount("27.50")?);

    Ok(())
}

#[test]
fn test_reconstruct_keeps_same_day_transactions_distinct() -> Result<()> {
    let transactions = vec![
        Transaction::deposit("late", "Evening", amount("3")?, date(4)?),
        Transaction::deposit("early", "Morning", amount("2")?, date(4)?),
    ];

    let snapshots = reconstruct(amount("10")?, &transactions);

    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0], HistorySnapshot { label: date(4)?, amount: amount("7")? });
    assert_eq!(snapshots[1], HistorySnapshot { label: date(4)?, amount: amount("10")? });

    Ok(())
}

#[test]
fn test_reconstruct_replays_forward_to_current_balance() -> Result<()> {
    let transactions = vec![
        Transaction::deposit("1", "Salary", amount("1200.45")?, date(10)?),
        Transaction::withdrawal("2", "Rent", amount("800")?, date(11)?),
        Transaction::deposit("3", "Gift", amount("0.55")?, date(9)?),
        Transaction::transfer("4", "Holiday", amount("150.99")?, date(12)?),
        Transaction::deposit("5", "Refund", amount("12.34")?, date(11)?),
    ];
    let current = amount("913.21")?;

    let snapshots = reconstruct(current, &transactions);
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by(|left, right| left.occurred_on.cmp(&right.occurred_on));

    assert_eq!(snapshots.len(), transactions.len());
    assert_eq!(snapshots.last().map(|snapshot| snapshot.amount), Some(current));
    assert_eq!(replay_forward(&snapshots, &ordered), current);

    Ok(())
}

#[test]
fn test_reconstruct_treats_withdrawals_by_magnitude() -> Result<()> {
    // Wrongly signed on purpose: undoing a withdrawal goes by magnitude.
    let unsigned = Transaction {
        id: "w".to_string(),
        title: "Toy".to_string(),
        amount: amount("4")?,
        transaction_type: TransactionType::Withdrawal,
        occurred_on: date(1)?
    };
    let signed = Transaction::withdrawal("w", "Toy", amount("4")?, date(1)?);
    let deposit = Transaction::deposit("d", "Gift", amount("1")?, date(1)?);

    assert_eq!(reconstruct(amount("6")?, [&unsigned]), vec![HistorySnapshot { label: date(1)?, amount: amount("6")? }]);

    let before_unsigned = reconstruct(amount("6")?, [&unsigned, &deposit]);
    let before_signed = reconstruct(amount("6")?, [&signed, &deposit]);

    assert_eq!(before_unsigned[0].amount, amount("10")?);
    assert_eq!(before_unsigned, before_signed);

    Ok(())
}
