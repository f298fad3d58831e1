use chrono::NaiveDate;
use tracing::debug;

use crate::allocation::{Allocation, GoalAllocator};
use crate::history::{reconstruct, HistorySnapshot};
use crate::models::errors::AccountError;
use crate::models::{Goal, Transaction, TransactionType};
use crate::types::{AccountId, Amount, TransactionId};

/// The account owning the authoritative balance, its transaction log and its goals.
///
/// The balance only ever changes through [`PiggyBank::apply`]. History and goal
/// progress are derived on demand and never stored.
#[derive(Debug, Clone)]
pub struct PiggyBank {
    /// The unique identifier for the account.
    pub account_id: AccountId,
    /// Current balance, the source every derived view starts from.
    pub balance: Amount,
    /// Applied transactions in the order they were applied.
    transactions: Vec<Transaction>,
    goals: Vec<Goal>
}

impl PiggyBank {
    /// Creates a new, empty account.
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            balance: Amount::ZERO,
            transactions: Vec::new(),
            goals: Vec::new()
        }
    }

    /// Rehydrates an account from persisted parts without re-applying the log.
    pub fn from_parts(account_id: AccountId, balance: Amount, transactions: Vec<Transaction>, goals: Vec<Goal>) -> Self {
        Self { account_id, balance, transactions, goals }
    }

    pub fn into_parts(self) -> (Amount, Vec<Transaction>, Vec<Goal>) {
        (self.balance, self.transactions, self.goals)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Applies a single transaction to the balance and appends it to the log.
    ///
    /// # Errors
    /// Returns `AccountError` if:
    /// - The transaction id is already in the log.
    /// - A deposit is negative, or a withdrawal/transfer is positive.
    /// - A withdrawal/transfer exceeds the balance.
    /// - The new balance overflows.
    pub fn apply(&mut self, transaction: Transaction) -> Result<(), AccountError> {
        if self.transactions.iter().any(|existing| existing.id == transaction.id) {
            return Err(AccountError::duplicate_transaction(self.account_id, &transaction))
        }

        match transaction.transaction_type {
            TransactionType::Deposit => {
                if transaction.amount.is_negative() {
                    return Err(AccountError::invalid_sign(self.account_id, &transaction))
                }
            }
            TransactionType::Withdrawal | TransactionType::Transfer => {
                if !transaction.amount.is_negative() && !transaction.amount.is_zero() {
                    return Err(AccountError::invalid_sign(self.account_id, &transaction))
                }

                if self.balance < transaction.amount.abs() {
                    return Err(AccountError::insufficient_funds(self.account_id, &transaction))
                }
            }
        }

        self.balance = self.balance.checked_add(transaction.amount)
            .ok_or_else(|| AccountError::overflow(self.account_id, &transaction))?;

        self.transactions.push(transaction);

        Ok(())
    }

    pub fn add_goal(&mut self, goal: Goal) -> Result<(), AccountError> {
        if self.goals.iter().any(|existing| existing.id == goal.id) {
            return Err(AccountError::duplicate_goal(self.account_id, &goal.id))
        }

        self.goals.push(goal);

        Ok(())
    }

    /// Edits the title and target of an existing goal.
    pub fn update_goal(&mut self, goal_id: &str, title: impl Into<String>, target_amount: Amount) -> Result<(), AccountError> {
        let account_id = self.account_id;
        let goal = self.goals.iter_mut()
            .find(|goal| goal.id == goal_id)
            .ok_or_else(|| AccountError::goal_not_found(account_id, goal_id))?;

        Goal::validate(goal_id, target_amount, goal.allocation_percent)?;

        goal.title = title.into();
        goal.target_amount = target_amount;

        Ok(())
    }

    pub fn remove_goal(&mut self, goal_id: &str) -> Result<Goal, AccountError> {
        let position = self.goals.iter()
            .position(|goal| goal.id == goal_id)
            .ok_or_else(|| AccountError::goal_not_found(self.account_id, goal_id))?;

        Ok(self.goals.remove(position))
    }

    /// Redeems a fulfilled goal: books a transfer of its target and deletes it.
    ///
    /// # Errors
    /// `GoalNotFound` for an unknown goal, `GoalNotFull` while the current
    /// allocation does not report the goal as full, or any error from `apply`.
    pub fn redeem_goal(&mut self, goal_id: &str, transaction_id: impl Into<TransactionId>, occurred_on: NaiveDate) -> Result<Transaction, AccountError> {
        let goal = self.goals.iter()
            .find(|goal| goal.id == goal_id)
            .cloned()
            .ok_or_else(|| AccountError::goal_not_found(self.account_id, goal_id))?;

        let is_full = self.goal_progress()
            .progress(goal_id)
            .is_some_and(|progress| progress.is_full);

        if !is_full {
            return Err(AccountError::goal_not_full(self.account_id, goal_id))
        }

        let transaction = Transaction::transfer(transaction_id, goal.title.clone(), goal.target_amount, occurred_on);
        self.apply(transaction.clone())?;
        self.remove_goal(goal_id)?;

        debug!("Goal [{}] redeemed for account [{}], balance now {}", goal_id, self.account_id, self.balance);

        Ok(transaction)
    }

    /// Balance over time, oldest first, ending at the current balance.
    pub fn history(&self) -> Vec<HistorySnapshot> {
        // the log is oldest first, the reconstructor expects same-day entries newest first
        reconstruct(self.balance, self.transactions.iter().rev())
    }

    pub fn goal_progress(&self) -> Allocation {
        GoalAllocator::new().allocate(self.balance, &self.goals)
    }
}
