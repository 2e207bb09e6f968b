//! Core types and data structures for the marketplace ledger

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account categories following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Assets - what the platform holds (Cash, Accounts Receivable, etc.)
    Asset,
    /// Liabilities - what the platform owes (Vendor Payable, Platform Fee Payable, etc.)
    Liability,
    /// Equity - owner's interest in the platform
    Equity,
    /// Revenue - money earned (Sales Revenue, Subscription Revenue, etc.)
    Revenue,
    /// Expenses - costs incurred (Platform Fee Expense, Refund Expense, etc.)
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account category.
    /// Assets and Expenses normally carry debit balances;
    /// Liabilities, Equity, and Revenue normally carry credit balances.
    pub fn normal_balance(&self) -> Side {
        match self {
            AccountType::Asset | AccountType::Expense => Side::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => Side::Credit,
        }
    }
}

/// The two sides of a double-entry posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Debit,
    Credit,
}

/// Posting status of a journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryStatus {
    /// Entry exists but its lines are not yet reflected in balances
    Draft,
    /// Entry is final and counted by balance and report queries
    Posted,
}

/// A chart-of-accounts account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,
    /// Chart of accounts code, unique across the ledger (e.g. "1000")
    pub account_number: String,
    /// Human-readable account name
    pub account_name: String,
    /// Category of the account (Asset, Liability, etc.)
    pub account_type: AccountType,
    /// Side on which the account customarily carries a positive balance
    pub normal_balance: Side,
    /// Inactive accounts are excluded from listings, reports, and bulk recalculation
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// Create a new active account. The normal balance side is derived
    /// from the account category.
    pub fn new(account_number: String, account_name: String, account_type: AccountType) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            account_number,
            account_name,
            normal_balance: account_type.normal_balance(),
            account_type,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A single debit or credit posting against one account.
///
/// Exactly one of `debit` and `credit` must be nonzero, and amounts are
/// never negative. Lines live inside their journal entry and are removed
/// with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Journal entry this line belongs to
    pub entry_number: u64,
    /// Account being posted against
    pub account_id: Uuid,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
    /// Optional free-text description for this specific line
    pub description: String,
}

/// Input specification for one line of a transaction to be recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub account_id: Uuid,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
    pub description: String,
}

impl LineItem {
    pub fn new(
        account_id: Uuid,
        debit: BigDecimal,
        credit: BigDecimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            debit,
            credit,
            description: description.into(),
        }
    }

    /// Line item debiting the given account
    pub fn debit(account_id: Uuid, amount: BigDecimal, description: impl Into<String>) -> Self {
        Self::new(account_id, amount, BigDecimal::from(0), description)
    }

    /// Line item crediting the given account
    pub fn credit(account_id: Uuid, amount: BigDecimal, description: impl Into<String>) -> Self {
        Self::new(account_id, BigDecimal::from(0), amount, description)
    }
}

/// Transaction header grouping the line items of one business event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Monotonically assigned entry number
    pub entry_number: u64,
    /// Date the transaction occurred
    pub date: NaiveDate,
    pub description: String,
    /// External system identifier: "order", "payment", "subscription", "refund", "manual"
    pub reference_type: String,
    /// External system's ID. Opaque string, no referential constraint.
    pub reference_id: String,
    pub status: EntryStatus,
    /// Line items making up this entry
    pub lines: Vec<LedgerLine>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl JournalEntry {
    /// Sum of all debit amounts across this entry's lines
    pub fn total_debits(&self) -> BigDecimal {
        self.lines.iter().map(|line| &line.debit).sum()
    }

    /// Sum of all credit amounts across this entry's lines
    pub fn total_credits(&self) -> BigDecimal {
        self.lines.iter().map(|line| &line.credit).sum()
    }
}

/// Header fields for a journal entry about to be created.
/// The entry number is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub date: NaiveDate,
    pub description: String,
    pub reference_type: String,
    pub reference_id: String,
    pub status: EntryStatus,
}

/// Cached balance for one account.
///
/// At most one live snapshot exists per account. It is a materialized
/// view over the posted ledger lines, never a source of truth, and is
/// overwritten wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub account_id: Uuid,
    /// Date through which this snapshot is valid
    pub as_of_date: NaiveDate,
    pub debit_total: BigDecimal,
    pub credit_total: BigDecimal,
    /// Signed balance per the account's normal-balance convention
    pub net_balance: BigDecimal,
    pub last_updated: NaiveDateTime,
}

/// Filter for journal entry listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryFilter {
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<EntryStatus>,
}

/// Filter for ledger line queries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineFilter {
    pub account_id: Option<Uuid>,
    /// Only lines whose entry date is on or after this date
    pub date_from: Option<NaiveDate>,
    /// Only lines whose entry date is on or before this date
    pub date_to: Option<NaiveDate>,
    pub status: Option<EntryStatus>,
}

impl LineFilter {
    /// Posted lines for one account with entry date on or before `date_to`
    pub fn posted_through(account_id: Uuid, date_to: NaiveDate) -> Self {
        Self {
            account_id: Some(account_id),
            date_from: None,
            date_to: Some(date_to),
            status: Some(EntryStatus::Posted),
        }
    }

    /// Posted lines for one account with entry date within the given range
    pub fn posted_between(account_id: Uuid, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            account_id: Some(account_id),
            date_from: Some(date_from),
            date_to: Some(date_to),
            status: Some(EntryStatus::Posted),
        }
    }
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Account is referenced by ledger entries and cannot be deleted: {0}")]
    AccountInUse(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_balance_by_category() {
        assert_eq!(AccountType::Asset.normal_balance(), Side::Debit);
        assert_eq!(AccountType::Expense.normal_balance(), Side::Debit);
        assert_eq!(AccountType::Liability.normal_balance(), Side::Credit);
        assert_eq!(AccountType::Equity.normal_balance(), Side::Credit);
        assert_eq!(AccountType::Revenue.normal_balance(), Side::Credit);
    }

    #[test]
    fn journal_entry_totals() {
        let account = Uuid::new_v4();
        let other = Uuid::new_v4();
        let now = chrono::Utc::now().naive_utc();
        let entry = JournalEntry {
            entry_number: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "Test".to_string(),
            reference_type: "manual".to_string(),
            reference_id: "1".to_string(),
            status: EntryStatus::Posted,
            lines: vec![
                LedgerLine {
                    entry_number: 1,
                    account_id: account,
                    debit: BigDecimal::from(100),
                    credit: BigDecimal::from(0),
                    description: String::new(),
                },
                LedgerLine {
                    entry_number: 1,
                    account_id: other,
                    debit: BigDecimal::from(0),
                    credit: BigDecimal::from(100),
                    description: String::new(),
                },
            ],
            created_at: now,
            updated_at: now,
        };

        assert_eq!(entry.total_debits(), BigDecimal::from(100));
        assert_eq!(entry.total_credits(), BigDecimal::from(100));
    }
}
