//! Storage abstraction for the ledger system

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::*;

/// Storage backend for the ledger.
///
/// Implementations may be backed by any storage engine (PostgreSQL,
/// SQLite, in-memory, etc.). Read methods never observe partially
/// committed writes; the only multi-row write path goes through a
/// [`StoreTransaction`] obtained from [`LedgerStore::begin`].
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Save a new account
    async fn save_account(&self, account: &Account) -> LedgerResult<()>;

    /// Get an account by ID
    async fn get_account(&self, account_id: Uuid) -> LedgerResult<Option<Account>>;

    /// Get an account by its chart-of-accounts number
    async fn get_account_by_number(&self, account_number: &str) -> LedgerResult<Option<Account>>;

    /// List accounts ordered by account number, optionally filtered by
    /// category. With `active_only`, inactive accounts are excluded.
    async fn list_accounts(
        &self,
        account_type: Option<AccountType>,
        active_only: bool,
    ) -> LedgerResult<Vec<Account>>;

    /// Update an existing account
    async fn update_account(&self, account: &Account) -> LedgerResult<()>;

    /// Delete an account. Fails with [`LedgerError::AccountInUse`] if any
    /// ledger line references it.
    async fn delete_account(&self, account_id: Uuid) -> LedgerResult<()>;

    /// Get a journal entry (with its lines) by entry number
    async fn get_journal_entry(&self, entry_number: u64) -> LedgerResult<Option<JournalEntry>>;

    /// Find the first journal entry carrying the given reference pair
    async fn find_by_reference(
        &self,
        reference_type: &str,
        reference_id: &str,
    ) -> LedgerResult<Option<JournalEntry>>;

    /// List journal entries matching the filter, newest first
    async fn list_journal_entries(&self, filter: &EntryFilter) -> LedgerResult<Vec<JournalEntry>>;

    /// Ledger lines matching the filter. Date and status conditions apply
    /// to the owning journal entry.
    async fn lines(&self, filter: &LineFilter) -> LedgerResult<Vec<LedgerLine>>;

    /// Whether any ledger line references the given account
    async fn account_has_lines(&self, account_id: Uuid) -> LedgerResult<bool>;

    /// Get the cached balance snapshot for an account, if one exists
    async fn get_balance_snapshot(&self, account_id: Uuid) -> LedgerResult<Option<BalanceSnapshot>>;

    /// Insert or replace the single snapshot row for the account
    async fn upsert_balance_snapshot(&self, snapshot: &BalanceSnapshot) -> LedgerResult<()>;

    /// Begin an atomic write scope
    async fn begin(&self) -> LedgerResult<Box<dyn StoreTransaction>>;
}

/// Unit of work covering the recorder's multi-row write.
///
/// All writes staged on the transaction become durable together on
/// [`commit`](StoreTransaction::commit); dropping the transaction
/// without committing discards every staged write. Reads through the
/// transaction see committed data overlaid with its own staged rows.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Stage a journal entry together with its lines. The entry number
    /// is assigned here and remains consumed even if the transaction is
    /// rolled back.
    async fn create_journal_entry(
        &mut self,
        entry: NewJournalEntry,
        items: Vec<LineItem>,
    ) -> LedgerResult<JournalEntry>;

    /// Ledger lines matching the filter, including lines staged on this
    /// transaction
    async fn lines(&self, filter: &LineFilter) -> LedgerResult<Vec<LedgerLine>>;

    /// Stage an insert-or-replace of the account's snapshot row
    async fn upsert_balance_snapshot(&mut self, snapshot: &BalanceSnapshot) -> LedgerResult<()>;

    /// Make every staged write durable atomically
    async fn commit(self: Box<Self>) -> LedgerResult<()>;
}
