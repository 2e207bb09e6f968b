//! In-memory storage implementation for testing and development

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::traits::{LedgerStore, StoreTransaction};
use crate::types::*;

#[derive(Debug)]
struct StoreInner {
    accounts: HashMap<Uuid, Account>,
    entries: BTreeMap<u64, JournalEntry>,
    snapshots: HashMap<Uuid, BalanceSnapshot>,
    next_entry_number: u64,
}

/// In-memory [`LedgerStore`] backed by a single read-write lock.
///
/// Commits apply under one write-lock acquisition, so concurrent readers
/// never observe a partially applied journal entry.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                accounts: HashMap::new(),
                entries: BTreeMap::new(),
                snapshots: HashMap::new(),
                next_entry_number: 1,
            })),
        }
    }

    /// Clear all data (useful for testing). Fails if the store lock is
    /// poisoned rather than silently leaving data behind.
    pub fn clear(&self) -> LedgerResult<()> {
        let mut inner = self.write()?;
        inner.accounts.clear();
        inner.entries.clear();
        inner.snapshots.clear();
        inner.next_entry_number = 1;
        Ok(())
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, StoreInner>> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Storage("store lock poisoned".to_string()))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, StoreInner>> {
        self.inner
            .write()
            .map_err(|_| LedgerError::Storage("store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn entry_matches(entry: &JournalEntry, filter: &EntryFilter) -> bool {
    if let Some(ref reference_type) = filter.reference_type {
        if &entry.reference_type != reference_type {
            return false;
        }
    }
    if let Some(ref reference_id) = filter.reference_id {
        if &entry.reference_id != reference_id {
            return false;
        }
    }
    if let Some(date_from) = filter.date_from {
        if entry.date < date_from {
            return false;
        }
    }
    if let Some(date_to) = filter.date_to {
        if entry.date > date_to {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if entry.status != status {
            return false;
        }
    }
    true
}

fn collect_lines<'a>(
    entries: impl Iterator<Item = &'a JournalEntry>,
    filter: &LineFilter,
    out: &mut Vec<LedgerLine>,
) {
    for entry in entries {
        if let Some(date_from) = filter.date_from {
            if entry.date < date_from {
                continue;
            }
        }
        if let Some(date_to) = filter.date_to {
            if entry.date > date_to {
                continue;
            }
        }
        if let Some(status) = filter.status {
            if entry.status != status {
                continue;
            }
        }
        for line in &entry.lines {
            if filter
                .account_id
                .is_none_or(|account_id| line.account_id == account_id)
            {
                out.push(line.clone());
            }
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn save_account(&self, account: &Account) -> LedgerResult<()> {
        self.write()?.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn get_account(&self, account_id: Uuid) -> LedgerResult<Option<Account>> {
        Ok(self.read()?.accounts.get(&account_id).cloned())
    }

    async fn get_account_by_number(&self, account_number: &str) -> LedgerResult<Option<Account>> {
        Ok(self
            .read()?
            .accounts
            .values()
            .find(|account| account.account_number == account_number)
            .cloned())
    }

    async fn list_accounts(
        &self,
        account_type: Option<AccountType>,
        active_only: bool,
    ) -> LedgerResult<Vec<Account>> {
        let inner = self.read()?;
        let mut accounts: Vec<Account> = inner
            .accounts
            .values()
            .filter(|account| {
                account_type.is_none_or(|t| account.account_type == t)
                    && (!active_only || account.is_active)
            })
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.account_number.cmp(&b.account_number));
        Ok(accounts)
    }

    async fn update_account(&self, account: &Account) -> LedgerResult<()> {
        let mut inner = self.write()?;
        if !inner.accounts.contains_key(&account.id) {
            return Err(LedgerError::AccountNotFound(account.id.to_string()));
        }
        inner.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn delete_account(&self, account_id: Uuid) -> LedgerResult<()> {
        let mut inner = self.write()?;
        let referenced = inner
            .entries
            .values()
            .flat_map(|entry| entry.lines.iter())
            .any(|line| line.account_id == account_id);
        if referenced {
            return Err(LedgerError::AccountInUse(account_id.to_string()));
        }
        if inner.accounts.remove(&account_id).is_none() {
            return Err(LedgerError::AccountNotFound(account_id.to_string()));
        }
        inner.snapshots.remove(&account_id);
        Ok(())
    }

    async fn get_journal_entry(&self, entry_number: u64) -> LedgerResult<Option<JournalEntry>> {
        Ok(self.read()?.entries.get(&entry_number).cloned())
    }

    async fn find_by_reference(
        &self,
        reference_type: &str,
        reference_id: &str,
    ) -> LedgerResult<Option<JournalEntry>> {
        let filter = EntryFilter {
            reference_type: Some(reference_type.to_string()),
            reference_id: Some(reference_id.to_string()),
            ..EntryFilter::default()
        };
        Ok(self.list_journal_entries(&filter).await?.into_iter().next())
    }

    async fn list_journal_entries(&self, filter: &EntryFilter) -> LedgerResult<Vec<JournalEntry>> {
        let inner = self.read()?;
        let mut entries: Vec<JournalEntry> = inner
            .entries
            .values()
            .filter(|entry| entry_matches(entry, filter))
            .cloned()
            .collect();
        // Newest first: by date, then by entry number
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.entry_number.cmp(&a.entry_number)));
        Ok(entries)
    }

    async fn lines(&self, filter: &LineFilter) -> LedgerResult<Vec<LedgerLine>> {
        let inner = self.read()?;
        let mut lines = Vec::new();
        collect_lines(inner.entries.values(), filter, &mut lines);
        Ok(lines)
    }

    async fn account_has_lines(&self, account_id: Uuid) -> LedgerResult<bool> {
        let inner = self.read()?;
        Ok(inner
            .entries
            .values()
            .flat_map(|entry| entry.lines.iter())
            .any(|line| line.account_id == account_id))
    }

    async fn get_balance_snapshot(&self, account_id: Uuid) -> LedgerResult<Option<BalanceSnapshot>> {
        Ok(self.read()?.snapshots.get(&account_id).cloned())
    }

    async fn upsert_balance_snapshot(&self, snapshot: &BalanceSnapshot) -> LedgerResult<()> {
        self.write()?
            .snapshots
            .insert(snapshot.account_id, snapshot.clone());
        Ok(())
    }

    async fn begin(&self) -> LedgerResult<Box<dyn StoreTransaction>> {
        Ok(Box::new(MemoryTransaction {
            inner: Arc::clone(&self.inner),
            staged_entries: Vec::new(),
            staged_snapshots: HashMap::new(),
        }))
    }
}

/// Unit of work over a [`MemoryStore`].
///
/// Writes are staged on the transaction and applied under a single
/// write-lock acquisition on commit. Dropping the transaction without
/// committing discards everything staged. Entry numbers are reserved at
/// staging time and stay consumed on rollback, like a database sequence.
struct MemoryTransaction {
    inner: Arc<RwLock<StoreInner>>,
    staged_entries: Vec<JournalEntry>,
    staged_snapshots: HashMap<Uuid, BalanceSnapshot>,
}

impl MemoryTransaction {
    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, StoreInner>> {
        self.inner
            .write()
            .map_err(|_| LedgerError::Storage("store lock poisoned".to_string()))
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, StoreInner>> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Storage("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn create_journal_entry(
        &mut self,
        entry: NewJournalEntry,
        items: Vec<LineItem>,
    ) -> LedgerResult<JournalEntry> {
        let entry_number = {
            let mut inner = self.write()?;
            let number = inner.next_entry_number;
            inner.next_entry_number += 1;
            number
        };

        let now = chrono::Utc::now().naive_utc();
        let lines = items
            .into_iter()
            .map(|item| LedgerLine {
                entry_number,
                account_id: item.account_id,
                debit: item.debit,
                credit: item.credit,
                description: item.description,
            })
            .collect();

        let entry = JournalEntry {
            entry_number,
            date: entry.date,
            description: entry.description,
            reference_type: entry.reference_type,
            reference_id: entry.reference_id,
            status: entry.status,
            lines,
            created_at: now,
            updated_at: now,
        };
        self.staged_entries.push(entry.clone());
        Ok(entry)
    }

    async fn lines(&self, filter: &LineFilter) -> LedgerResult<Vec<LedgerLine>> {
        let mut lines = Vec::new();
        {
            let inner = self.read()?;
            collect_lines(inner.entries.values(), filter, &mut lines);
        }
        collect_lines(self.staged_entries.iter(), filter, &mut lines);
        Ok(lines)
    }

    async fn upsert_balance_snapshot(&mut self, snapshot: &BalanceSnapshot) -> LedgerResult<()> {
        self.staged_snapshots
            .insert(snapshot.account_id, snapshot.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> LedgerResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| LedgerError::Storage("store lock poisoned".to_string()))?;
        for entry in self.staged_entries {
            inner.entries.insert(entry.entry_number, entry);
        }
        for (account_id, snapshot) in self.staged_snapshots {
            inner.snapshots.insert(account_id, snapshot);
        }
        Ok(())
    }
}
