//! Main ledger facade that coordinates accounts, recording, balances, and reports

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::ledger::account::AccountManager;
use crate::ledger::transaction::TransactionRecorder;
use crate::ledger::{balance, reports};
use crate::traits::LedgerStore;
use crate::types::*;

/// Ledger system facade over a storage backend
pub struct Ledger<S: LedgerStore> {
    store: S,
    accounts: AccountManager<S>,
    recorder: TransactionRecorder<S>,
}

impl<S: LedgerStore + Clone> Ledger<S> {
    /// Create a new ledger with the given storage backend
    pub fn new(store: S) -> Self {
        Self {
            accounts: AccountManager::new(store.clone()),
            recorder: TransactionRecorder::new(store.clone()),
            store,
        }
    }

    // Account operations

    pub async fn create_account(
        &self,
        account_number: String,
        account_name: String,
        account_type: AccountType,
    ) -> LedgerResult<Account> {
        self.accounts
            .create_account(account_number, account_name, account_type)
            .await
    }

    pub async fn get_account(&self, account_id: Uuid) -> LedgerResult<Option<Account>> {
        self.accounts.get_account(account_id).await
    }

    pub async fn get_account_by_number(&self, account_number: &str) -> LedgerResult<Account> {
        self.accounts.get_by_number_required(account_number).await
    }

    pub async fn list_accounts(&self) -> LedgerResult<Vec<Account>> {
        self.accounts.list_active().await
    }

    pub async fn rename_account(
        &self,
        account_id: Uuid,
        account_name: String,
    ) -> LedgerResult<Account> {
        self.accounts.rename(account_id, account_name).await
    }

    pub async fn set_account_active(
        &self,
        account_id: Uuid,
        is_active: bool,
    ) -> LedgerResult<Account> {
        self.accounts.set_active(account_id, is_active).await
    }

    pub async fn delete_account(&self, account_id: Uuid) -> LedgerResult<()> {
        self.accounts.delete_account(account_id).await
    }

    /// Seed the standard marketplace chart of accounts
    pub async fn setup_marketplace_chart(&self) -> LedgerResult<HashMap<String, Account>> {
        self.accounts.create_marketplace_chart().await
    }

    // Transaction operations

    /// Record a balanced transaction. See
    /// [`TransactionRecorder::record_transaction`].
    pub async fn record_transaction(
        &self,
        date: NaiveDate,
        description: String,
        reference_type: String,
        reference_id: String,
        items: Vec<LineItem>,
    ) -> LedgerResult<JournalEntry> {
        self.recorder
            .record_transaction(date, description, reference_type, reference_id, items)
            .await
    }

    pub async fn record_order_payment(
        &self,
        order_id: &str,
        amount: BigDecimal,
        platform_fee: BigDecimal,
        vendor_amount: BigDecimal,
    ) -> LedgerResult<JournalEntry> {
        self.recorder
            .record_order_payment(order_id, amount, platform_fee, vendor_amount)
            .await
    }

    pub async fn record_vendor_payout(
        &self,
        vendor_id: &str,
        amount: BigDecimal,
    ) -> LedgerResult<JournalEntry> {
        self.recorder.record_vendor_payout(vendor_id, amount).await
    }

    pub async fn record_subscription_payment(
        &self,
        subscription_id: &str,
        amount: BigDecimal,
    ) -> LedgerResult<JournalEntry> {
        self.recorder
            .record_subscription_payment(subscription_id, amount)
            .await
    }

    pub async fn record_refund(
        &self,
        reference_type: &str,
        reference_id: &str,
    ) -> LedgerResult<JournalEntry> {
        self.recorder.record_refund(reference_type, reference_id).await
    }

    pub async fn get_journal_entry(&self, entry_number: u64) -> LedgerResult<Option<JournalEntry>> {
        self.store.get_journal_entry(entry_number).await
    }

    pub async fn find_by_reference(
        &self,
        reference_type: &str,
        reference_id: &str,
    ) -> LedgerResult<Option<JournalEntry>> {
        self.store.find_by_reference(reference_type, reference_id).await
    }

    pub async fn list_journal_entries(
        &self,
        filter: &EntryFilter,
    ) -> LedgerResult<Vec<JournalEntry>> {
        self.store.list_journal_entries(filter).await
    }

    // Balance operations

    /// Cache-aware balance read; defaults to today
    pub async fn get_account_balance(
        &self,
        account_id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> LedgerResult<BigDecimal> {
        let account = self.accounts.get_account_required(account_id).await?;
        balance::get_account_balance(&self.store, &account, as_of).await
    }

    /// Recompute a balance directly from the ledger lines, bypassing the
    /// cache
    pub async fn calculate_account_balance(
        &self,
        account_id: Uuid,
        as_of: NaiveDate,
    ) -> LedgerResult<BigDecimal> {
        let account = self.accounts.get_account_required(account_id).await?;
        balance::calculate_account_balance(&self.store, &account, as_of).await
    }

    /// Refresh the cached snapshot of one account
    pub async fn update_account_balance(&self, account_id: Uuid) -> LedgerResult<BalanceSnapshot> {
        let account = self.accounts.get_account_required(account_id).await?;
        balance::update_account_balance(&self.store, &account).await
    }

    /// Refresh the cached snapshot of every active account
    pub async fn update_all_balances(&self) -> LedgerResult<usize> {
        balance::update_all_balances(&self.store).await
    }

    // Reports

    pub async fn trial_balance(&self, as_of: Option<NaiveDate>) -> LedgerResult<reports::TrialBalance> {
        reports::trial_balance(&self.store, as_of).await
    }

    pub async fn profit_and_loss(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> LedgerResult<reports::ProfitLoss> {
        reports::profit_and_loss(&self.store, date_from, date_to).await
    }

    pub async fn balance_sheet(&self, as_of: Option<NaiveDate>) -> LedgerResult<reports::BalanceSheet> {
        reports::balance_sheet(&self.store, as_of).await
    }
}
