//! Transaction recording and the domain event adapters

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::ledger::account::chart;
use crate::ledger::balance::{snapshot_from_lines, today};
use crate::ledger::validation::{validate_line_items, Tolerance};
use crate::traits::LedgerStore;
use crate::types::*;

/// Records balanced journal entries and keeps the balance cache of the
/// touched accounts current, all inside one atomic write scope.
pub struct TransactionRecorder<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> TransactionRecorder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a transaction: one posted journal entry plus one ledger
    /// line per item, followed by a cache refresh for every distinct
    /// account touched.
    ///
    /// Validation (exact balance, entry count, one-sided items) and
    /// account resolution happen before any write. The writes themselves
    /// go through a single [`StoreTransaction`](crate::traits::StoreTransaction);
    /// a failure on any of them leaves the store untouched.
    pub async fn record_transaction(
        &self,
        date: NaiveDate,
        description: String,
        reference_type: String,
        reference_id: String,
        items: Vec<LineItem>,
    ) -> LedgerResult<JournalEntry> {
        validate_line_items(&items, Tolerance::Exact)?;

        let mut accounts: HashMap<Uuid, Account> = HashMap::new();
        for item in &items {
            if !accounts.contains_key(&item.account_id) {
                let account = self
                    .store
                    .get_account(item.account_id)
                    .await?
                    .ok_or_else(|| LedgerError::AccountNotFound(item.account_id.to_string()))?;
                accounts.insert(item.account_id, account);
            }
        }

        let mut tx = self.store.begin().await?;
        let entry = tx
            .create_journal_entry(
                NewJournalEntry {
                    date,
                    description,
                    reference_type,
                    reference_id,
                    status: EntryStatus::Posted,
                },
                items,
            )
            .await?;

        let as_of = today();
        for account in accounts.values() {
            let lines = tx
                .lines(&LineFilter::posted_through(account.id, as_of))
                .await?;
            let snapshot = snapshot_from_lines(account, as_of, &lines);
            tx.upsert_balance_snapshot(&snapshot).await?;
        }

        tx.commit().await?;

        tracing::info!(
            entry_number = entry.entry_number,
            lines = entry.lines.len(),
            reference_type = %entry.reference_type,
            reference_id = %entry.reference_id,
            "recorded journal entry"
        );

        Ok(entry)
    }

    /// Record an incoming order payment, split across cash received,
    /// gross sales revenue, the platform fee pass-through, and the
    /// vendor's share.
    ///
    /// `amount` must equal `platform_fee + vendor_amount`.
    pub async fn record_order_payment(
        &self,
        order_id: &str,
        amount: BigDecimal,
        platform_fee: BigDecimal,
        vendor_amount: BigDecimal,
    ) -> LedgerResult<JournalEntry> {
        if amount != &platform_fee + &vendor_amount {
            return Err(LedgerError::Validation(format!(
                "Order payment ({amount}) must equal platform fee ({platform_fee}) plus vendor share ({vendor_amount})"
            )));
        }

        let cash = self.account_by_number(chart::CASH).await?;
        let sales_revenue = self.account_by_number(chart::SALES_REVENUE).await?;
        let fee_expense = self.account_by_number(chart::PLATFORM_FEE_EXPENSE).await?;
        let fee_payable = self.account_by_number(chart::PLATFORM_FEE_PAYABLE).await?;
        let vendor_cost = self.account_by_number(chart::VENDOR_COST).await?;
        let vendor_payable = self.account_by_number(chart::VENDOR_PAYABLE).await?;

        let items = vec![
            LineItem::debit(cash.id, amount.clone(), "Cash received"),
            LineItem::credit(sales_revenue.id, amount, "Sales revenue"),
            LineItem::debit(fee_expense.id, platform_fee.clone(), "Platform fee expense"),
            LineItem::credit(fee_payable.id, platform_fee, "Platform fee payable"),
            LineItem::debit(vendor_cost.id, vendor_amount.clone(), "Vendor share of order"),
            LineItem::credit(vendor_payable.id, vendor_amount, "Vendor payable"),
        ];

        self.record_transaction(
            today(),
            format!("Order payment for order {order_id}"),
            "order".to_string(),
            order_id.to_string(),
            items,
        )
        .await
    }

    /// Record a payout to a vendor: the payable is settled and cash
    /// leaves the platform.
    pub async fn record_vendor_payout(
        &self,
        vendor_id: &str,
        amount: BigDecimal,
    ) -> LedgerResult<JournalEntry> {
        let cash = self.account_by_number(chart::CASH).await?;
        let vendor_payable = self.account_by_number(chart::VENDOR_PAYABLE).await?;

        let items = vec![
            LineItem::debit(
                vendor_payable.id,
                amount.clone(),
                format!("Payout to vendor {vendor_id}"),
            ),
            LineItem::credit(
                cash.id,
                amount,
                format!("Cash paid to vendor {vendor_id}"),
            ),
        ];

        self.record_transaction(
            today(),
            format!("Vendor payout to {vendor_id}"),
            "payment".to_string(),
            vendor_id.to_string(),
            items,
        )
        .await
    }

    /// Record a subscription payment: cash in, subscription revenue out
    pub async fn record_subscription_payment(
        &self,
        subscription_id: &str,
        amount: BigDecimal,
    ) -> LedgerResult<JournalEntry> {
        let cash = self.account_by_number(chart::CASH).await?;
        let subscription_revenue = self.account_by_number(chart::SUBSCRIPTION_REVENUE).await?;

        let items = vec![
            LineItem::debit(cash.id, amount.clone(), "Cash received"),
            LineItem::credit(subscription_revenue.id, amount, "Subscription revenue"),
        ];

        self.record_transaction(
            today(),
            format!("Subscription payment for {subscription_id}"),
            "subscription".to_string(),
            subscription_id.to_string(),
            items,
        )
        .await
    }

    /// Record a refund as the exact reversal of a previously recorded
    /// transaction: every original line is posted again with its debit
    /// and credit amounts swapped.
    pub async fn record_refund(
        &self,
        reference_type: &str,
        reference_id: &str,
    ) -> LedgerResult<JournalEntry> {
        let original = self
            .store
            .find_by_reference(reference_type, reference_id)
            .await?
            .ok_or_else(|| {
                LedgerError::TransactionNotFound(format!("{reference_type} {reference_id}"))
            })?;

        let items = original
            .lines
            .iter()
            .map(|line| LineItem {
                account_id: line.account_id,
                debit: line.credit.clone(),
                credit: line.debit.clone(),
                description: format!("Refund: {}", line.description),
            })
            .collect();

        self.record_transaction(
            today(),
            format!("Refund for {reference_type} {reference_id}"),
            "refund".to_string(),
            format!("{reference_type}_{reference_id}"),
            items,
        )
        .await
    }

    async fn account_by_number(&self, account_number: &str) -> LedgerResult<Account> {
        self.store
            .get_account_by_number(account_number)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }
}
