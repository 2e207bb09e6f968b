//! Chart of accounts management

use std::collections::HashMap;

use uuid::Uuid;

use crate::ledger::validation::validate_account;
use crate::traits::LedgerStore;
use crate::types::*;

/// Account numbers of the standard marketplace chart
pub mod chart {
    pub const CASH: &str = "1000";
    pub const ACCOUNTS_RECEIVABLE: &str = "1100";
    pub const VENDOR_PAYABLE: &str = "2100";
    pub const PLATFORM_FEE_PAYABLE: &str = "2200";
    pub const OWNERS_EQUITY: &str = "3000";
    pub const SALES_REVENUE: &str = "4000";
    pub const SUBSCRIPTION_REVENUE: &str = "4100";
    pub const VENDOR_COST: &str = "5000";
    pub const PLATFORM_FEE_EXPENSE: &str = "5100";
    pub const REFUND_EXPENSE: &str = "5200";
}

/// Manager for chart-of-accounts operations
pub struct AccountManager<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> AccountManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a new account. The account number must be unique.
    pub async fn create_account(
        &self,
        account_number: String,
        account_name: String,
        account_type: AccountType,
    ) -> LedgerResult<Account> {
        let account = Account::new(account_number, account_name, account_type);
        validate_account(&account)?;

        if self
            .store
            .get_account_by_number(&account.account_number)
            .await?
            .is_some()
        {
            return Err(LedgerError::Validation(format!(
                "An account with number '{}' already exists",
                account.account_number
            )));
        }

        self.store.save_account(&account).await?;
        tracing::debug!(
            account_number = %account.account_number,
            account_type = ?account.account_type,
            "created account"
        );

        Ok(account)
    }

    /// Get an account by ID
    pub async fn get_account(&self, account_id: Uuid) -> LedgerResult<Option<Account>> {
        self.store.get_account(account_id).await
    }

    /// Get an account by ID, returning an error if not found
    pub async fn get_account_required(&self, account_id: Uuid) -> LedgerResult<Account> {
        self.store
            .get_account(account_id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))
    }

    /// Get an account by its chart-of-accounts number, returning an
    /// error if not found
    pub async fn get_by_number_required(&self, account_number: &str) -> LedgerResult<Account> {
        self.store
            .get_account_by_number(account_number)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }

    /// List active accounts ordered by account number
    pub async fn list_active(&self) -> LedgerResult<Vec<Account>> {
        self.store.list_accounts(None, true).await
    }

    /// List active accounts of one category, ordered by account number
    pub async fn list_active_by_type(&self, account_type: AccountType) -> LedgerResult<Vec<Account>> {
        self.store.list_accounts(Some(account_type), true).await
    }

    /// Rename an account. The number, category, and normal balance are
    /// fixed once the account exists.
    pub async fn rename(&self, account_id: Uuid, account_name: String) -> LedgerResult<Account> {
        let mut account = self.get_account_required(account_id).await?;
        account.account_name = account_name;
        account.updated_at = chrono::Utc::now().naive_utc();
        validate_account(&account)?;
        self.store.update_account(&account).await?;
        Ok(account)
    }

    /// Activate or deactivate an account
    pub async fn set_active(&self, account_id: Uuid, is_active: bool) -> LedgerResult<Account> {
        let mut account = self.get_account_required(account_id).await?;
        account.is_active = is_active;
        account.updated_at = chrono::Utc::now().naive_utc();
        self.store.update_account(&account).await?;
        Ok(account)
    }

    /// Delete an account. Fails if any ledger line references it.
    pub async fn delete_account(&self, account_id: Uuid) -> LedgerResult<()> {
        let account = self.get_account_required(account_id).await?;
        if self.store.account_has_lines(account_id).await? {
            return Err(LedgerError::AccountInUse(account.account_number));
        }
        self.store.delete_account(account_id).await
    }

    /// Seed the standard marketplace chart of accounts. Returns the
    /// created accounts keyed by a short slug.
    pub async fn create_marketplace_chart(&self) -> LedgerResult<HashMap<String, Account>> {
        let definitions: [(&str, &str, &str, AccountType); 10] = [
            ("cash", chart::CASH, "Cash", AccountType::Asset),
            (
                "accounts_receivable",
                chart::ACCOUNTS_RECEIVABLE,
                "Accounts Receivable",
                AccountType::Asset,
            ),
            (
                "vendor_payable",
                chart::VENDOR_PAYABLE,
                "Vendor Payable",
                AccountType::Liability,
            ),
            (
                "platform_fee_payable",
                chart::PLATFORM_FEE_PAYABLE,
                "Platform Fee Payable",
                AccountType::Liability,
            ),
            (
                "owners_equity",
                chart::OWNERS_EQUITY,
                "Owner's Equity",
                AccountType::Equity,
            ),
            (
                "sales_revenue",
                chart::SALES_REVENUE,
                "Sales Revenue",
                AccountType::Revenue,
            ),
            (
                "subscription_revenue",
                chart::SUBSCRIPTION_REVENUE,
                "Subscription Revenue",
                AccountType::Revenue,
            ),
            (
                "vendor_cost",
                chart::VENDOR_COST,
                "Vendor Cost",
                AccountType::Expense,
            ),
            (
                "platform_fee_expense",
                chart::PLATFORM_FEE_EXPENSE,
                "Platform Fee Expense",
                AccountType::Expense,
            ),
            (
                "refund_expense",
                chart::REFUND_EXPENSE,
                "Refund Expense",
                AccountType::Expense,
            ),
        ];

        let mut accounts = HashMap::new();
        for (slug, number, name, account_type) in definitions {
            let account = self
                .create_account(number.to_string(), name.to_string(), account_type)
                .await?;
            accounts.insert(slug.to_string(), account);
        }

        tracing::info!(count = accounts.len(), "seeded marketplace chart of accounts");
        Ok(accounts)
    }
}
