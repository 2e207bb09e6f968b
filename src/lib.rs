//! # Marketplace Ledger
//!
//! A double-entry bookkeeping core for marketplace platforms: order
//! payments, vendor payouts, subscriptions, and refunds land as balanced
//! journal entries, and account balances and financial reports are
//! derived from the posted lines.
//!
//! ## Features
//!
//! - **Double-entry recording**: balanced journal entries validated
//!   before anything is persisted, written atomically with the balance
//!   cache refresh of every touched account
//! - **Chart of accounts**: Asset, Liability, Equity, Revenue, and
//!   Expense accounts keyed by account number, with delete protection
//!   once referenced
//! - **Balance tracking**: as-of-date balance calculation honoring the
//!   normal-balance sign convention, with a per-account snapshot cache
//!   for staleness-tolerant reads
//! - **Financial reporting**: trial balance, profit & loss, and balance
//!   sheet generation
//! - **Storage abstraction**: database-agnostic, trait-based storage
//!   with an explicit unit-of-work for the recorder's multi-row write
//!
//! ## Quick Start
//!
//! ```rust
//! use marketplace_ledger::{Ledger, MemoryStore};
//! use bigdecimal::BigDecimal;
//!
//! # async fn example() -> marketplace_ledger::LedgerResult<()> {
//! let ledger = Ledger::new(MemoryStore::new());
//! let accounts = ledger.setup_marketplace_chart().await?;
//!
//! ledger
//!     .record_order_payment(
//!         "order-1",
//!         BigDecimal::from(100),
//!         BigDecimal::from(10),
//!         BigDecimal::from(90),
//!     )
//!     .await?;
//!
//! let cash = ledger.get_account_balance(accounts["cash"].id, None).await?;
//! assert_eq!(cash, BigDecimal::from(100));
//! # Ok(())
//! # }
//! ```

pub mod intake;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use intake::{BalanceResponse, LineItemRequest, TransactionRequest};
pub use ledger::account::chart;
pub use ledger::balance::{
    calculate_account_balance, get_account_balance, net_balance, update_account_balance,
    update_all_balances,
};
pub use ledger::reports::{
    balance_sheet, profit_and_loss, trial_balance, BalanceSheet, ProfitLoss, ReportLine,
    ReportSection, TrialBalance, TrialBalanceRow,
};
pub use ledger::validation::{validate_account, validate_line_items, Tolerance};
pub use ledger::{AccountManager, Ledger, TransactionRecorder};
pub use traits::{LedgerStore, StoreTransaction};
pub use types::*;
pub use utils::MemoryStore;
