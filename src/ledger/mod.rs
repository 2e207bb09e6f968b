//! Double-entry ledger: chart of accounts, recording, balances, reports

pub mod account;
pub mod balance;
pub mod core;
pub mod reports;
pub mod transaction;
pub mod validation;

pub use account::AccountManager;
pub use core::Ledger;
pub use transaction::TransactionRecorder;
