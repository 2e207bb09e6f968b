//! Financial report generation: trial balance, profit & loss, balance sheet

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ledger::balance::{get_account_balance, net_balance, sum_lines, today};
use crate::traits::LedgerStore;
use crate::types::*;

/// One account row of a trial balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_number: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub debit_total: BigDecimal,
    pub credit_total: BigDecimal,
    /// Signed balance per the account's normal-balance convention
    pub balance: BigDecimal,
}

/// Trial balance as of a date.
///
/// A nonzero `difference` indicates a data integrity fault, not a user
/// error; it is reported as data for downstream consumers to alarm on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub as_of_date: NaiveDate,
    pub accounts: Vec<TrialBalanceRow>,
    pub total_debits: BigDecimal,
    pub total_credits: BigDecimal,
    pub difference: BigDecimal,
}

/// One line of an itemized report section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub account_name: String,
    pub amount: BigDecimal,
}

/// An itemized breakdown with its total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub details: Vec<ReportLine>,
    pub total: BigDecimal,
}

/// Profit & loss statement over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLoss {
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
    pub revenue: ReportSection,
    pub expenses: ReportSection,
    pub net_income: BigDecimal,
}

/// Balance sheet as of a date.
///
/// As with the trial balance, a nonzero `difference` is surfaced as
/// data rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub as_of_date: NaiveDate,
    pub assets: ReportSection,
    pub liabilities: ReportSection,
    pub equity: ReportSection,
    pub total_liabilities_equity: BigDecimal,
    pub difference: BigDecimal,
}

/// Generate a trial balance: per active account with any posted activity
/// through `as_of` (default today), its debit total, credit total, and
/// signed balance, with grand totals and their difference.
pub async fn trial_balance<S: LedgerStore>(
    store: &S,
    as_of: Option<NaiveDate>,
) -> LedgerResult<TrialBalance> {
    let as_of = as_of.unwrap_or_else(today);
    let accounts = store.list_accounts(None, true).await?;

    let mut rows = Vec::new();
    let mut total_debits = BigDecimal::from(0);
    let mut total_credits = BigDecimal::from(0);

    for account in accounts {
        let lines = store
            .lines(&LineFilter::posted_through(account.id, as_of))
            .await?;
        let (debit_total, credit_total) = sum_lines(&lines);

        let zero = BigDecimal::from(0);
        if debit_total == zero && credit_total == zero {
            continue;
        }

        let balance = net_balance(account.account_type, &debit_total, &credit_total);
        total_debits += &debit_total;
        total_credits += &credit_total;
        rows.push(TrialBalanceRow {
            account_number: account.account_number,
            account_name: account.account_name,
            account_type: account.account_type,
            debit_total,
            credit_total,
            balance,
        });
    }

    let difference = &total_debits - &total_credits;
    if difference != BigDecimal::from(0) {
        tracing::warn!(%difference, %as_of, "trial balance does not balance");
    }

    Ok(TrialBalance {
        as_of_date: as_of,
        accounts: rows,
        total_debits,
        total_credits,
        difference,
    })
}

/// Generate a profit & loss statement for the period (default
/// month-to-date). Revenue accounts contribute their period credits
/// minus debits, expense accounts their period debits minus credits.
///
/// Only accounts with a strictly positive period net appear in the
/// itemized details and the totals; zero and negative nets are omitted
/// entirely. This asymmetry is a documented quirk of the report, kept
/// as-is.
pub async fn profit_and_loss<S: LedgerStore>(
    store: &S,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> LedgerResult<ProfitLoss> {
    let date_to = date_to.unwrap_or_else(today);
    let date_from = date_from.unwrap_or_else(|| first_of_month(date_to));

    let revenue = period_section(store, AccountType::Revenue, date_from, date_to).await?;
    let expenses = period_section(store, AccountType::Expense, date_from, date_to).await?;
    let net_income = &revenue.total - &expenses.total;

    tracing::debug!(
        %date_from,
        %date_to,
        %net_income,
        "generated profit and loss statement"
    );

    Ok(ProfitLoss {
        period_from: date_from,
        period_to: date_to,
        revenue,
        expenses,
        net_income,
    })
}

async fn period_section<S: LedgerStore>(
    store: &S,
    account_type: AccountType,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> LedgerResult<ReportSection> {
    let accounts = store.list_accounts(Some(account_type), true).await?;
    let mut section = ReportSection::default();

    for account in accounts {
        let lines = store
            .lines(&LineFilter::posted_between(account.id, date_from, date_to))
            .await?;
        let (debit_total, credit_total) = sum_lines(&lines);
        let net = net_balance(account_type, &debit_total, &credit_total);

        if net > BigDecimal::from(0) {
            section.total += &net;
            section.details.push(ReportLine {
                account_name: account.account_name,
                amount: net,
            });
        }
    }

    Ok(section)
}

/// Generate a balance sheet as of a date (default today). Asset accounts
/// with a nonzero balance are itemized and summed with their sign;
/// Liability and Equity balances are normalized to absolute values for
/// display and totals.
pub async fn balance_sheet<S: LedgerStore>(
    store: &S,
    as_of: Option<NaiveDate>,
) -> LedgerResult<BalanceSheet> {
    let as_of = as_of.unwrap_or_else(today);

    let assets = sheet_section(store, AccountType::Asset, as_of, false).await?;
    let liabilities = sheet_section(store, AccountType::Liability, as_of, true).await?;
    let equity = sheet_section(store, AccountType::Equity, as_of, true).await?;

    let total_liabilities_equity = &liabilities.total + &equity.total;
    let difference = &assets.total - &total_liabilities_equity;
    if difference != BigDecimal::from(0) {
        tracing::warn!(%difference, %as_of, "balance sheet does not balance");
    }

    Ok(BalanceSheet {
        as_of_date: as_of,
        assets,
        liabilities,
        equity,
        total_liabilities_equity,
        difference,
    })
}

async fn sheet_section<S: LedgerStore>(
    store: &S,
    account_type: AccountType,
    as_of: NaiveDate,
    absolute: bool,
) -> LedgerResult<ReportSection> {
    let accounts = store.list_accounts(Some(account_type), true).await?;
    let mut section = ReportSection::default();

    for account in accounts {
        let balance = get_account_balance(store, &account, Some(as_of)).await?;
        if balance == BigDecimal::from(0) {
            continue;
        }

        let amount = if absolute { balance.abs() } else { balance };
        section.total += &amount;
        section.details.push(ReportLine {
            account_name: account.account_name,
            amount,
        });
    }

    Ok(section)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
