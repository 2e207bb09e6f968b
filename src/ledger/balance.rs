//! Balance calculation and the per-account balance cache

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::traits::LedgerStore;
use crate::types::*;

/// Sum the debit and credit columns of a set of ledger lines
pub(crate) fn sum_lines(lines: &[LedgerLine]) -> (BigDecimal, BigDecimal) {
    let debit_total: BigDecimal = lines.iter().map(|line| &line.debit).sum();
    let credit_total: BigDecimal = lines.iter().map(|line| &line.credit).sum();
    (debit_total, credit_total)
}

/// Signed net balance under the normal-balance convention: accounts with
/// a debit normal balance (Asset, Expense) report debits minus credits,
/// the rest report credits minus debits.
pub fn net_balance(
    account_type: AccountType,
    debit_total: &BigDecimal,
    credit_total: &BigDecimal,
) -> BigDecimal {
    match account_type.normal_balance() {
        Side::Debit => debit_total - credit_total,
        Side::Credit => credit_total - debit_total,
    }
}

/// Build the cache row for an account from its posted lines through `as_of`
pub(crate) fn snapshot_from_lines(
    account: &Account,
    as_of: NaiveDate,
    lines: &[LedgerLine],
) -> BalanceSnapshot {
    let (debit_total, credit_total) = sum_lines(lines);
    let net = net_balance(account.account_type, &debit_total, &credit_total);
    BalanceSnapshot {
        account_id: account.id,
        as_of_date: as_of,
        debit_total,
        credit_total,
        net_balance: net,
        last_updated: chrono::Utc::now().naive_utc(),
    }
}

/// Compute an account's balance from its posted ledger lines with entry
/// date on or before `as_of`.
///
/// Pure function of stored data; no side effects, safe for concurrent
/// readers.
pub async fn calculate_account_balance<S: LedgerStore>(
    store: &S,
    account: &Account,
    as_of: NaiveDate,
) -> LedgerResult<BigDecimal> {
    let lines = store
        .lines(&LineFilter::posted_through(account.id, as_of))
        .await?;
    let (debit_total, credit_total) = sum_lines(&lines);
    Ok(net_balance(account.account_type, &debit_total, &credit_total))
}

/// Staleness-tolerant balance read. The cached snapshot is served when
/// its as-of date covers the requested date; otherwise the balance is
/// recomputed from the ledger lines. Defaults to today.
pub async fn get_account_balance<S: LedgerStore>(
    store: &S,
    account: &Account,
    as_of: Option<NaiveDate>,
) -> LedgerResult<BigDecimal> {
    let as_of = as_of.unwrap_or_else(today);

    if let Some(cached) = store.get_balance_snapshot(account.id).await? {
        if cached.as_of_date >= as_of {
            return Ok(cached.net_balance);
        }
    }

    calculate_account_balance(store, account, as_of).await
}

/// Recompute the account's totals and net balance as of today and
/// overwrite its single cache row.
pub async fn update_account_balance<S: LedgerStore>(
    store: &S,
    account: &Account,
) -> LedgerResult<BalanceSnapshot> {
    let as_of = today();
    let lines = store
        .lines(&LineFilter::posted_through(account.id, as_of))
        .await?;
    let snapshot = snapshot_from_lines(account, as_of, &lines);
    store.upsert_balance_snapshot(&snapshot).await?;
    tracing::debug!(
        account_number = %account.account_number,
        net_balance = %snapshot.net_balance,
        "refreshed balance snapshot"
    );
    Ok(snapshot)
}

/// Refresh the cached balance of every active account. Used for bulk
/// reconciliation after manual or administrative postings. Returns the
/// number of accounts refreshed.
pub async fn update_all_balances<S: LedgerStore>(store: &S) -> LedgerResult<usize> {
    let accounts = store.list_accounts(None, true).await?;
    for account in &accounts {
        update_account_balance(store, account).await?;
    }
    tracing::info!(count = accounts.len(), "recalculated all account balances");
    Ok(accounts.len())
}

pub(crate) fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
