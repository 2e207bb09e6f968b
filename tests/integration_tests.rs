//! Integration tests for marketplace-ledger

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use marketplace_ledger::{
    AccountType, EntryFilter, EntryStatus, Ledger, LedgerError, LineItem, MemoryStore,
    TransactionRequest,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn cash_sale_updates_both_balances() {
    let ledger = Ledger::new(MemoryStore::new());
    let cash = ledger
        .create_account("1000".to_string(), "Cash".to_string(), AccountType::Asset)
        .await
        .unwrap();
    let revenue = ledger
        .create_account(
            "4000".to_string(),
            "Sales Revenue".to_string(),
            AccountType::Revenue,
        )
        .await
        .unwrap();

    let entry = ledger
        .record_transaction(
            date(2024, 1, 15),
            "Cash sale".to_string(),
            "order".to_string(),
            "12345".to_string(),
            vec![
                LineItem::debit(cash.id, BigDecimal::from(100), "Cash received"),
                LineItem::credit(revenue.id, BigDecimal::from(100), "Sales revenue"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(entry.status, EntryStatus::Posted);
    assert_eq!(entry.lines.len(), 2);

    let cash_balance = ledger.get_account_balance(cash.id, None).await.unwrap();
    let revenue_balance = ledger.get_account_balance(revenue.id, None).await.unwrap();
    assert_eq!(cash_balance, BigDecimal::from(100));
    // Credit-normal account reports its credit balance as positive
    assert_eq!(revenue_balance, BigDecimal::from(100));
}

#[tokio::test]
async fn imbalanced_sale_is_rejected_and_nothing_persists() {
    let ledger = Ledger::new(MemoryStore::new());
    let cash = ledger
        .create_account("1000".to_string(), "Cash".to_string(), AccountType::Asset)
        .await
        .unwrap();
    let revenue = ledger
        .create_account(
            "4000".to_string(),
            "Sales Revenue".to_string(),
            AccountType::Revenue,
        )
        .await
        .unwrap();

    let err = ledger
        .record_transaction(
            date(2024, 1, 15),
            "Bad sale".to_string(),
            "order".to_string(),
            "12345".to_string(),
            vec![
                LineItem::debit(cash.id, BigDecimal::from(100), ""),
                LineItem::credit(revenue.id, BigDecimal::from(99), ""),
            ],
        )
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("100"), "{message}");
    assert!(message.contains("99"), "{message}");

    let entries = ledger
        .list_journal_entries(&EntryFilter::default())
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn marketplace_flow_order_to_payout_to_refund() {
    let ledger = Ledger::new(MemoryStore::new());
    let accounts = ledger.setup_marketplace_chart().await.unwrap();

    // An order comes in: 100 gross, 10 platform fee, 90 vendor share
    ledger
        .record_order_payment(
            "ord-42",
            BigDecimal::from(100),
            BigDecimal::from(10),
            BigDecimal::from(90),
        )
        .await
        .unwrap();

    let vendor_payable = ledger
        .get_account_balance(accounts["vendor_payable"].id, None)
        .await
        .unwrap();
    assert_eq!(vendor_payable, BigDecimal::from(90));

    // The vendor gets paid out
    ledger
        .record_vendor_payout("V1", BigDecimal::from(90))
        .await
        .unwrap();
    let vendor_payable = ledger
        .get_account_balance(accounts["vendor_payable"].id, None)
        .await
        .unwrap();
    let cash = ledger
        .get_account_balance(accounts["cash"].id, None)
        .await
        .unwrap();
    assert_eq!(vendor_payable, BigDecimal::from(0));
    assert_eq!(cash, BigDecimal::from(10));

    // Refunding the order reverses its entry exactly
    let refund = ledger.record_refund("order", "ord-42").await.unwrap();
    assert_eq!(refund.reference_id, "order_ord-42");
    let cash = ledger
        .get_account_balance(accounts["cash"].id, None)
        .await
        .unwrap();
    assert_eq!(cash, BigDecimal::from(-90));

    // Ledger stays balanced through the whole flow
    let trial = ledger.trial_balance(None).await.unwrap();
    assert_eq!(trial.difference, BigDecimal::from(0));
}

#[tokio::test]
async fn refund_without_original_transaction_fails() {
    let ledger = Ledger::new(MemoryStore::new());
    ledger.setup_marketplace_chart().await.unwrap();

    let err = ledger.record_refund("order", "missing").await.unwrap_err();
    assert!(matches!(err, LedgerError::TransactionNotFound(_)));
}

#[tokio::test]
async fn subscription_revenue_flows_into_profit_and_loss() {
    let ledger = Ledger::new(MemoryStore::new());
    ledger.setup_marketplace_chart().await.unwrap();

    ledger
        .record_subscription_payment("sub-7", BigDecimal::from(25))
        .await
        .unwrap();

    let report = ledger.profit_and_loss(None, None).await.unwrap();
    assert_eq!(report.revenue.total, BigDecimal::from(25));
    assert_eq!(report.net_income, BigDecimal::from(25));
    assert_eq!(report.revenue.details.len(), 1);
    assert_eq!(report.revenue.details[0].account_name, "Subscription Revenue");
}

#[tokio::test]
async fn balance_sheet_balances_for_pass_through_order() {
    let ledger = Ledger::new(MemoryStore::new());
    ledger.setup_marketplace_chart().await.unwrap();

    ledger
        .record_order_payment(
            "ord-1",
            BigDecimal::from(100),
            BigDecimal::from(10),
            BigDecimal::from(90),
        )
        .await
        .unwrap();

    let sheet = ledger.balance_sheet(None).await.unwrap();
    assert_eq!(sheet.assets.total, BigDecimal::from(100));
    assert_eq!(sheet.total_liabilities_equity, BigDecimal::from(100));
    // Order net income is zero here (gross revenue offset by fee and
    // vendor cost), so this sheet balances exactly
    assert_eq!(sheet.difference, BigDecimal::from(0));
}

#[tokio::test]
async fn intake_request_drives_the_recorder() {
    let ledger = Ledger::new(MemoryStore::new());
    let accounts = ledger.setup_marketplace_chart().await.unwrap();

    let body = format!(
        r#"{{
            "date": "2024-01-15",
            "description": "Order payment",
            "reference_type": "order",
            "reference_id": "12345",
            "entries": [
                {{"account_id": "{}", "debit": 100.0, "credit": 0, "description": "Cash received"}},
                {{"account_id": "{}", "debit": 0, "credit": 100.0, "description": "Sales revenue"}}
            ]
        }}"#,
        accounts["cash"].id, accounts["sales_revenue"].id
    );

    let request: TransactionRequest = serde_json::from_str(&body).unwrap();
    let date = request.date;
    let description = request.description.clone();
    let reference_type = request.reference_type.clone();
    let reference_id = request.reference_id.clone();
    let items = request.into_line_items().unwrap();

    let entry = ledger
        .record_transaction(date, description, reference_type, reference_id, items)
        .await
        .unwrap();
    assert_eq!(entry.total_debits(), BigDecimal::from(100));

    let found = ledger
        .find_by_reference("order", "12345")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.entry_number, entry.entry_number);
}

#[tokio::test]
async fn bulk_reconciliation_refreshes_every_snapshot() {
    let ledger = Ledger::new(MemoryStore::new());
    let accounts = ledger.setup_marketplace_chart().await.unwrap();

    ledger
        .record_order_payment(
            "ord-1",
            BigDecimal::from(100),
            BigDecimal::from(10),
            BigDecimal::from(90),
        )
        .await
        .unwrap();

    let refreshed = ledger.update_all_balances().await.unwrap();
    assert_eq!(refreshed, accounts.len());

    let snapshot = ledger
        .update_account_balance(accounts["cash"].id)
        .await
        .unwrap();
    assert_eq!(snapshot.debit_total, BigDecimal::from(100));
    assert_eq!(snapshot.net_balance, BigDecimal::from(100));
}

#[tokio::test]
async fn decimal_amounts_survive_recording_exactly() {
    let ledger = Ledger::new(MemoryStore::new());
    let cash = ledger
        .create_account("1000".to_string(), "Cash".to_string(), AccountType::Asset)
        .await
        .unwrap();
    let revenue = ledger
        .create_account(
            "4000".to_string(),
            "Sales Revenue".to_string(),
            AccountType::Revenue,
        )
        .await
        .unwrap();

    // 0.1 + 0.2 style amounts stay exact in fixed-point decimals
    let a = BigDecimal::new(10.into(), 2); // 0.10
    let b = BigDecimal::new(20.into(), 2); // 0.20
    let total = &a + &b;

    ledger
        .record_transaction(
            date(2024, 1, 15),
            "Fractional sale".to_string(),
            "order".to_string(),
            "1".to_string(),
            vec![
                LineItem::debit(cash.id, total.clone(), ""),
                LineItem::credit(revenue.id, total.clone(), ""),
            ],
        )
        .await
        .unwrap();

    let balance = ledger.get_account_balance(cash.id, None).await.unwrap();
    assert_eq!(balance, BigDecimal::new(30.into(), 2));
}
