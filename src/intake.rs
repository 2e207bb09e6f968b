//! Typed request/response shapes for the REST boundary.
//!
//! Amounts cross the HTTP boundary as JSON numbers, so they arrive as
//! floats. Requests are validated here with a small rounding tolerance
//! before conversion to fixed-point decimals; the recorder re-validates
//! exactly. Precision beyond f64 is not guaranteed across the boundary.

use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode, ToPrimitive};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::validation::{validate_line_items, Tolerance};
use crate::types::*;

/// One line of an incoming transaction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub account_id: Uuid,
    #[serde(default)]
    pub debit: f64,
    #[serde(default)]
    pub credit: f64,
    #[serde(default)]
    pub description: String,
}

/// Body of `POST /api/transactions/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub date: NaiveDate,
    pub description: String,
    pub reference_type: String,
    pub reference_id: String,
    pub entries: Vec<LineItemRequest>,
}

impl TransactionRequest {
    /// Convert the float entries into typed line items, validating with
    /// the rounding tolerance along the way. Amounts are fixed to two
    /// decimal places.
    pub fn into_line_items(self) -> LedgerResult<Vec<LineItem>> {
        let items = self
            .entries
            .into_iter()
            .map(|entry| {
                Ok(LineItem {
                    account_id: entry.account_id,
                    debit: decimal_from_f64(entry.debit)?,
                    credit: decimal_from_f64(entry.credit)?,
                    description: entry.description,
                })
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        validate_line_items(&items, Tolerance::Rounding)?;
        Ok(items)
    }
}

/// Response of `GET /api/accounts/{id}/balance/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub account: String,
    pub account_number: String,
    pub balance: f64,
    pub as_of_date: NaiveDate,
}

impl BalanceResponse {
    pub fn new(account: &Account, balance: &BigDecimal, as_of_date: NaiveDate) -> Self {
        Self {
            account: account.account_name.clone(),
            account_number: account.account_number.clone(),
            // NaN is preferable to silently reporting a failed
            // conversion as a zero balance
            balance: balance.to_f64().unwrap_or(f64::NAN),
            as_of_date,
        }
    }
}

fn decimal_from_f64(value: f64) -> LedgerResult<BigDecimal> {
    BigDecimal::from_f64(value)
        .map(|amount| amount.with_scale_round(2, RoundingMode::HalfUp))
        .ok_or_else(|| LedgerError::Validation(format!("Amount is not a finite number: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(debit: f64, credit: f64) -> TransactionRequest {
        TransactionRequest {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "Order payment".to_string(),
            reference_type: "order".to_string(),
            reference_id: "12345".to_string(),
            entries: vec![
                LineItemRequest {
                    account_id: Uuid::new_v4(),
                    debit,
                    credit: 0.0,
                    description: "Cash received".to_string(),
                },
                LineItemRequest {
                    account_id: Uuid::new_v4(),
                    debit: 0.0,
                    credit,
                    description: "Sales revenue".to_string(),
                },
            ],
        }
    }

    #[test]
    fn deserializes_documented_shape() {
        let body = format!(
            r#"{{
                "date": "2024-01-15",
                "description": "Order payment",
                "reference_type": "order",
                "reference_id": "12345",
                "entries": [
                    {{"account_id": "{}", "debit": 100.00, "credit": 0}},
                    {{"account_id": "{}", "debit": 0, "credit": 100.00, "description": "Sales revenue"}}
                ]
            }}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );

        let request: TransactionRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(request.entries.len(), 2);
        assert_eq!(request.entries[0].description, "");

        let items = request.into_line_items().unwrap();
        assert_eq!(items[0].debit, BigDecimal::from(100));
    }

    #[test]
    fn tolerates_one_cent_float_skew() {
        // A cent of skew passes the lenient boundary check. The recorder
        // still applies the exact check before anything is persisted.
        let items = request(100.01, 100.0).into_line_items().unwrap();
        assert_eq!(items[0].debit, BigDecimal::new(10001.into(), 2)); // 100.01
        assert_eq!(items[1].credit, BigDecimal::from(100));
    }

    #[test]
    fn half_cent_amounts_settle_to_whole_cents() {
        // The nearest f64 to 100.005 sits just below it, so rounding to
        // two places lands on 100.00 and the pair balances exactly
        let items = request(100.005, 100.0).into_line_items().unwrap();
        assert_eq!(items[0].debit, BigDecimal::from(100));
        assert_eq!(items[1].credit, BigDecimal::from(100));

        // An amount representable above the half-cent mark rounds up
        let items = request(100.006, 100.0).into_line_items().unwrap();
        assert_eq!(items[0].debit, BigDecimal::new(10001.into(), 2)); // 100.01
    }

    #[test]
    fn rejects_two_cent_imbalance() {
        let err = request(100.02, 100.0).into_line_items().unwrap_err();
        assert!(err.to_string().contains("must equal credits"));
    }

    #[test]
    fn rejects_non_finite_amounts() {
        let err = request(f64::NAN, 100.0).into_line_items().unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn balance_response_shape() {
        let account = Account::new("1000".to_string(), "Cash".to_string(), AccountType::Asset);
        let response = BalanceResponse::new(
            &account,
            &BigDecimal::from(100),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["account"], "Cash");
        assert_eq!(json["account_number"], "1000");
        assert_eq!(json["balance"], 100.0);
        assert_eq!(json["as_of_date"], "2024-01-15");
    }
}
