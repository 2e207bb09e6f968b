//! Double-entry posting validation

use bigdecimal::BigDecimal;

use crate::types::*;

/// How strictly debit and credit totals must agree.
///
/// The intake boundary accepts client-supplied floating values and
/// tolerates small rounding skew; the persistence boundary works in
/// fixed-point decimals and requires exact equality. Running the same
/// checks at both boundaries is intentional, since the two layers may
/// disagree on rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    /// Exact decimal equality, used at the persistence boundary
    Exact,
    /// Allow up to 0.01 of skew, used for client-supplied floats
    Rounding,
}

impl Tolerance {
    fn allowance(&self) -> BigDecimal {
        match self {
            Tolerance::Exact => BigDecimal::from(0),
            Tolerance::Rounding => BigDecimal::new(1.into(), 2), // 0.01
        }
    }
}

/// Validate a proposed set of line items against the double-entry rules:
/// at least two items, exactly one nonzero side per item, no negative
/// amounts, and debit total equal to credit total within `tolerance`.
pub fn validate_line_items(items: &[LineItem], tolerance: Tolerance) -> LedgerResult<()> {
    if items.len() < 2 {
        return Err(LedgerError::Validation(
            "A transaction must have at least two entries".to_string(),
        ));
    }

    let zero = BigDecimal::from(0);
    for (index, item) in items.iter().enumerate() {
        if item.debit < zero || item.credit < zero {
            return Err(LedgerError::Validation(format!(
                "Entry {index} has a negative amount (debit {}, credit {})",
                item.debit, item.credit
            )));
        }
        if item.debit > zero && item.credit > zero {
            return Err(LedgerError::Validation(format!(
                "Entry {index} cannot have both debit and credit amounts"
            )));
        }
        if item.debit == zero && item.credit == zero {
            return Err(LedgerError::Validation(format!(
                "Entry {index} must have either a debit or credit amount"
            )));
        }
    }

    let total_debits: BigDecimal = items.iter().map(|item| &item.debit).sum();
    let total_credits: BigDecimal = items.iter().map(|item| &item.credit).sum();
    let skew = (&total_debits - &total_credits).abs();

    if skew > tolerance.allowance() {
        return Err(LedgerError::Validation(format!(
            "Debits ({total_debits}) must equal credits ({total_credits})"
        )));
    }

    Ok(())
}

/// Validate an account's reference data
pub fn validate_account(account: &Account) -> LedgerResult<()> {
    if account.account_number.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Account number cannot be empty".to_string(),
        ));
    }

    if account.account_number.len() > 20 {
        return Err(LedgerError::Validation(
            "Account number cannot exceed 20 characters".to_string(),
        ));
    }

    if account.account_name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Account name cannot be empty".to_string(),
        ));
    }

    if account.account_name.len() > 200 {
        return Err(LedgerError::Validation(
            "Account name cannot exceed 200 characters".to_string(),
        ));
    }

    if account.normal_balance != account.account_type.normal_balance() {
        return Err(LedgerError::Validation(format!(
            "Account {} declares a {:?} normal balance, which is inconsistent with {:?} accounts",
            account.account_number, account.normal_balance, account.account_type
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn balanced_pair(amount: i64) -> Vec<LineItem> {
        vec![
            LineItem::debit(Uuid::new_v4(), BigDecimal::from(amount), "cash"),
            LineItem::credit(Uuid::new_v4(), BigDecimal::from(amount), "revenue"),
        ]
    }

    #[test]
    fn accepts_balanced_items() {
        assert!(validate_line_items(&balanced_pair(100), Tolerance::Exact).is_ok());
    }

    #[test]
    fn rejects_single_item() {
        let items = vec![LineItem::debit(Uuid::new_v4(), BigDecimal::from(100), "")];
        let err = validate_line_items(&items, Tolerance::Exact).unwrap_err();
        assert!(err.to_string().contains("at least two"));
    }

    #[test]
    fn rejects_imbalance_naming_totals() {
        let items = vec![
            LineItem::debit(Uuid::new_v4(), BigDecimal::from(100), ""),
            LineItem::credit(Uuid::new_v4(), BigDecimal::from(99), ""),
        ];
        let err = validate_line_items(&items, Tolerance::Exact).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("100"));
        assert!(message.contains("99"));
    }

    #[test]
    fn rejects_both_sides_populated() {
        let items = vec![
            LineItem::new(
                Uuid::new_v4(),
                BigDecimal::from(50),
                BigDecimal::from(50),
                "",
            ),
            LineItem::credit(Uuid::new_v4(), BigDecimal::from(0), ""),
        ];
        let err = validate_line_items(&items, Tolerance::Exact).unwrap_err();
        assert!(err.to_string().contains("both debit and credit"));
    }

    #[test]
    fn rejects_both_sides_zero() {
        let items = vec![
            LineItem::debit(Uuid::new_v4(), BigDecimal::from(100), ""),
            LineItem::new(Uuid::new_v4(), BigDecimal::from(0), BigDecimal::from(0), ""),
        ];
        let err = validate_line_items(&items, Tolerance::Exact).unwrap_err();
        assert!(err.to_string().contains("either a debit or credit"));
    }

    #[test]
    fn rejects_negative_amounts() {
        let items = vec![
            LineItem::debit(Uuid::new_v4(), BigDecimal::from(-100), ""),
            LineItem::credit(Uuid::new_v4(), BigDecimal::from(-100), ""),
        ];
        assert!(validate_line_items(&items, Tolerance::Exact).is_err());
    }

    #[test]
    fn rounding_tolerance_absorbs_one_cent() {
        let items = vec![
            LineItem::debit(Uuid::new_v4(), BigDecimal::new(10001.into(), 2), ""), // 100.01
            LineItem::credit(Uuid::new_v4(), BigDecimal::from(100), ""),
        ];
        assert!(validate_line_items(&items, Tolerance::Exact).is_err());
        assert!(validate_line_items(&items, Tolerance::Rounding).is_ok());
    }

    #[test]
    fn rounding_tolerance_rejects_two_cents() {
        let items = vec![
            LineItem::debit(Uuid::new_v4(), BigDecimal::new(10002.into(), 2), ""), // 100.02
            LineItem::credit(Uuid::new_v4(), BigDecimal::from(100), ""),
        ];
        assert!(validate_line_items(&items, Tolerance::Rounding).is_err());
    }

    #[test]
    fn account_validation_catches_inconsistent_normal_balance() {
        let mut account = Account::new(
            "1000".to_string(),
            "Cash".to_string(),
            AccountType::Asset,
        );
        assert!(validate_account(&account).is_ok());

        account.normal_balance = Side::Credit;
        assert!(validate_account(&account).is_err());
    }

    #[test]
    fn account_validation_requires_number_and_name() {
        let account = Account::new("".to_string(), "Cash".to_string(), AccountType::Asset);
        assert!(validate_account(&account).is_err());

        let account = Account::new("1000".to_string(), "  ".to_string(), AccountType::Asset);
        assert!(validate_account(&account).is_err());
    }
}
