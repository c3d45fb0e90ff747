use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::DomainError;
use super::money::Money;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    BankTransfer,
}

impl PaymentMethod {
    pub fn is_cash(self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct TenderInfo {
    pub method: PaymentMethod,
    /// Only meaningful for cash.
    pub amount_tendered: Option<Money>,
}

impl TenderInfo {
    pub fn cash(amount: Money) -> Self {
        Self {
            method: PaymentMethod::Cash,
            amount_tendered: Some(amount),
        }
    }

    pub fn bank_transfer() -> Self {
        Self {
            method: PaymentMethod::BankTransfer,
            amount_tendered: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidTender {
    pub method: PaymentMethod,
    pub tendered: Money,
    pub change: Money,
}

/// Checks that `tender` covers `total`.
///
/// Non-cash methods always pass with no change. Cash must cover the total;
/// a missing amount counts as zero.
pub fn validate_tender(total: Money, tender: &TenderInfo) -> Result<ValidTender, DomainError> {
    if !tender.method.is_cash() {
        return Ok(ValidTender {
            method: tender.method,
            tendered: Money::ZERO,
            change: Money::ZERO,
        });
    }

    let tendered = tender.amount_tendered.unwrap_or(Money::ZERO);
    let change = tendered
        .checked_sub(total)
        .ok_or(DomainError::InsufficientTender { total, tendered })?;

    Ok(ValidTender {
        method: PaymentMethod::Cash,
        tendered,
        change,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::{parse_money, MoneyInput};

    #[test]
    fn exact_cash_gives_no_change() {
        let valid = validate_tender(Money::new(100), &TenderInfo::cash(Money::new(100)))
            .expect("exact cash is sufficient");
        assert_eq!(valid.change, Money::ZERO);
    }

    #[test]
    fn short_cash_is_insufficient() {
        let err = validate_tender(Money::new(100), &TenderInfo::cash(Money::new(99)))
            .expect_err("99 does not cover 100");
        assert_eq!(
            err,
            DomainError::InsufficientTender {
                total: Money::new(100),
                tendered: Money::new(99),
            }
        );
    }

    #[test]
    fn excess_cash_gives_change() {
        let valid = validate_tender(Money::new(100), &TenderInfo::cash(Money::new(150)))
            .expect("150 covers 100");
        assert_eq!(valid.change, Money::new(50));
        assert_eq!(valid.tendered, Money::new(150));
    }

    #[test]
    fn missing_cash_amount_is_insufficient() {
        let tender = TenderInfo {
            method: PaymentMethod::Cash,
            amount_tendered: None,
        };
        assert!(matches!(
            validate_tender(Money::new(1), &tender),
            Err(DomainError::InsufficientTender { .. })
        ));
    }

    #[test]
    fn bank_transfer_ignores_amount() {
        let tender = TenderInfo {
            method: PaymentMethod::BankTransfer,
            amount_tendered: Some(Money::ZERO),
        };
        let valid = validate_tender(Money::new(100), &tender).expect("non-cash always passes");
        assert_eq!(valid.change, Money::ZERO);
        assert_eq!(valid.method, PaymentMethod::BankTransfer);
    }

    #[test]
    fn formatted_cash_string_covers_matching_total() {
        let tendered = parse_money(&MoneyInput::from("57.000")).expect("parses");
        let valid = validate_tender(Money::new(57_000), &TenderInfo::cash(tendered))
            .expect("57.000 covers 57000");
        assert_eq!(valid.change, Money::ZERO);
    }

    #[test]
    fn payment_method_uses_snake_case() {
        let method: PaymentMethod = serde_json::from_str(r#""bank_transfer""#).expect("valid");
        assert_eq!(method, PaymentMethod::BankTransfer);
    }
}
