use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::cart::Cart;
use super::money::Money;
use super::product::ProductId;
use super::tender::TenderInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The order payload handed to the transaction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderSubmission {
    lines: Vec<OrderLine>,
    cash_tendered: Money,
}

impl OrderSubmission {
    /// Snapshots `cart`. The cash amount is zero for non-cash tenders.
    pub fn snapshot(cart: &Cart, tender: &TenderInfo) -> Self {
        let cash_tendered = if tender.method.is_cash() {
            tender.amount_tendered.unwrap_or(Money::ZERO)
        } else {
            Money::ZERO
        };

        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| OrderLine {
                    product_id: line.product_id(),
                    quantity: line.quantity(),
                })
                .collect(),
            cash_tendered,
        }
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn cash_tendered(&self) -> Money {
        self.cash_tendered
    }
}

/// Acknowledgement returned by the transaction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Receipt {
    #[serde(alias = "id")]
    pub transaction_id: i64,
    pub total: Money,
    #[serde(default)]
    pub change: Money,
    #[serde(alias = "tanggal")]
    pub created_at: DateTime<Utc>,
}
