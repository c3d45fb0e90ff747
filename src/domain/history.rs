//! Past transactions as reported by the backend, and the sales summary built
//! from them.
//!
//! The backend is inconsistent about field names on detail rows (`qty`,
//! `quantity` and `jumlah` all appear), so the aliases are resolved here and
//! nowhere else.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::money::{deserialize_money, Money};
use super::product::ProductId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryDetail {
    #[serde(alias = "id_produk")]
    pub product_id: ProductId,
    #[serde(default, alias = "name", alias = "nama_produk")]
    pub product_name: String,
    #[serde(alias = "qty", alias = "jumlah")]
    pub quantity: u32,
    #[serde(deserialize_with = "deserialize_money")]
    pub subtotal: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    pub id: i64,
    #[serde(alias = "tanggal")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_money")]
    pub total: Money,
    #[serde(default, deserialize_with = "deserialize_money")]
    pub cash: Money,
    #[serde(default, alias = "details", alias = "detail")]
    pub items: Vec<HistoryDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u64,
    pub revenue: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SalesSummary {
    pub transactions: usize,
    pub gross_total: Money,
    pub items_sold: u64,
    /// Best sellers first, by revenue.
    pub per_product: Vec<ProductSales>,
}

/// Inclusive calendar-day range, in UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

pub fn summarize(entries: &[HistoryEntry], range: DateRange) -> SalesSummary {
    let mut summary = SalesSummary::default();

    for entry in entries.iter().filter(|e| range.contains(e.created_at)) {
        summary.transactions += 1;
        summary.gross_total = summary.gross_total + entry.total;

        for item in &entry.items {
            summary.items_sold += u64::from(item.quantity);

            match summary
                .per_product
                .iter_mut()
                .find(|p| p.product_id == item.product_id)
            {
                Some(sales) => {
                    sales.quantity += u64::from(item.quantity);
                    sales.revenue = sales.revenue + item.subtotal;
                }
                None => summary.per_product.push(ProductSales {
                    product_id: item.product_id,
                    product_name: item.product_name.clone(),
                    quantity: u64::from(item.quantity),
                    revenue: item.subtotal,
                }),
            }
        }
    }

    summary
        .per_product
        .sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.product_id.cmp(&b.product_id)));

    summary
}
