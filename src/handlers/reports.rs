use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::history::{summarize, DateRange, HistoryEntry, SalesSummary};
use crate::domain::ports::TransactionHistory;
use crate::errors::AppError;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SalesParams {
    /// First day, YYYY-MM-DD.
    pub from: Option<NaiveDate>,
    /// Last day, YYYY-MM-DD.
    pub to: Option<NaiveDate>,
}

/// GET /transactions
#[utoipa::path(
    get,
    path = "/transactions",
    responses(
        (status = 200, description = "Past transactions", body = [HistoryEntry]),
        (status = 502, description = "Backend unavailable"),
    ),
    tag = "reports"
)]
pub async fn list_transactions<H: TransactionHistory>(
    history: web::Data<H>,
) -> Result<HttpResponse, AppError> {
    let entries = history.list_transactions().await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// GET /reports/sales
///
/// Totals and best sellers over an optional inclusive date range (UTC days).
#[utoipa::path(
    get,
    path = "/reports/sales",
    params(SalesParams),
    responses(
        (status = 200, description = "Sales summary", body = SalesSummary),
        (status = 400, description = "from is after to"),
        (status = 502, description = "Backend unavailable"),
    ),
    tag = "reports"
)]
pub async fn sales_summary<H: TransactionHistory>(
    history: web::Data<H>,
    query: web::Query<SalesParams>,
) -> Result<HttpResponse, AppError> {
    let range = DateRange {
        from: query.from,
        to: query.to,
    };
    if let (Some(from), Some(to)) = (range.from, range.to) {
        if from > to {
            return Err(AppError::BadRequest(format!(
                "from ({}) is after to ({})",
                from, to
            )));
        }
    }

    let entries = history.list_transactions().await?;
    Ok(HttpResponse::Ok().json(summarize(&entries, range)))
}
