use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::application::checkout::CheckoutView;
use crate::domain::money::{parse_money, MoneyInput};
use crate::domain::product::{Product, ProductId};
use crate::domain::tender::{PaymentMethod, TenderInfo, ValidTender};
use crate::errors::AppError;

use super::{lock, SharedCheckout};

// ── Request DTOs ─────────────────────────────────────────────────────────────

/// The product as the presentation layer displayed it. The price goes
/// through the money parser, so `"Rp 18.000"` and `18000` are both accepted.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub id: ProductId,
    pub name: String,
    pub unit_price: MoneyInput,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeQuantityRequest {
    pub delta: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TenderRequest {
    pub method: PaymentMethod,
    /// Required for cash, ignored otherwise.
    #[serde(default)]
    pub amount_tendered: Option<MoneyInput>,
}

impl TenderRequest {
    fn into_tender(self) -> Result<TenderInfo, AppError> {
        let amount_tendered = match (self.method, self.amount_tendered) {
            (PaymentMethod::Cash, Some(raw)) => Some(parse_money(&raw)?),
            _ => None,
        };
        Ok(TenderInfo {
            method: self.method,
            amount_tendered,
        })
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses((status = 200, description = "Current cart", body = CheckoutView)),
    tag = "cart"
)]
pub async fn get_cart(checkout: web::Data<SharedCheckout>) -> Result<HttpResponse, AppError> {
    let view = lock(&checkout)?.view();
    Ok(HttpResponse::Ok().json(view))
}

/// POST /cart/items
///
/// Adds one unit of the product.
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Updated cart", body = CheckoutView),
        (status = 400, description = "Unparseable price"),
        (status = 409, description = "Submission in flight"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    checkout: web::Data<SharedCheckout>,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let product = Product {
        id: body.id,
        name: body.name,
        unit_price: parse_money(&body.unit_price)?,
        category: body.category,
    };

    let mut session = lock(&checkout)?;
    session.add_product(&product)?;
    Ok(HttpResponse::Ok().json(session.view()))
}

/// PATCH /cart/items/{product_id}
///
/// Dropping below one removes the line. Unknown ids leave the cart as is.
#[utoipa::path(
    patch,
    path = "/cart/items/{product_id}",
    params(("product_id" = i64, Path, description = "Product id")),
    request_body = ChangeQuantityRequest,
    responses(
        (status = 200, description = "Updated cart", body = CheckoutView),
        (status = 409, description = "Submission in flight"),
    ),
    tag = "cart"
)]
pub async fn change_quantity(
    checkout: web::Data<SharedCheckout>,
    path: web::Path<i64>,
    body: web::Json<ChangeQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let mut session = lock(&checkout)?;
    session.change_quantity(ProductId(path.into_inner()), body.delta)?;
    Ok(HttpResponse::Ok().json(session.view()))
}

/// DELETE /cart/items/{product_id}
#[utoipa::path(
    delete,
    path = "/cart/items/{product_id}",
    params(("product_id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Updated cart", body = CheckoutView),
        (status = 409, description = "Submission in flight"),
    ),
    tag = "cart"
)]
pub async fn remove_item(
    checkout: web::Data<SharedCheckout>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let mut session = lock(&checkout)?;
    session.remove_product(ProductId(path.into_inner()))?;
    Ok(HttpResponse::Ok().json(session.view()))
}

/// DELETE /cart
#[utoipa::path(
    delete,
    path = "/cart",
    responses(
        (status = 200, description = "Emptied cart", body = CheckoutView),
        (status = 409, description = "Submission in flight"),
    ),
    tag = "cart"
)]
pub async fn clear_cart(checkout: web::Data<SharedCheckout>) -> Result<HttpResponse, AppError> {
    let mut session = lock(&checkout)?;
    session.clear()?;
    Ok(HttpResponse::Ok().json(session.view()))
}

/// PUT /cart/tender
#[utoipa::path(
    put,
    path = "/cart/tender",
    request_body = TenderRequest,
    responses(
        (status = 200, description = "Updated cart", body = CheckoutView),
        (status = 400, description = "Unparseable amount"),
        (status = 409, description = "Submission in flight"),
    ),
    tag = "cart"
)]
pub async fn set_tender(
    checkout: web::Data<SharedCheckout>,
    body: web::Json<TenderRequest>,
) -> Result<HttpResponse, AppError> {
    let tender = body.into_inner().into_tender()?;
    let mut session = lock(&checkout)?;
    session.set_tender(tender)?;
    Ok(HttpResponse::Ok().json(session.view()))
}

/// GET /cart/tender
///
/// Validates the current tender against the current total.
#[utoipa::path(
    get,
    path = "/cart/tender",
    responses(
        (status = 200, description = "Tender covers the total", body = ValidTender),
        (status = 422, description = "Insufficient cash"),
    ),
    tag = "cart"
)]
pub async fn validate_tender(
    checkout: web::Data<SharedCheckout>,
) -> Result<HttpResponse, AppError> {
    let valid = lock(&checkout)?.validate_tender()?;
    Ok(HttpResponse::Ok().json(valid))
}
