use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::CatalogProvider;
use crate::domain::product::Product;
use crate::domain::session::Session;
use crate::errors::AppError;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogParams {
    /// Name filter.
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub products: Vec<Product>,
    /// Whether the operator may edit or delete these products.
    pub can_manage: bool,
}

/// GET /products
///
/// Lists the catalog, or searches it when `search` is non-empty.
#[utoipa::path(
    get,
    path = "/products",
    params(CatalogParams),
    responses(
        (status = 200, description = "Catalog products", body = CatalogResponse),
        (status = 502, description = "Backend unavailable"),
    ),
    tag = "catalog"
)]
pub async fn list_products<C: CatalogProvider>(
    catalog: web::Data<C>,
    session: web::Data<Session>,
    query: web::Query<CatalogParams>,
) -> Result<HttpResponse, AppError> {
    let products = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => catalog.search_products(term).await?,
        _ => catalog.list_products().await?,
    };

    Ok(HttpResponse::Ok().json(CatalogResponse {
        products,
        can_manage: session.can_manage_catalog(),
    }))
}
