use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::domain::errors::SubmissionError;
use crate::domain::history::HistoryEntry;
use crate::domain::money::{deserialize_money, Money};
use crate::domain::order::{OrderSubmission, Receipt};
use crate::domain::ports::{CatalogProvider, TransactionHistory, TransactionSubmitter};
use crate::domain::product::{Product, ProductId};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<reqwest::Error> for SubmissionError {
    fn from(e: reqwest::Error) -> Self {
        SubmissionError::Transport(e.to_string())
    }
}

// ── Wire records ─────────────────────────────────────────────────────────────

/// Product as the backend sends it. Prices may be numbers or formatted
/// strings and field names are sometimes Indonesian.
#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: ProductId,
    #[serde(alias = "nama")]
    name: String,
    #[serde(alias = "harga", alias = "price", deserialize_with = "deserialize_money")]
    unit_price: Money,
    #[serde(default, alias = "kategori")]
    category: String,
}

impl From<ProductRecord> for Product {
    fn from(r: ProductRecord) -> Self {
        Product {
            id: r.id,
            name: r.name,
            unit_price: r.unit_price,
            category: r.category,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

// ── Client ───────────────────────────────────────────────────────────────────

/// REST client for the canteen backend. Implements every outbound port.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, SubmissionError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, SubmissionError> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn fetch_products(&self, builder: RequestBuilder) -> Result<Vec<Product>, SubmissionError> {
        let records: Vec<ProductRecord> = self.fetch(builder).await?;
        Ok(records.into_iter().map(Product::from).collect())
    }
}

async fn check_status(response: Response) -> Result<Response, SubmissionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SubmissionError::Rejected {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason().unwrap_or("error")),
    })
}

/// Pulls a readable message out of an error body, which may be JSON
/// (`{"message": ...}` or `{"error": ...}`) or plain text.
fn error_message(body: &str, fallback: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

impl CatalogProvider for HttpBackend {
    async fn list_products(&self) -> Result<Vec<Product>, SubmissionError> {
        self.fetch_products(self.request(Method::GET, "/products")).await
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, SubmissionError> {
        let builder = self
            .request(Method::GET, "/products")
            .query(&[("search", query)]);
        self.fetch_products(builder).await
    }
}

impl TransactionSubmitter for HttpBackend {
    async fn submit(&self, order: &OrderSubmission) -> Result<Receipt, SubmissionError> {
        // Correlation only: the backend does not deduplicate on it.
        let request_id = Uuid::new_v4();
        log::debug!("POST /transactions request_id={}", request_id);

        let builder = self
            .request(Method::POST, "/transactions")
            .header("X-Request-Id", request_id.to_string())
            .json(order);
        let result = self.fetch::<Receipt>(builder).await;
        if let Err(e) = &result {
            log::warn!("Transaction request {} failed: {}", request_id, e);
        }
        result
    }
}

impl TransactionHistory for HttpBackend {
    async fn list_transactions(&self) -> Result<Vec<HistoryEntry>, SubmissionError> {
        self.fetch(self.request(Method::GET, "/transactions")).await
    }
}
