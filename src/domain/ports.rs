use std::future::Future;

use super::errors::SubmissionError;
use super::history::HistoryEntry;
use super::order::{OrderSubmission, Receipt};
use super::product::Product;

pub trait CatalogProvider: Send + Sync + 'static {
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, SubmissionError>> + Send;
    fn search_products(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Product>, SubmissionError>> + Send;
}

/// Persists finalized orders. Called exactly once per finalize attempt.
pub trait TransactionSubmitter: Send + Sync + 'static {
    fn submit(
        &self,
        order: &OrderSubmission,
    ) -> impl Future<Output = Result<Receipt, SubmissionError>> + Send;
}

pub trait TransactionHistory: Send + Sync + 'static {
    fn list_transactions(
        &self,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, SubmissionError>> + Send;
}
