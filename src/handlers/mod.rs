pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod reports;
pub mod session;

use std::sync::{Mutex, MutexGuard};

use actix_web::web;

use crate::application::checkout::CheckoutSession;
use crate::domain::ports::{CatalogProvider, TransactionHistory, TransactionSubmitter};
use crate::errors::AppError;

/// The terminal's single checkout session, shared by every worker.
pub type SharedCheckout = Mutex<CheckoutSession>;

/// Registers every terminal route. Expects `web::Data<SharedCheckout>`,
/// `web::Data<Session>` and `web::Data<B>` to be registered on the app.
pub fn configure<B>(cfg: &mut web::ServiceConfig)
where
    B: CatalogProvider + TransactionSubmitter + TransactionHistory,
{
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/session", web::get().to(session::get_session))
    .route("/products", web::get().to(catalog::list_products::<B>))
    .service(
        web::scope("/cart")
            .route("", web::get().to(cart::get_cart))
            .route("", web::delete().to(cart::clear_cart))
            .route("/items", web::post().to(cart::add_item))
            .route("/items/{product_id}", web::patch().to(cart::change_quantity))
            .route("/items/{product_id}", web::delete().to(cart::remove_item))
            .route("/tender", web::put().to(cart::set_tender))
            .route("/tender", web::get().to(cart::validate_tender)),
    )
    .service(
        web::scope("/checkout")
            .route("", web::post().to(checkout::finalize::<B>))
            .route("/acknowledge", web::post().to(checkout::acknowledge)),
    )
    .route("/transactions", web::get().to(reports::list_transactions::<B>))
    .route("/reports/sales", web::get().to(reports::sales_summary::<B>));
}

fn lock(checkout: &SharedCheckout) -> Result<MutexGuard<'_, CheckoutSession>, AppError> {
    checkout
        .lock()
        .map_err(|e| AppError::Internal(format!("checkout session lock poisoned: {}", e)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use chrono::Utc;

    use crate::domain::errors::SubmissionError;
    use crate::domain::history::{HistoryDetail, HistoryEntry};
    use crate::domain::money::Money;
    use crate::domain::order::{OrderSubmission, Receipt};
    use crate::domain::ports::{CatalogProvider, TransactionHistory, TransactionSubmitter};
    use crate::domain::product::{Product, ProductId};

    /// In-memory stand-in for the backend. Its receipts carry no change, like
    /// a backend that leaves the field out.
    #[derive(Debug, Default)]
    pub struct FakeBackend {
        pub reject: bool,
        /// How long `submit` takes before answering.
        pub latency: Duration,
        pub submissions: AtomicUsize,
    }

    impl FakeBackend {
        pub fn submitted(&self) -> usize {
            self.submissions.load(Ordering::SeqCst)
        }
    }

    pub fn product(id: i64, name: &str, price: u64) -> Product {
        Product {
            id: ProductId(id),
            name: name.to_string(),
            unit_price: Money::new(price),
            category: "makanan".to_string(),
        }
    }

    impl CatalogProvider for FakeBackend {
        async fn list_products(&self) -> Result<Vec<Product>, SubmissionError> {
            Ok(vec![
                product(1, "Nasi Goreng", 18_000),
                product(2, "Es Teh", 4_000),
            ])
        }

        async fn search_products(&self, query: &str) -> Result<Vec<Product>, SubmissionError> {
            let query = query.to_lowercase();
            Ok(self
                .list_products()
                .await?
                .into_iter()
                .filter(|p| p.name.to_lowercase().contains(&query))
                .collect())
        }
    }

    impl TransactionSubmitter for FakeBackend {
        async fn submit(&self, _order: &OrderSubmission) -> Result<Receipt, SubmissionError> {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            if !self.latency.is_zero() {
                actix_web::rt::time::sleep(self.latency).await;
            }
            if self.reject {
                return Err(SubmissionError::Transport("connection reset".to_string()));
            }
            Ok(Receipt {
                transaction_id: 7,
                total: Money::new(18_000),
                change: Money::ZERO,
                created_at: Utc::now(),
            })
        }
    }

    impl TransactionHistory for FakeBackend {
        async fn list_transactions(&self) -> Result<Vec<HistoryEntry>, SubmissionError> {
            Ok(vec![HistoryEntry {
                id: 1,
                created_at: Utc::now(),
                total: Money::new(22_000),
                cash: Money::new(25_000),
                items: vec![
                    HistoryDetail {
                        product_id: ProductId(1),
                        product_name: "Nasi Goreng".to_string(),
                        quantity: 1,
                        subtotal: Money::new(18_000),
                    },
                    HistoryDetail {
                        product_id: ProductId(2),
                        product_name: "Es Teh".to_string(),
                        quantity: 1,
                        subtotal: Money::new(4_000),
                    },
                ],
            }])
        }
    }
}
