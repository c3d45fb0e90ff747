use std::sync::{MutexGuard, PoisonError};

use actix_web::{web, HttpResponse};

use crate::application::checkout::{CheckoutSession, CheckoutView, PendingSubmission};
use crate::domain::errors::{DomainError, SubmissionError};
use crate::domain::order::Receipt;
use crate::domain::ports::TransactionSubmitter;
use crate::errors::AppError;

use super::{lock, SharedCheckout};

/// A submission that has left `Idle` and must be resolved exactly once.
///
/// Dropping it unresolved, when actix cancels the request mid-submit, records
/// the attempt as failed so the terminal does not stay in `Submitting`.
struct InFlight<'a> {
    checkout: &'a SharedCheckout,
    pending: PendingSubmission,
    resolved: bool,
}

impl<'a> InFlight<'a> {
    fn new(checkout: &'a SharedCheckout, pending: PendingSubmission) -> Self {
        Self {
            checkout,
            pending,
            resolved: false,
        }
    }

    fn resolve(
        &mut self,
        outcome: Result<Receipt, SubmissionError>,
    ) -> Result<Receipt, DomainError> {
        self.resolved = true;
        relock(self.checkout).complete(&self.pending, outcome)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            log::warn!("Checkout request dropped before the backend answered");
            let _ = self.resolve(Err(SubmissionError::Transport(
                "submission abandoned".to_string(),
            )));
        }
    }
}

/// The outcome must land even if another worker panicked holding the lock.
fn relock(checkout: &SharedCheckout) -> MutexGuard<'_, CheckoutSession> {
    checkout.lock().unwrap_or_else(PoisonError::into_inner)
}

/// POST /checkout
///
/// Submits the cart once. The session lock is released while the backend
/// call is pending, so a concurrent finalize sees `Submitting` and gets 409.
#[utoipa::path(
    post,
    path = "/checkout",
    responses(
        (status = 201, description = "Transaction recorded, cart cleared", body = Receipt),
        (status = 409, description = "Submission in flight"),
        (status = 422, description = "Empty cart or insufficient cash"),
        (status = 502, description = "Backend rejected or unreachable; cart kept"),
    ),
    tag = "checkout"
)]
pub async fn finalize<S: TransactionSubmitter>(
    checkout: web::Data<SharedCheckout>,
    submitter: web::Data<S>,
) -> Result<HttpResponse, AppError> {
    let pending = lock(&checkout)?.begin_finalize()?;
    let mut in_flight = InFlight::new(&checkout, pending);
    let outcome = submitter.submit(&in_flight.pending.order).await;
    let receipt = in_flight.resolve(outcome)?;
    Ok(HttpResponse::Created().json(receipt))
}

/// POST /checkout/acknowledge
///
/// Dismisses a success or failure and returns the terminal to idle.
#[utoipa::path(
    post,
    path = "/checkout/acknowledge",
    responses((status = 200, description = "Cart after acknowledging", body = CheckoutView)),
    tag = "checkout"
)]
pub async fn acknowledge(checkout: web::Data<SharedCheckout>) -> Result<HttpResponse, AppError> {
    let mut session = lock(&checkout)?;
    session.acknowledge();
    Ok(HttpResponse::Ok().json(session.view()))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use crate::application::checkout::CheckoutState;
    use crate::domain::money::Money;
    use crate::domain::session::{Role, Session};
    use crate::domain::tender::TenderInfo;
    use crate::handlers::configure;
    use crate::handlers::test_support::{product, FakeBackend};

    use super::*;

    async fn run(
        backend: FakeBackend,
        items: &[Value],
        tender: Value,
    ) -> (web::Data<FakeBackend>, Value, StatusCode, Value) {
        let backend = web::Data::new(backend);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Mutex::new(CheckoutSession::new())))
                .app_data(backend.clone())
                .app_data(web::Data::new(Session::new("Dimas", Role::Cashier)))
                .configure(configure::<FakeBackend>),
        )
        .await;

        for item in items {
            let req = test::TestRequest::post()
                .uri("/cart/items")
                .set_json(item)
                .to_request();
            test::call_service(&app, req).await;
        }
        let req = test::TestRequest::put()
            .uri("/cart/tender")
            .set_json(tender)
            .to_request();
        test::call_service(&app, req).await;

        let resp = test::call_service(&app, test::TestRequest::post().uri("/checkout").to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;

        let req = test::TestRequest::get().uri("/cart").to_request();
        let cart: Value = test::call_and_read_body_json(&app, req).await;

        (backend, body, status, cart)
    }

    fn nasi() -> Value {
        json!({ "id": 1, "name": "Nasi Goreng", "unit_price": 18_000 })
    }

    #[actix_web::test]
    async fn successful_checkout_clears_cart() {
        let (backend, body, status, cart) = run(
            FakeBackend::default(),
            &[nasi()],
            json!({ "method": "cash", "amount_tendered": "Rp 20.000" }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["transaction_id"], 7);
        assert_eq!(body["change"], 2_000);
        assert_eq!(cart["lines"].as_array().map(Vec::len), Some(0));
        assert_eq!(cart["status"]["state"], "succeeded");
        assert_eq!(backend.submitted(), 1);
    }

    #[actix_web::test]
    async fn failed_checkout_keeps_cart() {
        let backend = FakeBackend {
            reject: true,
            ..FakeBackend::default()
        };
        let (backend, body, status, cart) = run(
            backend,
            &[nasi(), nasi()],
            json!({ "method": "bank_transfer" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "submission_failed");
        assert_eq!(cart["lines"][0]["quantity"], 2);
        assert_eq!(cart["status"]["state"], "failed");
        assert_eq!(backend.submitted(), 1);
    }

    #[actix_web::test]
    async fn empty_cart_never_reaches_backend() {
        let (backend, body, status, _cart) =
            run(FakeBackend::default(), &[], json!({ "method": "bank_transfer" })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "empty_cart");
        assert_eq!(backend.submitted(), 0);
    }

    #[actix_web::test]
    async fn insufficient_cash_never_reaches_backend() {
        let (backend, body, status, cart) = run(
            FakeBackend::default(),
            &[json!({ "id": 9, "name": "Paket Rapat", "unit_price": 95_000 })],
            json!({ "method": "cash", "amount_tendered": 50_000 }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "insufficient_tender");
        assert_eq!(cart["total"], 95_000);
        assert_eq!(backend.submitted(), 0);
    }

    #[actix_web::test]
    async fn change_comes_from_the_validated_tender() {
        let (_backend, body, status, _cart) = run(
            FakeBackend::default(),
            &[nasi(), nasi()],
            json!({ "method": "cash", "amount_tendered": 50_000 }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["change"], 14_000);
    }

    #[actix_web::test]
    async fn dropped_request_does_not_leave_the_terminal_submitting() {
        let checkout = web::Data::new(Mutex::new(CheckoutSession::new()));
        let backend = web::Data::new(FakeBackend {
            latency: Duration::from_secs(60),
            ..FakeBackend::default()
        });
        {
            let mut session = checkout.lock().unwrap();
            session.add_product(&product(1, "Nasi Goreng", 18_000)).unwrap();
            session.set_tender(TenderInfo::bank_transfer()).unwrap();
        }

        let cancelled = actix_web::rt::time::timeout(
            Duration::from_millis(50),
            finalize::<FakeBackend>(checkout.clone(), backend.clone()),
        )
        .await;
        assert!(cancelled.is_err());
        assert_eq!(backend.submitted(), 1);

        let mut session = checkout.lock().unwrap();
        assert!(matches!(session.state(), CheckoutState::Failed { .. }));
        assert_eq!(session.cart().total(), Money::new(18_000));

        session.acknowledge();
        assert_eq!(session.state(), &CheckoutState::Idle);
        session
            .add_product(&product(2, "Es Teh", 4_000))
            .expect("editable again");
        assert!(session.begin_finalize().is_ok());
    }

    #[actix_web::test]
    async fn acknowledge_returns_to_idle() {
        let checkout = web::Data::new(Mutex::new(CheckoutSession::new()));
        let app = test::init_service(
            App::new()
                .app_data(checkout.clone())
                .app_data(web::Data::new(FakeBackend::default()))
                .app_data(web::Data::new(Session::new("Dimas", Role::Cashier)))
                .configure(configure::<FakeBackend>),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/cart/items")
            .set_json(nasi())
            .to_request();
        test::call_service(&app, req).await;
        let req = test::TestRequest::put()
            .uri("/cart/tender")
            .set_json(json!({ "method": "bank_transfer" }))
            .to_request();
        test::call_service(&app, req).await;
        test::call_service(&app, test::TestRequest::post().uri("/checkout").to_request()).await;

        let req = test::TestRequest::post()
            .uri("/checkout/acknowledge")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"]["state"], "idle");
    }
}
