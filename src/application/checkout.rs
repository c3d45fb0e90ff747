//! Order finalizer for one terminal.
//!
//! `CheckoutSession` owns the cart and tender and walks
//! `Idle -> Submitting -> {Succeeded, Failed} -> Idle`. The submission is split
//! into `begin_finalize` and `complete` so a caller holding the session behind
//! a lock can release it while the network call is pending.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::cart::{Cart, CartLine};
use crate::domain::errors::{DomainError, SubmissionError};
use crate::domain::money::Money;
use crate::domain::order::{OrderSubmission, Receipt};
use crate::domain::ports::TransactionSubmitter;
use crate::domain::product::{Product, ProductId};
use crate::domain::tender::{validate_tender, TenderInfo, ValidTender};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    Succeeded { receipt: Receipt },
    Failed { reason: String },
}

/// Snapshot taken when a submission starts. Later cart edits do not touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub order: OrderSubmission,
    pub tender: ValidTender,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutView {
    pub lines: Vec<CartLine>,
    pub total: Money,
    pub tender: TenderInfo,
    pub status: CheckoutState,
}

#[derive(Debug, Default)]
pub struct CheckoutSession {
    cart: Cart,
    tender: TenderInfo,
    state: CheckoutState,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn tender(&self) -> &TenderInfo {
        &self.tender
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn view(&self) -> CheckoutView {
        CheckoutView {
            lines: self.cart.lines().to_vec(),
            total: self.cart.total(),
            tender: self.tender.clone(),
            status: self.state.clone(),
        }
    }

    pub fn add_product(&mut self, product: &Product) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.cart.add_product(product);
        log::debug!("Added product {} ({} lines)", product.id, self.cart.len());
        Ok(())
    }

    pub fn change_quantity(&mut self, product_id: ProductId, delta: i64) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.cart.change_quantity(product_id, delta);
        Ok(())
    }

    pub fn remove_product(&mut self, product_id: ProductId) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.cart.remove_product(product_id);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.cart.clear();
        Ok(())
    }

    pub fn set_tender(&mut self, tender: TenderInfo) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.tender = tender;
        Ok(())
    }

    pub fn validate_tender(&self) -> Result<ValidTender, DomainError> {
        validate_tender(self.cart.total(), &self.tender)
    }

    /// Moves to `Submitting` and returns the order to send.
    ///
    /// Nothing changes when the cart is empty, the tender does not cover the
    /// total, or another submission is still pending.
    pub fn begin_finalize(&mut self) -> Result<PendingSubmission, DomainError> {
        self.ensure_editable()?;

        if self.cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }
        let tender = self.validate_tender()?;

        let order = OrderSubmission::snapshot(&self.cart, &self.tender);
        self.state = CheckoutState::Submitting;
        log::info!(
            "Submitting order: {} lines, total {}",
            order.lines().len(),
            self.cart.total()
        );

        Ok(PendingSubmission { order, tender })
    }

    /// Records the outcome of `pending`. Success clears the cart and resets the
    /// tender; failure keeps both for a retry.
    ///
    /// The receipt's change is the one computed when the tender was validated,
    /// whatever the backend echoed back.
    pub fn complete(
        &mut self,
        pending: &PendingSubmission,
        outcome: Result<Receipt, SubmissionError>,
    ) -> Result<Receipt, DomainError> {
        let outcome = outcome.map(|receipt| Receipt {
            change: pending.tender.change,
            ..receipt
        });
        if self.state != CheckoutState::Submitting {
            log::warn!("Ignoring submission outcome while {:?}", self.state);
            return outcome.map_err(DomainError::from);
        }

        match outcome {
            Ok(receipt) => {
                log::info!("Transaction {} recorded", receipt.transaction_id);
                self.cart.clear();
                self.tender = TenderInfo::default();
                self.state = CheckoutState::Succeeded {
                    receipt: receipt.clone(),
                };
                Ok(receipt)
            }
            Err(e) => {
                log::warn!("Submission failed, cart kept for retry: {}", e);
                self.state = CheckoutState::Failed {
                    reason: e.to_string(),
                };
                Err(DomainError::Submission(e))
            }
        }
    }

    /// Returns to `Idle` after the operator has seen the outcome.
    pub fn acknowledge(&mut self) {
        if matches!(
            self.state,
            CheckoutState::Succeeded { .. } | CheckoutState::Failed { .. }
        ) {
            self.state = CheckoutState::Idle;
        }
    }

    /// Runs a whole finalize: one submit call, never retried.
    pub async fn finalize<S: TransactionSubmitter>(
        &mut self,
        submitter: &S,
    ) -> Result<Receipt, DomainError> {
        let pending = self.begin_finalize()?;
        let outcome = submitter.submit(&pending.order).await;
        self.complete(&pending, outcome)
    }

    fn ensure_editable(&mut self) -> Result<(), DomainError> {
        if self.state == CheckoutState::Submitting {
            return Err(DomainError::SubmissionInFlight);
        }
        self.acknowledge();
        Ok(())
    }
}
