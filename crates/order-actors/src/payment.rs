// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Payment Actor — keyed by `payment_id`.
//!
//! Responsible for creating an invoice at the external provider, tracking
//! the payment's lifecycle, and surviving restarts/retries without
//! duplicating the external side effect: the Payment row itself is the
//! durable record of whether an invoice was already created, so a replayed
//! `process_payment` call after a crash returns the cached result instead
//! of calling the provider again.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use order_core::KeyedExecutor;
use order_domain::{OrderError, Payment, PaymentMethod, PaymentStatus, Repository, Result};

use crate::provider::PaymentProvider;

/// Outcome of `process_payment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPaymentOutcome {
    /// The payment id (same as the one passed in).
    pub payment_id: String,
    /// Current status after processing.
    pub status: PaymentStatus,
    /// The hosted invoice URL the customer should be sent to.
    pub invoice_url: String,
}

/// Manages one payment's lifecycle.
pub struct PaymentActor {
    repo: Arc<dyn Repository>,
    provider: Arc<dyn PaymentProvider>,
    executor: Arc<KeyedExecutor>,
}

impl PaymentActor {
    /// Build an actor over a shared repository, provider, and keyed
    /// executor.
    pub fn new(
        repo: Arc<dyn Repository>,
        provider: Arc<dyn PaymentProvider>,
        executor: Arc<KeyedExecutor>,
    ) -> Self {
        Self {
            repo,
            provider,
            executor,
        }
    }

    /// Create an invoice for `order_id`/`amount` via the external provider,
    /// or return the cached result if one was already created for
    /// `payment_id`.
    #[instrument(skip(self))]
    pub async fn process_payment(
        &self,
        payment_id: &str,
        order_id: &str,
        method: PaymentMethod,
        amount: Decimal,
    ) -> Result<ProcessPaymentOutcome> {
        self.executor
            .run(payment_id, || async {
                if let Some(existing) = self.repo.get_payment(payment_id).await? {
                    if let Some(invoice_url) = existing.invoice_url {
                        return Ok(ProcessPaymentOutcome {
                            payment_id: payment_id.to_string(),
                            status: existing.status,
                            invoice_url,
                        });
                    }
                }

                let now = Utc::now();
                self.repo
                    .insert_or_update_payment(&Payment {
                        payment_id: payment_id.to_string(),
                        order_id: order_id.to_string(),
                        amount,
                        payment_method: method,
                        status: PaymentStatus::Processing,
                        invoice_url: None,
                        provider_invoice_id: None,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?;

                let invoice = self.provider.create_invoice(order_id, amount).await?;

                self.repo
                    .update_payment_invoice(payment_id, &invoice.invoice_url, &invoice.provider_invoice_id)
                    .await?;
                self.repo
                    .update_payment_status(payment_id, PaymentStatus::Pending)
                    .await?;

                Ok(ProcessPaymentOutcome {
                    payment_id: payment_id.to_string(),
                    status: PaymentStatus::Pending,
                    invoice_url: invoice.invoice_url,
                })
            })
            .await
    }

    /// Idempotent transition to `PAYMENT_COMPLETED`.
    #[instrument(skip(self))]
    pub async fn mark_payment_completed(&self, payment_id: &str) -> Result<()> {
        self.executor
            .run(payment_id, || async {
                let payment = self.repo.get_payment(payment_id).await?.ok_or_else(|| OrderError::NotFound {
                    entity: "payment".to_string(),
                    id: payment_id.to_string(),
                })?;
                if payment.status == PaymentStatus::Completed {
                    return Ok(());
                }
                self.repo
                    .update_payment_status(payment_id, PaymentStatus::Completed)
                    .await
            })
            .await
    }

    /// Idempotent transition to `PAYMENT_EXPIRED`.
    #[instrument(skip(self))]
    pub async fn mark_payment_expired(&self, payment_id: &str) -> Result<()> {
        self.executor
            .run(payment_id, || async {
                let payment = self.repo.get_payment(payment_id).await?.ok_or_else(|| OrderError::NotFound {
                    entity: "payment".to_string(),
                    id: payment_id.to_string(),
                })?;
                if payment.status == PaymentStatus::Expired {
                    return Ok(());
                }
                self.repo
                    .update_payment_status(payment_id, PaymentStatus::Expired)
                    .await
            })
            .await
    }

    /// Transition `PAYMENT_COMPLETED -> PAYMENT_REFUNDED`. Fails with
    /// `Conflict` if the payment isn't completed, or if `amount` exceeds
    /// what was originally paid.
    #[instrument(skip(self))]
    pub async fn process_refund(&self, payment_id: &str, amount: Decimal, reason: &str) -> Result<()> {
        self.executor
            .run(payment_id, || async {
                let payment = self.repo.get_payment(payment_id).await?.ok_or_else(|| OrderError::NotFound {
                    entity: "payment".to_string(),
                    id: payment_id.to_string(),
                })?;
                if payment.status != PaymentStatus::Completed {
                    return Err(OrderError::Conflict {
                        message: format!(
                            "payment '{payment_id}' is '{}', refunds only apply to completed payments",
                            payment.status.as_str()
                        ),
                    });
                }
                if amount > payment.amount {
                    return Err(OrderError::Conflict {
                        message: format!(
                            "refund amount {amount} exceeds original payment amount {}",
                            payment.amount
                        ),
                    });
                }
                tracing::info!(payment_id, reason, %amount, "processing refund");
                self.repo
                    .update_payment_status(payment_id, PaymentStatus::Refunded)
                    .await
            })
            .await
    }
}
