// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The boundary to an external payment provider.
//!
//! Secret storage and the real provider integration are out of scope; this
//! is the interface the Payment Actor calls through, so a real provider can
//! be dropped in without touching actor logic.

use async_trait::async_trait;
use rust_decimal::Decimal;

use order_domain::{OrderError, Result};

/// A hosted invoice created with the payment provider.
#[derive(Debug, Clone)]
pub struct Invoice {
    /// URL the customer is sent to in order to pay.
    pub invoice_url: String,
    /// The provider's own id for this invoice, used to correlate webhooks.
    pub provider_invoice_id: String,
}

/// External payment provider boundary.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted invoice for `amount` against `order_id`.
    async fn create_invoice(&self, order_id: &str, amount: Decimal) -> Result<Invoice>;
}

/// An in-memory provider for tests and local runs. Never fails, and derives
/// a stable invoice id from `order_id` so repeated calls for the same order
/// are trivially idempotent at the provider boundary too.
#[derive(Debug, Default)]
pub struct MockProvider;

#[async_trait]
impl PaymentProvider for MockProvider {
    async fn create_invoice(&self, order_id: &str, amount: Decimal) -> Result<Invoice> {
        tracing::debug!(order_id, %amount, "mock provider issued invoice");
        Ok(Invoice {
            invoice_url: format!("https://pay.example.com/invoice/{order_id}"),
            provider_invoice_id: format!("inv_{order_id}"),
        })
    }
}

/// A provider that always fails, for exercising the Payment Actor's
/// transient-failure retry path.
#[derive(Debug, Default)]
pub struct FailingProvider;

#[async_trait]
impl PaymentProvider for FailingProvider {
    async fn create_invoice(&self, _order_id: &str, _amount: Decimal) -> Result<Invoice> {
        Err(OrderError::ProviderUnavailable {
            message: "simulated provider outage".to_string(),
        })
    }
}
