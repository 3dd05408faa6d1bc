// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Everything the workflow needs wired in from the service binary: the
//! actors it calls through, the repository it reads consolidated views
//! from, the durable execution substrate, and a handful of tunables.

use std::sync::Arc;
use std::time::Duration;

use order_actors::{CartActor, MerchantInventoryActor, OrderManagementActor, PaymentActor, ShippingActor};
use order_core::Persistence;
use order_domain::Repository;

/// Tunables the workflow reads from configuration rather than hardcoding.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// How long a `SHIPPED` order durably sleeps before becoming `DELIVERED`,
    /// simulating carrier transit time.
    pub delivery_sleep: Duration,
    /// How long `continue_after_payment` polls an unresolved awakeable
    /// before returning `StillPending` for the caller to retry later.
    pub awakeable_poll_timeout: Duration,
    /// Probability (0.0..=1.0) that the legacy `create_order` demo path's
    /// simulated payment draw fails, standing in for a real provider's
    /// decline rate.
    pub payment_retry_failure_rate: f64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            delivery_sleep: Duration::from_secs(10),
            awakeable_poll_timeout: Duration::from_secs(5),
            payment_retry_failure_rate: 0.0,
        }
    }
}

/// The workflow's dependencies, constructed once in the service binary and
/// shared across every invocation.
#[derive(Clone)]
pub struct WorkflowDeps {
    /// The durable execution substrate, used to build a [`order_sdk::WorkflowContext`]
    /// per order instance.
    pub persistence: Arc<dyn Persistence>,
    /// Relational storage for orders, payments, shipments, and inventory.
    pub repo: Arc<dyn Repository>,
    /// Merchant Inventory Actor.
    pub inventory: Arc<MerchantInventoryActor>,
    /// Payment Actor.
    pub payment: Arc<PaymentActor>,
    /// Shipping Actor.
    pub shipping: Arc<ShippingActor>,
    /// Order Management Operations actor.
    pub order_management: Arc<OrderManagementActor>,
    /// Cart Actor.
    pub cart: Arc<CartActor>,
    /// Workflow tunables.
    pub config: WorkflowConfig,
}
