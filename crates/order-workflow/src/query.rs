// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! `GetOrder`: a read-only consolidated view of an order.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use order_domain::{Order, OrderError, Payment, Shipment};

use crate::deps::WorkflowDeps;
use crate::error::Result;

/// Consolidated order + payment + shipment view. Payment and shipment are
/// `None` until the workflow has reached the step that creates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    /// The order itself.
    pub order: Order,
    /// The order's payment, if one has been created.
    pub payment: Option<Payment>,
    /// The order's shipment, if one has been created.
    pub shipment: Option<Shipment>,
}

/// Fetch a consolidated view of an order. Tolerates missing payment/shipment
/// rows — an order early in its lifecycle legitimately has neither yet.
#[instrument(skip(deps))]
pub async fn get_order(deps: &WorkflowDeps, order_id: &str) -> Result<OrderView> {
    let order = deps.repo.get_order(order_id).await?.ok_or_else(|| OrderError::NotFound {
        entity: "order".to_string(),
        id: order_id.to_string(),
    })?;

    let payment = match &order.payment_id {
        Some(payment_id) => deps.repo.get_payment(payment_id).await?,
        None => None,
    };
    let shipment = match &order.shipment_id {
        Some(shipment_id) => deps.repo.get_shipment(shipment_id).await?,
        None => None,
    };

    Ok(OrderView { order, payment, shipment })
}
