// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! `ContinueAfterPayment` and `OnPaymentUpdate`: resuming an order suspended
//! on its payment promise.
//!
//! The webhook consumer resolves the order's awakeable directly (see
//! `order-webhook`), then calls [`continue_after_payment`] to drive the rest
//! of the state machine. Polling the awakeable here (rather than assuming it
//! is already resolved) keeps this entry point safe to call speculatively,
//! e.g. from an operator tool or a redrive sweep.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use order_domain::{OrderError, OrderStatus, StockLine};
use order_sdk::{AwakeableOutcome, WorkflowContext};

use crate::deps::WorkflowDeps;
use crate::error::Result;

/// The resolution value a payment promise is resolved with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentOutcome {
    /// The provider confirmed payment.
    #[serde(rename = "payment_completed")]
    Completed,
    /// The invoice expired before payment was made.
    #[serde(rename = "payment_expired")]
    Expired,
}

/// Result of attempting to resume a suspended order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationOutcome {
    /// The order's promise resolved and the workflow ran to its next
    /// suspension point (or completion).
    Resumed,
    /// The promise hasn't resolved yet; try again later.
    StillPending,
    /// The order isn't suspended on a payment promise (already resumed, or
    /// never reached that point) — a no-op.
    NotSuspended,
}

/// Poll the order's payment promise and, if resolved, drive the workflow
/// forward via [`on_payment_update`].
#[instrument(skip(deps))]
pub async fn continue_after_payment(deps: &WorkflowDeps, order_id: &str) -> Result<ContinuationOutcome> {
    let order = deps.repo.get_order(order_id).await?.ok_or_else(|| OrderError::NotFound {
        entity: "order".to_string(),
        id: order_id.to_string(),
    })?;

    let Some(promise_id) = order.payment_promise_id else {
        return Ok(ContinuationOutcome::NotSuspended);
    };

    let ctx = WorkflowContext::new(deps.persistence.clone(), order_id, "order_workflow").await?;
    match ctx.await_awakeable::<PaymentOutcome>(&promise_id, deps.config.awakeable_poll_timeout).await? {
        AwakeableOutcome::Pending => Ok(ContinuationOutcome::StillPending),
        AwakeableOutcome::Resolved(outcome) => {
            on_payment_update(deps, &ctx, order_id, outcome).await?;
            deps.repo.update_order_payment_promise(order_id, None).await?;
            Ok(ContinuationOutcome::Resumed)
        }
    }
}

/// Apply a resolved payment outcome to the order's state machine. Idempotent:
/// calling this on an order that already moved past `PENDING` is a no-op, so
/// a duplicate webhook (and thus a duplicate resolution) converges safely.
#[instrument(skip(deps, ctx))]
pub async fn on_payment_update(
    deps: &WorkflowDeps,
    ctx: &WorkflowContext,
    order_id: &str,
    outcome: PaymentOutcome,
) -> Result<()> {
    let order = deps.repo.get_order(order_id).await?.ok_or_else(|| OrderError::NotFound {
        entity: "order".to_string(),
        id: order_id.to_string(),
    })?;

    if order.status != OrderStatus::Pending {
        tracing::debug!(order_id, status = order.status.as_str(), "order already past pending, ignoring");
        return Ok(());
    }

    match outcome {
        PaymentOutcome::Completed => {
            deps.repo.update_order_status(order_id, OrderStatus::Processing).await?;

            let shipment = deps.shipping.create_shipment(order_id, "DHL", "standard").await?;
            deps.repo
                .update_order_shipment(order_id, &shipment.shipment_id, &shipment.tracking_number)
                .await?;
            deps.repo.update_order_status(order_id, OrderStatus::Shipped).await?;

            ctx.sleep("delivery-sleep", deps.config.delivery_sleep).await?;
            deps.repo.update_order_status(order_id, OrderStatus::Delivered).await?;

            deps.cart.clear_cart(&order.customer_id).await;
        }
        PaymentOutcome::Expired => {
            let items = deps.repo.get_order_items(order_id).await?;
            let lines: Vec<StockLine> =
                items.iter().map(|item| StockLine { item_id: item.item_id.clone(), quantity: item.quantity }).collect();
            if !lines.is_empty() {
                deps.repo.restore_stock(&order.merchant_id, &lines).await?;
            }
            deps.repo.update_order_status(order_id, OrderStatus::Cancelled).await?;
        }
    }

    Ok(())
}
