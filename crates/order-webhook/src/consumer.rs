// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The `payments.v1` consumer: marks the payment, resolves the order's
//! payment promise, and drives the workflow forward.
//!
//! At-least-once: [`order_events::EventConsumer::run`] only commits the
//! offset once the handler returns `Ok(())`, so every step here must be safe
//! to repeat (spec.md §4.8's "every step is idempotent on replay").

use order_events::{BusError, EventEnvelope, EventType};
use order_workflow::{PaymentOutcome, WorkflowDeps};
use tracing::{info, warn};

fn to_bus_error(err: impl std::fmt::Display) -> BusError {
    BusError::Handler(err.to_string())
}

/// Handle one decoded `payments.v1` envelope.
#[tracing::instrument(skip(deps, envelope), fields(event_type = envelope.event_type.as_str(), aggregate_id = %envelope.aggregate_id))]
pub async fn handle_payment_event(deps: &WorkflowDeps, envelope: EventEnvelope) -> order_events::Result<()> {
    let outcome = match envelope.event_type {
        EventType::PaymentCompleted => PaymentOutcome::Completed,
        EventType::PaymentExpired => PaymentOutcome::Expired,
        EventType::OrderCreated => {
            return Ok(());
        }
    };

    let payment_id = envelope
        .data
        .get("paymentId")
        .and_then(|v| v.as_str())
        .unwrap_or(&envelope.aggregate_id)
        .to_string();

    match outcome {
        PaymentOutcome::Completed => deps.payment.mark_payment_completed(&payment_id).await,
        PaymentOutcome::Expired => deps.payment.mark_payment_expired(&payment_id).await,
    }
    .map_err(to_bus_error)?;

    let order_id = match envelope.data.get("orderId").and_then(|v| v.as_str()) {
        Some(id) => Some(id.to_string()),
        None => deps
            .repo
            .get_order_with_payment_by_payment_id(&payment_id)
            .await
            .map_err(to_bus_error)?
            .map(|owp| owp.order.order_id),
    };

    let Some(order_id) = order_id else {
        warn!(payment_id, "payment event could not be resolved to an order, skipping resumption");
        return Ok(());
    };

    let Some(order) = deps.repo.get_order(&order_id).await.map_err(to_bus_error)? else {
        warn!(order_id, "order referenced by payment event no longer exists");
        return Ok(());
    };

    if let Some(promise_id) = &order.payment_promise_id {
        order_sdk::context::resolve_awakeable(&*deps.persistence, promise_id, &outcome)
            .await
            .map_err(to_bus_error)?;
    }

    order_workflow::continue_after_payment(deps, &order_id).await.map_err(to_bus_error)?;

    info!(order_id, "payment event applied");

    Ok(())
}
