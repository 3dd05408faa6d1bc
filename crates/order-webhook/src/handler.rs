// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! `POST /webhooks/payment`: the payment provider's callback intake.
//!
//! Validates and enqueues only — resolving the payment and resuming the
//! suspended order happens on [`crate::consumer`], which the provider never
//! waits on.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{info, warn};

use order_domain::Repository;
use order_events::{EventEnvelope, EventProducer, EventType};

use crate::error::WebhookError;

const CALLBACK_TOKEN_HEADER: &str = "x-callback-token";

/// Dependencies the webhook router needs.
pub struct WebhookState {
    /// Relational storage, used to resolve `external_id` to an order/payment.
    pub repo: Arc<dyn Repository>,
    /// Publishes the mapped event to `payments.v1`.
    pub producer: Arc<EventProducer>,
    /// Topic name events are published to.
    pub payments_topic: String,
    /// Expected `x-callback-token` value. When `None` (or empty), the header
    /// is not required — a deployment with no configured secret accepts any
    /// request, matching `payment_provider.callback_token`'s optional nature
    /// in spec.md §6.
    pub callback_token: Option<String>,
}

/// Build the router exposing `POST /webhooks/payment`.
pub fn router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/webhooks/payment", post(handle_payment_webhook))
        .with_state(state)
}

fn check_callback_token(state: &WebhookState, headers: &HeaderMap) -> Result<(), WebhookError> {
    let Some(expected) = state.callback_token.as_deref().filter(|token| !token.is_empty()) else {
        return Ok(());
    };
    let provided = headers.get(CALLBACK_TOKEN_HEADER).and_then(|value| value.to_str().ok());
    if provided == Some(expected) {
        Ok(())
    } else {
        Err(WebhookError::Unauthorized)
    }
}

fn map_status(status: &str) -> Option<EventType> {
    match status {
        "PAID" => Some(EventType::PaymentCompleted),
        "EXPIRED" => Some(EventType::PaymentExpired),
        _ => None,
    }
}

#[tracing::instrument(skip(state, headers, payload))]
async fn handle_payment_webhook(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Response, WebhookError> {
    check_callback_token(&state, &headers)?;

    let external_id = payload
        .get("external_id")
        .and_then(Value::as_str)
        .ok_or_else(|| WebhookError::InvalidRequest("external_id is required".to_string()))?
        .to_string();
    let status = payload.get("status").and_then(Value::as_str).unwrap_or_default();
    let provider_invoice_id = payload.get("id").and_then(Value::as_str).unwrap_or_default();

    let Some(event_type) = map_status(status) else {
        info!(payment_id = %external_id, status, "webhook status not actionable, acknowledging without publishing");
        return Ok(Json(json!({ "status": "received" })).into_response());
    };

    let found = state
        .repo
        .get_order_with_payment_by_payment_id(&external_id)
        .await
        .map_err(|e| WebhookError::Enqueue(order_events::BusError::Handler(e.to_string())))?;

    let (aggregate_id, order_id, customer_id, total_amount, invoice_url) = match &found {
        Some(owp) => (
            owp.order.order_id.clone(),
            Some(owp.order.order_id.clone()),
            Some(owp.order.customer_id.clone()),
            Some(owp.order.total_amount),
            owp.payment.as_ref().and_then(|p| p.invoice_url.clone()),
        ),
        None => {
            warn!(payment_id = %external_id, "webhook references an unknown payment, publishing keyed by payment_id");
            (external_id.clone(), None, None, None::<Decimal>, None)
        }
    };

    let envelope = EventEnvelope::new(
        event_type,
        aggregate_id,
        json!({
            "orderId": order_id,
            "paymentId": external_id,
            "customerId": customer_id,
            "invoiceURL": invoice_url,
            "totalAmount": total_amount,
            "provider": "xendit",
            "status": status,
            "invoiceId": provider_invoice_id,
        }),
    );

    state
        .producer
        .publish(&state.payments_topic, &envelope)
        .await
        .map_err(WebhookError::Enqueue)?;

    Ok(Json(json!({ "status": "received" })).into_response())
}
