// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Errors the webhook handler reports back to the payment provider.
//!
//! Deliberately narrow: the handler must never fail to the provider except
//! on malformed input (spec.md §7) — everything past "accepted" happens on
//! the consumer, which the provider never waits on.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors the `POST /webhooks/payment` handler can return.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The request body was missing a required field.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// `x-callback-token` was missing or did not match the configured secret.
    #[error("unauthorized")]
    Unauthorized,
    /// Publishing the event to the bus failed.
    #[error("failed to enqueue event: {0}")]
    Enqueue(#[from] order_events::BusError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Enqueue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
