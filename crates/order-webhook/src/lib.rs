// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Payment provider webhook intake and resumption.
//!
//! Two halves, split exactly as spec.md §4.8 describes: [`handler`] accepts
//! the provider's callback and enqueues an event as fast as possible;
//! [`consumer`] does the actual work of marking the payment and waking the
//! suspended order, off the provider's request path entirely.

#![deny(missing_docs)]

/// The at-least-once `payments.v1` consumer.
pub mod consumer;

/// Errors the webhook handler can return to the provider.
pub mod error;

/// `POST /webhooks/payment` and its router.
pub mod handler;

pub use consumer::handle_payment_event;
pub use error::WebhookError;
pub use handler::{router, WebhookState};
