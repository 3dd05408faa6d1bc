// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Order SDK - ergonomic workflow context over `order-core`.
//!
//! This crate provides [`WorkflowContext`], the API an order workflow
//! actually calls: checkpointed steps, durable sleep, and durable promises
//! (awakeables). It wraps `order-core`'s [`order_core::Persistence`] trait
//! directly — there is no remote transport here, since the substrate itself
//! is embedded in the same process (see `order-core`'s crate docs).
//!
//! # Quick Start
//!
//! ```ignore
//! use order_sdk::WorkflowContext;
//! use std::sync::Arc;
//!
//! let ctx = WorkflowContext::new(persistence, order_id, "order_workflow").await?;
//!
//! let reservation = ctx.run_step("reserve-stock", || async {
//!     reserve_stock(&order).await
//! }).await?;
//!
//! let awakeable_id = ctx.create_awakeable().await?;
//! // ... persist awakeable_id on the order row, return control ...
//!
//! match ctx.await_awakeable::<PaymentOutcome>(&awakeable_id, poll_timeout).await? {
//!     AwakeableOutcome::Resolved(outcome) => { /* continue the workflow */ }
//!     AwakeableOutcome::Pending => { /* re-suspend, a later redrive retries */ }
//! }
//! ```
//!
//! # Checkpointing
//!
//! [`WorkflowContext::run_step`] handles both save and resume semantics: on
//! first execution it runs the closure and persists the result; on replay it
//! returns the persisted result without re-running the closure.
//!
//! # Durable Sleep
//!
//! [`WorkflowContext::sleep`] persists the wake deadline before sleeping, so
//! a crash mid-sleep resumes with the remaining duration recomputed from the
//! persisted deadline.
//!
//! # Awakeables
//!
//! [`WorkflowContext::create_awakeable`] allocates a durable promise id;
//! [`context::resolve_awakeable`] (a free function, usable without owning a
//! context for that instance) resolves it; [`WorkflowContext::await_awakeable`]
//! polls it with bounded backoff.

#![deny(missing_docs)]

/// [`WorkflowContext`] and related types.
pub mod context;

/// SDK-specific error types.
pub mod error;

pub use context::{AwakeableOutcome, WorkflowContext};
pub use error::{Result, SdkError};
