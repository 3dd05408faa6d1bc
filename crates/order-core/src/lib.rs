// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Order Core - Durable Execution Substrate
//!
//! This crate provides the execution substrate the order-processing workflow
//! runs on. It manages workflow instances, checkpoints (journaled steps),
//! durable sleep, and awakeables (externally-resolvable promises), persisting
//! all state to PostgreSQL for crash resilience.
//!
//! It deliberately does not reimplement a general-purpose distributed
//! workflow engine: there is no remote transport, no multi-tenant scheduler,
//! no container lifecycle management. A single process embeds it directly —
//! `order-sdk`'s `WorkflowContext` wraps this crate's [`Persistence`] trait
//! the same way a network-transport SDK would wrap a remote engine, except
//! the call is a direct method call instead of an RPC.
//!
//! # Instance Status State Machine
//!
//! ```text
//!                     ┌─────────┐
//!                     │ PENDING │
//!                     └────┬────┘
//!                          │ register
//!                          ▼
//!                     ┌─────────┐
//!          ┌──────────│ RUNNING │◄─────────┐
//!          │          └────┬────┘          │
//!     sleep/await          │               │
//!          │               │               │
//!          ▼               │               │
//!     ┌───────────┐        │               │
//!     │ SUSPENDED │────────┘ wake/resolve  │
//!     └───────────┘                        │
//!                          complete       fail
//!                               │           │
//!                               ▼           ▼
//!                         ┌───────────┐ ┌────────┐
//!                         │ COMPLETED │ │ FAILED │
//!                         └───────────┘ └────────┘
//! ```
//!
//! # Checkpoint Semantics
//!
//! [`Persistence::save_checkpoint`] / [`Persistence::load_checkpoint`] are the
//! journaled-step primitive: first execution persists the step's result
//! keyed by `(instance_id, checkpoint_id)`; replay returns the persisted
//! value without re-running the step.
//!
//! # Awakeables
//!
//! [`Persistence::create_awakeable`] allocates a durable promise id;
//! [`Persistence::resolve_awakeable`] resolves it (idempotent — resolving an
//! already-resolved awakeable is a no-op, which is what lets a webhook
//! delivered before the workflow suspends still converge once the promise
//! is finally created); [`Persistence::get_awakeable`] polls its current
//! state.
//!
//! # Modules
//!
//! - [`config`]: substrate configuration from environment variables.
//! - [`persistence`]: PostgreSQL persistence layer for instances, checkpoints,
//!   and awakeables.
//! - [`keyed`]: single-writer-per-key execution ([`KeyedExecutor`]), used by
//!   actors to serialize invocations sharing a key.
//! - [`error`]: error types for substrate operations.
//! - [`migrations`]: embedded schema migrations.

#![deny(missing_docs)]

/// Substrate configuration loaded from environment variables.
pub mod config;

/// Error types for substrate operations.
pub mod error;

/// Single-writer-per-key execution.
pub mod keyed;

/// Embedded schema migrations.
pub mod migrations;

/// PostgreSQL persistence layer for instances, checkpoints, and awakeables.
pub mod persistence;

pub use error::{CoreError, Result};
pub use keyed::KeyedExecutor;
pub use persistence::{
    AwakeableRecord, AwakeableStatus, CheckpointRecord, InstanceRecord, InstanceStatus,
    Persistence, PostgresPersistence,
};
