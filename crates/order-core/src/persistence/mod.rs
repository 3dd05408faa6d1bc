// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Persistence interfaces and backends for order-core.
//!
//! This module defines the persistence abstraction and its PostgreSQL
//! backend.

pub mod postgres;

pub use self::postgres::PostgresPersistence;

use crate::error::CoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a workflow instance, independent of domain status
/// (e.g. an Order's `PENDING`/`PROCESSING`/... is a separate concept tracked
/// by `order-domain`, not this crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    /// Instance created but not yet started.
    Pending,
    /// Instance is actively executing.
    Running,
    /// Instance is suspended (durable sleep or awaiting an awakeable).
    Suspended,
    /// Instance finished successfully.
    Completed,
    /// Instance finished with an error.
    Failed,
}

impl InstanceStatus {
    /// String form used in SQL and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Suspended => "suspended",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parse from the `text` representation stored in the database.
    pub fn from_str(s: &str) -> Self {
        match s {
            "running" => Self::Running,
            "suspended" => Self::Suspended,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// Durable record of a workflow instance.
#[derive(Debug, Clone)]
pub struct InstanceRecord {
    /// Instance id (the keyed workflow's key, e.g. an order id).
    pub instance_id: String,
    /// Workflow kind (e.g. `"order_workflow"`) so one substrate can host
    /// several workflow definitions.
    pub workflow_kind: String,
    /// Lifecycle status.
    pub status: InstanceStatus,
    /// Most recently saved checkpoint id, if any.
    pub checkpoint_id: Option<String>,
    /// When a durable sleep should wake the instance, if suspended on sleep.
    pub sleep_until: Option<DateTime<Utc>>,
    /// When the instance was created.
    pub created_at: DateTime<Utc>,
    /// When the instance started running.
    pub started_at: Option<DateTime<Utc>>,
    /// When the instance finished (completed or failed).
    pub finished_at: Option<DateTime<Utc>>,
    /// Output payload on completion.
    pub output: Option<serde_json::Value>,
    /// Error message on failure.
    pub error: Option<String>,
}

/// Durable record of a single journaled checkpoint (step result).
#[derive(Debug, Clone)]
pub struct CheckpointRecord {
    /// Owning instance id.
    pub instance_id: String,
    /// Checkpoint id, unique per instance.
    pub checkpoint_id: String,
    /// Persisted step result, JSON-encoded.
    pub state: serde_json::Value,
    /// When the checkpoint was first saved.
    pub created_at: DateTime<Utc>,
}

/// Status of a durable promise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwakeableStatus {
    /// Not yet resolved.
    Pending,
    /// Resolved with a value.
    Resolved,
}

impl AwakeableStatus {
    /// Parse from the `text` representation stored in the database.
    pub fn from_str(s: &str) -> Self {
        match s {
            "resolved" => Self::Resolved,
            _ => Self::Pending,
        }
    }
}

/// Durable record of an awakeable (externally-resolvable promise).
#[derive(Debug, Clone)]
pub struct AwakeableRecord {
    /// Awakeable id, globally unique.
    pub awakeable_id: String,
    /// Owning instance id — the workflow instance suspended on this promise.
    pub instance_id: String,
    /// Current status.
    pub status: AwakeableStatus,
    /// Resolution value, JSON-encoded, once resolved.
    pub value: Option<serde_json::Value>,
    /// When the awakeable was created.
    pub created_at: DateTime<Utc>,
    /// When the awakeable was resolved, if resolved.
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Persistence interface used by the durable execution substrate.
///
/// A single trait so `order-sdk`'s `WorkflowContext` (and tests) can be
/// written against an abstraction rather than a concrete `PgPool`.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Register a new instance, or return `Ok(())` if it already exists
    /// (idempotent — replaying registration on resume must not fail).
    async fn register_instance(
        &self,
        instance_id: &str,
        workflow_kind: &str,
    ) -> Result<(), CoreError>;

    /// Fetch an instance record.
    async fn get_instance(&self, instance_id: &str) -> Result<Option<InstanceRecord>, CoreError>;

    /// Update instance lifecycle status.
    async fn update_instance_status(
        &self,
        instance_id: &str,
        status: InstanceStatus,
    ) -> Result<(), CoreError>;

    /// Set (or, passing `None`, clear) the `sleep_until` deadline.
    async fn set_sleep_until(
        &self,
        instance_id: &str,
        sleep_until: Option<DateTime<Utc>>,
    ) -> Result<(), CoreError>;

    /// Mark an instance completed or failed.
    async fn complete_instance(
        &self,
        instance_id: &str,
        output: Option<serde_json::Value>,
        error: Option<&str>,
    ) -> Result<(), CoreError>;

    /// Save a checkpoint (journaled step result). Idempotent: saving the
    /// same `checkpoint_id` again is a no-op if one is already recorded.
    async fn save_checkpoint(
        &self,
        instance_id: &str,
        checkpoint_id: &str,
        state: &serde_json::Value,
    ) -> Result<(), CoreError>;

    /// Load a checkpoint by id, if it exists.
    async fn load_checkpoint(
        &self,
        instance_id: &str,
        checkpoint_id: &str,
    ) -> Result<Option<CheckpointRecord>, CoreError>;

    /// Create a new awakeable (durable promise) for an instance. Idempotent:
    /// creating with the same id twice is a no-op.
    async fn create_awakeable(
        &self,
        awakeable_id: &str,
        instance_id: &str,
    ) -> Result<(), CoreError>;

    /// Resolve an awakeable. Idempotent: resolving twice keeps the first value.
    async fn resolve_awakeable(
        &self,
        awakeable_id: &str,
        value: &serde_json::Value,
    ) -> Result<(), CoreError>;

    /// Fetch the current state of an awakeable.
    async fn get_awakeable(
        &self,
        awakeable_id: &str,
    ) -> Result<Option<AwakeableRecord>, CoreError>;

    /// Lightweight DB health check.
    async fn health_check_db(&self) -> Result<bool, CoreError>;
}
