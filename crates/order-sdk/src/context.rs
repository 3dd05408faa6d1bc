// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! [`WorkflowContext`]: the ergonomic layer workflows drive through.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use order_core::{AwakeableStatus, InstanceStatus, Persistence};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::{Result, SdkError};

/// Outcome of [`WorkflowContext::await_awakeable`].
#[derive(Debug, Clone)]
pub enum AwakeableOutcome<T> {
    /// The awakeable resolved within the poll window.
    Resolved(T),
    /// Still pending when the poll window elapsed. The caller should
    /// re-suspend the instance (persist enough state to call this again)
    /// and return; a later redrive will retry the poll.
    Pending,
}

/// Ergonomic wrapper over [`order_core::Persistence`] that a workflow drives.
///
/// One `WorkflowContext` is constructed per instance invocation, scoped to a
/// single `instance_id`. It never holds workflow state itself — every method
/// reads or writes through to the database, so a fresh context built after a
/// crash or restart behaves identically to the one that was running before.
pub struct WorkflowContext {
    persistence: Arc<dyn Persistence>,
    instance_id: String,
}

impl WorkflowContext {
    /// Build a context for `instance_id`, registering the instance if it
    /// doesn't already exist (idempotent, so safe on replay).
    pub async fn new(
        persistence: Arc<dyn Persistence>,
        instance_id: impl Into<String>,
        workflow_kind: &str,
    ) -> Result<Self> {
        let instance_id = instance_id.into();
        persistence
            .register_instance(&instance_id, workflow_kind)
            .await?;
        persistence
            .update_instance_status(&instance_id, InstanceStatus::Running)
            .await?;
        Ok(Self {
            persistence,
            instance_id,
        })
    }

    /// The instance id this context is scoped to.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Run a journaled step. On first execution, runs `f` and persists its
    /// result keyed by `(instance_id, step_id)`. On replay, returns the
    /// persisted result without re-running `f` — this is what makes an
    /// at-least-once-retried workflow behave as exactly-once from the
    /// caller's perspective.
    #[instrument(skip(self, f), fields(instance_id = %self.instance_id, step_id = step_id))]
    pub async fn run_step<T, F, Fut>(&self, step_id: &str, f: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(checkpoint) = self
            .persistence
            .load_checkpoint(&self.instance_id, step_id)
            .await?
        {
            debug!("replaying step from checkpoint");
            return serde_json::from_value(checkpoint.state).map_err(|source| {
                SdkError::CheckpointDecode {
                    checkpoint_id: step_id.to_string(),
                    source,
                }
            });
        }

        let result = f().await?;
        let state = serde_json::to_value(&result)?;
        self.persistence
            .save_checkpoint(&self.instance_id, step_id, &state)
            .await?;
        Ok(result)
    }

    /// Durable sleep: persists `sleep_until` before actually sleeping, so a
    /// crash mid-sleep resumes with the remaining duration recomputed from
    /// the persisted deadline rather than sleeping the full duration again.
    /// Itself a checkpointed step, so replaying after the sleep already
    /// completed is a no-op.
    #[instrument(skip(self), fields(instance_id = %self.instance_id, step_id = step_id))]
    pub async fn sleep(&self, step_id: &str, duration: Duration) -> Result<()> {
        if self
            .persistence
            .load_checkpoint(&self.instance_id, step_id)
            .await?
            .is_some()
        {
            debug!("sleep step already completed, skipping");
            return Ok(());
        }

        let instance = self.persistence.get_instance(&self.instance_id).await?;
        let wake_at = instance
            .as_ref()
            .and_then(|i| i.sleep_until)
            .unwrap_or_else(|| Utc::now() + chrono::Duration::from_std(duration).unwrap_or_default());

        self.persistence
            .set_sleep_until(&self.instance_id, Some(wake_at))
            .await?;
        self.persistence
            .update_instance_status(&self.instance_id, InstanceStatus::Suspended)
            .await?;

        let remaining = (wake_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tokio::time::sleep(remaining).await;

        self.persistence
            .update_instance_status(&self.instance_id, InstanceStatus::Running)
            .await?;
        self.persistence
            .set_sleep_until(&self.instance_id, None)
            .await?;
        self.persistence
            .save_checkpoint(&self.instance_id, step_id, &serde_json::json!(null))
            .await?;

        Ok(())
    }

    /// Allocate a new durable promise for this instance.
    #[instrument(skip(self), fields(instance_id = %self.instance_id))]
    pub async fn create_awakeable(&self) -> Result<String> {
        let awakeable_id = uuid::Uuid::new_v4().to_string();
        self.persistence
            .create_awakeable(&awakeable_id, &self.instance_id)
            .await?;
        Ok(awakeable_id)
    }

    /// Poll an awakeable with bounded backoff up to `poll_timeout`. Returns
    /// [`AwakeableOutcome::Pending`] rather than blocking forever, since std
    /// Rust futures can't be durably parked mid-stack the way a true
    /// continuation-based runtime suspends — the caller re-suspends the
    /// workflow and a later redrive calls this again.
    #[instrument(skip(self), fields(instance_id = %self.instance_id, awakeable_id = awakeable_id))]
    pub async fn await_awakeable<T>(
        &self,
        awakeable_id: &str,
        poll_timeout: Duration,
    ) -> Result<AwakeableOutcome<T>>
    where
        T: DeserializeOwned,
    {
        let deadline = tokio::time::Instant::now() + poll_timeout;
        let mut backoff = Duration::from_millis(50);

        loop {
            let record = self
                .persistence
                .get_awakeable(awakeable_id)
                .await?
                .ok_or_else(|| {
                    SdkError::Substrate(order_core::CoreError::AwakeableNotFound {
                        awakeable_id: awakeable_id.to_string(),
                    })
                })?;

            if record.status == AwakeableStatus::Resolved {
                let value = record.value.unwrap_or(serde_json::Value::Null);
                let parsed = serde_json::from_value(value).map_err(|source| {
                    SdkError::CheckpointDecode {
                        checkpoint_id: awakeable_id.to_string(),
                        source,
                    }
                })?;
                return Ok(AwakeableOutcome::Resolved(parsed));
            }

            if tokio::time::Instant::now() >= deadline {
                return Ok(AwakeableOutcome::Pending);
            }

            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(Duration::from_secs(2));
        }
    }

    /// Resolve an awakeable. Idempotent: resolving twice keeps the first
    /// value, which is what lets a webhook delivered before the workflow
    /// suspends still converge once the promise is created.
    pub async fn resolve_awakeable<T: Serialize>(
        &self,
        awakeable_id: &str,
        value: &T,
    ) -> Result<()> {
        let encoded = serde_json::to_value(value)?;
        self.persistence
            .resolve_awakeable(awakeable_id, &encoded)
            .await?;
        Ok(())
    }

    /// Mark the instance completed, recording `output`.
    pub async fn complete(&self, output: impl Serialize) -> Result<()> {
        let output = serde_json::to_value(output)?;
        self.persistence
            .complete_instance(&self.instance_id, Some(output), None)
            .await?;
        Ok(())
    }

    /// Mark the instance failed, recording `error`.
    pub async fn fail(&self, error: &str) -> Result<()> {
        self.persistence
            .complete_instance(&self.instance_id, None, Some(error))
            .await?;
        Ok(())
    }
}

/// Resolve an awakeable belonging to some other instance, without
/// constructing a full [`WorkflowContext`] for it. Used by the webhook
/// consumer, which knows an `awakeable_id` but isn't driving that instance's
/// workflow itself.
pub async fn resolve_awakeable<T: Serialize>(
    persistence: &dyn Persistence,
    awakeable_id: &str,
    value: &T,
) -> Result<()> {
    let encoded = serde_json::to_value(value)?;
    persistence.resolve_awakeable(awakeable_id, &encoded).await?;
    Ok(())
}
