// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Context behavior tests against an in-memory mock persistence.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use order_core::{
    AwakeableRecord, AwakeableStatus, CheckpointRecord, CoreError, InstanceRecord, InstanceStatus,
    Persistence,
};
use order_sdk::{AwakeableOutcome, WorkflowContext};
use tokio::sync::Mutex;

#[derive(Default)]
struct MockPersistence {
    instances: Mutex<HashMap<String, InstanceRecord>>,
    checkpoints: Mutex<HashMap<(String, String), serde_json::Value>>,
    awakeables: Mutex<HashMap<String, AwakeableRecord>>,
}

#[async_trait]
impl Persistence for MockPersistence {
    async fn register_instance(
        &self,
        instance_id: &str,
        workflow_kind: &str,
    ) -> Result<(), CoreError> {
        let mut instances = self.instances.lock().await;
        instances.entry(instance_id.to_string()).or_insert(InstanceRecord {
            instance_id: instance_id.to_string(),
            workflow_kind: workflow_kind.to_string(),
            status: InstanceStatus::Pending,
            checkpoint_id: None,
            sleep_until: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            output: None,
            error: None,
        });
        Ok(())
    }

    async fn get_instance(&self, instance_id: &str) -> Result<Option<InstanceRecord>, CoreError> {
        Ok(self.instances.lock().await.get(instance_id).cloned())
    }

    async fn update_instance_status(
        &self,
        instance_id: &str,
        status: InstanceStatus,
    ) -> Result<(), CoreError> {
        let mut instances = self.instances.lock().await;
        let instance = instances
            .get_mut(instance_id)
            .ok_or_else(|| CoreError::InstanceNotFound {
                instance_id: instance_id.to_string(),
            })?;
        instance.status = status;
        Ok(())
    }

    async fn set_sleep_until(
        &self,
        instance_id: &str,
        sleep_until: Option<DateTime<Utc>>,
    ) -> Result<(), CoreError> {
        let mut instances = self.instances.lock().await;
        let instance = instances
            .get_mut(instance_id)
            .ok_or_else(|| CoreError::InstanceNotFound {
                instance_id: instance_id.to_string(),
            })?;
        instance.sleep_until = sleep_until;
        Ok(())
    }

    async fn complete_instance(
        &self,
        instance_id: &str,
        output: Option<serde_json::Value>,
        error: Option<&str>,
    ) -> Result<(), CoreError> {
        let mut instances = self.instances.lock().await;
        let instance = instances
            .get_mut(instance_id)
            .ok_or_else(|| CoreError::InstanceNotFound {
                instance_id: instance_id.to_string(),
            })?;
        instance.status = if error.is_some() {
            InstanceStatus::Failed
        } else {
            InstanceStatus::Completed
        };
        instance.output = output;
        instance.error = error.map(str::to_string);
        Ok(())
    }

    async fn save_checkpoint(
        &self,
        instance_id: &str,
        checkpoint_id: &str,
        state: &serde_json::Value,
    ) -> Result<(), CoreError> {
        let mut checkpoints = self.checkpoints.lock().await;
        checkpoints
            .entry((instance_id.to_string(), checkpoint_id.to_string()))
            .or_insert_with(|| state.clone());
        Ok(())
    }

    async fn load_checkpoint(
        &self,
        instance_id: &str,
        checkpoint_id: &str,
    ) -> Result<Option<CheckpointRecord>, CoreError> {
        let checkpoints = self.checkpoints.lock().await;
        Ok(checkpoints
            .get(&(instance_id.to_string(), checkpoint_id.to_string()))
            .map(|state| CheckpointRecord {
                instance_id: instance_id.to_string(),
                checkpoint_id: checkpoint_id.to_string(),
                state: state.clone(),
                created_at: Utc::now(),
            }))
    }

    async fn create_awakeable(
        &self,
        awakeable_id: &str,
        instance_id: &str,
    ) -> Result<(), CoreError> {
        let mut awakeables = self.awakeables.lock().await;
        awakeables
            .entry(awakeable_id.to_string())
            .or_insert(AwakeableRecord {
                awakeable_id: awakeable_id.to_string(),
                instance_id: instance_id.to_string(),
                status: AwakeableStatus::Pending,
                value: None,
                created_at: Utc::now(),
                resolved_at: None,
            });
        Ok(())
    }

    async fn resolve_awakeable(
        &self,
        awakeable_id: &str,
        value: &serde_json::Value,
    ) -> Result<(), CoreError> {
        let mut awakeables = self.awakeables.lock().await;
        if let Some(record) = awakeables.get_mut(awakeable_id) {
            if record.status == AwakeableStatus::Pending {
                record.status = AwakeableStatus::Resolved;
                record.value = Some(value.clone());
                record.resolved_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn get_awakeable(
        &self,
        awakeable_id: &str,
    ) -> Result<Option<AwakeableRecord>, CoreError> {
        Ok(self.awakeables.lock().await.get(awakeable_id).cloned())
    }

    async fn health_check_db(&self) -> Result<bool, CoreError> {
        Ok(true)
    }
}

#[tokio::test]
async fn run_step_executes_once_and_replays_from_checkpoint() {
    let persistence: Arc<dyn Persistence> = Arc::new(MockPersistence::default());
    let ctx = WorkflowContext::new(persistence, "order-1", "order_workflow")
        .await
        .unwrap();

    let calls = Arc::new(Mutex::new(0u32));
    let calls_clone = calls.clone();
    let result = ctx
        .run_step("reserve-stock", || async move {
            *calls_clone.lock().await += 1;
            Ok(42i32)
        })
        .await
        .unwrap();
    assert_eq!(result, 42);

    let calls_clone = calls.clone();
    let replayed = ctx
        .run_step("reserve-stock", || async move {
            *calls_clone.lock().await += 1;
            Ok(99i32)
        })
        .await
        .unwrap();

    assert_eq!(replayed, 42, "replay must return the first result, not re-run the step");
    assert_eq!(*calls.lock().await, 1);
}

#[tokio::test]
async fn await_awakeable_returns_pending_before_resolution() {
    let persistence: Arc<dyn Persistence> = Arc::new(MockPersistence::default());
    let ctx = WorkflowContext::new(persistence, "order-2", "order_workflow")
        .await
        .unwrap();

    let awakeable_id = ctx.create_awakeable().await.unwrap();
    let outcome = ctx
        .await_awakeable::<String>(&awakeable_id, std::time::Duration::from_millis(100))
        .await
        .unwrap();

    assert!(matches!(outcome, AwakeableOutcome::Pending));
}

#[tokio::test]
async fn await_awakeable_resolves_once_the_promise_is_fulfilled() {
    let persistence: Arc<dyn Persistence> = Arc::new(MockPersistence::default());
    let ctx = WorkflowContext::new(persistence.clone(), "order-3", "order_workflow")
        .await
        .unwrap();

    let awakeable_id = ctx.create_awakeable().await.unwrap();
    order_sdk::context::resolve_awakeable(&*persistence, &awakeable_id, &"payment_completed")
        .await
        .unwrap();

    let outcome = ctx
        .await_awakeable::<String>(&awakeable_id, std::time::Duration::from_millis(100))
        .await
        .unwrap();

    match outcome {
        AwakeableOutcome::Resolved(value) => assert_eq!(value, "payment_completed"),
        AwakeableOutcome::Pending => panic!("expected resolved outcome"),
    }
}

#[tokio::test]
async fn resolving_awakeable_twice_keeps_first_value() {
    let persistence: Arc<dyn Persistence> = Arc::new(MockPersistence::default());
    let ctx = WorkflowContext::new(persistence.clone(), "order-4", "order_workflow")
        .await
        .unwrap();

    let awakeable_id = ctx.create_awakeable().await.unwrap();
    order_sdk::context::resolve_awakeable(&*persistence, &awakeable_id, &"payment_completed")
        .await
        .unwrap();
    order_sdk::context::resolve_awakeable(&*persistence, &awakeable_id, &"payment_expired")
        .await
        .unwrap();

    let outcome = ctx
        .await_awakeable::<String>(&awakeable_id, std::time::Duration::from_millis(100))
        .await
        .unwrap();

    match outcome {
        AwakeableOutcome::Resolved(value) => assert_eq!(value, "payment_completed"),
        AwakeableOutcome::Pending => panic!("expected resolved outcome"),
    }
}
