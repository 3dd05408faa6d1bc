// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shipping Actor — keyed by `order_id` for creation (the shipment id
//! doesn't exist yet at that point), by `shipment_id` for tracking.
//!
//! `shipment_id` is derived deterministically from `order_id`
//! (`format!("shp-{order_id}")`) rather than randomly generated, so that
//! `create_shipment` replayed after a crash (before the caller observed the
//! first attempt's result) finds the same row instead of creating a
//! second shipment for the same order.

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use order_core::KeyedExecutor;
use order_domain::{Repository, Result, Shipment, ShipmentStatus};
use tracing::instrument;
use uuid::Uuid;

/// How far ahead of shipment creation delivery is estimated, absent any
/// carrier-reported timeline.
const DEFAULT_DELIVERY_HORIZON_DAYS: i64 = 3;

/// Manages shipment creation and tracking.
pub struct ShippingActor {
    repo: Arc<dyn Repository>,
    executor: Arc<KeyedExecutor>,
}

impl ShippingActor {
    /// Build an actor over a shared repository and keyed executor.
    pub fn new(repo: Arc<dyn Repository>, executor: Arc<KeyedExecutor>) -> Self {
        Self { repo, executor }
    }

    /// The shipment id that `create_shipment(order_id, ...)` will use or
    /// has already used.
    pub fn shipment_id_for_order(order_id: &str) -> String {
        format!("shp-{order_id}")
    }

    /// Create a shipment for `order_id`, or return the existing one if
    /// this order already has a shipment (idempotent).
    #[instrument(skip(self))]
    pub async fn create_shipment(
        &self,
        order_id: &str,
        carrier: &str,
        service_type: &str,
    ) -> Result<Shipment> {
        self.executor
            .run(order_id, || async {
                let shipment_id = Self::shipment_id_for_order(order_id);
                if let Some(existing) = self.repo.get_shipment(&shipment_id).await? {
                    return Ok(existing);
                }

                let now = Utc::now();
                let shipment = Shipment {
                    shipment_id: shipment_id.clone(),
                    order_id: order_id.to_string(),
                    tracking_number: format!("TRK-{}", Uuid::new_v4().simple()),
                    carrier: carrier.to_string(),
                    service_type: service_type.to_string(),
                    status: ShipmentStatus::Created,
                    current_location: "Warehouse".to_string(),
                    estimated_delivery: now + ChronoDuration::days(DEFAULT_DELIVERY_HORIZON_DAYS),
                    created_at: now,
                    updated_at: now,
                };
                self.repo.insert_or_update_shipment(&shipment).await?;
                Ok(shipment)
            })
            .await
    }

    /// Read-only lookup by shipment id.
    #[instrument(skip(self))]
    pub async fn track_shipment(&self, shipment_id: &str) -> Result<Option<Shipment>> {
        self.executor
            .run(shipment_id, || self.repo.get_shipment(shipment_id))
            .await
    }
}
