// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Order Management Operations — keyed actor by `order_id`.
//!
//! Administrative transitions on top of the order state machine the
//! workflow otherwise drives: cancel, ship, deliver, confirm, return. Each
//! validates the order's current state before writing through the
//! repository.

use std::sync::Arc;

use order_core::KeyedExecutor;
use order_domain::{OrderError, OrderStatus, Repository, Result, StockLine};
use tracing::instrument;

/// Administrative operations on an order.
pub struct OrderManagementActor {
    repo: Arc<dyn Repository>,
    executor: Arc<KeyedExecutor>,
}

fn conflict(order_id: &str, from: OrderStatus, action: &str) -> OrderError {
    OrderError::Conflict {
        message: format!("cannot {action} order '{order_id}' from status '{}'", from.as_str()),
    }
}

impl OrderManagementActor {
    /// Build an actor over a shared repository and keyed executor.
    pub fn new(repo: Arc<dyn Repository>, executor: Arc<KeyedExecutor>) -> Self {
        Self { repo, executor }
    }

    async fn require_order(&self, order_id: &str) -> Result<order_domain::Order> {
        self.repo.get_order(order_id).await?.ok_or_else(|| OrderError::NotFound {
            entity: "order".to_string(),
            id: order_id.to_string(),
        })
    }

    /// Cancel an order from any non-terminal status. Restores reserved
    /// stock if the order had not yet shipped.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &str, reason: &str) -> Result<()> {
        self.executor
            .run(order_id, || async {
                let order = self.require_order(order_id).await?;
                if matches!(order.status, OrderStatus::Cancelled | OrderStatus::Delivered | OrderStatus::Returned) {
                    return Err(conflict(order_id, order.status, "cancel"));
                }

                if order.status.is_pre_shipment() {
                    let items = self.repo.get_order_items(order_id).await?;
                    let lines: Vec<StockLine> = items
                        .iter()
                        .map(|item| StockLine {
                            item_id: item.item_id.clone(),
                            quantity: item.quantity,
                        })
                        .collect();
                    if !lines.is_empty() {
                        self.repo.restore_stock(&order.merchant_id, &lines).await?;
                    }
                }

                tracing::info!(order_id, reason, "order cancelled");
                self.repo.update_order_status(order_id, OrderStatus::Cancelled).await
            })
            .await
    }

    /// Mark a `PROCESSING` order `SHIPPED`, recording the shipment's
    /// tracking number.
    #[instrument(skip(self))]
    pub async fn ship_order(&self, order_id: &str, shipment_id: &str, tracking_number: &str) -> Result<()> {
        self.executor
            .run(order_id, || async {
                let order = self.require_order(order_id).await?;
                if order.status != OrderStatus::Processing {
                    return Err(conflict(order_id, order.status, "ship"));
                }
                self.repo
                    .update_order_shipment(order_id, shipment_id, tracking_number)
                    .await?;
                self.repo.update_order_status(order_id, OrderStatus::Shipped).await
            })
            .await
    }

    /// Mark a `SHIPPED` order `DELIVERED`.
    #[instrument(skip(self))]
    pub async fn deliver_order(&self, order_id: &str) -> Result<()> {
        self.executor
            .run(order_id, || async {
                let order = self.require_order(order_id).await?;
                if order.status != OrderStatus::Shipped {
                    return Err(conflict(order_id, order.status, "deliver"));
                }
                self.repo.update_order_status(order_id, OrderStatus::Delivered).await
            })
            .await
    }

    /// Administratively confirm a `PENDING` order into `PROCESSING`,
    /// bypassing the payment webhook — used for manually-confirmed payment
    /// methods (e.g. bank transfer confirmed out of band) that never
    /// trigger the usual webhook resolution path.
    #[instrument(skip(self))]
    pub async fn confirm_order(&self, order_id: &str) -> Result<()> {
        self.executor
            .run(order_id, || async {
                let order = self.require_order(order_id).await?;
                if order.status != OrderStatus::Pending {
                    return Err(conflict(order_id, order.status, "confirm"));
                }
                self.repo.update_order_status(order_id, OrderStatus::Processing).await
            })
            .await
    }

    /// Mark a `SHIPPED` order `RETURNED`. Distinct from `CANCELLED`: stock
    /// is not restored automatically, since a return implies the goods
    /// physically came back and inventory reconciliation is a separate
    /// concern this domain doesn't model.
    #[instrument(skip(self))]
    pub async fn return_order(&self, order_id: &str, reason: &str) -> Result<()> {
        self.executor
            .run(order_id, || async {
                let order = self.require_order(order_id).await?;
                if order.status != OrderStatus::Shipped {
                    return Err(conflict(order_id, order.status, "return"));
                }
                tracing::info!(order_id, reason, "order returned");
                self.repo.update_order_status(order_id, OrderStatus::Returned).await
            })
            .await
    }
}
