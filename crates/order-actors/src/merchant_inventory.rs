// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Merchant Inventory Actor — keyed by `merchant_id`.
//!
//! Stock correctness is enforced at the Repository level
//! (`reserve_stock`/`restore_stock`, transactional): this actor serializes
//! management access per merchant but is not itself the authority on
//! quantities.

use std::sync::Arc;

use order_core::KeyedExecutor;
use order_domain::{MerchantItem, Repository, Result};
use tracing::instrument;

/// Manages one merchant's catalog.
pub struct MerchantInventoryActor {
    repo: Arc<dyn Repository>,
    executor: Arc<KeyedExecutor>,
}

impl MerchantInventoryActor {
    /// Build an actor over a shared repository and keyed executor.
    pub fn new(repo: Arc<dyn Repository>, executor: Arc<KeyedExecutor>) -> Self {
        Self { repo, executor }
    }

    /// The merchant's full catalog (there is no separate "merchant" entity
    /// in this domain beyond its items, so this doubles as `GetMerchant`).
    #[instrument(skip(self))]
    pub async fn list_items(&self, merchant_id: &str) -> Result<Vec<MerchantItem>> {
        self.executor
            .run(merchant_id, || self.repo.list_merchant_items(merchant_id))
            .await
    }

    /// Fetch a single catalog entry.
    #[instrument(skip(self))]
    pub async fn get_item(&self, merchant_id: &str, item_id: &str) -> Result<Option<MerchantItem>> {
        self.executor
            .run(merchant_id, || self.repo.get_merchant_item(merchant_id, item_id))
            .await
    }

    /// Add a new catalog entry (or replace an existing one's name/price,
    /// leaving its quantity untouched — use `update_stock` for that).
    #[instrument(skip(self, item))]
    pub async fn add_item(&self, item: MerchantItem) -> Result<()> {
        let merchant_id = item.merchant_id.clone();
        self.executor
            .run(&merchant_id, || self.repo.upsert_merchant_item(&item))
            .await
    }

    /// Alias for `add_item`: the upsert is the same operation whether the
    /// caller thinks of it as creating or updating the entry.
    #[instrument(skip(self, item))]
    pub async fn update_item(&self, item: MerchantItem) -> Result<()> {
        self.add_item(item).await
    }

    /// Remove a catalog entry.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, merchant_id: &str, item_id: &str) -> Result<()> {
        self.executor
            .run(merchant_id, || self.repo.delete_merchant_item(merchant_id, item_id))
            .await
    }

    /// Adjust an item's stock by `delta` (can be negative). This is a
    /// direct management operation, distinct from the transactional
    /// `reserve_stock`/`restore_stock` pair the order workflow drives.
    #[instrument(skip(self))]
    pub async fn update_stock(&self, merchant_id: &str, item_id: &str, delta: i64) -> Result<()> {
        self.executor
            .run(merchant_id, || {
                self.repo.update_merchant_item_stock(merchant_id, item_id, delta)
            })
            .await
    }
}
