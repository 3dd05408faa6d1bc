// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Single-writer-per-key execution.
//!
//! Actors in this system (Payment, Shipping, Merchant Inventory, Cart, the
//! order workflow itself) are all "virtual objects": every invocation is
//! keyed (by order id, merchant id, customer id, ...) and invocations
//! sharing a key must serialize, while invocations on different keys run
//! concurrently. [`KeyedExecutor`] provides that guarantee by handing out
//! one lock per key from a registry, growing the registry lazily. Keys in
//! this system are long-lived (an order id, a merchant id), so the
//! registry is not expected to grow without bound in practice; entries are
//! never evicted.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

/// Hands out one [`tokio::sync::Mutex`] per key, so callers can serialize
/// work against the same key without blocking callers using different keys.
#[derive(Default)]
pub struct KeyedExecutor {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedExecutor {
    /// Build an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to `key`. Concurrent calls for the
    /// same key queue behind each other in FIFO lock order; calls for
    /// different keys proceed immediately.
    pub async fn run<T, F, Fut>(&self, key: &str, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let key_lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = key_lock.lock().await;
        f().await
    }
}
