// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Cart Actor — keyed by `customer_id`.
//!
//! Unlike the other actors, cart state has no relational table of its own:
//! it is owned exclusively by this actor, held in memory behind a lock per
//! customer. Losing an in-progress cart on restart is an accepted tradeoff
//! (a cart is not yet an order; nothing downstream depends on its
//! durability).

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::instrument;

/// One line in a customer's cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog item id.
    pub product_id: String,
    /// Display name, captured at add-to-cart time.
    pub name: String,
    /// Quantity requested.
    pub quantity: i64,
    /// Unit price, captured at add-to-cart time.
    pub unit_price: Decimal,
}

/// A customer's in-progress cart.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Cart {
    /// The merchant this cart is bound to. `None` until the first item is
    /// added.
    pub merchant_id: Option<String>,
    /// Line items, in the order they were added.
    pub items: Vec<CartItem>,
    /// `Σ quantity * unit_price`, recomputed on every mutation.
    pub total_amount: Decimal,
}

impl Cart {
    fn recompute_total(&mut self) {
        self.total_amount = self
            .items
            .iter()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum();
    }
}

/// Manages every customer's cart.
#[derive(Default)]
pub struct CartActor {
    carts: Mutex<HashMap<String, Cart>>,
}

impl CartActor {
    /// Build an empty actor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in an `Arc` for sharing across the service.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Add an item to `customer_id`'s cart. If the cart is currently bound
    /// to a different merchant, the binding is replaced and prior items are
    /// dropped — a cart holds items from exactly one merchant at a time.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        customer_id: &str,
        merchant_id: &str,
        product_id: &str,
        name: &str,
        unit_price: Decimal,
        quantity: i64,
    ) -> Cart {
        let mut carts = self.carts.lock().await;
        let cart = carts.entry(customer_id.to_string()).or_default();

        if cart.merchant_id.as_deref() != Some(merchant_id) {
            cart.merchant_id = Some(merchant_id.to_string());
            cart.items.clear();
        }

        if let Some(existing) = cart.items.iter_mut().find(|i| i.product_id == product_id) {
            existing.quantity += quantity;
            existing.unit_price = unit_price;
        } else {
            cart.items.push(CartItem {
                product_id: product_id.to_string(),
                name: name.to_string(),
                quantity,
                unit_price,
            });
        }
        cart.recompute_total();
        cart.clone()
    }

    /// Set an item's quantity directly (not additive, unlike `add_to_cart`).
    /// A quantity of zero removes the line.
    #[instrument(skip(self))]
    pub async fn update_cart_item(&self, customer_id: &str, product_id: &str, quantity: i64) -> Cart {
        let mut carts = self.carts.lock().await;
        let cart = carts.entry(customer_id.to_string()).or_default();

        if quantity <= 0 {
            cart.items.retain(|i| i.product_id != product_id);
        } else if let Some(existing) = cart.items.iter_mut().find(|i| i.product_id == product_id) {
            existing.quantity = quantity;
        }
        cart.recompute_total();
        cart.clone()
    }

    /// Remove an item from the cart entirely.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, customer_id: &str, product_id: &str) -> Cart {
        self.update_cart_item(customer_id, product_id, 0).await
    }

    /// Read the current cart, or an empty one if the customer has never
    /// added anything.
    #[instrument(skip(self))]
    pub async fn view_cart(&self, customer_id: &str) -> Cart {
        self.carts.lock().await.get(customer_id).cloned().unwrap_or_default()
    }

    /// Empty the cart. Idempotent: clearing an already-empty cart is a
    /// no-op.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self, customer_id: &str) {
        if let Some(cart) = self.carts.lock().await.get_mut(customer_id) {
            cart.merchant_id = None;
            cart.items.clear();
            cart.total_amount = Decimal::ZERO;
        }
    }
}
