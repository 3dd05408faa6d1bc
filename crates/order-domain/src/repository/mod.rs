// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The [`Repository`] abstraction and its PostgreSQL backend.

pub mod postgres;

pub use self::postgres::PostgresRepository;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::model::{MerchantItem, Order, OrderItem, Payment, Shipment, StockLine};

/// An order joined with its payment, as returned by the two lookup helpers
/// actors use to go from either key to the pair.
#[derive(Debug, Clone)]
pub struct OrderWithPayment {
    /// The order.
    pub order: Order,
    /// The order's payment, if one has been created.
    pub payment: Option<Payment>,
}

/// Storage operations over the order domain's relational model.
///
/// All mutations are idempotent with respect to retries from an
/// at-least-once-executed actor: re-running the same logical step again
/// (e.g. because a crash happened just after the database commit but before
/// the actor's caller observed success) must not corrupt state.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Insert a new order, or update an existing one's mutable fields
    /// (status, total, payment/shipment linkage). Keyed on `order_id`.
    async fn insert_or_update_order(&self, order: &Order) -> Result<()>;

    /// Replace or insert the line items for an order. For each item, the
    /// display name and unit price are resolved from the merchant's catalog
    /// (falling back to `name = item_id` and `unit_price = 1` if the catalog
    /// has no matching entry, so checkout never blocks on missing pricing
    /// data).
    async fn upsert_order_items(
        &self,
        order_id: &str,
        merchant_id: &str,
        lines: &[StockLine],
    ) -> Result<Vec<OrderItem>>;

    /// Fetch an order by id.
    async fn get_order(&self, order_id: &str) -> Result<Option<Order>>;

    /// Fetch the line items belonging to an order.
    async fn get_order_items(&self, order_id: &str) -> Result<Vec<OrderItem>>;

    /// Update only an order's status. Errors if the order does not exist.
    async fn update_order_status(&self, order_id: &str, status: crate::model::OrderStatus) -> Result<()>;

    /// Link a payment to an order. Errors if the order does not exist.
    async fn update_order_payment(&self, order_id: &str, payment_id: &str) -> Result<()>;

    /// Link a shipment (and its tracking number) to an order. Errors if the
    /// order does not exist.
    async fn update_order_shipment(
        &self,
        order_id: &str,
        shipment_id: &str,
        tracking_number: &str,
    ) -> Result<()>;

    /// Set or clear the durable promise id a workflow is suspended on.
    async fn update_order_payment_promise(
        &self,
        order_id: &str,
        payment_promise_id: Option<&str>,
    ) -> Result<()>;

    /// Insert a new payment, or update an existing one's mutable fields.
    /// Keyed on `payment_id`.
    async fn insert_or_update_payment(&self, payment: &Payment) -> Result<()>;

    /// Fetch a payment by id.
    async fn get_payment(&self, payment_id: &str) -> Result<Option<Payment>>;

    /// Update only a payment's status.
    async fn update_payment_status(
        &self,
        payment_id: &str,
        status: crate::model::PaymentStatus,
    ) -> Result<()>;

    /// Record the provider's hosted invoice URL and invoice id.
    async fn update_payment_invoice(
        &self,
        payment_id: &str,
        invoice_url: &str,
        provider_invoice_id: &str,
    ) -> Result<()>;

    /// Insert a new shipment, or update an existing one's mutable fields.
    /// Keyed on `shipment_id`.
    async fn insert_or_update_shipment(&self, shipment: &Shipment) -> Result<()>;

    /// Fetch a shipment by id.
    async fn get_shipment(&self, shipment_id: &str) -> Result<Option<Shipment>>;

    /// Update only a shipment's status and current location.
    async fn update_shipment_status(
        &self,
        shipment_id: &str,
        status: crate::model::ShipmentStatus,
        current_location: &str,
    ) -> Result<()>;

    /// Fetch a merchant's catalog entry for one item.
    async fn get_merchant_item(&self, merchant_id: &str, item_id: &str) -> Result<Option<MerchantItem>>;

    /// List every catalog entry for a merchant, ordered by item id.
    async fn list_merchant_items(&self, merchant_id: &str) -> Result<Vec<MerchantItem>>;

    /// Insert a new catalog entry, or replace an existing one's name/price.
    /// Does not touch `quantity` on conflict — use `update_merchant_item_stock`
    /// to adjust stock.
    async fn upsert_merchant_item(&self, item: &MerchantItem) -> Result<()>;

    /// Remove a catalog entry. A no-op if it doesn't exist.
    async fn delete_merchant_item(&self, merchant_id: &str, item_id: &str) -> Result<()>;

    /// Adjust a catalog entry's quantity by `delta` (negative to decrement).
    /// Errors with `Conflict` if the result would go negative. Unlike
    /// `reserve_stock`, this is a single-item, non-transactional adjustment
    /// used by direct inventory management rather than checkout.
    async fn update_merchant_item_stock(&self, merchant_id: &str, item_id: &str, delta: i64) -> Result<()>;

    /// Atomically decrement stock for every line, all-or-nothing: if any
    /// line's available quantity is less than requested, no line is
    /// decremented and `OrderError::InsufficientStock` names the first
    /// line found short.
    async fn reserve_stock(&self, merchant_id: &str, lines: &[StockLine]) -> Result<()>;

    /// Atomically increment stock for every line. Used to undo a prior
    /// `reserve_stock` on cancellation; the inverse operation restores the
    /// exact quantity taken, with no floor or ceiling applied.
    async fn restore_stock(&self, merchant_id: &str, lines: &[StockLine]) -> Result<()>;

    /// Fetch an order together with its payment, keyed by order id.
    async fn get_order_with_payment_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<OrderWithPayment>>;

    /// Fetch an order together with its payment, keyed by payment id. Used
    /// by the webhook consumer, which only knows the provider's invoice id
    /// (mapped 1:1 to `payment_id`).
    async fn get_order_with_payment_by_payment_id(
        &self,
        payment_id: &str,
    ) -> Result<Option<OrderWithPayment>>;
}

/// Sum of `quantity * unit_price` across a set of requested lines, resolving
/// prices from the merchant's catalog. Used by the checkout flow to compute
/// `Order::total_amount` before any row is written.
pub fn compute_total(items: &[(MerchantItem, i64)]) -> Decimal {
    items
        .iter()
        .map(|(item, quantity)| item.price * Decimal::from(*quantity))
        .sum()
}
