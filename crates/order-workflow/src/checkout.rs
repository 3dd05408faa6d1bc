// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! `Checkout`: the workflow's main entry point.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use order_domain::{repository::compute_total, Order, OrderStatus, PaymentMethod, StockLine};
use order_sdk::WorkflowContext;

use crate::deps::WorkflowDeps;
use crate::error::{Result, WorkflowError};

/// A single requested line in a [`CheckoutRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedItem {
    /// Catalog item id.
    pub product_id: String,
    /// Quantity requested. Must be `>= 1`.
    pub quantity: i64,
}

/// Input to [`checkout`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// The customer placing the order.
    pub customer_id: String,
    /// The merchant fulfilling it.
    pub merchant_id: String,
    /// Requested line items. Must be non-empty.
    pub items: Vec<RequestedItem>,
    /// How the customer intends to pay. Defaults to [`PaymentMethod::Unknown`]
    /// if not supplied.
    pub payment_method: Option<PaymentMethod>,
}

/// Output of a successful [`checkout`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOutput {
    /// The newly created order's id.
    pub order_id: String,
    /// The payment created to collect funds for this order.
    pub payment_id: String,
    /// Where the customer should be sent to pay.
    pub invoice_url: String,
    /// Always `"pending"`: checkout returns before fulfillment completes.
    pub status: String,
}

pub(crate) fn validate_request(request: &CheckoutRequest) -> Result<()> {
    if request.customer_id.trim().is_empty() {
        return Err(WorkflowError::InvalidRequest("customer_id is required".to_string()));
    }
    if request.merchant_id.trim().is_empty() {
        return Err(WorkflowError::InvalidRequest("merchant_id is required".to_string()));
    }
    if request.items.is_empty() {
        return Err(WorkflowError::InvalidRequest("items must be non-empty".to_string()));
    }
    if request.items.iter().any(|item| item.quantity < 1) {
        return Err(WorkflowError::InvalidRequest("item quantity must be at least 1".to_string()));
    }
    Ok(())
}

/// Place an order: validate stock, reserve it, create a payment invoice, and
/// suspend the order on a durable promise awaiting the payment webhook.
///
/// Returns as soon as the invoice exists — fulfillment past that point
/// happens when [`crate::continue_after_payment`] is driven by the webhook
/// consumer.
#[instrument(skip(deps, request), fields(customer_id = %request.customer_id, merchant_id = %request.merchant_id))]
pub async fn checkout(deps: &WorkflowDeps, request: CheckoutRequest) -> Result<CheckoutOutput> {
    validate_request(&request)?;

    let mut lines = Vec::with_capacity(request.items.len());
    let mut priced_items = Vec::with_capacity(request.items.len());
    for requested in &request.items {
        let item = deps
            .inventory
            .get_item(&request.merchant_id, &requested.product_id)
            .await?
            .ok_or_else(|| order_domain::OrderError::NotFound {
                entity: "merchant_item".to_string(),
                id: requested.product_id.clone(),
            })?;

        if requested.quantity > item.quantity {
            return Err(order_domain::OrderError::InsufficientStock {
                merchant_id: request.merchant_id.clone(),
                item_id: requested.product_id.clone(),
                requested: requested.quantity,
                available: item.quantity,
            }
            .into());
        }

        lines.push(StockLine { item_id: requested.product_id.clone(), quantity: requested.quantity });
        priced_items.push((item, requested.quantity));
    }

    let total_amount: Decimal = compute_total(&priced_items);
    let order_id = format!("ord-{}", Uuid::new_v4());

    let ctx = WorkflowContext::new(deps.persistence.clone(), order_id.clone(), "order_workflow").await?;

    // `order_id` is freshly generated above, so this step is never actually
    // replayed in this implementation — but the guard keeps `reserve_stock`
    // (the one non-idempotent call here) safe if a caller-level retry ever
    // reuses an order_id. `ctx.run_step` isn't used here: its closure must
    // return a substrate-shaped error, while reservation failures are
    // domain errors (`OrderError::InsufficientStock`, a caller rejection,
    // not something the runtime should retry).
    if deps.repo.get_order(&order_id).await?.is_none() {
        deps.repo.reserve_stock(&request.merchant_id, &lines).await?;
        let now = Utc::now();
        deps.repo
            .insert_or_update_order(&Order {
                order_id: order_id.clone(),
                customer_id: request.customer_id.clone(),
                merchant_id: request.merchant_id.clone(),
                status: OrderStatus::Pending,
                total_amount,
                payment_id: None,
                shipment_id: None,
                tracking_number: None,
                payment_promise_id: None,
                created_at: now,
                updated_at: now,
            })
            .await?;
        deps.repo.upsert_order_items(&order_id, &request.merchant_id, &lines).await?;
    }

    let payment_id = format!("pay-{order_id}");
    let outcome = deps
        .payment
        .process_payment(&payment_id, &order_id, request.payment_method.unwrap_or(PaymentMethod::Unknown), total_amount)
        .await?;

    deps.repo.update_order_payment(&order_id, &payment_id).await?;

    let awakeable_id = ctx.create_awakeable().await?;
    deps.repo.update_order_payment_promise(&order_id, Some(&awakeable_id)).await?;

    Ok(CheckoutOutput {
        order_id,
        payment_id,
        invoice_url: outcome.invoice_url,
        status: "pending".to_string(),
    })
}
