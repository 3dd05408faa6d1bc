// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! `CreateOrder`: the legacy demo variant of [`crate::checkout`].
//!
//! Exercises the same order state machine without a real external payment
//! provider: a durable sleep stands in for the provider's processing time,
//! and the payment's success or failure is drawn from a configured failure
//! rate rather than waiting on a webhook. Useful for demos and load tests
//! that shouldn't depend on an external network call.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;

use order_domain::{repository::compute_total, Order, OrderStatus, PaymentMethod, PaymentStatus, StockLine};
use order_sdk::WorkflowContext;

use crate::checkout::{CheckoutOutput, CheckoutRequest};
use crate::deps::WorkflowDeps;
use crate::error::Result;

const PAYMENT_PROCESSING_SLEEP: Duration = Duration::from_secs(2);

/// Same state machine as [`crate::checkout`], with the payment provider
/// replaced by a simulated draw against `payment_retry_failure_rate`.
#[instrument(skip(deps, request), fields(customer_id = %request.customer_id, merchant_id = %request.merchant_id))]
pub async fn create_order(deps: &WorkflowDeps, request: CheckoutRequest) -> Result<CheckoutOutput> {
    crate::checkout::validate_request(&request)?;

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

    let payment_id = format!("pay-{order_id}");
    let outcome = deps
        .payment
        .process_payment(&payment_id, &order_id, request.payment_method.unwrap_or(PaymentMethod::Unknown), total_amount)
        .await?;
    deps.repo.update_order_payment(&order_id, &payment_id).await?;

    ctx.sleep("simulated-payment-processing", PAYMENT_PROCESSING_SLEEP).await?;

    let failure_rate = deps.config.payment_retry_failure_rate.clamp(0.0, 1.0);
    let failed = ctx
        .run_step("payment-outcome-draw", || async { Ok(rand::thread_rng().gen_bool(failure_rate)) })
        .await?;
    if failed {
        deps.repo.update_payment_status(&payment_id, PaymentStatus::Failed).await?;
        deps.repo.restore_stock(&request.merchant_id, &lines).await?;
        deps.repo.update_order_status(&order_id, OrderStatus::Cancelled).await?;
        return Ok(CheckoutOutput {
            order_id,
            payment_id,
            invoice_url: outcome.invoice_url,
            status: "cancelled".to_string(),
        });
    }

    deps.repo.update_payment_status(&payment_id, PaymentStatus::Completed).await?;
    deps.repo.update_order_status(&order_id, OrderStatus::Processing).await?;

    let shipment = deps.shipping.create_shipment(&order_id, "DHL", "standard").await?;
    deps.repo
        .update_order_shipment(&order_id, &shipment.shipment_id, &shipment.tracking_number)
        .await?;
    deps.repo.update_order_status(&order_id, OrderStatus::Shipped).await?;

    ctx.sleep("delivery-sleep", deps.config.delivery_sleep).await?;
    deps.repo.update_order_status(&order_id, OrderStatus::Delivered).await?;
    deps.cart.clear_cart(&request.customer_id).await;

    Ok(CheckoutOutput {
        order_id,
        payment_id,
        invoice_url: outcome.invoice_url,
        status: "delivered".to_string(),
    })
}
