// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Keyed virtual object actors built on top of [`order_domain::Repository`].
//!
//! # Modules
//!
//! - [`provider`]: the external payment provider boundary ([`provider::PaymentProvider`])
//! - [`merchant_inventory`]: catalog and stock management, keyed by `merchant_id`
//!   ([`merchant_inventory::MerchantInventoryActor`])
//! - [`cart`]: in-memory per-customer carts ([`cart::CartActor`])
//! - [`payment`]: invoice issuance and payment lifecycle, keyed by `payment_id`
//!   ([`payment::PaymentActor`])
//! - [`shipping`]: shipment creation and tracking ([`shipping::ShippingActor`])
//! - [`order_management`]: administrative order transitions, keyed by `order_id`
//!   ([`order_management::OrderManagementActor`])
//!
//! Every actor serializes access per key through an [`order_core::KeyedExecutor`]
//! shared across the service, rather than owning its own lock.

#![deny(missing_docs)]

pub mod cart;
pub mod merchant_inventory;
pub mod order_management;
pub mod payment;
pub mod provider;
pub mod shipping;

pub use cart::{Cart, CartActor, CartItem};
pub use merchant_inventory::MerchantInventoryActor;
pub use order_management::OrderManagementActor;
pub use payment::{PaymentActor, ProcessPaymentOutcome};
pub use provider::{FailingProvider, Invoice, MockProvider, PaymentProvider};
pub use shipping::ShippingActor;
