// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Entities that make up the order domain: orders, line items, payments,
//! shipments, and merchant inventory.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an [`Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, stock reserved, payment invoice issued; awaiting payment.
    Pending,
    /// Payment completed; shipment is being arranged.
    Processing,
    /// Shipment created and handed to the carrier.
    Shipped,
    /// Delivery confirmed.
    Delivered,
    /// Cancelled before or during fulfillment; reserved stock restored.
    Cancelled,
    /// Returned by the customer after delivery. Distinct from `Cancelled`:
    /// a return happens after the goods and payment have already changed
    /// hands, so stock is not automatically restored by this transition
    /// alone.
    Returned,
}

impl OrderStatus {
    /// String form used in SQL and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
        }
    }

    /// Parse from the `text` representation stored in the database.
    pub fn from_str(s: &str) -> Self {
        match s {
            "processing" => Self::Processing,
            "shipped" => Self::Shipped,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            "returned" => Self::Returned,
            _ => Self::Pending,
        }
    }

    /// Whether stock reserved for this order should be restored if it is
    /// now cancelled (i.e. the order had not yet shipped).
    pub fn is_pre_shipment(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }
}

/// A customer order against a single merchant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Primary key.
    pub order_id: String,
    /// The customer who placed the order.
    pub customer_id: String,
    /// The merchant fulfilling the order.
    pub merchant_id: String,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Sum of all `OrderItem.subtotal` at the time the order was placed.
    pub total_amount: Decimal,
    /// The payment covering this order, once one has been created.
    pub payment_id: Option<String>,
    /// The shipment fulfilling this order, once one has been created.
    pub shipment_id: Option<String>,
    /// Carrier tracking number, mirrored here for quick lookup once shipped.
    pub tracking_number: Option<String>,
    /// Durable promise id the order workflow is suspended on while waiting
    /// for a payment webhook. `None` once the workflow has resumed past
    /// the suspension point.
    pub payment_promise_id: Option<String>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A single line item within an [`Order`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Owning order.
    pub order_id: String,
    /// Item id, unique within the owning merchant's catalog.
    pub item_id: String,
    /// The merchant this item belongs to (matches `Order::merchant_id`).
    pub merchant_id: String,
    /// Display name, resolved from `MerchantItem` at checkout time.
    pub name: String,
    /// Quantity ordered. Always `>= 1`.
    pub quantity: i64,
    /// Unit price at the time of checkout.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub subtotal: Decimal,
}

/// How a payment is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment.
    CreditCard,
    /// Direct bank transfer.
    BankTransfer,
    /// Wallet-based payment (e.g. mobile wallet).
    DigitalWallet,
    /// Method not specified or not recognized.
    Unknown,
}

impl PaymentMethod {
    /// String form used in SQL and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::BankTransfer => "bank_transfer",
            Self::DigitalWallet => "digital_wallet",
            Self::Unknown => "unknown",
        }
    }

    /// Parse from the `text` representation stored in the database.
    pub fn from_str(s: &str) -> Self {
        match s {
            "credit_card" => Self::CreditCard,
            "bank_transfer" => Self::BankTransfer,
            "digital_wallet" => Self::DigitalWallet,
            _ => Self::Unknown,
        }
    }
}

/// Lifecycle status of a [`Payment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Invoice not yet created with the provider.
    Pending,
    /// Invoice created, awaiting the customer.
    Processing,
    /// Provider confirmed payment.
    Completed,
    /// Provider confirmed the payment failed (e.g. card declined).
    Failed,
    /// The invoice expired before payment was made.
    Expired,
    /// A previously completed payment was refunded.
    Refunded,
}

impl PaymentStatus {
    /// String form used in SQL and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "payment_pending",
            Self::Processing => "payment_processing",
            Self::Completed => "payment_completed",
            Self::Failed => "payment_failed",
            Self::Expired => "payment_expired",
            Self::Refunded => "payment_refunded",
        }
    }

    /// Parse from the `text` representation stored in the database.
    pub fn from_str(s: &str) -> Self {
        match s {
            "payment_processing" => Self::Processing,
            "payment_completed" => Self::Completed,
            "payment_failed" => Self::Failed,
            "payment_expired" => Self::Expired,
            "payment_refunded" => Self::Refunded,
            _ => Self::Pending,
        }
    }
}

/// A payment collected against an [`Order`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Primary key.
    pub payment_id: String,
    /// The order this payment covers.
    pub order_id: String,
    /// Amount to collect.
    pub amount: Decimal,
    /// How the customer is paying.
    pub payment_method: PaymentMethod,
    /// Current lifecycle status.
    pub status: PaymentStatus,
    /// Hosted invoice URL, once the provider has issued one.
    pub invoice_url: Option<String>,
    /// The provider's own invoice id, used to correlate inbound webhooks.
    pub provider_invoice_id: Option<String>,
    /// When the payment record was created.
    pub created_at: DateTime<Utc>,
    /// When the payment record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a [`Shipment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    /// Shipment created, not yet handed to the carrier's transit network.
    Created,
    /// In transit.
    InTransit,
    /// Out for final delivery.
    OutForDelivery,
    /// Delivered.
    Delivered,
}

impl ShipmentStatus {
    /// String form used in SQL and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "shipment_created",
            Self::InTransit => "shipment_in_transit",
            Self::OutForDelivery => "shipment_out_for_delivery",
            Self::Delivered => "shipment_delivered",
        }
    }

    /// Parse from the `text` representation stored in the database.
    pub fn from_str(s: &str) -> Self {
        match s {
            "shipment_in_transit" => Self::InTransit,
            "shipment_out_for_delivery" => Self::OutForDelivery,
            "shipment_delivered" => Self::Delivered,
            _ => Self::Created,
        }
    }
}

/// A shipment fulfilling an [`Order`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    /// Primary key.
    pub shipment_id: String,
    /// The order this shipment fulfills.
    pub order_id: String,
    /// Carrier-assigned tracking number.
    pub tracking_number: String,
    /// Carrier name (e.g. `"DHL"`, `"UPS"`).
    pub carrier: String,
    /// Carrier service tier (e.g. `"standard"`, `"express"`).
    pub service_type: String,
    /// Current lifecycle status.
    pub status: ShipmentStatus,
    /// Last known location, as reported by the carrier.
    pub current_location: String,
    /// Estimated delivery time.
    pub estimated_delivery: DateTime<Utc>,
    /// When the shipment record was created.
    pub created_at: DateTime<Utc>,
    /// When the shipment record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A catalog entry owned by a merchant, tracking available stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantItem {
    /// The merchant that owns this catalog entry.
    pub merchant_id: String,
    /// Item id, unique within the merchant's catalog.
    pub item_id: String,
    /// Display name.
    pub name: String,
    /// Unit price. Always `>= 0`.
    pub price: Decimal,
    /// Quantity currently available to reserve. Never negative.
    pub quantity: i64,
}

/// A single line requested in a stock reservation or restoration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLine {
    /// Item id within the merchant's catalog.
    pub item_id: String,
    /// Quantity to reserve or restore.
    pub quantity: i64,
}
