// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

use std::time::Duration;

/// Service-wide configuration: the durable execution substrate's own
/// settings, plus the event bus, payment provider, and workflow tunables
/// `order-service` needs to wire everything together. Bundled in one place
/// the way `runtara-core::config::Config` bundles its own bin's QUIC/admin
/// addresses alongside the database url.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum concurrent workflow instances (advisory; enforced by the
    /// caller's semaphore, not by this crate).
    pub max_concurrent_instances: u32,
    /// How long an `await_awakeable` poll loop waits for resolution before
    /// giving up and re-suspending the instance.
    pub awakeable_poll_timeout: Duration,
    /// Comma-separated Kafka bootstrap servers.
    pub event_bus_brokers: String,
    /// Topic carrying order lifecycle events.
    pub orders_topic: String,
    /// Topic carrying payment outcome events.
    pub payments_topic: String,
    /// Expected `x-callback-token` header value on inbound payment
    /// webhooks. Empty/unset means no token is required.
    pub payment_provider_callback_token: Option<String>,
    /// How long a `SHIPPED` order durably sleeps before becoming `DELIVERED`.
    pub delivery_sleep: Duration,
    /// Probability (0.0..=1.0) that the legacy demo payment path's
    /// simulated draw fails.
    pub payment_retry_failure_rate: f64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `ORDER_DATABASE_URL`: PostgreSQL connection string
    /// - `ORDER_EVENT_BUS_BROKERS`: Kafka bootstrap servers
    ///
    /// Optional (with defaults):
    /// - `ORDER_MAX_CONCURRENT_INSTANCES`: Max concurrent instances (default: 32)
    /// - `ORDER_AWAKEABLE_POLL_TIMEOUT_MS`: awakeable poll timeout (default: 5000)
    /// - `ORDER_ORDERS_TOPIC`: orders event topic (default: `orders.v1`)
    /// - `ORDER_PAYMENTS_TOPIC`: payments event topic (default: `payments.v1`)
    /// - `ORDER_PAYMENT_CALLBACK_TOKEN`: webhook callback token (default: none)
    /// - `ORDER_DELIVERY_SLEEP_SECS`: simulated transit time (default: 10)
    /// - `ORDER_PAYMENT_RETRY_FAILURE_RATE`: simulated decline rate (default: 0.0)
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("ORDER_DATABASE_URL")
            .map_err(|_| ConfigError::Missing("ORDER_DATABASE_URL"))?;

        let event_bus_brokers = std::env::var("ORDER_EVENT_BUS_BROKERS")
            .map_err(|_| ConfigError::Missing("ORDER_EVENT_BUS_BROKERS"))?;

        let max_concurrent_instances: u32 = std::env::var("ORDER_MAX_CONCURRENT_INSTANCES")
            .unwrap_or_else(|_| "32".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid(
                    "ORDER_MAX_CONCURRENT_INSTANCES",
                    "must be a positive integer",
                )
            })?;

        let awakeable_poll_timeout_ms: u64 = std::env::var("ORDER_AWAKEABLE_POLL_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid(
                    "ORDER_AWAKEABLE_POLL_TIMEOUT_MS",
                    "must be a positive integer",
                )
            })?;

        let orders_topic =
            std::env::var("ORDER_ORDERS_TOPIC").unwrap_or_else(|_| "orders.v1".to_string());
        let payments_topic =
            std::env::var("ORDER_PAYMENTS_TOPIC").unwrap_or_else(|_| "payments.v1".to_string());

        let payment_provider_callback_token = std::env::var("ORDER_PAYMENT_CALLBACK_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        let delivery_sleep_secs: u64 = std::env::var("ORDER_DELIVERY_SLEEP_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("ORDER_DELIVERY_SLEEP_SECS", "must be a positive integer")
            })?;

        let payment_retry_failure_rate: f64 = std::env::var("ORDER_PAYMENT_RETRY_FAILURE_RATE")
            .unwrap_or_else(|_| "0.0".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("ORDER_PAYMENT_RETRY_FAILURE_RATE", "must be a number between 0.0 and 1.0")
            })?;

        Ok(Self {
            database_url,
            max_concurrent_instances,
            awakeable_poll_timeout: Duration::from_millis(awakeable_poll_timeout_ms),
            event_bus_brokers,
            orders_topic,
            payments_topic,
            payment_provider_callback_token,
            delivery_sleep: Duration::from_secs(delivery_sleep_secs),
            payment_retry_failure_rate,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
