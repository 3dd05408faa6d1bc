// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Bus connection configuration.

use rdkafka::ClientConfig;

/// Connection settings for the Kafka-backed event bus.
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Comma-separated Kafka bootstrap servers.
    pub brokers: String,
    /// Topic carrying order lifecycle events (`OrderCreated`, ...).
    pub orders_topic: String,
    /// Topic carrying payment outcome events (`PaymentCompleted`, `PaymentExpired`).
    pub payments_topic: String,
}

impl EventBusConfig {
    pub(crate) fn producer_client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config.set("bootstrap.servers", &self.brokers);
        config.set("message.timeout.ms", "5000");
        config.set("acks", "all");
        config.set("enable.idempotence", "true");
        config
    }

    pub(crate) fn consumer_client_config(&self, group_id: &str) -> ClientConfig {
        let mut config = ClientConfig::new();
        config.set("bootstrap.servers", &self.brokers);
        config.set("group.id", group_id);
        config.set("enable.auto.commit", "false");
        config.set("auto.offset.reset", "earliest");
        config
    }
}
