// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Subscribing side of the event bus.

use std::future::Future;

use futures::StreamExt;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message as KafkaMessage;
use tracing::{error, warn};

use crate::config::EventBusConfig;
use crate::error::{BusError, Result};
use crate::event::EventEnvelope;

/// Subscribes to topics and hands decoded [`EventEnvelope`]s to a handler,
/// one at a time, committing the offset only after the handler succeeds.
///
/// This is at-least-once delivery: a crash between a successful handler run
/// and the commit redelivers that message. Handlers (e.g. `MarkPaymentCompleted`)
/// must themselves be idempotent.
pub struct EventConsumer {
    consumer: StreamConsumer,
}

impl EventConsumer {
    /// Create a consumer in `group_id`, subscribed to `topics`.
    pub fn new(config: &EventBusConfig, group_id: &str, topics: &[&str]) -> Result<Self> {
        let consumer: StreamConsumer = config
            .consumer_client_config(group_id)
            .create()
            .map_err(|e| BusError::Connection(e.to_string()))?;
        consumer
            .subscribe(topics)
            .map_err(|e| BusError::Subscribe(e.to_string()))?;
        Ok(Self { consumer })
    }

    /// Run the consume loop until the stream ends (which, for a Kafka
    /// subscription, only happens if the consumer is dropped or the
    /// broker connection is torn down for good).
    ///
    /// `handler` is awaited to completion for each message before the next
    /// one is polled: this crate makes no ordering claims across partitions,
    /// but within one it preserves log order, which is what lets per-order
    /// event sequencing (`OrderCreated` before `PaymentCompleted`) hold.
    pub async fn run<F, Fut>(&self, mut handler: F) -> Result<()>
    where
        F: FnMut(EventEnvelope) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut stream = self.consumer.stream();
        while let Some(message) = stream.next().await {
            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    error!(error = %e, "kafka consumer error");
                    continue;
                }
            };

            let Some(payload) = message.payload() else {
                warn!("received message with no payload");
                let _ = self.consumer.commit_message(&message, CommitMode::Async);
                continue;
            };

            match serde_json::from_slice::<EventEnvelope>(payload) {
                Ok(envelope) => match handler(envelope).await {
                    Ok(()) => {
                        if let Err(e) = self.consumer.commit_message(&message, CommitMode::Sync) {
                            error!(error = %e, "failed to commit offset after successful handling");
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "handler failed, offset not committed, message will be redelivered");
                    }
                },
                Err(e) => {
                    error!(error = %e, "failed to decode event envelope, skipping malformed message");
                    let _ = self.consumer.commit_message(&message, CommitMode::Async);
                }
            }
        }
        Ok(())
    }
}
