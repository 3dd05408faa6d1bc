// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Publish/consume integration test against a real broker.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use order_events::{EventBusConfig, EventConsumer, EventEnvelope, EventProducer, EventType};
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{GenericImage, ImageExt};
use tokio::sync::mpsc;

async fn start_broker() -> (testcontainers::ContainerAsync<GenericImage>, String) {
    let image = GenericImage::new("redpandadata/redpanda", "v24.1.1")
        .with_wait_for(WaitFor::message_on_stderr("Successfully started Redpanda"))
        .with_exposed_port(ContainerPort::Tcp(9092))
        .with_cmd([
            "redpanda",
            "start",
            "--mode",
            "dev-container",
            "--smp",
            "1",
            "--memory",
            "512M",
            "--overprovisioned",
            "--kafka-addr",
            "0.0.0.0:9092",
        ]);
    let container = image.start().await.expect("start redpanda");
    let port = container.get_host_port_ipv4(9092).await.expect("port");
    (container, format!("localhost:{port}"))
}

#[tokio::test]
async fn publish_is_observed_by_a_subscribed_consumer() {
    let (_container, brokers) = start_broker().await;
    let topic = format!("orders-test-{}", uuid::Uuid::new_v4());
    let group_id = format!("test-group-{}", uuid::Uuid::new_v4());

    let config = EventBusConfig {
        brokers,
        orders_topic: topic.clone(),
        payments_topic: "unused".to_string(),
    };

    let producer = EventProducer::new(&config).expect("build producer");
    let consumer = EventConsumer::new(&config, &group_id, &[topic.as_str()]).expect("build consumer");

    let received = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = mpsc::channel(1);
    let received_clone = received.clone();
    tokio::spawn(async move {
        consumer
            .run(|envelope: EventEnvelope| {
                let received = received_clone.clone();
                let tx = tx.clone();
                async move {
                    received.fetch_add(1, Ordering::SeqCst);
                    let _ = tx.send(envelope).await;
                    Ok(())
                }
            })
            .await
            .unwrap();
    });

    tokio::time::sleep(Duration::from_secs(2)).await;

    let envelope = EventEnvelope::new(
        EventType::OrderCreated,
        "order-1",
        serde_json::json!({ "total_amount": "42.00" }),
    );
    producer.publish(&topic, &envelope).await.expect("publish");

    let envelope = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("timed out waiting for message")
        .expect("channel closed");

    assert_eq!(envelope.aggregate_id, "order-1");
    assert_eq!(received.load(Ordering::SeqCst), 1);
}
