// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! `POST /webhooks/payment` against a real broker: validates the fast-path
//! contract (missing field, bad token, not-actionable status) without
//! touching Kafka, then confirms an accepted `PAID` webhook actually lands
//! on `payments.v1`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::sync::{mpsc, Mutex};
use tower::ServiceExt;

use order_domain::{
    MerchantItem, Order, OrderItem, OrderStatus, OrderWithPayment, Payment, PaymentMethod, PaymentStatus, Repository,
    Result as DomainResult, Shipment, ShipmentStatus, StockLine,
};
use order_events::{EventBusConfig, EventConsumer, EventEnvelope, EventProducer, EventType};
use order_webhook::{router, WebhookState};
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{GenericImage, ImageExt};

#[derive(Default)]
struct FakeRepository {
    orders: Mutex<HashMap<String, Order>>,
    payments: Mutex<HashMap<String, Payment>>,
}

#[async_trait]
impl Repository for FakeRepository {
    async fn insert_or_update_order(&self, order: &Order) -> DomainResult<()> {
        self.orders.lock().await.insert(order.order_id.clone(), order.clone());
        Ok(())
    }
    async fn upsert_order_items(&self, _order_id: &str, _merchant_id: &str, _lines: &[StockLine]) -> DomainResult<Vec<OrderItem>> {
        Ok(Vec::new())
    }
    async fn get_order(&self, order_id: &str) -> DomainResult<Option<Order>> {
        Ok(self.orders.lock().await.get(order_id).cloned())
    }
    async fn get_order_items(&self, _order_id: &str) -> DomainResult<Vec<OrderItem>> {
        Ok(Vec::new())
    }
    async fn update_order_status(&self, _order_id: &str, _status: OrderStatus) -> DomainResult<()> {
        Ok(())
    }
    async fn update_order_payment(&self, _order_id: &str, _payment_id: &str) -> DomainResult<()> {
        Ok(())
    }
    async fn update_order_shipment(&self, _order_id: &str, _shipment_id: &str, _tracking_number: &str) -> DomainResult<()> {
        Ok(())
    }
    async fn update_order_payment_promise(&self, _order_id: &str, _payment_promise_id: Option<&str>) -> DomainResult<()> {
        Ok(())
    }
    async fn insert_or_update_payment(&self, payment: &Payment) -> DomainResult<()> {
        self.payments.lock().await.insert(payment.payment_id.clone(), payment.clone());
        Ok(())
    }
    async fn get_payment(&self, payment_id: &str) -> DomainResult<Option<Payment>> {
        Ok(self.payments.lock().await.get(payment_id).cloned())
    }
    async fn update_payment_status(&self, _payment_id: &str, _status: PaymentStatus) -> DomainResult<()> {
        Ok(())
    }
    async fn update_payment_invoice(&self, _payment_id: &str, _invoice_url: &str, _provider_invoice_id: &str) -> DomainResult<()> {
        Ok(())
    }
    async fn insert_or_update_shipment(&self, _shipment: &Shipment) -> DomainResult<()> {
        Ok(())
    }
    async fn get_shipment(&self, _shipment_id: &str) -> DomainResult<Option<Shipment>> {
        Ok(None)
    }
    async fn update_shipment_status(&self, _shipment_id: &str, _status: ShipmentStatus, _current_location: &str) -> DomainResult<()> {
        Ok(())
    }
    async fn get_merchant_item(&self, _merchant_id: &str, _item_id: &str) -> DomainResult<Option<MerchantItem>> {
        Ok(None)
    }
    async fn list_merchant_items(&self, _merchant_id: &str) -> DomainResult<Vec<MerchantItem>> {
        Ok(Vec::new())
    }
    async fn upsert_merchant_item(&self, _item: &MerchantItem) -> DomainResult<()> {
        Ok(())
    }
    async fn delete_merchant_item(&self, _merchant_id: &str, _item_id: &str) -> DomainResult<()> {
        Ok(())
    }
    async fn update_merchant_item_stock(&self, _merchant_id: &str, _item_id: &str, _delta: i64) -> DomainResult<()> {
        Ok(())
    }
    async fn reserve_stock(&self, _merchant_id: &str, _lines: &[StockLine]) -> DomainResult<()> {
        Ok(())
    }
    async fn restore_stock(&self, _merchant_id: &str, _lines: &[StockLine]) -> DomainResult<()> {
        Ok(())
    }
    async fn get_order_with_payment_by_order_id(&self, order_id: &str) -> DomainResult<Option<OrderWithPayment>> {
        let Some(order) = self.orders.lock().await.get(order_id).cloned() else {
            return Ok(None);
        };
        let payment = match &order.payment_id {
            Some(id) => self.payments.lock().await.get(id).cloned(),
            None => None,
        };
        Ok(Some(OrderWithPayment { order, payment }))
    }
    async fn get_order_with_payment_by_payment_id(&self, payment_id: &str) -> DomainResult<Option<OrderWithPayment>> {
        let Some(payment) = self.payments.lock().await.get(payment_id).cloned() else {
            return Ok(None);
        };
        let order = self.orders.lock().await.get(&payment.order_id).cloned();
        Ok(order.map(|order| OrderWithPayment { order, payment: Some(payment) }))
    }
}

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

async fn build_state(repo: Arc<FakeRepository>, producer: Arc<EventProducer>, topic: &str, token: Option<&str>) -> Arc<WebhookState> {
    Arc::new(WebhookState {
        repo,
        producer,
        payments_topic: topic.to_string(),
        callback_token: token.map(str::to_string),
    })
}

#[tokio::test]
async fn missing_external_id_is_rejected_with_400() {
    let (_container, brokers) = start_broker().await;
    let config = EventBusConfig { brokers, orders_topic: "unused".to_string(), payments_topic: "payments-test".to_string() };
    let producer = Arc::new(EventProducer::new(&config).expect("build producer"));
    let repo = Arc::new(FakeRepository::default());
    let state = build_state(repo, producer, "payments-test", None).await;

    let response = router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks/payment")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "status": "PAID" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_callback_token_is_rejected_with_401() {
    let (_container, brokers) = start_broker().await;
    let config = EventBusConfig { brokers, orders_topic: "unused".to_string(), payments_topic: "payments-test".to_string() };
    let producer = Arc::new(EventProducer::new(&config).expect("build producer"));
    let repo = Arc::new(FakeRepository::default());
    let state = build_state(repo, producer, "payments-test", Some("secret-token")).await;

    let response = router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks/payment")
                .header("content-type", "application/json")
                .header("x-callback-token", "wrong")
                .body(Body::from(json!({ "external_id": "pay-1", "status": "PAID" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_actionable_status_is_acknowledged_without_publishing() {
    let (_container, brokers) = start_broker().await;
    let topic = format!("payments-test-{}", uuid::Uuid::new_v4());
    let config = EventBusConfig { brokers, orders_topic: "unused".to_string(), payments_topic: topic.clone() };
    let producer = Arc::new(EventProducer::new(&config).expect("build producer"));
    let repo = Arc::new(FakeRepository::default());
    let state = build_state(repo, producer, &topic, None).await;

    let response = router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks/payment")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "external_id": "pay-1", "status": "FAILED" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "received");
}

#[tokio::test]
async fn accepted_paid_webhook_publishes_to_payments_topic() {
    let (_container, brokers) = start_broker().await;
    let topic = format!("payments-test-{}", uuid::Uuid::new_v4());
    let group_id = format!("test-group-{}", uuid::Uuid::new_v4());
    let config = EventBusConfig { brokers, orders_topic: "unused".to_string(), payments_topic: topic.clone() };

    let producer = Arc::new(EventProducer::new(&config).expect("build producer"));
    let consumer = EventConsumer::new(&config, &group_id, &[topic.as_str()]).expect("build consumer");

    let repo = Arc::new(FakeRepository::default());
    let now = chrono::Utc::now();
    repo.insert_or_update_order(&Order {
        order_id: "ord-1".to_string(),
        customer_id: "cust-1".to_string(),
        merchant_id: "merchant-1".to_string(),
        status: OrderStatus::Pending,
        total_amount: Decimal::from(42),
        payment_id: Some("pay-1".to_string()),
        shipment_id: None,
        tracking_number: None,
        payment_promise_id: Some("promise-1".to_string()),
        created_at: now,
        updated_at: now,
    })
    .await
    .unwrap();
    repo.insert_or_update_payment(&Payment {
        payment_id: "pay-1".to_string(),
        order_id: "ord-1".to_string(),
        amount: Decimal::from(42),
        payment_method: PaymentMethod::CreditCard,
        status: PaymentStatus::Pending,
        invoice_url: Some("https://pay.example.com/invoice/ord-1".to_string()),
        provider_invoice_id: Some("inv_ord-1".to_string()),
        created_at: now,
        updated_at: now,
    })
    .await
    .unwrap();

    let state = build_state(repo, producer, &topic, None).await;

    let (tx, mut rx) = mpsc::channel(1);
    tokio::spawn(async move {
        consumer
            .run(|envelope: EventEnvelope| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(envelope).await;
                    Ok(())
                }
            })
            .await
            .unwrap();
    });
    tokio::time::sleep(Duration::from_secs(2)).await;

    let response = router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks/payment")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "external_id": "pay-1", "status": "PAID", "id": "inv_ord-1" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let envelope = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("timed out waiting for published event")
        .expect("channel closed");

    assert_eq!(envelope.event_type, EventType::PaymentCompleted);
    assert_eq!(envelope.aggregate_id, "ord-1");
    assert_eq!(envelope.data["paymentId"], "pay-1");
}
