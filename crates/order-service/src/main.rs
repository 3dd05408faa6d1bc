// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! order-service - the order-processing backend binary.
//!
//! Wires the durable execution substrate (`order-core`), the relational
//! domain (`order-domain`), the keyed actors (`order-actors`), the Order
//! Workflow (`order-workflow`), the Kafka event bus (`order-events`), and
//! payment webhook intake (`order-webhook`) into one running process:
//!
//! - `POST /webhooks/payment` accepts the provider's callback and enqueues
//!   an event on `payments.v1`.
//! - A background consumer drains `payments.v1`, marks the payment,
//!   resolves the suspended order's durable promise, and drives the
//!   workflow forward.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};

use order_actors::{CartActor, MerchantInventoryActor, MockProvider, OrderManagementActor, PaymentActor, ShippingActor};
use order_core::config::Config;
use order_core::{KeyedExecutor, Persistence, PostgresPersistence};
use order_domain::{PostgresRepository, Repository};
use order_events::{EventBusConfig, EventConsumer, EventProducer};
use order_webhook::WebhookState;
use order_workflow::{WorkflowConfig, WorkflowDeps};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("order_service=info".parse().unwrap()),
        )
        .init();

    info!("starting order-service");

    let config = Config::from_env().map_err(|e| {
        error!("configuration error: {}", e);
        e
    })?;

    info!(
        max_instances = config.max_concurrent_instances,
        brokers = %config.event_bus_brokers,
        "configuration loaded"
    );

    info!("connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("connecting to postgres")?;

    info!("running substrate migrations...");
    order_core::migrations::run_postgres(&pool)
        .await
        .context("running order-core migrations")?;

    info!("running domain migrations...");
    order_domain::migrations::run_postgres(&pool)
        .await
        .context("running order-domain migrations")?;

    let persistence: Arc<dyn Persistence> = Arc::new(PostgresPersistence::new(pool.clone()));
    let repo: Arc<dyn Repository> = Arc::new(PostgresRepository::new(pool));

    let executor = Arc::new(KeyedExecutor::new());
    let deps = WorkflowDeps {
        persistence: persistence.clone(),
        repo: repo.clone(),
        inventory: Arc::new(MerchantInventoryActor::new(repo.clone(), executor.clone())),
        payment: Arc::new(PaymentActor::new(repo.clone(), Arc::new(MockProvider), executor.clone())),
        shipping: Arc::new(ShippingActor::new(repo.clone(), executor.clone())),
        order_management: Arc::new(OrderManagementActor::new(repo.clone(), executor)),
        cart: CartActor::shared(),
        config: WorkflowConfig {
            delivery_sleep: config.delivery_sleep,
            awakeable_poll_timeout: config.awakeable_poll_timeout,
            payment_retry_failure_rate: config.payment_retry_failure_rate,
        },
    };

    let bus_config = EventBusConfig {
        brokers: config.event_bus_brokers.clone(),
        orders_topic: config.orders_topic.clone(),
        payments_topic: config.payments_topic.clone(),
    };

    let producer = Arc::new(EventProducer::new(&bus_config).context("building kafka producer")?);

    let webhook_state = Arc::new(WebhookState {
        repo: repo.clone(),
        producer,
        payments_topic: bus_config.payments_topic.clone(),
        callback_token: config.payment_provider_callback_token.clone(),
    });

    let consumer_deps = deps.clone();
    let consumer_handle = tokio::spawn(async move {
        let consumer = match EventConsumer::new(&bus_config, "order-service", &[bus_config.payments_topic.as_str()]) {
            Ok(consumer) => consumer,
            Err(e) => {
                error!(error = %e, "failed to build payments consumer");
                return;
            }
        };
        info!("payments consumer running");
        if let Err(e) = consumer
            .run(|envelope| order_webhook::handle_payment_event(&consumer_deps, envelope))
            .await
        {
            error!(error = %e, "payments consumer exited");
        }
    });

    let app = order_webhook::router(webhook_state);
    let addr = std::env::var("ORDER_HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let addr: SocketAddr = addr.parse().context("parsing ORDER_HTTP_ADDR")?;
    let listener = tokio::net::TcpListener::bind(addr).await.context("binding http listener")?;
    info!(%addr, "webhook intake listening");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "http server exited");
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("shutting down...");

    consumer_handle.abort();
    server_handle.abort();

    info!("shutdown complete");
    Ok(())
}
