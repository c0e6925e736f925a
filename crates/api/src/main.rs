//! API server entry point.

use std::sync::Arc;

use api::config::Config;
use api::routes::AppState;
use audit::{AuditLogConsumer, InMemoryAuditStore, PostgresAuditStore};
use domain::{CategoryService, ProductService};
use messaging::{EventPublisher, InMemoryBroker, MessageBus};
use sqlx::postgres::PgPoolOptions;
use store::{
    CategoryRepository, InMemoryCategoryRepository, InMemoryProductRepository,
    PostgresCategoryRepository, PostgresProductRepository, ProductRepository,
};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve(app: axum::Router, config: &Config) {
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

fn build_state<P, C>(products: P, categories: C, publisher: Arc<EventPublisher>) -> Arc<AppState<P, C>>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    Arc::new(AppState {
        category_service: CategoryService::new(categories.clone(), publisher.clone()),
        product_service: ProductService::new(products, categories, publisher),
    })
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Wire the event bus and publisher
    let broker = Arc::new(InMemoryBroker::new());
    let bus: Arc<dyn MessageBus> = broker.clone();
    let publisher = Arc::new(EventPublisher::new());
    publisher.connect(bus.clone()).await;

    // 4. Build state and the audit consumer, PostgreSQL-backed when
    //    DATABASE_URL is set, in-memory otherwise
    match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await
                .expect("failed to connect to database");
            store::run_migrations(&pool)
                .await
                .expect("failed to run migrations");

            let consumer = AuditLogConsumer::new(PostgresAuditStore::new(pool.clone()));
            tokio::spawn(consumer.run(bus));

            let state = build_state(
                PostgresProductRepository::new(pool.clone()),
                PostgresCategoryRepository::new(pool),
                publisher,
            );
            serve(api::create_app(state, metrics_handle), &config).await;
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");

            let consumer = AuditLogConsumer::new(InMemoryAuditStore::new());
            tokio::spawn(consumer.run(bus));

            let state = build_state(
                InMemoryProductRepository::new(),
                InMemoryCategoryRepository::new(),
                publisher,
            );
            serve(api::create_app(state, metrics_handle), &config).await;
        }
    }
}
