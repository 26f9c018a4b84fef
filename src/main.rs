//! Service entry point.
//!
//! Wires configuration, PostgreSQL, Redis and Resend into the Axum
//! routers and serves until interrupted.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use confreg::adapters::http::{
    registration_router, revalidation_router, RegistrationAppState, RevalidationAppState,
};
use confreg::adapters::postgres::{
    PostgresActivationTokenRepository, PostgresSubmissionRepository, PostgresTicketRepository,
    PostgresTransactionRepository,
};
use confreg::adapters::{RedisCacheInvalidator, ResendConfig, ResendNotificationSink};
use confreg::config::AppConfig;
use confreg::domain::payment::WebhookVerifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));
    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    config.validate()?;

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("database migrations applied");
    }

    let redis_client = redis::Client::open(config.redis.url.clone())?;
    let redis_conn = redis_client.get_multiplexed_tokio_connection().await?;

    let cache = Arc::new(
        RedisCacheInvalidator::new(redis_conn).with_key_prefix(config.redis.key_prefix.clone()),
    );
    let notifications = Arc::new(ResendNotificationSink::new(ResendConfig::new(
        config.email.resend_api_key.clone(),
        config.email.from_header(),
    ))?);

    let transactions = Arc::new(PostgresTransactionRepository::new(pool.clone()));

    let registration_state = RegistrationAppState {
        tickets: Arc::new(PostgresTicketRepository::new(pool.clone())),
        transactions: transactions.clone(),
        submissions: Arc::new(PostgresSubmissionRepository::new(pool.clone())),
        admissions: transactions,
        activation_tokens: Arc::new(PostgresActivationTokenRepository::new(pool)),
        cache: cache.clone(),
        notifications,
        webhook_verifier: Arc::new(WebhookVerifier::new(config.payment.webhook_secret.clone())),
        activation_ttl_hours: config.activation.ttl_hours,
        activation_base_url: config.activation.base_url.clone(),
    };

    let revalidation_state = RevalidationAppState {
        cache,
        secret: SecretString::new(config.revalidation.secret.clone()),
    };

    let cors = if config.is_production() {
        let origins: Vec<_> = config
            .server
            .cors_origins_list()
            .into_iter()
            .filter_map(|o| o.parse::<http::HeaderValue>().ok())
            .collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    } else {
        CorsLayer::permissive()
    };

    let app = Router::new()
        .nest(
            "/api",
            registration_router().with_state(registration_state),
        )
        .nest(
            "/api",
            revalidation_router().with_state(revalidation_state),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr()?;
    info!(%addr, "starting registration service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown handler");
    }
    info!("shutdown signal received");
}
