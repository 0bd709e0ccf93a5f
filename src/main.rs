//! Kantik API server.
//!
//! Loads `KANTIK__*` configuration, picks PostgreSQL or in-memory storage,
//! and serves the HTTP API.

use std::sync::Arc;

use http::HeaderValue;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kantik::adapters::auth::JwtSessionValidator;
use kantik::adapters::clock::SystemClock;
use kantik::adapters::http::{api_router, AppState, AuthState};
use kantik::adapters::memory::{
    InMemoryContentStore, InMemoryPaymentRepository, InMemoryTeamRepository,
    InMemoryUserRepository,
};
use kantik::adapters::notification::{EmailLinks, LoggingNotifier, ResendNotifier};
use kantik::adapters::postgres::{
    PostgresContentRepository, PostgresPaymentRepository, PostgresTeamRepository,
    PostgresUserRepository, MIGRATOR,
};
use kantik::config::{AppConfig, DatabaseConfig, EmailConfig, ServerConfig};
use kantik::domain::entitlement::EntitlementPolicy;
use kantik::ports::PaymentNotifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let policy = config.entitlement.policy();
    let notifier = build_notifier(&config.email);
    let state = match &config.database {
        Some(database) => postgres_state(database, notifier, policy).await?,
        None => {
            tracing::warn!("No database configured, using in-memory storage");
            memory_state(notifier, policy)
        }
    };

    let validator: AuthState = Arc::new(JwtSessionValidator::new(
        &config.auth.jwt_secret,
        config.auth.issuer.as_deref(),
        config.auth.leeway_secs,
    ));

    let app = api_router(state, validator)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        "Kantik API listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

fn build_notifier(email: &EmailConfig) -> Arc<dyn PaymentNotifier> {
    match &email.resend_api_key {
        Some(key) => Arc::new(ResendNotifier::new(
            key.clone(),
            email.from_header(),
            EmailLinks {
                app_base_url: email.app_base_url.clone(),
                support_email: email.support_email.clone(),
            },
        )),
        None => {
            tracing::warn!("No Resend API key configured, payment emails are logged only");
            Arc::new(LoggingNotifier)
        }
    }
}

async fn postgres_state(
    database: &DatabaseConfig,
    notifier: Arc<dyn PaymentNotifier>,
    policy: EntitlementPolicy,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let pool = database.pool_options().connect(&database.url).await?;
    tracing::info!("Connected to PostgreSQL");

    if database.run_migrations {
        MIGRATOR.run(&pool).await?;
        tracing::info!("Migrations applied");
    }

    let teams = Arc::new(PostgresTeamRepository::new(pool.clone()));
    let content = Arc::new(PostgresContentRepository::new(pool.clone()));

    Ok(AppState {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        payments: Arc::new(PostgresPaymentRepository::new(pool)),
        teams: teams.clone(),
        invitations: teams,
        catalog: content.clone(),
        downloads: content,
        notifier,
        clock: Arc::new(SystemClock),
        policy,
    })
}

fn memory_state(notifier: Arc<dyn PaymentNotifier>, policy: EntitlementPolicy) -> AppState {
    let teams = Arc::new(InMemoryTeamRepository::new());
    let content = Arc::new(InMemoryContentStore::new());

    AppState {
        users: Arc::new(InMemoryUserRepository::new()),
        payments: Arc::new(InMemoryPaymentRepository::new()),
        teams: teams.clone(),
        invitations: teams,
        catalog: content.clone(),
        downloads: content,
        notifier,
        clock: Arc::new(SystemClock),
        policy,
    }
}
