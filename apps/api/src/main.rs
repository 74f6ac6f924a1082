mod config;
mod errors;
mod llm_client;
mod models;
mod notifications;
mod recruiting;
mod routes;
mod screening;
mod state;
mod storage;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::notifications::{InMemoryNotificationRegistry, NotificationDispatcher, SendGridTransport};
use crate::routes::build_router;
use crate::screening::{LlmFitScorer, ScreeningPipeline};
use crate::state::AppState;
use crate::storage::{InMemoryStorage, PgStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HireFlow API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage
    let storage: Arc<dyn Storage> = match &config.database_url {
        Some(url) => Arc::new(
            PgStorage::connect(url)
                .await
                .context("failed to connect to PostgreSQL")?,
        ),
        None => {
            warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
            Arc::new(InMemoryStorage::new())
        }
    };

    // Initialize AI judge
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let scorer = Arc::new(
        LlmFitScorer::new(Arc::new(llm)).with_attempt_timeout(config.scoring_attempt_timeout),
    );

    // Initialize notifications
    let transport = SendGridTransport::new(config.sendgrid_api_key.clone())?;
    if config.sendgrid_api_key.is_none() {
        warn!("SENDGRID_API_KEY not set, candidate emails will not be delivered");
    }
    let dispatcher = NotificationDispatcher::new(Arc::new(transport), config.mail_from.clone());
    let registry = Arc::new(InMemoryNotificationRegistry::new());

    // Build app state
    let pipeline = ScreeningPipeline::new(storage.clone(), scorer, dispatcher.clone(), registry);
    let state = AppState {
        storage,
        dispatcher,
        pipeline,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins once the dashboard host is fixed
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
