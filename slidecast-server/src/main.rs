use anyhow::Context;
use slidecast_client::{ChatClient, HttpTransport};
use slidecast_render::{ToolchainRenderService, check_toolchain_available};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod db;
pub mod repository;
pub mod service;

use config::Config;
use repository::{InMemoryMaterialStore, MaterialStore, PgMaterialStore};
use service::{GenerationService, LocalArtifactStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading any configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "slidecast_server=debug,slidecast_render=debug,slidecast_client=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Slidecast Server...");

    let config = Config::from_env();
    config.validate().context("Invalid configuration")?;

    let store: Arc<dyn MaterialStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = db::create_pool(database_url)
                .await
                .context("Failed to create database pool")?;
            db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            Arc::new(PgMaterialStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using an in-memory content store");
            let store = match &config.seed_file {
                Some(path) => {
                    let store = InMemoryMaterialStore::from_seed_file(path).with_context(|| {
                        format!("Failed to load materials from {}", path.display())
                    })?;
                    tracing::info!("Loaded {} material(s) from {}", store.len(), path.display());
                    store
                }
                None => InMemoryMaterialStore::new(),
            };
            Arc::new(store)
        }
    };

    let chat = match &config.llm.api_key {
        Some(api_key) => {
            let transport = Arc::new(HttpTransport::new(&config.llm.base_url, api_key.clone()));
            tracing::info!(
                "LLM endpoint: {} (model {})",
                transport.endpoint(),
                config.llm.model
            );
            Some(ChatClient::new(
                transport,
                config.llm.model.clone(),
                config.retry.clone(),
            ))
        }
        None => {
            tracing::warn!("LLM_API_KEY not set, storyboard and code generation are disabled");
            None
        }
    };

    match check_toolchain_available(&config.render.command).await {
        Ok(version) => tracing::info!("Rendering toolchain available: {}", version),
        Err(e) => tracing::warn!("Rendering toolchain is not usable, renders will fail: {}", e),
    }

    std::fs::create_dir_all(&config.storage.artifact_dir).with_context(|| {
        format!(
            "Failed to create artifact directory {}",
            config.storage.artifact_dir.display()
        )
    })?;

    let service = Arc::new(GenerationService::new(
        store,
        chat,
        config.llm.clone(),
        config.render.scene_class.clone(),
        Arc::new(ToolchainRenderService::new(config.render.clone())),
        Arc::new(LocalArtifactStorage::from_config(&config.storage)),
    ));

    // Build router with all API endpoints
    let app = api::create_router(service, &config.storage);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
