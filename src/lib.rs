use anyhow::Result;
use dotenvy::dotenv;

pub mod ai;
pub mod api;
mod config;
pub mod error;
pub mod pipeline;
mod system_info;
pub mod taxonomy;
pub mod types;

pub mod tests {
    pub mod util;
}

pub use api::router as api_router;
pub use config::Config;
pub use error::{PipelineError, Stage};
pub use pipeline::{generate_listing, Orchestrator, PipelineSettings};
pub use system_info::get_system_info;
pub use types::{CatalogCopy, IdentificationRecord, ListingResult, RequestInput, SeoMetadata};

// ──────────────────────────────────────────────────────────────
// Main application setup
// ──────────────────────────────────────────────────────────────

pub async fn run() -> Result<()> {
    // Load .env file if it exists (for local development)
    dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting listing copy service...");

    let config = Config::from_env();
    let orchestrator = Orchestrator::from_config(config.ai.as_ref())?;
    if let Some(ai) = &config.ai {
        tracing::info!(
            vision_model = %ai.vision_model,
            copy_model = %ai.copy_model,
            timeout_secs = ai.timeout_secs,
            "OpenAI client configured"
        );
    }

    let app = api_router(orchestrator);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Listening for requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "Failed to listen for ctrl-c");
            }
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
