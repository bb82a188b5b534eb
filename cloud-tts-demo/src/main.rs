use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod catalog;
mod config;
mod error;
mod form;
#[cfg(feature = "audio-playback")]
mod playback;
mod synth;

use api::routes::{create_router, AppState};
use catalog::{build_catalog, google_voices};
use config::Config;
use error::AppError;
use synth::SynthesisClient;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let addr = config.addr()?;

    tracing::info!("Cloud TTS demo v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Static directory: {}", config.static_dir.display());

    let catalog = build_catalog(google_voices());
    tracing::info!(
        "Loaded {} voices in {} kinds",
        catalog.voices().len(),
        catalog.kinds().len()
    );

    let synth = SynthesisClient::new(config.endpoint.clone());
    tracing::info!("Synthesis endpoint: {}", synth.endpoint());
    let state = Arc::new(AppState::new(catalog, synth));
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
