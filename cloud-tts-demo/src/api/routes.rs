use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers;
use crate::catalog::VoiceCatalog;
#[cfg(feature = "audio-playback")]
use crate::playback::Player;
use crate::synth::SynthesisClient;

pub struct AppState {
    pub catalog: VoiceCatalog,
    pub synth: SynthesisClient,
    /// Held for the duration of a synthesis call.
    pub in_flight: Mutex<()>,
    #[cfg(feature = "audio-playback")]
    pub player: Arc<Player>,
}

impl AppState {
    pub fn new(catalog: VoiceCatalog, synth: SynthesisClient) -> Self {
        Self {
            catalog,
            synth,
            in_flight: Mutex::new(()),
            #[cfg(feature = "audio-playback")]
            player: Arc::new(Player::new()),
        }
    }
}

pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/speak", post(handlers::speak))
        .route("/speak/audio", post(handlers::speak_audio))
        .route("/speak/aloud", post(handlers::speak_aloud))
        .route("/voices", get(handlers::list_voices))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/", ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
