//! azan-ui library - web front end for azan voice generation
//!
//! Serves the browser UI, orchestrates text-to-speech generation against the
//! remote API, and exposes the resulting WAV artifact for playback and
//! download.

use axum::Router;
use std::sync::Arc;

pub mod api;
pub mod artifact;
pub mod audio;
pub mod services;
pub mod voices;

use artifact::ArtifactStore;
use services::tts_client::TtsClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Client for the remote text-to-speech API
    pub tts: Arc<TtsClient>,
    /// Holds the single live audio artifact
    pub artifacts: Arc<ArtifactStore>,
    /// Voice used when a request does not select one
    pub default_voice: String,
}

impl AppState {
    /// Create new application state
    pub fn new(tts: TtsClient, default_voice: String) -> Self {
        Self {
            tts: Arc::new(tts),
            artifacts: Arc::new(ArtifactStore::new()),
            default_voice,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/generate", post(api::generate))
        .route("/api/voices", get(api::list_voices))
        .route("/api/audio/:id", get(api::get_audio))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
