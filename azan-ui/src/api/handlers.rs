//! Voice generation API
//!
//! `POST /api/generate` runs the full pipeline: validate input, call the
//! TTS service (retries happen inside the client), decode the Base64 PCM
//! payload, repackage it as WAV, and install it as the live artifact.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use azan_common::Error;

use crate::audio::{pcm, wav};
use crate::voices;
use crate::AppState;

/// Suggested filename for the download action
const DOWNLOAD_FILENAME: &str = "azan-voice.wav";

/// Generation request from the browser
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    /// Voice id from the catalog; server default when absent
    pub voice: Option<String>,
}

/// Generation response
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// URL of the live WAV artifact (valid until the next generation)
    pub audio_url: String,
    pub sample_rate: u32,
    pub duration_secs: f64,
}

/// Errors surfaced by the generation endpoint
#[derive(Debug)]
pub enum GenerateError {
    UnknownVoice(String),
    Generation(Error),
}

impl From<Error> for GenerateError {
    fn from(err: Error) -> Self {
        GenerateError::Generation(err)
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            GenerateError::UnknownVoice(voice) => {
                (StatusCode::BAD_REQUEST, format!("Unknown voice: {}", voice))
            }
            GenerateError::Generation(err) => (status_for(&err), err.to_string()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Map generation errors to HTTP statuses
fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::EmptyInput => StatusCode::BAD_REQUEST,
        Error::RateLimitExhausted { .. } => StatusCode::TOO_MANY_REQUESTS,
        Error::Network(_) | Error::Api { .. } | Error::MalformedResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, GenerateError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(Error::EmptyInput.into());
    }

    let voice = request
        .voice
        .unwrap_or_else(|| state.default_voice.clone());
    if !voices::is_known(&voice) {
        return Err(GenerateError::UnknownVoice(voice));
    }

    tracing::info!(chars = text.len(), voice = %voice, "Generating voice audio");

    let payload = state.tts.synthesize(text, &voice).await?;

    let sample_rate = pcm::parse_sample_rate(&payload.mime_type)?;
    let raw = pcm::decode_base64(&payload.data)?;
    let samples = pcm::bytes_to_samples(&raw)?;
    let wav_bytes = wav::encode(&samples, sample_rate)?;

    let duration_secs = samples.len() as f64 / sample_rate as f64;
    let id = state.artifacts.store(wav_bytes, sample_rate).await;

    tracing::info!(
        artifact_id = %id,
        sample_rate,
        samples = samples.len(),
        duration_secs,
        "Voice audio ready"
    );

    Ok(Json(GenerateResponse {
        audio_url: format!("/api/audio/{}", id),
        sample_rate,
        duration_secs,
    }))
}

/// GET /api/audio/:id
///
/// Serves the live WAV artifact. Ids from earlier generations stop
/// resolving once a new artifact is stored.
pub async fn get_audio(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.artifacts.get(id).await {
        Some(wav_bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "audio/wav".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
                ),
            ],
            wav_bytes,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No such audio artifact" })),
        )
            .into_response(),
    }
}

/// GET /api/voices
pub async fn list_voices() -> Json<Vec<voices::Voice>> {
    Json(voices::VOICES.to_vec())
}
