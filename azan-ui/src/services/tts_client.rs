//! Text-to-speech API client
//!
//! Sends generation requests to the remote `generateContent` endpoint and
//! extracts the Base64 PCM payload from the response. HTTP 429 is retried
//! with exponential backoff; every other failure is terminal for the
//! current generation.

use azan_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const USER_AGENT: &str = "azan-voice/0.1.0 (https://github.com/azan-voice/azan-voice)";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Retry behavior for rate-limited requests
///
/// Attempt 1 runs immediately; each 429 response waits `initial_backoff`
/// doubled per retry (1000 ms, 2000 ms, 4000 ms, ...) until `max_attempts`
/// requests have been made, then surfaces `RateLimitExhausted`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Backoff to wait after a rate-limited attempt (1-indexed)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.initial_backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

// ========================================
// Request body (camelCase upstream schema)
// ========================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

fn build_request(text: &str, voice: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![TextPart {
                text: format!("Say: {}", text),
            }],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.to_string(),
                    },
                },
            },
        },
    }
}

// ========================================
// Response body
// ========================================

/// Audio payload extracted from a successful response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<u16>,
    message: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

/// Walk the response structure to the audio part
///
/// Every level is optional in the wire schema; any missing level is a
/// malformed response, as is a payload that is not audio.
fn extract_audio_payload(response: GenerateContentResponse) -> Result<InlineData> {
    if let Some(err) = response.error {
        return Err(Error::Api {
            status: err.code.unwrap_or(0),
            message: err.message.unwrap_or_else(|| "unspecified error".to_string()),
        });
    }

    let parts = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .ok_or_else(|| Error::MalformedResponse("No candidate content parts".to_string()))?;

    let inline = parts
        .into_iter()
        .find_map(|part| part.inline_data)
        .ok_or_else(|| Error::MalformedResponse("No inline audio data in response".to_string()))?;

    if !inline.mime_type.starts_with("audio/") {
        return Err(Error::MalformedResponse(format!(
            "Expected audio payload, got mime type: {}",
            inline.mime_type
        )));
    }

    Ok(inline)
}

// ========================================
// Client
// ========================================

/// Text-to-speech API client
pub struct TtsClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    retry_policy: RetryPolicy,
}

impl TtsClient {
    pub fn new(endpoint: String, api_key: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            api_key,
            retry_policy: RetryPolicy::default(),
        })
    }

    /// Override the retry policy (tests use a fast schedule)
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Generate speech for `text` in `voice`
    ///
    /// Returns the raw audio payload (Base64 PCM + mime type). Retries
    /// rate-limited attempts per the retry policy; all other errors are
    /// returned as-is from the first failing attempt.
    pub async fn synthesize(&self, text: &str, voice: &str) -> Result<InlineData> {
        let request = build_request(text, voice);
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            tracing::debug!(attempt, voice, "Sending TTS request");

            match self.send_once(&request).await {
                Ok(inline) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "TTS request succeeded after retry");
                    }
                    return Ok(inline);
                }
                Err(err) if err.is_rate_limit() => {
                    if attempt >= self.retry_policy.max_attempts {
                        tracing::error!(
                            attempt,
                            "TTS request rate limited, retries exhausted"
                        );
                        return Err(Error::RateLimitExhausted { attempts: attempt });
                    }

                    let backoff = self.retry_policy.backoff_for(attempt);
                    tracing::warn!(
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        "TTS request rate limited, will retry after backoff"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once(&self, request: &GenerateContentRequest) -> Result<InlineData> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(Error::Api {
                status: 429,
                message: "Rate limited".to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        extract_audio_payload(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_service_contract() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.backoff_for(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(2000));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(4000));
        assert_eq!(policy.backoff_for(4), Duration::from_millis(8000));
    }

    #[test]
    fn request_body_wraps_text_and_voice() {
        let request = build_request("Allahu Akbar", "Charon");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "Say: Allahu Akbar"
        );
        assert_eq!(json["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            json["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Charon"
        );
    }

    fn audio_response(mime_type: &str, data: &str) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(CandidateContent {
                    parts: Some(vec![ResponsePart {
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data: data.to_string(),
                        }),
                    }]),
                }),
            }]),
            error: None,
        }
    }

    #[test]
    fn extracts_audio_payload() {
        let inline =
            extract_audio_payload(audio_response("audio/L16;rate=24000", "AAAA")).unwrap();
        assert_eq!(inline.mime_type, "audio/L16;rate=24000");
        assert_eq!(inline.data, "AAAA");
    }

    #[test]
    fn missing_candidates_is_malformed() {
        let response = GenerateContentResponse {
            candidates: None,
            error: None,
        };
        let result = extract_audio_payload(response);
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn missing_inline_data_is_malformed() {
        let response = GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(CandidateContent {
                    parts: Some(vec![ResponsePart { inline_data: None }]),
                }),
            }]),
            error: None,
        };
        let result = extract_audio_payload(response);
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn non_audio_mime_is_malformed() {
        let result = extract_audio_payload(audio_response("text/plain", "AAAA"));
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn error_body_surfaces_as_api_error() {
        let response = GenerateContentResponse {
            candidates: None,
            error: Some(ApiErrorBody {
                code: Some(403),
                message: Some("API key invalid".to_string()),
            }),
        };
        match extract_audio_payload(response) {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key invalid");
            }
            other => panic!("expected Api error, got {:?}", other.map(|i| i.mime_type)),
        }
    }

    #[test]
    fn wire_response_deserializes_from_camel_case() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": {
                            "mimeType": "audio/L16;rate=24000",
                            "data": "QQ=="
                        }
                    }]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let inline = extract_audio_payload(response).unwrap();
        assert_eq!(inline.mime_type, "audio/L16;rate=24000");
        assert_eq!(inline.data, "QQ==");
    }
}
