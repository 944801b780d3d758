//! Retry behavior tests for the TTS client
//!
//! Drives the client against a local fake upstream to verify:
//! - 429 responses are retried with exponential backoff until success
//! - Retries stop after the attempt cap with `RateLimitExhausted`
//! - Non-429 failures are terminal on the first attempt
//!
//! Tests inject a millisecond-scale backoff so they stay fast; the
//! production 1000 ms doubling schedule itself is covered by the
//! `RetryPolicy` unit tests.

use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use azan_common::Error;
use azan_ui::services::tts_client::{RetryPolicy, TtsClient};

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        initial_backoff: Duration::from_millis(25),
    }
}

/// Upstream that answers 429 for the first `fail_count` requests, then a
/// valid audio response. Returns the router and the request counter.
fn rate_limited_upstream(fail_count: u32) -> (Router, Arc<AtomicU32>) {
    let counter = Arc::new(AtomicU32::new(0));
    let seen = counter.clone();

    let app = Router::new().route(
        "/tts",
        post(move || {
            let seen = seen.clone();
            async move {
                let n = seen.fetch_add(1, Ordering::SeqCst);
                if n < fail_count {
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        Json(json!({ "error": { "code": 429, "message": "quota exceeded" } })),
                    )
                        .into_response()
                } else {
                    Json(json!({
                        "candidates": [{
                            "content": {
                                "parts": [{
                                    "inlineData": {
                                        "mimeType": "audio/L16;rate=24000",
                                        "data": general_purpose::STANDARD
                                            .encode([0u8, 0, 1, 0])
                                    }
                                }]
                            }
                        }]
                    }))
                    .into_response()
                }
            }
        }),
    );

    (app, counter)
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/tts", addr)
}

fn client(endpoint: String) -> TtsClient {
    TtsClient::new(endpoint, "test-key".to_string())
        .unwrap()
        .with_retry_policy(fast_policy())
}

#[tokio::test]
async fn three_rate_limits_then_success_retries_with_backoff() {
    let (upstream, counter) = rate_limited_upstream(3);
    let endpoint = spawn(upstream).await;

    let start = Instant::now();
    let inline = client(endpoint).synthesize("test", "Charon").await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(inline.mime_type, "audio/L16;rate=24000");
    // 3 rate-limited attempts + 1 success
    assert_eq!(counter.load(Ordering::SeqCst), 4);
    // Three doubled waits: 25 + 50 + 100 ms
    assert!(
        elapsed >= Duration::from_millis(175),
        "retries returned too fast: {:?}",
        elapsed
    );
    assert!(elapsed < Duration::from_secs(3), "retries too slow: {:?}", elapsed);
}

#[tokio::test]
async fn persistent_rate_limit_exhausts_after_five_attempts() {
    let (upstream, counter) = rate_limited_upstream(u32::MAX);
    let endpoint = spawn(upstream).await;

    let result = client(endpoint).synthesize("test", "Charon").await;

    match result {
        Err(Error::RateLimitExhausted { attempts }) => assert_eq!(attempts, 5),
        other => panic!("expected RateLimitExhausted, got {:?}", other.is_ok()),
    }
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn non_rate_limit_error_is_not_retried() {
    let counter = Arc::new(AtomicU32::new(0));
    let seen = counter.clone();
    let upstream = Router::new().route(
        "/tts",
        post(move || {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": { "code": 500, "message": "backend exploded" } })),
                )
            }
        }),
    );
    let endpoint = spawn(upstream).await;

    let result = client(endpoint).synthesize("test", "Charon").await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "backend exploded");
        }
        other => panic!("expected Api error, got {:?}", other.is_ok()),
    }
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn connection_failure_surfaces_as_network_error() {
    // Bind then drop to get a port that refuses connections
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = client(format!("http://{}/tts", addr))
        .synthesize("test", "Charon")
        .await;

    assert!(matches!(result, Err(Error::Network(_))));
}

#[tokio::test]
async fn success_on_first_attempt_makes_single_request() {
    let (upstream, counter) = rate_limited_upstream(0);
    let endpoint = spawn(upstream).await;

    let start = Instant::now();
    client(endpoint).synthesize("test", "Charon").await.unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    // No backoff waits on the success path
    assert!(start.elapsed() < Duration::from_millis(500));
}
