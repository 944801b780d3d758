//! Common error types for azan-voice

use thiserror::Error;

/// Common result type for azan-voice operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can terminate a voice generation attempt
///
/// Only rate limiting (HTTP 429) is retried, internally by the TTS client,
/// before surfacing as `RateLimitExhausted`. Every other variant is terminal
/// for the current generation.
#[derive(Error, Debug)]
pub enum Error {
    /// No text provided for generation
    #[error("No text provided")]
    EmptyInput,

    /// Transport-level failure talking to the TTS service
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 429 persisted through every retry attempt
    #[error("Rate limited after {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },

    /// Non-rate-limit error reported by the TTS service
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response did not carry the expected audio payload shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Base64 or PCM payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Sample rate outside the encodable range
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal catch-all
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors the TTS client retries before giving up
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Error::RateLimitExhausted { .. })
            || matches!(self, Error::Api { status: 429, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_classification() {
        assert!(Error::RateLimitExhausted { attempts: 5 }.is_rate_limit());
        assert!(Error::Api {
            status: 429,
            message: "slow down".to_string()
        }
        .is_rate_limit());
        assert!(!Error::Api {
            status: 500,
            message: "boom".to_string()
        }
        .is_rate_limit());
        assert!(!Error::EmptyInput.is_rate_limit());
    }

    #[test]
    fn display_includes_context() {
        let err = Error::Api {
            status: 403,
            message: "key rejected".to_string(),
        };
        assert_eq!(err.to_string(), "API error 403: key rejected");

        let err = Error::RateLimitExhausted { attempts: 5 };
        assert!(err.to_string().contains("5 attempts"));
    }
}
