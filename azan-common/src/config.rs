//! Configuration loading and resolution
//!
//! Every setting resolves through the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default listen port for the azan-ui service
pub const DEFAULT_PORT: u16 = 5732;

/// Default TTS endpoint (Gemini generateContent, TTS-capable model)
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-tts:generateContent";

/// Default prebuilt voice when the UI does not select one
pub const DEFAULT_VOICE: &str = "Charon";

/// Environment variable names
pub const ENV_API_KEY: &str = "AZAN_API_KEY";
pub const ENV_ENDPOINT: &str = "AZAN_ENDPOINT";
pub const ENV_PORT: &str = "AZAN_PORT";
pub const ENV_VOICE: &str = "AZAN_VOICE";

/// Raw TOML config file schema
///
/// Every field is optional; missing fields fall through to environment
/// variables and compiled defaults. A missing config file is not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub default_voice: Option<String>,
    pub port: Option<u16>,
}

/// Fully-resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_key: String,
    pub endpoint: String,
    pub default_voice: String,
    pub port: u16,
}

/// Command-line overrides passed down from the binary's clap parser
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub port: Option<u16>,
    pub config_file: Option<PathBuf>,
}

/// Load the TOML config file
///
/// Order: explicit path (error if unreadable), then the per-user path
/// (`~/.config/azan-voice/config.toml`), then `/etc/azan-voice/config.toml`.
/// A file that does not exist yields defaults; a file that exists but does
/// not parse is a hard `Config` error.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => {
                let system = PathBuf::from("/etc/azan-voice/config.toml");
                if system.exists() {
                    system
                } else {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(TomlConfig::default());
                }
            }
        },
    };

    let content = std::fs::read_to_string(&path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    tracing::info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Per-user config file path (`~/.config/azan-voice/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("azan-voice").join("config.toml"))
}

/// Resolve the full service configuration
///
/// The API key is the only setting without a compiled default; resolution
/// fails with a `Config` error when no source provides one.
pub fn resolve(cli: &CliOverrides) -> Result<ServiceConfig> {
    let toml_config = load_toml_config(cli.config_file.as_deref())?;

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var(ENV_API_KEY).ok())
        .or_else(|| toml_config.api_key.clone())
        .ok_or_else(|| {
            Error::Config(format!(
                "No API key configured (set {} or api_key in config.toml)",
                ENV_API_KEY
            ))
        })?;

    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| std::env::var(ENV_ENDPOINT).ok())
        .or_else(|| toml_config.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let port = cli
        .port
        .or_else(|| {
            std::env::var(ENV_PORT)
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
        })
        .or(toml_config.port)
        .unwrap_or(DEFAULT_PORT);

    let default_voice = std::env::var(ENV_VOICE)
        .ok()
        .or_else(|| toml_config.default_voice.clone())
        .unwrap_or_else(|| DEFAULT_VOICE.to_string());

    Ok(ServiceConfig {
        api_key,
        endpoint,
        default_voice,
        port,
    })
}
