//! # Azan Voice Common Library
//!
//! Shared code for the azan-voice service:
//! - Service-wide error types
//! - Configuration loading and resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
