//! Audio payload handling
//!
//! The remote API returns header-less linear PCM, Base64-encoded, with the
//! sample rate carried in the part's mime type. This module decodes that
//! payload and repackages it as a self-describing WAV byte stream.

pub mod pcm;
pub mod wav;
