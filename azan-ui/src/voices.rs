//! Prebuilt voice catalog
//!
//! The remote API selects a voice by name; this table drives the UI's
//! selection control and validates incoming requests.

use serde::Serialize;

/// A selectable prebuilt voice
#[derive(Debug, Clone, Serialize)]
pub struct Voice {
    /// Voice name as the remote API expects it
    pub id: &'static str,
    /// Human-readable label for the selection control
    pub label: &'static str,
}

/// Voices offered by the UI
pub const VOICES: &[Voice] = &[
    Voice {
        id: "Charon",
        label: "Charon (deep, resonant)",
    },
    Voice {
        id: "Fenrir",
        label: "Fenrir (strong, clear)",
    },
    Voice {
        id: "Kore",
        label: "Kore (warm, steady)",
    },
    Voice {
        id: "Puck",
        label: "Puck (bright, light)",
    },
    Voice {
        id: "Aoede",
        label: "Aoede (melodic)",
    },
];

/// True if `id` names a voice in the catalog
pub fn is_known(id: &str) -> bool {
    VOICES.iter().any(|v| v.id == id)
}
