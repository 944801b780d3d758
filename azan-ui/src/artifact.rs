//! Single-live-artifact store for generated audio
//!
//! At most one generated WAV is live at a time. Storing a new artifact
//! releases the previous one, so repeated generations cannot accumulate
//! audio buffers. A released artifact's id stops resolving, which is how
//! the browser-facing URL gets revoked.

use tokio::sync::Mutex;
use uuid::Uuid;

/// A generated WAV artifact
#[derive(Debug)]
pub struct AudioArtifact {
    pub id: Uuid,
    pub wav: Vec<u8>,
    pub sample_rate: u32,
}

/// Owner of the single live artifact
#[derive(Debug, Default)]
pub struct ArtifactStore {
    current: Mutex<Option<AudioArtifact>>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new artifact, releasing any previous one
    ///
    /// Returns the fresh artifact id.
    pub async fn store(&self, wav: Vec<u8>, sample_rate: u32) -> Uuid {
        let artifact = AudioArtifact {
            id: Uuid::new_v4(),
            wav,
            sample_rate,
        };
        let id = artifact.id;

        let mut current = self.current.lock().await;
        if let Some(previous) = current.take() {
            tracing::debug!(
                artifact_id = %previous.id,
                bytes = previous.wav.len(),
                "Releasing previous audio artifact"
            );
        }
        *current = Some(artifact);
        id
    }

    /// Fetch the live artifact's WAV bytes, if `id` names it
    pub async fn get(&self, id: Uuid) -> Option<Vec<u8>> {
        self.current
            .lock()
            .await
            .as_ref()
            .filter(|artifact| artifact.id == id)
            .map(|artifact| artifact.wav.clone())
    }

    /// Drop the live artifact, if any
    ///
    /// Returns true when an artifact was released.
    pub async fn release(&self) -> bool {
        self.current.lock().await.take().is_some()
    }
}
