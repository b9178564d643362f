use std::path::{Path, PathBuf};

use autotrade_models::event::NegotiationSnapshot;
use tracing::{debug, warn};

use crate::error::StoreError;

/// File-backed negotiation snapshot store.
///
/// Holds exactly one snapshot as JSON text. Every save replaces the whole file:
/// the snapshot is written to a sibling temp file and renamed into place, so a
/// reader never sees a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored snapshot. Returns None if no snapshot has been saved yet.
    pub async fn load(&self) -> Result<Option<NegotiationSnapshot>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let snapshot = serde_json::from_str(&raw)?;
        Ok(Some(snapshot))
    }

    /// Load at start-up. A missing or corrupt file is logged and treated as
    /// "no resumption state".
    pub async fn load_or_empty(&self) -> Option<NegotiationSnapshot> {
        match self.load().await {
            Ok(Some(snapshot)) => {
                debug!(path = %self.path.display(), "Loaded negotiation snapshot");
                Some(snapshot)
            }
            Ok(None) => None,
            Err(StoreError::Json(e)) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Negotiation snapshot is corrupt, starting without it"
                );
                None
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to load negotiation snapshot, starting without it"
                );
                None
            }
        }
    }

    /// Replace the stored snapshot.
    pub async fn save(&self, snapshot: &NegotiationSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string(snapshot)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
