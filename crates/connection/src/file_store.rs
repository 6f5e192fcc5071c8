//! [`SelectionFileStore`]: one JSON document per workspace context.

use std::path::{Path, PathBuf};

use awsctx_core::config::StorageConfig;
use awsctx_core::slugify;
use tracing::{debug, info};

use crate::codec::PersistedSelection;
use crate::error::ConnectionError;

const STATE_FILE: &str = "connection.json";

pub struct SelectionFileStore {
    path: PathBuf,
}

impl SelectionFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{data_dir}/workspaces/{slug(workspace)}/connection.json`
    pub fn for_workspace(storage: &StorageConfig, workspace: &str) -> Self {
        Self::new(storage.workspace_dir(&slugify(workspace)).join(STATE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nothing was saved yet.
    pub fn load(&self) -> Result<Option<PersistedSelection>, ConnectionError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No saved connection state");
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)?;
        let doc = PersistedSelection::from_json(&data)?;
        debug!(path = %self.path.display(), "Loaded connection state");
        Ok(Some(doc))
    }

    pub fn save(&self, doc: &PersistedSelection) -> Result<(), ConnectionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, doc.to_json()?)?;
        info!(path = %self.path.display(), "Saved connection state");
        Ok(())
    }
}
