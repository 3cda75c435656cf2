//! Durable state — session and archive serialized to a single JSON file under a
//! fixed namespace, rewritten after each flow step and rehydrated at startup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::interview::models::CandidateRecord;
use crate::interview::session::SessionState;

/// Fixed namespace key; the on-disk file is `<state_dir>/<namespace>.json`.
pub const STATE_NAMESPACE: &str = "apexhire";

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub session: SessionState,
    pub candidates: Vec<CandidateRecord>,
}

pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        StateStore {
            path: state_dir.as_ref().join(format!("{STATE_NAMESPACE}.json")),
        }
    }

    /// Loads the persisted state, `None` when no file exists yet.
    pub async fn load(&self) -> Result<Option<PersistedState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let payload = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read state file {}", self.path.display()))?;
        let state = serde_json::from_str(&payload)
            .with_context(|| format!("Failed to parse state file {}", self.path.display()))?;
        Ok(Some(state))
    }

    pub async fn save(&self, state: &PersistedState) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create state dir {}", dir.display()))?;
        }
        let payload = serde_json::to_vec_pretty(state).context("Failed to serialize state")?;
        fs::write(&self.path, payload)
            .await
            .with_context(|| format!("Failed to write state file {}", self.path.display()))?;
        Ok(())
    }
}
