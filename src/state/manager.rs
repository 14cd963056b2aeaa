//! Watermark persistence
//!
//! The whole state lives in memory behind a lock. File-backed managers
//! rewrite the file on every change by writing a sibling `.tmp` file and
//! renaming it over the original, so a crash mid-write leaves the previous
//! watermarks intact. A change only becomes visible in memory once the write
//! has succeeded.

use super::types::State;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::debug;

/// Shared, optionally file-backed trigger state
///
/// Clones share the same in-memory state.
#[derive(Debug, Clone)]
pub struct StateManager {
    file: Option<PathBuf>,
    state: Arc<RwLock<State>>,
}

impl StateManager {
    /// Manager that never touches the filesystem
    pub fn in_memory() -> Self {
        Self::build(None, State::new())
    }

    /// Manager backed by `path`, seeded from the file when it exists
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = match std::fs::read_to_string(&path) {
            Ok(contents) => parse_state(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => State::new(),
            Err(e) => return Err(Error::state(format!("Failed to read state file: {e}"))),
        };
        Ok(Self::build(Some(path), state))
    }

    fn build(file: Option<PathBuf>, state: State) -> Self {
        Self {
            file,
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Read access to the whole state
    pub async fn state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().await
    }

    /// Stored watermark for a trigger instance
    pub async fn get_watermark(&self, trigger_id: &str) -> Option<String> {
        self.state
            .read()
            .await
            .get_watermark(trigger_id)
            .map(ToString::to_string)
    }

    /// Record a new watermark for a trigger instance
    pub async fn set_watermark(&self, trigger_id: &str, watermark: String) -> Result<()> {
        self.update(|state| state.set_watermark(trigger_id, watermark))
            .await
    }

    /// Forget a trigger instance so its next poll re-baselines
    pub async fn clear_trigger(&self, trigger_id: &str) -> Result<()> {
        self.update(|state| {
            state.remove_trigger(trigger_id);
        })
        .await
    }

    /// Apply `change` to a copy, write it, then publish it
    async fn update(&self, change: impl FnOnce(&mut State)) -> Result<()> {
        let mut state = self.state.write().await;
        let mut staged = state.clone();
        change(&mut staged);

        self.write_file(&staged).await?;
        *state = staged;
        Ok(())
    }

    async fn write_file(&self, state: &State) -> Result<()> {
        let Some(path) = &self.file else {
            return Ok(());
        };

        let contents = serde_json::to_string_pretty(state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))?;
        let staging = path.with_extension("tmp");

        tokio::fs::write(&staging, contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;
        tokio::fs::rename(&staging, path)
            .await
            .map_err(|e| Error::state(format!("Failed to replace state file: {e}")))?;

        debug!("Saved poll state to {}", path.display());
        Ok(())
    }

    /// Backing file, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Whether changes stay in this process
    pub fn is_in_memory(&self) -> bool {
        self.file.is_none()
    }
}

fn parse_state(contents: &str) -> Result<State> {
    if contents.trim().is_empty() {
        return Ok(State::new());
    }
    serde_json::from_str(contents)
        .map_err(|e| Error::state(format!("Failed to parse state file: {e}")))
}
