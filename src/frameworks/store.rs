// Ledger storage backends: process memory, or a JSON file on disk.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::LedgerStore;
use crate::domain::state::GameState;

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Corrupt(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "ledger file io error: {e}"),
            StoreError::Corrupt(e) => write!(f, "ledger file is not valid json: {e}"),
        }
    }
}

#[derive(Default)]
pub struct InMemoryLedgerStore {
    state: Mutex<Option<GameState>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load(&self) -> Result<Option<GameState>, String> {
        Ok(self.state.lock().await.clone())
    }

    async fn save(&self, state: &GameState) -> Result<(), String> {
        *self.state.lock().await = Some(state.clone());
        Ok(())
    }
}

pub struct FileLedgerStore {
    path: PathBuf,
}

impl FileLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Option<GameState>, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(StoreError::Corrupt)
    }

    // Write a sibling temp file and rename it over the target so readers never
    // see a half-written ledger.
    async fn write(&self, state: &GameState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StoreError::Io)?;
        }

        let json = serde_json::to_vec_pretty(state).map_err(StoreError::Corrupt)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await.map_err(StoreError::Io)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(StoreError::Io)
    }
}

#[async_trait]
impl LedgerStore for FileLedgerStore {
    async fn load(&self) -> Result<Option<GameState>, String> {
        self.read().await.map_err(|e| e.to_string())
    }

    async fn save(&self, state: &GameState) -> Result<(), String> {
        self.write(state).await.map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::upgrade::{Upgrade, find_upgrade};

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("idle-miner-store-{}", std::process::id()))
            .join(format!("{name}.json"))
    }

    #[tokio::test]
    async fn in_memory_store_starts_empty_and_keeps_last_save() {
        let store = InMemoryLedgerStore::new();
        assert_eq!(store.load().await, Ok(None));

        let mut state = GameState::default();
        state.ledger.crystals = 42.0;
        store.save(&state).await.expect("expected save to succeed");

        assert_eq!(store.load().await, Ok(Some(state)));
    }

    #[tokio::test]
    async fn file_store_round_trips_state_with_upgrades() {
        let path = scratch_path("round-trip");
        let _ = tokio::fs::remove_file(&path).await;
        let store = FileLedgerStore::new(&path);
        assert_eq!(store.load().await, Ok(None));

        let mut state = GameState::default();
        state.ledger.research = 7.5;
        state
            .upgrades
            .push(Upgrade::from(find_upgrade("research-boost-1").expect("catalog entry")));
        store.save(&state).await.expect("expected save to succeed");

        let reopened = FileLedgerStore::new(&path);
        assert_eq!(reopened.load().await, Ok(Some(state)));
        assert!(!path.with_extension("tmp").exists());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn file_store_reports_corrupt_json() {
        let path = scratch_path("corrupt");
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .expect("expected scratch dir");
        }
        tokio::fs::write(&path, "{not json")
            .await
            .expect("expected scratch write");

        let result = FileLedgerStore::new(&path).load().await;

        let err = result.expect_err("expected corrupt file to fail");
        assert!(err.contains("not valid json"));
        let _ = tokio::fs::remove_file(&path).await;
    }
}
