use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::ports::LedgerStore;
use crate::domain::state::GameState;

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub load: bool,
    pub save: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingStore {
    state: Arc<Mutex<Option<GameState>>>,
    // Shared so a test can break and repair the store while it is in use.
    failures: Arc<Mutex<FailureFlags>>,
    saves: Arc<Mutex<usize>>,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(None)),
            failures: Arc::new(Mutex::new(FailureFlags::default())),
            saves: Arc::new(Mutex::new(0)),
        }
    }

    pub(crate) fn seeded(state: GameState) -> Self {
        let store = Self::new();
        *store.state.lock().expect("state mutex poisoned") = Some(state);
        store
    }

    pub(crate) fn set_failures(&self, failures: FailureFlags) {
        *self.failures.lock().expect("failures mutex poisoned") = failures;
    }

    pub(crate) fn stored(&self) -> Option<GameState> {
        self.state.lock().expect("state mutex poisoned").clone()
    }

    pub(crate) fn save_count(&self) -> usize {
        *self.saves.lock().expect("saves mutex poisoned")
    }

    fn failures(&self) -> FailureFlags {
        *self.failures.lock().expect("failures mutex poisoned")
    }
}

#[async_trait]
impl LedgerStore for RecordingStore {
    async fn load(&self) -> Result<Option<GameState>, String> {
        if self.failures().load {
            return Err("load failed".to_string());
        }
        let state = self.state.lock().expect("state mutex poisoned").clone();
        // Give other tasks a chance to interleave between load and save.
        tokio::task::yield_now().await;
        Ok(state)
    }

    async fn save(&self, state: &GameState) -> Result<(), String> {
        if self.failures().save {
            return Err("save failed".to_string());
        }
        tokio::task::yield_now().await;
        *self.state.lock().expect("state mutex poisoned") = Some(state.clone());
        *self.saves.lock().expect("saves mutex poisoned") += 1;
        Ok(())
    }
}
