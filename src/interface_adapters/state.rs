use crate::use_cases::{LedgerService, SessionSettings};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct AppState {
    // Single writer for the persisted ledger, shared by sessions and HTTP handlers.
    pub ledger: Arc<LedgerService>,
    // Settings used for every new per-connection game session.
    pub session_settings: SessionSettings,
    next_session_id: AtomicU64,
}

impl AppState {
    pub fn new(ledger: Arc<LedgerService>, session_settings: SessionSettings) -> Self {
        Self {
            ledger,
            session_settings,
            next_session_id: AtomicU64::new(1),
        }
    }

    pub fn next_session_id(&self) -> u64 {
        self.next_session_id.fetch_add(1, Ordering::Relaxed)
    }
}
