use async_trait::async_trait;

use crate::domain::state::GameState;

// Port for the persisted game state consumed by the ledger use cases.
// Errors are opaque strings; callers map them to `LedgerError::StorageFailure`.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load(&self) -> Result<Option<GameState>, String>;
    async fn save(&self, state: &GameState) -> Result<(), String>;
}
