// Use cases layer: application workflows for the game server.

pub mod ledger;
pub mod production;
pub mod session;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;

pub use ledger::LedgerService;
pub use production::{ProductionScheduler, production_task};
pub use session::{GameSession, SessionHandle, SessionSettings, spawn_session};
pub use types::{GameStats, LedgerUpdate, SessionEvent, SessionNotice, WorldUpdate};
