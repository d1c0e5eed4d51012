// Persisted game state: the resource ledger plus the upgrades bought so far.

use super::resources::{Ledger, STARTING_LEDGER};
use super::upgrade::Upgrade;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub ledger: Ledger,
    #[serde(default)]
    pub upgrades: Vec<Upgrade>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            ledger: STARTING_LEDGER,
            upgrades: Vec::new(),
        }
    }
}

impl GameState {
    pub fn has_upgrade(&self, id: &str) -> bool {
        self.upgrades.iter().any(|u| u.purchased && u.id == id)
    }
}
