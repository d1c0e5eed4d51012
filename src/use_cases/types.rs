// Use-case level inputs/outputs for game sessions and the ledger.

use crate::domain::upgrade::Upgrade;
use crate::domain::{
    AgentId, AgentSnapshot, AsteroidId, AsteroidSnapshot, FleetStats, Ledger, Ore,
    ProductionDelta, ShipType, Vec2,
};

#[derive(Debug, Clone)]
pub enum SessionEvent {
    PlayerMoved { position: Vec2 },
    Mine { asteroid_id: AsteroidId, power: f32 },
    SetMiningMode { enabled: bool },
    Deploy { kind: ShipType },
    Recall { agent_id: AgentId },
}

/// Per-connection replies produced while handling events or running a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionNotice {
    Mined {
        asteroid_id: AsteroidId,
        extracted: Ore,
        destroyed: bool,
    },
    Deployed(AgentSnapshot),
    Recalled(AgentSnapshot),
    Rejected { reason: &'static str },
}

#[derive(Debug, Clone, Default)]
pub struct WorldUpdate {
    pub frame: u64,
    pub player: Vec2,
    pub mining_mode: bool,
    pub asteroids: Vec<AsteroidSnapshot>,
    pub agents: Vec<AgentSnapshot>,
    pub fleet: FleetStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerUpdate {
    pub ledger: Ledger,
}

/// Ledger view with derived per-second production, served as game stats.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStats {
    pub ledger: Ledger,
    pub production_per_second: ProductionDelta,
    pub upgrades: Vec<Upgrade>,
}
