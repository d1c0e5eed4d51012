// Wire protocol DTOs and conversions for the WebSocket and the HTTP API.

use crate::domain::upgrade::{CATALOG, UpgradeCategory, UpgradeDef};
use crate::domain::{
    AgentSnapshot, AgentState, AsteroidSnapshot, AsteroidType, Cost, FleetStats, GameState, Ledger,
    Ore, ProductionDelta, ShipType, Vec2,
};
use crate::use_cases::{GameStats, SessionNotice, WorldUpdate};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Sent once right after the connection is accepted.
    Identity { session_id: String },
    // Per-frame snapshot of this connection's world.
    WorldUpdate(WorldUpdateDto),
    // Ledger totals after a deposit, debit, purchase or production publish.
    ResourcesUpdated(ResourcesDto),
    Mined(MinedDto),
    Deployed(AgentStateDto),
    Recalled(AgentStateDto),
    CommandRejected { reason: String },
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    Position(PositionDto),
    Mine(MinePayload),
    MiningMode(MiningModePayload),
    Deploy(DeployPayload),
    Recall(RecallPayload),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PositionDto {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for PositionDto {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<PositionDto> for Vec2 {
    fn from(p: PositionDto) -> Self {
        Vec2::new(p.x, p.y)
    }
}

fn default_power() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct MinePayload {
    pub asteroid_id: u64,
    #[serde(default = "default_power")]
    pub power: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MiningModePayload {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployPayload {
    // Parsed case-insensitively; unknown names are rejected before reaching the session.
    pub ship_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecallPayload {
    pub agent_id: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldUpdateDto {
    pub frame: u64,
    pub player: PositionDto,
    pub mining_mode: bool,
    pub asteroids: Vec<AsteroidStateDto>,
    pub agents: Vec<AgentStateDto>,
    pub fleet: FleetStats,
}

impl From<&WorldUpdate> for WorldUpdateDto {
    fn from(update: &WorldUpdate) -> Self {
        Self {
            frame: update.frame,
            player: update.player.into(),
            mining_mode: update.mining_mode,
            asteroids: update.asteroids.iter().map(AsteroidStateDto::from).collect(),
            agents: update.agents.iter().map(AgentStateDto::from).collect(),
            fleet: update.fleet,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AsteroidStateDto {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: AsteroidType,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub rotation: f32,
    pub being_mined: bool,
}

impl From<&AsteroidSnapshot> for AsteroidStateDto {
    fn from(a: &AsteroidSnapshot) -> Self {
        Self {
            id: a.id.0,
            kind: a.kind,
            x: a.position.x,
            y: a.position.y,
            size: a.size,
            health: a.health,
            max_health: a.max_health,
            rotation: a.rotation,
            being_mined: a.being_mined,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentStateDto {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ShipType,
    pub state: AgentState,
    pub x: f32,
    pub y: f32,
    pub target: Option<PositionDto>,
    pub cargo: u32,
    pub capacity: u32,
}

impl From<&AgentSnapshot> for AgentStateDto {
    fn from(a: &AgentSnapshot) -> Self {
        Self {
            id: a.id.0,
            kind: a.kind,
            state: a.state,
            x: a.position.x,
            y: a.position.y,
            target: a.target.map(PositionDto::from),
            cargo: a.cargo,
            capacity: a.capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MinedDto {
    pub asteroid_id: u64,
    pub extracted: Ore,
    pub destroyed: bool,
}

impl ServerMessage {
    pub fn from_notice(notice: &SessionNotice) -> Self {
        match notice {
            SessionNotice::Mined {
                asteroid_id,
                extracted,
                destroyed,
            } => ServerMessage::Mined(MinedDto {
                asteroid_id: asteroid_id.0,
                extracted: *extracted,
                destroyed: *destroyed,
            }),
            SessionNotice::Deployed(agent) => ServerMessage::Deployed(agent.into()),
            SessionNotice::Recalled(agent) => ServerMessage::Recalled(agent.into()),
            SessionNotice::Rejected { reason } => ServerMessage::CommandRejected {
                reason: reason.to_string(),
            },
        }
    }
}

/// Ledger totals as sent to clients and returned by `GET /api/resources`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResourcesDto {
    pub crystals: f64,
    pub energy: f64,
    pub research: f64,
    pub reputation: f64,
}

impl From<Ledger> for ResourcesDto {
    fn from(l: Ledger) -> Self {
        Self {
            crystals: l.crystals,
            energy: l.energy,
            research: l.research,
            reputation: l.reputation,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CostDto {
    pub crystals: f64,
    pub energy: f64,
    pub research: f64,
    pub reputation: f64,
}

impl From<Cost> for CostDto {
    fn from(c: Cost) -> Self {
        Self {
            crystals: c.crystals,
            energy: c.energy,
            research: c.research,
            reputation: c.reputation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpgradeDto {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub category: UpgradeCategory,
    pub name: &'static str,
    pub description: &'static str,
    pub multiplier: f64,
    pub cost: CostDto,
    pub purchased: bool,
}

impl UpgradeDto {
    fn new(def: &UpgradeDef, purchased: bool) -> Self {
        Self {
            id: def.id,
            category: def.category,
            name: def.name,
            description: def.description,
            multiplier: def.multiplier,
            cost: def.cost.into(),
            purchased,
        }
    }

    /// Whole catalog with purchase flags taken from `state`.
    pub fn catalog(state: &GameState) -> Vec<Self> {
        CATALOG
            .iter()
            .map(|def| Self::new(def, state.has_upgrade(def.id)))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseUpgradeRequest {
    pub upgrade_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseUpgradeResponse {
    pub resources: ResourcesDto,
    pub upgrades: Vec<UpgradeDto>,
}

/// Mined amounts reported by `POST /api/mining`; missing channels count as zero.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MiningRequest {
    #[serde(default)]
    pub crystals: u32,
    #[serde(default)]
    pub metals: u32,
    #[serde(default)]
    pub gems: u32,
    #[serde(default)]
    pub energy: u32,
}

impl From<MiningRequest> for Ore {
    fn from(r: MiningRequest) -> Self {
        Ore::new(r.crystals, r.metals, r.gems, r.energy)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProductionRatesDto {
    pub crystals: f64,
    pub energy: f64,
    pub research: f64,
    pub reputation: f64,
}

impl From<ProductionDelta> for ProductionRatesDto {
    fn from(d: ProductionDelta) -> Self {
        Self {
            crystals: d.crystals,
            energy: d.energy,
            research: d.research,
            reputation: d.reputation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStatsDto {
    pub resources: ResourcesDto,
    pub production_per_second: ProductionRatesDto,
    pub upgrades_purchased: Vec<String>,
}

impl From<GameStats> for GameStatsDto {
    fn from(stats: GameStats) -> Self {
        Self {
            resources: stats.ledger.into(),
            production_per_second: stats.production_per_second.into(),
            upgrades_purchased: stats
                .upgrades
                .into_iter()
                .filter(|u| u.purchased)
                .map(|u| u.id)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
