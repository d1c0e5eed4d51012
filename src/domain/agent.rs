// Autonomous ship entity, its behavioral state, and fleet-level views.

use super::errors::DeployError;
use super::geometry::Vec2;
use super::resources::Ore;
use super::tuning::ship::ShipTypeTuning;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    Scout,
    Miner,
    Hauler,
    Destroyer,
}

impl ShipType {
    pub const ALL: [ShipType; 4] = [
        ShipType::Scout,
        ShipType::Miner,
        ShipType::Hauler,
        ShipType::Destroyer,
    ];

    pub fn tuning(self) -> ShipTypeTuning {
        ShipTypeTuning::for_type(self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShipType::Scout => "SCOUT",
            ShipType::Miner => "MINER",
            ShipType::Hauler => "HAULER",
            ShipType::Destroyer => "DESTROYER",
        }
    }
}

impl FromStr for ShipType {
    type Err = DeployError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ShipType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or(DeployError::UnknownShipType)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentState {
    Deploying,
    Idle,
    Mining,
    Returning,
}

/// Multipliers from purchased ship upgrades, applied at deploy time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipBoosts {
    pub speed: f32,
    pub capacity: f32,
}

impl Default for ShipBoosts {
    fn default() -> Self {
        Self {
            speed: 1.0,
            capacity: 1.0,
        }
    }
}

pub struct Agent {
    pub id: AgentId,
    pub kind: ShipType,
    pub state: AgentState,
    pub position: Vec2,
    // Staging point, locked asteroid position, or none.
    pub target: Option<Vec2>,

    // Stats copied from tuning at deploy time.
    pub speed: f32,
    pub mining_rate: f32,
    pub capacity: u32,
    pub health: f32,

    pub cargo: Ore,
    // Session clock millis of the last mining call; none until the first one.
    pub last_mined_at: Option<u64>,
}

impl Agent {
    pub fn new(id: AgentId, kind: ShipType, origin: Vec2, boosts: ShipBoosts) -> Self {
        let tuning = kind.tuning();
        Self {
            id,
            kind,
            state: AgentState::Deploying,
            position: origin,
            target: None,
            speed: tuning.speed * boosts.speed,
            mining_rate: tuning.mining_rate,
            capacity: (tuning.capacity as f32 * boosts.capacity).floor() as u32,
            health: tuning.health,
            cargo: Ore::default(),
            last_mined_at: None,
        }
    }

    pub fn cargo_load(&self) -> u32 {
        u32::try_from(self.cargo.total()).unwrap_or(u32::MAX)
    }

    pub fn cargo_room(&self) -> u32 {
        self.capacity.saturating_sub(self.cargo_load())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub kind: ShipType,
    pub state: AgentState,
    pub position: Vec2,
    pub target: Option<Vec2>,
    pub cargo: u32,
    pub capacity: u32,
}

impl From<&Agent> for AgentSnapshot {
    fn from(a: &Agent) -> Self {
        Self {
            id: a.id,
            kind: a.kind,
            state: a.state,
            position: a.position,
            target: a.target,
            cargo: a.cargo_load(),
            capacity: a.capacity,
        }
    }
}

/// Per-state counts and carried cargo across the fleet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetStats {
    pub total: usize,
    pub deploying: usize,
    pub idle: usize,
    pub mining: usize,
    pub returning: usize,
    pub total_cargo: u32,
}

/// Cargo handed over when an agent reaches the reference position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub agent_id: AgentId,
    pub ore: Ore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_type_parses_case_insensitively() {
        assert_eq!("miner".parse::<ShipType>(), Ok(ShipType::Miner));
        assert_eq!(" HAULER ".parse::<ShipType>(), Ok(ShipType::Hauler));
        assert_eq!(
            "FRIGATE".parse::<ShipType>(),
            Err(DeployError::UnknownShipType)
        );
    }

    #[test]
    fn boosts_scale_speed_and_capacity() {
        let agent = Agent::new(
            AgentId(1),
            ShipType::Miner,
            Vec2::default(),
            ShipBoosts {
                speed: 1.1,
                capacity: 1.2,
            },
        );
        assert!((agent.speed - 1.65).abs() < 1e-5);
        assert_eq!(agent.capacity, 60);
        assert_eq!(agent.state, AgentState::Deploying);
        assert!(agent.target.is_none());
    }
}
