// Gameplay tuning for autonomous ships.

use crate::domain::agent::ShipType;
use crate::domain::resources::Cost;

#[derive(Debug, Clone, Copy)]
pub struct ShipTypeTuning {
    /// Display name.
    pub name: &'static str,

    /// World units moved per frame.
    pub speed: f32,

    /// Mining power applied per mining call.
    pub mining_rate: f32,

    /// Ore units the cargo hold can carry.
    pub capacity: u32,

    pub health: f32,

    /// Charged to the ledger when the ship is deployed.
    pub cost: Cost,
}

impl ShipTypeTuning {
    pub fn for_type(kind: ShipType) -> Self {
        match kind {
            ShipType::Scout => Self {
                name: "Scout",
                speed: 2.0,
                mining_rate: 0.5,
                capacity: 10,
                health: 50.0,
                cost: Cost::new(50.0, 10.0, 0.0, 0.0),
            },
            ShipType::Miner => Self {
                name: "Miner",
                speed: 1.5,
                mining_rate: 2.0,
                capacity: 50,
                health: 100.0,
                cost: Cost::new(200.0, 50.0, 10.0, 0.0),
            },
            ShipType::Hauler => Self {
                name: "Hauler",
                speed: 1.0,
                mining_rate: 1.0,
                capacity: 200,
                health: 150.0,
                cost: Cost::new(500.0, 100.0, 25.0, 10.0),
            },
            ShipType::Destroyer => Self {
                name: "Destroyer",
                speed: 1.8,
                mining_rate: 1.5,
                capacity: 100,
                health: 300.0,
                cost: Cost::new(1000.0, 200.0, 50.0, 25.0),
            },
        }
    }
}

/// Distances and timings of the deploy/idle/mine/return cycle.
#[derive(Debug, Clone, Copy)]
pub struct AgentTuning {
    /// Nearest staging point distance from the reference position.
    pub staging_min_distance: f32,

    /// Random extra staging distance, exclusive upper bound.
    pub staging_distance_span: f32,

    /// Staging point counts as reached inside this radius.
    pub staging_arrival_radius: f32,

    /// Asteroids farther than this are ignored when idle.
    pub search_radius: f32,

    /// Mining starts once the nearest asteroid is closer than this.
    pub mining_range: f32,

    /// Per-axis tolerance when re-locating a locked asteroid.
    pub target_tolerance: f32,

    /// Minimum milliseconds between two mining calls.
    pub mining_cooldown_ms: u64,

    /// Cargo is delivered inside this radius of the reference position.
    pub delivery_radius: f32,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            staging_min_distance: 100.0,
            staging_distance_span: 200.0,
            staging_arrival_radius: 10.0,
            search_radius: 300.0,
            mining_range: 50.0,
            target_tolerance: 10.0,
            mining_cooldown_ms: 2000,
            delivery_radius: 30.0,
        }
    }
}
