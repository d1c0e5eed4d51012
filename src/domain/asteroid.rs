// Asteroid entity and its render snapshot.

use super::geometry::Vec2;
use super::resources::Ore;
use super::tuning::asteroid::AsteroidTypeTuning;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AsteroidId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AsteroidType {
    Small,
    Medium,
    Large,
    Rare,
    Epic,
}

impl AsteroidType {
    /// Spawn-table order; the first entry is the fallback tier.
    pub const ALL: [AsteroidType; 5] = [
        AsteroidType::Small,
        AsteroidType::Medium,
        AsteroidType::Large,
        AsteroidType::Rare,
        AsteroidType::Epic,
    ];

    pub fn tuning(self) -> AsteroidTypeTuning {
        AsteroidTypeTuning::for_type(self)
    }
}

pub struct Asteroid {
    pub id: AsteroidId,
    pub kind: AsteroidType,
    pub position: Vec2,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    // Remaining ore; only ever decreases.
    pub pool: Ore,
    pub rotation: f32,
    pub rotation_speed: f32,
    // Render/audio cue, cleared at the start of every frame.
    pub being_mined: bool,
}

impl Asteroid {
    pub fn new(id: AsteroidId, kind: AsteroidType, position: Vec2, rotation: f32) -> Self {
        let tuning = kind.tuning();
        Self {
            id,
            kind,
            position,
            size: tuning.size,
            health: tuning.max_health,
            max_health: tuning.max_health,
            pool: tuning.pool,
            rotation,
            rotation_speed: tuning.rotation_speed,
            being_mined: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Read-only copy handed to renderers and agents.
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidSnapshot {
    pub id: AsteroidId,
    pub kind: AsteroidType,
    pub position: Vec2,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub pool: Ore,
    pub rotation: f32,
    pub being_mined: bool,
}

impl From<&Asteroid> for AsteroidSnapshot {
    fn from(a: &Asteroid) -> Self {
        Self {
            id: a.id,
            kind: a.kind,
            position: a.position,
            size: a.size,
            health: a.health,
            max_health: a.max_health,
            pool: a.pool,
            rotation: a.rotation,
            being_mined: a.being_mined,
        }
    }
}
