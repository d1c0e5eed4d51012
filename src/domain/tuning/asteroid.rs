// Gameplay tuning for asteroids and the field that spawns them.
// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

use crate::domain::asteroid::AsteroidType;
use crate::domain::geometry::Bounds;
use crate::domain::resources::Ore;

#[derive(Debug, Clone, Copy)]
pub struct AsteroidTypeTuning {
    /// Collision radius in world units.
    pub size: f32,

    /// Starting (and maximum) health.
    pub max_health: f32,

    /// Ore released over the asteroid's whole life.
    pub pool: Ore,

    /// Radians per 60 Hz frame; the field scales it by `dt * 60`.
    ///
    /// The browser client multiplied this by the frame time in milliseconds,
    /// about 16x faster at 60 Hz. Rotation here is cosmetic and keeps the
    /// per-frame reading of the table.
    pub rotation_speed: f32,

    /// Probability weight in the spawn draw; the table sums to 1.
    pub spawn_chance: f32,
}

impl AsteroidTypeTuning {
    pub fn for_type(kind: AsteroidType) -> Self {
        match kind {
            AsteroidType::Small => Self {
                size: 20.0,
                max_health: 50.0,
                pool: Ore::new(10, 5, 0, 2),
                rotation_speed: 0.02,
                spawn_chance: 0.4,
            },
            AsteroidType::Medium => Self {
                size: 35.0,
                max_health: 100.0,
                pool: Ore::new(25, 15, 2, 5),
                rotation_speed: 0.015,
                spawn_chance: 0.3,
            },
            AsteroidType::Large => Self {
                size: 50.0,
                max_health: 200.0,
                pool: Ore::new(50, 30, 5, 10),
                rotation_speed: 0.01,
                spawn_chance: 0.2,
            },
            AsteroidType::Rare => Self {
                size: 40.0,
                max_health: 150.0,
                pool: Ore::new(30, 20, 15, 8),
                rotation_speed: 0.025,
                spawn_chance: 0.08,
            },
            AsteroidType::Epic => Self {
                size: 60.0,
                max_health: 300.0,
                pool: Ore::new(100, 50, 30, 20),
                rotation_speed: 0.03,
                spawn_chance: 0.02,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldTuning {
    /// Active asteroid cap; spawning pauses at this count.
    pub max_asteroids: usize,

    /// Minimum spawn distance from the reference point.
    pub spawn_radius: f32,

    /// Extra random distance added on top of `spawn_radius`.
    pub spawn_radius_jitter: f32,

    /// No asteroid spawns closer than this to an existing one.
    pub min_distance: f32,

    /// Milliseconds between spawn attempts.
    pub spawn_interval_ms: u64,

    /// Asteroids farther than this from the reference point are culled.
    pub cull_radius: f32,

    /// Playable world rectangle.
    pub bounds: Bounds,

    /// Inset from the world edge for spawn positions.
    pub bounds_margin: f32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            max_asteroids: 20,
            spawn_radius: 200.0,
            spawn_radius_jitter: 200.0,
            min_distance: 100.0,
            spawn_interval_ms: 5000,
            cull_radius: 800.0,
            bounds: Bounds {
                width: 1600.0,
                height: 1200.0,
            },
            bounds_margin: 50.0,
        }
    }
}
