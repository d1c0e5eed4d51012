// Gameplay tuning for the player-controlled ship.

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Milliseconds between automatic mining calls while mining mode is on.
    pub auto_mine_interval_ms: u64,

    /// Auto-mining only reaches asteroids within this radius.
    pub auto_mine_range: f32,

    /// Mining power of the player's drill.
    pub mining_power: f32,

    /// Inset from the world edge the ship cannot cross.
    pub bounds_margin: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            auto_mine_interval_ms: 500,
            auto_mine_range: 50.0,
            mining_power: 1.0,
            bounds_margin: 20.0,
        }
    }
}
