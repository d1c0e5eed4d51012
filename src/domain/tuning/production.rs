// Passive production rates, per second of wall-clock time.

#[derive(Debug, Clone, Copy)]
pub struct ProductionTuning {
    pub crystal_rate: f64,

    /// Negative: energy drains while the game runs.
    pub energy_rate: f64,

    pub research_rate: f64,

    /// Research only accrues once crystals reach this amount.
    pub research_crystal_threshold: f64,

    pub reputation_rate: f64,

    /// Reputation only accrues once research reaches this amount.
    pub reputation_research_threshold: f64,
}

impl Default for ProductionTuning {
    fn default() -> Self {
        Self {
            crystal_rate: 1.0,
            energy_rate: -0.5,
            research_rate: 0.1,
            research_crystal_threshold: 10.0,
            reputation_rate: 0.2,
            reputation_research_threshold: 5.0,
        }
    }
}
