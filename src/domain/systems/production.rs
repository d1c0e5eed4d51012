// Passive resource production for one scheduler tick.

use crate::domain::resources::{Ledger, ProductionDelta};
use crate::domain::tuning::production::ProductionTuning;
use crate::domain::upgrade::{ProductionMultipliers, Upgrade};

/// Computes what `dt_secs` of passive production adds to `ledger`.
///
/// Thresholds are checked against the ledger as it was before the tick.
/// Reputation is not affected by upgrades.
pub fn compute_production(
    ledger: &Ledger,
    upgrades: &[Upgrade],
    dt_secs: f64,
    tuning: &ProductionTuning,
) -> ProductionDelta {
    let multipliers = ProductionMultipliers::from_upgrades(upgrades);

    let research = if ledger.crystals >= tuning.research_crystal_threshold {
        tuning.research_rate * dt_secs
    } else {
        0.0
    };
    let reputation = if ledger.research >= tuning.reputation_research_threshold {
        tuning.reputation_rate * dt_secs
    } else {
        0.0
    };

    ProductionDelta {
        crystals: tuning.crystal_rate * dt_secs * multipliers.crystals,
        energy: tuning.energy_rate * dt_secs * multipliers.energy,
        research: research * multipliers.research,
        reputation,
    }
}
