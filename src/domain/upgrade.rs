// Upgrade catalog and how purchased upgrades combine into multipliers.

use super::agent::ShipBoosts;
use super::resources::Cost;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpgradeCategory {
    ShipSpeed,
    ShipCapacity,
    MiningEfficiency,
    EnergyGeneration,
    ResearchBoost,
}

/// Static catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub category: UpgradeCategory,
    pub name: &'static str,
    pub description: &'static str,
    pub multiplier: f64,
    pub cost: Cost,
}

pub const CATALOG: [UpgradeDef; 5] = [
    UpgradeDef {
        id: "ship-speed-1",
        category: UpgradeCategory::ShipSpeed,
        name: "Ship Speed I",
        description: "Increase ship speed by 10%",
        multiplier: 1.1,
        cost: Cost::new(50.0, 0.0, 0.0, 0.0),
    },
    UpgradeDef {
        id: "ship-capacity-1",
        category: UpgradeCategory::ShipCapacity,
        name: "Ship Capacity I",
        description: "Increase ship capacity by 20%",
        multiplier: 1.2,
        cost: Cost::new(75.0, 0.0, 0.0, 0.0),
    },
    UpgradeDef {
        id: "mining-efficiency-1",
        category: UpgradeCategory::MiningEfficiency,
        name: "Mining Efficiency I",
        description: "Increase crystal production by 15%",
        multiplier: 1.15,
        cost: Cost::new(100.0, 0.0, 0.0, 0.0),
    },
    UpgradeDef {
        id: "energy-recycler-1",
        category: UpgradeCategory::EnergyGeneration,
        name: "Energy Recycler I",
        description: "Reduce passive energy drain by 20%",
        multiplier: 0.8,
        cost: Cost::new(120.0, 0.0, 5.0, 0.0),
    },
    UpgradeDef {
        id: "research-boost-1",
        category: UpgradeCategory::ResearchBoost,
        name: "Research Boost I",
        description: "Increase research production by 25%",
        multiplier: 1.25,
        cost: Cost::new(150.0, 0.0, 10.0, 0.0),
    },
];

pub fn find_upgrade(id: &str) -> Option<&'static UpgradeDef> {
    CATALOG.iter().find(|def| def.id == id)
}

/// Persisted upgrade record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    pub id: String,
    pub category: UpgradeCategory,
    pub multiplier: f64,
    pub purchased: bool,
}

impl From<&UpgradeDef> for Upgrade {
    fn from(def: &UpgradeDef) -> Self {
        Self {
            id: def.id.to_string(),
            category: def.category,
            multiplier: def.multiplier,
            purchased: true,
        }
    }
}

/// Product of all purchased multipliers in `category`; 1.0 when none apply.
pub fn category_multiplier(upgrades: &[Upgrade], category: UpgradeCategory) -> f64 {
    upgrades
        .iter()
        .filter(|u| u.purchased && u.category == category)
        .map(|u| u.multiplier)
        .product()
}

/// Multipliers applied to passive production.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionMultipliers {
    pub crystals: f64,
    pub energy: f64,
    pub research: f64,
}

impl ProductionMultipliers {
    pub fn from_upgrades(upgrades: &[Upgrade]) -> Self {
        Self {
            crystals: category_multiplier(upgrades, UpgradeCategory::MiningEfficiency),
            energy: category_multiplier(upgrades, UpgradeCategory::EnergyGeneration),
            research: category_multiplier(upgrades, UpgradeCategory::ResearchBoost),
        }
    }
}

pub fn ship_boosts(upgrades: &[Upgrade]) -> ShipBoosts {
    ShipBoosts {
        speed: category_multiplier(upgrades, UpgradeCategory::ShipSpeed) as f32,
        capacity: category_multiplier(upgrades, UpgradeCategory::ShipCapacity) as f32,
    }
}
