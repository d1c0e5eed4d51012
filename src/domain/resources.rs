// Resource value types: raw ore carried by asteroids and ships, and the
// four-channel ledger the server persists.

use serde::{Deserialize, Serialize};

/// Ore channels an asteroid holds and a mining call extracts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ore {
    pub crystals: u32,
    pub metals: u32,
    pub gems: u32,
    pub energy: u32,
}

impl Ore {
    pub const fn new(crystals: u32, metals: u32, gems: u32, energy: u32) -> Self {
        Self {
            crystals,
            metals,
            gems,
            energy,
        }
    }

    /// Sum of all channels; widened so four full `u32` channels cannot overflow.
    pub fn total(&self) -> u64 {
        u64::from(self.crystals)
            + u64::from(self.metals)
            + u64::from(self.gems)
            + u64::from(self.energy)
    }

    pub fn is_empty(&self) -> bool {
        self.crystals == 0 && self.metals == 0 && self.gems == 0 && self.energy == 0
    }

    pub fn saturating_sub(&self, other: &Ore) -> Ore {
        Ore {
            crystals: self.crystals.saturating_sub(other.crystals),
            metals: self.metals.saturating_sub(other.metals),
            gems: self.gems.saturating_sub(other.gems),
            energy: self.energy.saturating_sub(other.energy),
        }
    }

    pub fn add(&mut self, other: &Ore) {
        self.crystals = self.crystals.saturating_add(other.crystals);
        self.metals = self.metals.saturating_add(other.metals);
        self.gems = self.gems.saturating_add(other.gems);
        self.energy = self.energy.saturating_add(other.energy);
    }

    /// Takes at most `room` units, filling channels in declaration order.
    pub fn take_up_to(&self, room: u32) -> Ore {
        let mut left = room;
        let mut take = |amount: u32| {
            let n = amount.min(left);
            left -= n;
            n
        };
        Ore {
            crystals: take(self.crystals),
            metals: take(self.metals),
            gems: take(self.gems),
            energy: take(self.energy),
        }
    }
}

/// Persisted four-channel resource counters for the single game instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub crystals: f64,
    pub energy: f64,
    pub research: f64,
    pub reputation: f64,
}

/// Starting ledger for a fresh game.
pub const STARTING_LEDGER: Ledger = Ledger {
    crystals: 100.0,
    energy: 100.0,
    research: 0.0,
    reputation: 0.0,
};

/// Amount charged for a ship or upgrade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub crystals: f64,
    pub energy: f64,
    pub research: f64,
    pub reputation: f64,
}

impl Cost {
    pub const fn new(crystals: f64, energy: f64, research: f64, reputation: f64) -> Self {
        Self {
            crystals,
            energy,
            research,
            reputation,
        }
    }
}

/// Per-channel change computed by one production tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProductionDelta {
    pub crystals: f64,
    pub energy: f64,
    pub research: f64,
    pub reputation: f64,
}

impl Ledger {
    /// Credits mined ore. Gems are refined into research and metals into reputation.
    pub fn credit_ore(&mut self, ore: &Ore) {
        self.crystals += f64::from(ore.crystals);
        self.energy += f64::from(ore.energy);
        self.research += f64::from(ore.gems);
        self.reputation += f64::from(ore.metals);
    }

    pub fn covers(&self, cost: &Cost) -> bool {
        self.crystals >= cost.crystals
            && self.energy >= cost.energy
            && self.research >= cost.research
            && self.reputation >= cost.reputation
    }

    /// Subtracts `cost`; callers check `covers` first so no channel goes negative.
    pub fn debit(&mut self, cost: &Cost) {
        self.crystals -= cost.crystals;
        self.energy -= cost.energy;
        self.research -= cost.research;
        self.reputation -= cost.reputation;
    }

    /// Applies production. Only energy can be driven below zero and it stops at zero.
    pub fn apply(&mut self, delta: &ProductionDelta) {
        self.crystals += delta.crystals;
        self.energy = (self.energy + delta.energy).max(0.0);
        self.research += delta.research;
        self.reputation += delta.reputation;
    }
}
