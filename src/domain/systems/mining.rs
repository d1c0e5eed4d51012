// Mining math shared by the player's drill and autonomous ships.

use crate::domain::resources::Ore;

/// Health removed per unit of mining power.
pub const DAMAGE_PER_POWER: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningOutcome {
    pub health: f32,
    pub pool: Ore,
    pub extracted: Ore,
}

impl MiningOutcome {
    pub fn depleted(&self) -> bool {
        self.health <= 0.0
    }
}

/// Resolves one mining call against an asteroid's health and ore pool.
///
/// Returns `None` when the asteroid is already at zero health. The share of the
/// pool released equals the share of max health the hit removes (capped at the
/// whole pool), rounded down per channel, so extraction never exceeds what is left.
pub fn resolve(health: f32, max_health: f32, pool: Ore, power: f32) -> Option<MiningOutcome> {
    if health <= 0.0 {
        return None;
    }

    let damage = (power * DAMAGE_PER_POWER).max(0.0);
    let new_health = (health - damage).max(0.0);

    // Multiply before dividing so exact ratios (10 * 10 / 100) stay exact.
    let (num, den) = if max_health > 0.0 {
        (f64::from(damage.min(max_health)), f64::from(max_health))
    } else {
        (1.0, 1.0)
    };
    let extract = |amount: u32| ((f64::from(amount) * num / den).floor() as u32).min(amount);
    let extracted = Ore {
        crystals: extract(pool.crystals),
        metals: extract(pool.metals),
        gems: extract(pool.gems),
        energy: extract(pool.energy),
    };

    Some(MiningOutcome {
        health: new_health,
        pool: pool.saturating_sub(&extracted),
        extracted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_one_on_hundred_health_releases_a_tenth() {
        let out = resolve(100.0, 100.0, Ore::new(10, 5, 0, 2), 1.0).expect("alive asteroid");
        assert_eq!(out.health, 90.0);
        assert_eq!(out.extracted, Ore::new(1, 0, 0, 0));
        assert_eq!(out.pool, Ore::new(9, 5, 0, 2));
        assert!(!out.depleted());
    }

    #[test]
    fn dead_asteroid_yields_nothing() {
        assert!(resolve(0.0, 100.0, Ore::new(10, 0, 0, 0), 1.0).is_none());
    }

    #[test]
    fn overkill_releases_at_most_the_whole_pool() {
        let pool = Ore::new(7, 3, 1, 0);
        let out = resolve(20.0, 50.0, pool, 100.0).expect("alive asteroid");
        assert_eq!(out.health, 0.0);
        assert_eq!(out.extracted, pool);
        assert_eq!(out.pool, Ore::default());
        assert!(out.depleted());
    }

    #[test]
    fn extraction_never_exceeds_remaining_pool() {
        let mut health = 300.0;
        let mut pool = Ore::new(100, 50, 30, 20);
        for power in [0.5_f32, 1.0, 1.5, 2.0, 3.7, 0.1] {
            let Some(out) = resolve(health, 300.0, pool, power) else {
                break;
            };
            assert!(out.extracted.crystals <= pool.crystals);
            assert!(out.extracted.metals <= pool.metals);
            assert!(out.extracted.gems <= pool.gems);
            assert!(out.extracted.energy <= pool.energy);
            assert!(out.health <= health);
            health = out.health;
            pool = out.pool;
        }
    }

    #[test]
    fn negative_power_does_no_damage() {
        let out = resolve(50.0, 50.0, Ore::new(10, 0, 0, 0), -3.0).expect("alive asteroid");
        assert_eq!(out.health, 50.0);
        assert!(out.extracted.is_empty());
    }
}
