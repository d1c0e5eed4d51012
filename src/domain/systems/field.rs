// Asteroid field: spawning around the reference point, mining, and culling.

use crate::domain::asteroid::{Asteroid, AsteroidId, AsteroidSnapshot, AsteroidType};
use crate::domain::geometry::Vec2;
use crate::domain::resources::Ore;
use crate::domain::systems::mining;
use crate::domain::tuning::asteroid::FieldTuning;
use rand::{Rng, rngs::StdRng};
use std::collections::BTreeMap;
use std::f32::consts::TAU;
use tracing::debug;

/// Frames per second the per-frame rotation rates are expressed against.
const ROTATION_FRAME_RATE: f32 = 60.0;

/// Result of a successful mining call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningYield {
    pub asteroid_id: AsteroidId,
    pub extracted: Ore,
    pub health: f32,
    // True when this call mined the asteroid out and removed it.
    pub destroyed: bool,
}

/// Picks a spawn tier for a uniform draw in `[0, 1)`.
///
/// Weights accumulate in table order and the first bucket containing the draw wins.
/// Rounding gaps at the top of the range fall back to the lowest tier.
pub fn select_asteroid_type(draw: f32) -> AsteroidType {
    let mut cumulative = 0.0;
    for kind in AsteroidType::ALL {
        cumulative += kind.tuning().spawn_chance;
        if draw <= cumulative {
            return kind;
        }
    }
    AsteroidType::ALL[0]
}

pub struct AsteroidField {
    tuning: FieldTuning,
    // Keyed by id so scans visit asteroids in spawn order.
    asteroids: BTreeMap<AsteroidId, Asteroid>,
    next_id: u64,
    last_spawn_at: Option<u64>,
    rng: StdRng,
}

impl AsteroidField {
    pub fn new(tuning: FieldTuning, rng: StdRng) -> Self {
        Self {
            tuning,
            asteroids: BTreeMap::new(),
            next_id: 1,
            last_spawn_at: None,
            rng,
        }
    }

    pub fn tuning(&self) -> &FieldTuning {
        &self.tuning
    }

    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    /// Clears the per-frame mining cue on every asteroid.
    pub fn begin_frame(&mut self) {
        for a in self.asteroids.values_mut() {
            a.being_mined = false;
        }
    }

    /// Rotates, spawns at most once per interval, then culls around `reference`.
    pub fn advance(&mut self, dt: f32, now_ms: u64, reference: Vec2) {
        for a in self.asteroids.values_mut() {
            a.rotation = (a.rotation + a.rotation_speed * dt * ROTATION_FRAME_RATE) % TAU;
        }

        let due = match self.last_spawn_at {
            Some(last) => now_ms.saturating_sub(last) > self.tuning.spawn_interval_ms,
            None => true,
        };
        if due && self.asteroids.len() < self.tuning.max_asteroids {
            self.spawn(reference);
            self.last_spawn_at = Some(now_ms);
        }

        self.cull(reference);
    }

    /// Attempts one spawn near `reference`; no retry when the spot is crowded.
    pub fn spawn(&mut self, reference: Vec2) -> Option<AsteroidId> {
        let kind = select_asteroid_type(self.rng.r#gen::<f32>());
        let angle = self.rng.gen_range(0.0..TAU);
        let distance =
            self.tuning.spawn_radius + self.rng.r#gen::<f32>() * self.tuning.spawn_radius_jitter;
        let candidate = self
            .tuning
            .bounds
            .clamp(reference.offset_polar(angle, distance), self.tuning.bounds_margin);

        let min_sq = self.tuning.min_distance * self.tuning.min_distance;
        if self
            .asteroids
            .values()
            .any(|a| a.position.distance_sq(candidate) < min_sq)
        {
            debug!(x = candidate.x, y = candidate.y, "spawn rejected; too close to another asteroid");
            return None;
        }

        let rotation = self.rng.gen_range(0.0..TAU);
        Some(self.insert(kind, candidate, rotation))
    }

    /// Places an asteroid without the spacing check.
    pub fn place(&mut self, kind: AsteroidType, position: Vec2) -> AsteroidId {
        self.insert(kind, position, 0.0)
    }

    fn insert(&mut self, kind: AsteroidType, position: Vec2, rotation: f32) -> AsteroidId {
        let id = AsteroidId(self.next_id);
        self.next_id += 1;
        self.asteroids
            .insert(id, Asteroid::new(id, kind, position, rotation));
        debug!(asteroid_id = id.0, ?kind, x = position.x, y = position.y, "asteroid spawned");
        id
    }

    fn cull(&mut self, reference: Vec2) {
        let max_sq = self.tuning.cull_radius * self.tuning.cull_radius;
        self.asteroids
            .retain(|_, a| a.position.distance_sq(reference) <= max_sq);
    }

    /// Single entry point for health and pool mutation.
    pub fn mine(&mut self, id: AsteroidId, power: f32) -> Option<MiningYield> {
        let asteroid = self.asteroids.get_mut(&id)?;
        let outcome = mining::resolve(asteroid.health, asteroid.max_health, asteroid.pool, power)?;

        asteroid.health = outcome.health;
        asteroid.pool = outcome.pool;
        asteroid.being_mined = true;

        let destroyed = outcome.depleted();
        if destroyed {
            self.asteroids.remove(&id);
            debug!(asteroid_id = id.0, "asteroid mined out");
        }

        Some(MiningYield {
            asteroid_id: id,
            extracted: outcome.extracted,
            health: outcome.health,
            destroyed,
        })
    }

    pub fn get(&self, id: AsteroidId) -> Option<AsteroidSnapshot> {
        self.asteroids.get(&id).map(AsteroidSnapshot::from)
    }

    pub fn snapshots(&self) -> Vec<AsteroidSnapshot> {
        self.asteroids.values().map(AsteroidSnapshot::from).collect()
    }

    /// Copies of every asteroid within `radius` (inclusive) of `position`.
    pub fn query_near(&self, position: Vec2, radius: f32) -> Vec<AsteroidSnapshot> {
        let r_sq = radius * radius;
        self.asteroids
            .values()
            .filter(|a| a.position.distance_sq(position) <= r_sq)
            .map(AsteroidSnapshot::from)
            .collect()
    }

    /// First asteroid whose body overlaps a circle of `radius` at `position`.
    pub fn query_collision(&self, position: Vec2, radius: f32) -> Option<AsteroidSnapshot> {
        self.asteroids
            .values()
            .find(|a| a.position.distance(position) < a.size + radius)
            .map(AsteroidSnapshot::from)
    }

    /// Nearest live asteroid strictly inside `radius`; ties go to the lowest id.
    pub fn nearest_alive(&self, position: Vec2, radius: f32) -> Option<AsteroidSnapshot> {
        let mut best: Option<(&Asteroid, f32)> = None;
        for a in self.asteroids.values().filter(|a| a.is_alive()) {
            let d = a.position.distance(position);
            if d >= radius {
                continue;
            }
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((a, d));
            }
        }
        best.map(|(a, _)| AsteroidSnapshot::from(a))
    }

    /// Live asteroid within `tolerance` of `position` on both axes.
    pub fn find_at(&self, position: Vec2, tolerance: f32) -> Option<AsteroidId> {
        self.asteroids
            .values()
            .find(|a| a.is_alive() && a.position.within_box(position, tolerance))
            .map(|a| a.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn field() -> AsteroidField {
        AsteroidField::new(FieldTuning::default(), StdRng::seed_from_u64(7))
    }

    #[test]
    fn weighted_draw_matches_configured_chances() {
        let mut rng = StdRng::seed_from_u64(42);
        let samples = 10_000;
        let mut counts = [0usize; 5];
        for _ in 0..samples {
            let kind = select_asteroid_type(rng.r#gen::<f32>());
            let idx = AsteroidType::ALL
                .iter()
                .position(|k| *k == kind)
                .expect("known type");
            counts[idx] += 1;
        }
        for (i, kind) in AsteroidType::ALL.iter().enumerate() {
            let observed = counts[i] as f32 / samples as f32;
            let expected = kind.tuning().spawn_chance;
            assert!(
                (observed - expected).abs() < 0.02,
                "{kind:?}: observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn draw_past_the_table_falls_back_to_small() {
        assert_eq!(select_asteroid_type(1.5), AsteroidType::Small);
        assert_eq!(select_asteroid_type(0.0), AsteroidType::Small);
        assert_eq!(select_asteroid_type(0.95), AsteroidType::Rare);
        assert_eq!(select_asteroid_type(0.999), AsteroidType::Epic);
    }

    #[test]
    fn spawns_respect_minimum_spacing() {
        let mut field = field();
        let reference = Vec2::new(800.0, 600.0);
        for _ in 0..500 {
            field.spawn(reference);
        }
        let all = field.snapshots();
        assert!(!all.is_empty());
        let min = field.tuning().min_distance;
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(a.position.distance(b.position) >= min);
            }
        }
    }

    #[test]
    fn spawn_lands_inside_world_bounds() {
        let mut field = field();
        // Reference in a corner forces clamping.
        for _ in 0..50 {
            field.spawn(Vec2::new(0.0, 0.0));
        }
        let t = *field.tuning();
        for a in field.snapshots() {
            assert!(a.position.x >= t.bounds_margin && a.position.x <= t.bounds.width - t.bounds_margin);
            assert!(a.position.y >= t.bounds_margin && a.position.y <= t.bounds.height - t.bounds_margin);
        }
    }

    #[test]
    fn advance_spawns_once_per_interval_and_respects_cap() {
        let mut field = field();
        let reference = Vec2::new(800.0, 600.0);

        field.advance(1.0 / 60.0, 0, reference);
        let after_first = field.len();
        assert!(after_first <= 1);

        // Inside the interval: no new attempt.
        field.advance(1.0 / 60.0, 4_000, reference);
        assert_eq!(field.len(), after_first);

        let mut tuning = FieldTuning::default();
        tuning.max_asteroids = 0;
        let mut capped = AsteroidField::new(tuning, StdRng::seed_from_u64(1));
        capped.advance(1.0 / 60.0, 10_000, reference);
        assert!(capped.is_empty());
    }

    #[test]
    fn advance_culls_far_asteroids() {
        let mut field = field();
        let near = field.place(AsteroidType::Small, Vec2::new(100.0, 100.0));
        let far = field.place(AsteroidType::Small, Vec2::new(1500.0, 1100.0));
        field.advance(1.0 / 60.0, 0, Vec2::new(100.0, 100.0));
        assert!(field.get(near).is_some());
        assert!(field.get(far).is_none());
    }

    #[test]
    fn advance_rotates_asteroids() {
        let mut field = field();
        let id = field.place(AsteroidType::Epic, Vec2::new(100.0, 100.0));
        field.advance(1.0 / 60.0, 0, Vec2::new(100.0, 100.0));
        let rot = field.get(id).expect("asteroid kept").rotation;
        assert!((rot - 0.03).abs() < 1e-4);
    }

    #[test]
    fn mining_reduces_health_and_pool_and_sets_flag() {
        let mut field = field();
        let id = field.place(AsteroidType::Medium, Vec2::new(0.0, 0.0));

        let y = field.mine(id, 1.0).expect("asteroid exists");
        assert_eq!(y.extracted, Ore::new(2, 1, 0, 0));
        assert_eq!(y.health, 90.0);
        assert!(!y.destroyed);

        let snap = field.get(id).expect("still alive");
        assert_eq!(snap.pool, Ore::new(23, 14, 2, 5));
        assert!(snap.being_mined);

        field.begin_frame();
        assert!(!field.get(id).expect("still alive").being_mined);
    }

    #[test]
    fn mined_out_asteroid_disappears() {
        let mut field = field();
        let id = field.place(AsteroidType::Small, Vec2::new(0.0, 0.0));
        let mut last_health = 50.0;
        loop {
            let y = field.mine(id, 1.0).expect("alive until destroyed");
            assert!(y.health <= last_health);
            last_health = y.health;
            if y.destroyed {
                break;
            }
        }
        assert!(field.get(id).is_none());
        assert!(field.snapshots().iter().all(|a| a.id != id));
        assert!(field.mine(id, 1.0).is_none());
    }

    #[test]
    fn query_near_returns_copies() {
        let mut field = field();
        let id = field.place(AsteroidType::Small, Vec2::new(10.0, 0.0));
        field.place(AsteroidType::Small, Vec2::new(500.0, 0.0));

        let mut near = field.query_near(Vec2::new(0.0, 0.0), 10.0);
        assert_eq!(near.len(), 1);
        near[0].health = 0.0;
        assert_eq!(field.get(id).expect("untouched").health, 50.0);
    }

    #[test]
    fn collision_uses_size_plus_radius() {
        let mut field = field();
        field.place(AsteroidType::Small, Vec2::new(0.0, 0.0));
        assert!(field.query_collision(Vec2::new(34.0, 0.0), 15.0).is_some());
        assert!(field.query_collision(Vec2::new(35.0, 0.0), 15.0).is_none());
    }

    #[test]
    fn nearest_alive_breaks_ties_by_lowest_id() {
        let mut field = field();
        let first = field.place(AsteroidType::Small, Vec2::new(-20.0, 0.0));
        field.place(AsteroidType::Small, Vec2::new(20.0, 0.0));
        let hit = field.nearest_alive(Vec2::new(0.0, 0.0), 300.0).expect("in range");
        assert_eq!(hit.id, first);
        assert!(field.nearest_alive(Vec2::new(1000.0, 1000.0), 300.0).is_none());
    }

    #[test]
    fn find_at_uses_per_axis_tolerance() {
        let mut field = field();
        let id = field.place(AsteroidType::Small, Vec2::new(100.0, 100.0));
        assert_eq!(field.find_at(Vec2::new(109.0, 91.0), 10.0), Some(id));
        assert_eq!(field.find_at(Vec2::new(110.0, 100.0), 10.0), None);
    }
}
