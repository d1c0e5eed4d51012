// Per-ship behavior cycle: deploy to a staging point, seek the nearest
// asteroid, mine it, haul the cargo back to the reference position.

use crate::domain::agent::{Agent, AgentState, Delivery};
use crate::domain::geometry::Vec2;
use crate::domain::resources::Ore;
use crate::domain::systems::field::AsteroidField;
use crate::domain::tuning::ship::AgentTuning;
use rand::Rng;
use std::f32::consts::TAU;
use tracing::debug;

/// Inputs shared by every agent tick in one fleet pass.
#[derive(Debug, Clone, Copy)]
pub struct AgentContext<'a> {
    pub reference: Vec2,
    pub now_ms: u64,
    pub tuning: &'a AgentTuning,
}

/// Runs one state-machine step. Returns the cargo handed over, if any.
///
/// Every branch makes at most one state transition.
pub fn tick_agent<R: Rng>(
    agent: &mut Agent,
    field: &mut AsteroidField,
    ctx: &AgentContext<'_>,
    rng: &mut R,
) -> Option<Delivery> {
    match agent.state {
        AgentState::Deploying => {
            tick_deploying(agent, ctx, rng);
            None
        }
        AgentState::Idle => {
            tick_idle(agent, field, ctx);
            None
        }
        AgentState::Mining => {
            tick_mining(agent, field, ctx);
            None
        }
        AgentState::Returning => tick_returning(agent, ctx),
    }
}

fn transition(agent: &mut Agent, next: AgentState) {
    debug!(agent_id = agent.id.0, from = ?agent.state, to = ?next, "agent state change");
    agent.state = next;
}

fn tick_deploying<R: Rng>(agent: &mut Agent, ctx: &AgentContext<'_>, rng: &mut R) {
    let target = match agent.target {
        Some(target) => target,
        None => {
            let angle = rng.gen_range(0.0..TAU);
            let distance = ctx.tuning.staging_min_distance
                + rng.gen_range(0.0..ctx.tuning.staging_distance_span);
            let target = ctx.reference.offset_polar(angle, distance);
            agent.target = Some(target);
            target
        }
    };

    if agent.position.distance(target) < ctx.tuning.staging_arrival_radius {
        agent.target = None;
        transition(agent, AgentState::Idle);
    } else {
        agent.position = agent.position.step_toward(target, agent.speed);
    }
}

fn tick_idle(agent: &mut Agent, field: &AsteroidField, ctx: &AgentContext<'_>) {
    let Some(nearest) = field.nearest_alive(agent.position, ctx.tuning.search_radius) else {
        agent.target = None;
        transition(agent, AgentState::Returning);
        return;
    };

    agent.target = Some(nearest.position);
    if agent.position.distance(nearest.position) < ctx.tuning.mining_range {
        transition(agent, AgentState::Mining);
    } else {
        agent.position = agent.position.step_toward(nearest.position, agent.speed);
    }
}

fn tick_mining(agent: &mut Agent, field: &mut AsteroidField, ctx: &AgentContext<'_>) {
    // Re-locate every tick so a vanished target releases the ship immediately.
    let located = agent
        .target
        .and_then(|target| field.find_at(target, ctx.tuning.target_tolerance));
    let Some(asteroid_id) = located else {
        agent.target = None;
        transition(agent, AgentState::Idle);
        return;
    };

    let ready = agent
        .last_mined_at
        .is_none_or(|last| ctx.now_ms.saturating_sub(last) > ctx.tuning.mining_cooldown_ms);
    if !ready {
        return;
    }

    let Some(mined) = field.mine(asteroid_id, agent.mining_rate) else {
        agent.target = None;
        transition(agent, AgentState::Idle);
        return;
    };

    let loaded: Ore = mined.extracted.take_up_to(agent.cargo_room());
    agent.cargo.add(&loaded);
    agent.last_mined_at = Some(ctx.now_ms);
    debug!(
        agent_id = agent.id.0,
        asteroid_id = asteroid_id.0,
        loaded = loaded.total(),
        spilled = mined.extracted.total().saturating_sub(loaded.total()),
        cargo = agent.cargo_load(),
        "agent mined"
    );

    if mined.destroyed || agent.cargo_room() == 0 {
        agent.target = None;
        transition(agent, AgentState::Returning);
    }
}

fn tick_returning(agent: &mut Agent, ctx: &AgentContext<'_>) -> Option<Delivery> {
    if agent.position.distance(ctx.reference) < ctx.tuning.delivery_radius {
        let ore = std::mem::take(&mut agent.cargo);
        agent.target = None;
        transition(agent, AgentState::Idle);
        if ore.is_empty() {
            return None;
        }
        debug!(agent_id = agent.id.0, delivered = ore.total(), "agent delivered cargo");
        return Some(Delivery {
            agent_id: agent.id,
            ore,
        });
    }

    agent.target = Some(ctx.reference);
    agent.position = agent.position.step_toward(ctx.reference, agent.speed);
    None
}
