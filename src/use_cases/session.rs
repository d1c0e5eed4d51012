use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::sync::{Notify, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::ledger::LedgerService;
use super::types::{SessionEvent, SessionNotice, WorldUpdate};
use crate::domain::systems::field::{AsteroidField, MiningYield};
use crate::domain::systems::fleet::FleetCoordinator;
use crate::domain::tuning::asteroid::FieldTuning;
use crate::domain::tuning::player::PlayerTuning;
use crate::domain::tuning::ship::AgentTuning;
use crate::domain::{AgentId, AsteroidId, DeployError, Ore, ShipType, Vec2};

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub frame_interval: Duration,
    pub field: FieldTuning,
    pub agents: AgentTuning,
    pub player: PlayerTuning,
    pub event_buffer: usize,
    pub notice_buffer: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_secs_f64(1.0 / 60.0),
            field: FieldTuning::default(),
            agents: AgentTuning::default(),
            player: PlayerTuning::default(),
            event_buffer: 256,
            notice_buffer: 64,
        }
    }
}

/// One player's world: the asteroid field, the fleet, and the player's ship.
pub struct GameSession {
    id: u64,
    ledger: Arc<LedgerService>,
    player_tuning: PlayerTuning,
    field: AsteroidField,
    fleet: FleetCoordinator,
    player: Vec2,
    mining_mode: bool,
    last_auto_mine_at: Option<u64>,
    frame: u64,
}

impl GameSession {
    pub fn new(
        id: u64,
        ledger: Arc<LedgerService>,
        settings: &SessionSettings,
        field_rng: StdRng,
        fleet_rng: StdRng,
    ) -> Self {
        Self {
            id,
            ledger,
            player_tuning: settings.player,
            field: AsteroidField::new(settings.field, field_rng),
            fleet: FleetCoordinator::new(settings.agents, fleet_rng),
            player: settings.field.bounds.center(),
            mining_mode: false,
            last_auto_mine_at: None,
            frame: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn player_position(&self) -> Vec2 {
        self.player
    }

    /// Runs one frame: queued events, auto-mining, field and fleet, deliveries.
    pub async fn run_frame(
        &mut self,
        events: Vec<SessionEvent>,
        dt_secs: f32,
        now_ms: u64,
    ) -> Vec<SessionNotice> {
        self.field.begin_frame();

        let mut notices = Vec::new();
        for event in events {
            if let Some(notice) = self.handle_event(event).await {
                notices.push(notice);
            }
        }

        if let Some(notice) = self.auto_mine(now_ms).await {
            notices.push(notice);
        }

        self.field.advance(dt_secs, now_ms, self.player);
        let deliveries = self.fleet.advance(&mut self.field, self.player, now_ms);
        for delivery in deliveries {
            debug!(
                session_id = self.id,
                agent_id = delivery.agent_id.0,
                amount = delivery.ore.total(),
                "cargo delivered"
            );
            self.deposit(&delivery.ore).await;
        }

        self.frame += 1;
        notices
    }

    pub fn world_update(&self) -> WorldUpdate {
        WorldUpdate {
            frame: self.frame,
            player: self.player,
            mining_mode: self.mining_mode,
            asteroids: self.field.snapshots(),
            agents: self.fleet.snapshots(),
            fleet: self.fleet.stats(),
        }
    }

    async fn handle_event(&mut self, event: SessionEvent) -> Option<SessionNotice> {
        match event {
            SessionEvent::PlayerMoved { position } => {
                if position.x.is_finite() && position.y.is_finite() {
                    self.player = self
                        .field
                        .tuning()
                        .bounds
                        .clamp(position, self.player_tuning.bounds_margin);
                }
                None
            }
            SessionEvent::Mine { asteroid_id, power } => self.mine(asteroid_id, power).await,
            SessionEvent::SetMiningMode { enabled } => {
                self.mining_mode = enabled;
                if !enabled {
                    self.last_auto_mine_at = None;
                }
                None
            }
            SessionEvent::Deploy { kind } => Some(self.deploy(kind).await),
            SessionEvent::Recall { agent_id } => Some(self.recall(agent_id)),
        }
    }

    async fn mine(&mut self, asteroid_id: AsteroidId, power: f32) -> Option<SessionNotice> {
        if !power.is_finite() || power <= 0.0 {
            return Some(SessionNotice::Rejected {
                reason: "invalid mining power",
            });
        }

        // Unknown or already mined-out asteroids are a silent no-op.
        let mined = self.field.mine(asteroid_id, power)?;
        Some(self.collect(mined).await)
    }

    async fn auto_mine(&mut self, now_ms: u64) -> Option<SessionNotice> {
        if !self.mining_mode {
            return None;
        }
        let interval = self.player_tuning.auto_mine_interval_ms;
        if !self
            .last_auto_mine_at
            .is_none_or(|last| now_ms.saturating_sub(last) >= interval)
        {
            return None;
        }
        self.last_auto_mine_at = Some(now_ms);

        let target = self
            .field
            .nearest_alive(self.player, self.player_tuning.auto_mine_range)?;
        let mined = self
            .field
            .mine(target.id, self.player_tuning.mining_power)?;
        Some(self.collect(mined).await)
    }

    async fn collect(&mut self, mined: MiningYield) -> SessionNotice {
        self.deposit(&mined.extracted).await;
        SessionNotice::Mined {
            asteroid_id: mined.asteroid_id,
            extracted: mined.extracted,
            destroyed: mined.destroyed,
        }
    }

    async fn deposit(&self, ore: &Ore) {
        if ore.is_empty() {
            return;
        }
        if let Err(e) = self.ledger.deposit(ore).await {
            warn!(session_id = self.id, error = e.message(), "failed to deposit mined ore");
        }
    }

    async fn deploy(&mut self, kind: ShipType) -> SessionNotice {
        match self.ledger.charge_for_ship(kind).await {
            Ok(boosts) => {
                self.fleet.set_boosts(boosts);
                SessionNotice::Deployed(self.fleet.deploy(kind, self.player))
            }
            Err(e) => {
                let reason = DeployError::from(e).message();
                info!(session_id = self.id, ship_type = kind.as_str(), reason, "deploy rejected");
                SessionNotice::Rejected { reason }
            }
        }
    }

    fn recall(&mut self, agent_id: AgentId) -> SessionNotice {
        match self.fleet.recall(agent_id) {
            Some(agent) => SessionNotice::Recalled(agent),
            None => SessionNotice::Rejected {
                reason: "unknown agent",
            },
        }
    }
}

/// Channels owned by the connection that drives a session.
pub struct SessionHandle {
    pub session_id: u64,
    pub events: mpsc::Sender<SessionEvent>,
    pub notices: mpsc::Receiver<SessionNotice>,
    pub world: watch::Receiver<WorldUpdate>,
    pub shutdown: Arc<Notify>,
    pub task: JoinHandle<()>,
}

pub fn spawn_session(
    session_id: u64,
    ledger: Arc<LedgerService>,
    settings: SessionSettings,
) -> SessionHandle {
    let session = GameSession::new(
        session_id,
        ledger,
        &settings,
        StdRng::from_entropy(),
        StdRng::from_entropy(),
    );
    let (events_tx, events_rx) = mpsc::channel(settings.event_buffer);
    let (notices_tx, notices_rx) = mpsc::channel(settings.notice_buffer);
    let (world_tx, world_rx) = watch::channel(session.world_update());
    let shutdown = Arc::new(Notify::new());

    let task = tokio::spawn(session_task(
        session,
        events_rx,
        notices_tx,
        world_tx,
        settings.frame_interval,
        shutdown.clone(),
    ));

    SessionHandle {
        session_id,
        events: events_tx,
        notices: notices_rx,
        world: world_rx,
        shutdown,
        task,
    }
}

pub async fn session_task(
    mut session: GameSession,
    mut events_rx: mpsc::Receiver<SessionEvent>,
    notices_tx: mpsc::Sender<SessionNotice>,
    world_tx: watch::Sender<WorldUpdate>,
    frame_interval: Duration,
    shutdown: Arc<Notify>,
) {
    let session_id = session.id();
    let mut interval = tokio::time::interval(frame_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let start = Instant::now();
    let mut last = start;
    let mut dropped_notices: u64 = 0;

    info!(session_id, "session started");

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                break;
            }
            _ = interval.tick() => {}
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        let now_ms = now.duration_since(start).as_millis() as u64;

        let mut events = Vec::new();
        let mut inputs_closed = false;
        loop {
            match events_rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    inputs_closed = true;
                    break;
                }
            }
        }

        for notice in session.run_frame(events, dt, now_ms).await {
            match notices_tx.try_send(notice) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => dropped_notices += 1,
                Err(TrySendError::Closed(_)) => inputs_closed = true,
            }
        }

        // No receivers left means the connection is gone.
        if world_tx.send(session.world_update()).is_err() || inputs_closed {
            break;
        }
    }

    info!(
        session_id,
        frames = session.frame,
        dropped_notices,
        "session ended"
    );
}
