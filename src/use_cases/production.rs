use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::ledger::LedgerService;
use crate::domain::{LedgerError, ProductionDelta};

// Passive production job. Runs independently of connected clients.
pub struct ProductionScheduler {
    ledger: Arc<LedgerService>,
    // Listeners hear about every Nth committed tick.
    publish_every: u64,
    committed: u64,
}

impl ProductionScheduler {
    pub fn new(ledger: Arc<LedgerService>, publish_every: u64) -> Self {
        Self {
            ledger,
            publish_every: publish_every.max(1),
            committed: 0,
        }
    }

    pub fn committed_ticks(&self) -> u64 {
        self.committed
    }

    /// Commits `dt_secs` of production, publishing on the configured cadence.
    pub async fn tick(&mut self, dt_secs: f64) -> Result<ProductionDelta, LedgerError> {
        let (delta, ledger) = self.ledger.apply_production(dt_secs).await?;
        self.committed += 1;
        if self.committed % self.publish_every == 0 {
            self.ledger.publish(ledger);
        }
        Ok(delta)
    }
}

pub async fn production_task(
    mut scheduler: ProductionScheduler,
    period: Duration,
    shutdown: Arc<Notify>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; start measuring from it.
    interval.tick().await;
    let mut last = Instant::now();
    let mut last_failure_log: Option<Instant> = None;

    info!(period_ms = period.as_millis() as u64, "production scheduler started");

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                break;
            }
            _ = interval.tick() => {}
        }

        // Elapsed time is consumed even when the tick fails, so an outage is not
        // credited later in one large step.
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        match scheduler.tick(dt).await {
            Ok(delta) => {
                debug!(
                    dt,
                    crystals = delta.crystals,
                    energy = delta.energy,
                    research = delta.research,
                    reputation = delta.reputation,
                    "production tick committed"
                );
            }
            Err(e) => {
                if last_failure_log.is_none_or(|at| at.elapsed() >= FAILURE_LOG_THROTTLE) {
                    last_failure_log = Some(Instant::now());
                    warn!(error = e.message(), "production tick skipped");
                }
            }
        }
    }

    info!(
        committed = scheduler.committed_ticks(),
        "production scheduler stopped"
    );
}

const FAILURE_LOG_THROTTLE: Duration = Duration::from_secs(10);
