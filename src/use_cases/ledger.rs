use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tracing::{info, warn};

use super::types::{GameStats, LedgerUpdate};
use crate::domain::errors::LedgerError;
use crate::domain::ports::LedgerStore;
use crate::domain::state::GameState;
use crate::domain::systems::production::compute_production;
use crate::domain::tuning::production::ProductionTuning;
use crate::domain::upgrade::{Upgrade, find_upgrade, ship_boosts};
use crate::domain::{Cost, Ledger, Ore, ProductionDelta, ShipBoosts, ShipType};

// Single writer for the persisted ledger and upgrades.
// Every read-modify-write holds `write_lock` across load and save, so the
// production tick, session deposits and HTTP purchases never overwrite each other.
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
    tuning: ProductionTuning,
    write_lock: Mutex<()>,
    updates: broadcast::Sender<LedgerUpdate>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn LedgerStore>, tuning: ProductionTuning, update_buffer: usize) -> Self {
        let (updates, _) = broadcast::channel(update_buffer);
        Self {
            store,
            tuning,
            write_lock: Mutex::new(()),
            updates,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerUpdate> {
        self.updates.subscribe()
    }

    /// Sends the ledger to every listener. Having no listeners is not an error.
    pub fn publish(&self, ledger: Ledger) {
        let _ = self.updates.send(LedgerUpdate { ledger });
    }

    /// Loads the persisted state, seeding the starting ledger when none exists.
    pub async fn initialize(&self) -> Result<GameState, LedgerError> {
        let _guard = self.write_lock.lock().await;
        if let Some(state) = self.load().await? {
            return Ok(state);
        }

        let state = GameState::default();
        self.save(&state).await?;
        info!(
            crystals = state.ledger.crystals,
            energy = state.ledger.energy,
            "seeded starting ledger"
        );
        Ok(state)
    }

    pub async fn snapshot(&self) -> Result<GameState, LedgerError> {
        self.load().await?.ok_or(LedgerError::NotInitialized)
    }

    /// Commits `dt_secs` of passive production and returns the delta with the new ledger.
    ///
    /// Does not publish; the scheduler decides how often listeners hear about ticks.
    pub async fn apply_production(
        &self,
        dt_secs: f64,
    ) -> Result<(ProductionDelta, Ledger), LedgerError> {
        let tuning = self.tuning;
        let (state, delta) = self
            .modify(|state| {
                let delta = compute_production(&state.ledger, &state.upgrades, dt_secs, &tuning);
                state.ledger.apply(&delta);
                Ok(delta)
            })
            .await?;
        Ok((delta, state.ledger))
    }

    /// Credits mined ore to the ledger.
    pub async fn deposit(&self, ore: &Ore) -> Result<Ledger, LedgerError> {
        if ore.is_empty() {
            return Err(LedgerError::EmptyDeposit);
        }

        let (state, ()) = self
            .modify(|state| {
                state.ledger.credit_ore(ore);
                Ok(())
            })
            .await?;
        self.publish(state.ledger);
        Ok(state.ledger)
    }

    pub async fn debit(&self, cost: &Cost) -> Result<Ledger, LedgerError> {
        let (state, ()) = self.modify(|state| debit_state(state, cost)).await?;
        self.publish(state.ledger);
        Ok(state.ledger)
    }

    /// Charges the deploy cost of `kind` and returns the ship boosts in effect.
    pub async fn charge_for_ship(&self, kind: ShipType) -> Result<ShipBoosts, LedgerError> {
        let cost = kind.tuning().cost;
        let (state, boosts) = self
            .modify(|state| {
                debit_state(state, &cost)?;
                Ok(ship_boosts(&state.upgrades))
            })
            .await?;
        self.publish(state.ledger);
        Ok(boosts)
    }

    pub async fn purchase_upgrade(&self, upgrade_id: &str) -> Result<GameState, LedgerError> {
        let def = find_upgrade(upgrade_id).ok_or(LedgerError::UnknownUpgrade)?;

        let (state, ()) = self
            .modify(|state| {
                if state.has_upgrade(def.id) {
                    return Err(LedgerError::AlreadyPurchased);
                }
                debit_state(state, &def.cost)?;
                state.upgrades.push(Upgrade::from(def));
                Ok(())
            })
            .await?;

        info!(upgrade_id = def.id, "upgrade purchased");
        self.publish(state.ledger);
        Ok(state)
    }

    pub async fn game_stats(&self) -> Result<GameStats, LedgerError> {
        let state = self.snapshot().await?;
        let production_per_second =
            compute_production(&state.ledger, &state.upgrades, 1.0, &self.tuning);
        Ok(GameStats {
            ledger: state.ledger,
            production_per_second,
            upgrades: state.upgrades,
        })
    }

    pub async fn ship_boosts(&self) -> Result<ShipBoosts, LedgerError> {
        let state = self.snapshot().await?;
        Ok(ship_boosts(&state.upgrades))
    }

    async fn modify<T, F>(&self, f: F) -> Result<(GameState, T), LedgerError>
    where
        F: FnOnce(&mut GameState) -> Result<T, LedgerError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut state = self.load().await?.ok_or(LedgerError::NotInitialized)?;
        let out = f(&mut state)?;
        self.save(&state).await?;
        Ok((state, out))
    }

    async fn load(&self) -> Result<Option<GameState>, LedgerError> {
        self.store.load().await.map_err(|e| {
            warn!(error = %e, "ledger load failed");
            LedgerError::StorageFailure
        })
    }

    async fn save(&self, state: &GameState) -> Result<(), LedgerError> {
        self.store.save(state).await.map_err(|e| {
            warn!(error = %e, "ledger save failed");
            LedgerError::StorageFailure
        })
    }
}

fn debit_state(state: &mut GameState, cost: &Cost) -> Result<(), LedgerError> {
    if !state.ledger.covers(cost) {
        return Err(LedgerError::InsufficientResources);
    }
    state.ledger.debit(cost);
    Ok(())
}
