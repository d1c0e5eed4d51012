// Domain layer: core simulation types and rules.

pub mod agent;
pub mod asteroid;
pub mod errors;
pub mod geometry;
pub mod ports;
pub mod resources;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod upgrade;

pub use agent::{AgentId, AgentSnapshot, AgentState, Delivery, FleetStats, ShipBoosts, ShipType};
pub use asteroid::{AsteroidId, AsteroidSnapshot, AsteroidType};
pub use errors::{DeployError, LedgerError};
pub use geometry::Vec2;
pub use resources::{Cost, Ledger, Ore, ProductionDelta};
pub use state::GameState;
