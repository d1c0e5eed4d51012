// Network adapter modules split by the client WebSocket and the JSON HTTP API.

pub mod api;
pub mod client;

pub use api::{
    game_stats_handler, health_handler, mining_handler, purchase_upgrade_handler,
    resources_handler, upgrades_handler,
};
pub use client::ws_handler;
