// Frameworks layer: runtime bootstrap, configuration and storage backends.

pub mod config;
pub mod server;
pub mod store;
