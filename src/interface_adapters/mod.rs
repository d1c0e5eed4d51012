// Interface adapters: wire protocol, HTTP API and network handling.

pub mod http;
pub mod net;
pub mod protocol;
pub mod routes;
pub mod state;
