pub mod agent;
pub mod field;
pub mod fleet;
pub mod mining;
pub mod production;
