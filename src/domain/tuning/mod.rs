pub mod asteroid;
pub mod player;
pub mod production;
pub mod ship;
