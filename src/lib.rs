// Library exports for the snake bot simulation
// The driver binaries and integration tests use the simulator and bots through here

pub mod bots;
pub mod config;
pub mod debug_logger;
pub mod driver;
pub mod game;
pub mod grid;
pub mod pathfinding;
pub mod types;
