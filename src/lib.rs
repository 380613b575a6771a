// Library exports for the portfolio Battlesnake
// The server binary and the offline `decide` tool both drive the engine through these modules;
// the Rocket routes live here too so they can be mounted in tests

pub mod agent;
pub mod board;
pub mod bot;
pub mod config;
pub mod error;
pub mod expansion;
pub mod handler;
pub mod heuristics;
pub mod pathfinding;
pub mod portfolio;
pub mod rules;
pub mod sampling;
pub mod snapshot;
pub mod types;
