//! Simulation engine for popline.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for hosts.

pub mod economy;
pub mod engine;
pub mod path;
pub mod placement;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use popline_core as core;

#[cfg(test)]
mod tests;
