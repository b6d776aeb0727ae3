//! Popline headless host.
//!
//! Loads a TOML session config and drives the simulation either as fast
//! as possible or from a 30 Hz loop thread.

pub mod config;
pub mod game_loop;
pub mod runner;
pub mod session;
pub mod state;

pub use popline_core as core;
