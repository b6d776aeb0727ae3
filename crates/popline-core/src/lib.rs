//! Core types and definitions for the popline simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, entity structs, the static unit catalogs, commands, state
//! snapshots, events, and constants. It has no dependency on the ECS or
//! any runtime framework.

pub mod catalog;
pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
