//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions that take `&mut World` (or `&World` for
//! read-only). Per-entity rules are exposed as pure `advance`-style
//! functions next to each system's `run`.

pub mod cleanup;
pub mod decomposition;
pub mod fire_control;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod wave_spawner;
