//! Player commands sent from a host to the simulation.
//!
//! Commands are either applied immediately between ticks
//! (`SimulationEngine::apply_command`) or queued for processing at the next
//! tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Point, TowerId};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Waves ---
    /// Begin spawning the next authored wave.
    StartWave,

    // --- Towers ---
    /// Buy and place a tower.
    PlaceTower { kind: TowerKind, position: Point },
    /// Buy the next tier on one upgrade path. Cost comes from the catalog.
    UpgradeTower { tower: TowerId, path: UpgradePath },
    /// Remove a tower for a partial refund.
    SellTower { tower: TowerId },
    /// Change how a tower picks its target.
    SetTargetingMode { tower: TowerId, mode: TargetingMode },

    // --- Map ---
    /// Replace the enemy path.
    SetPath { waypoints: Vec<Point> },

    // --- Simulation control ---
    SetSpeed { speed: GameSpeed },
    Pause,
    Resume,
    /// Reset to a fresh game on the current map.
    NewGame { difficulty: Difficulty },
}

/// What an accepted command did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandOutcome {
    WaveStarted { wave: u32 },
    TowerPlaced { tower: TowerId },
    TowerUpgraded {
        tower: TowerId,
        path: UpgradePath,
        level: u32,
    },
    TowerSold { tower: TowerId, refund: u32 },
    /// Accepted with nothing further to report.
    Applied,
}
