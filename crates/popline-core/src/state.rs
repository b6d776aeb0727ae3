//! Game state snapshot: the complete visible state published after each tick.

use serde::{Deserialize, Serialize};

use crate::components::{CapabilitySet, UpgradeLevels};
use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{EnemyId, Point, ProjectileId, SimTime, TowerId};

/// Complete game state published after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub speed: GameSpeed,
    pub difficulty: Difficulty,
    pub wave: WaveView,
    pub economy: EconomyView,
    /// Waypoints of the path enemies follow.
    pub path: Vec<Point>,
    /// Sorted by id.
    pub enemies: Vec<EnemyView>,
    /// Sorted by id.
    pub towers: Vec<TowerView>,
    /// Sorted by id.
    pub projectiles: Vec<ProjectileView>,
    pub score: ScoreView,
    /// Events produced since the previous snapshot.
    pub events: Vec<GameEvent>,
}

/// Wave progression status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveView {
    /// Number of waves started so far (1-based wave number of the latest).
    pub current_wave: u32,
    pub total_waves: u32,
    pub is_spawning: bool,
    /// Group of the current wave being emitted.
    pub spawn_index: u32,
}

/// Defender resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyView {
    pub money: u32,
    pub health: u32,
}

/// An enemy as presented to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub position: Point,
    pub angle: f64,
    pub health: f64,
    pub layer: f64,
    pub target: usize,
    pub path_progress: f64,
    pub total_distance: f64,
    /// Active slow fraction, 0 when unaffected.
    pub slow: f64,
    pub is_camo: bool,
    pub is_regrow: bool,
    pub is_moab: bool,
}

/// A tower as presented to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerView {
    pub id: TowerId,
    pub kind: TowerKind,
    pub position: Point,
    pub angle: f64,
    pub range: f64,
    pub fire_rate: f64,
    pub damage: f64,
    pub targeting_mode: TargetingMode,
    pub upgrades: UpgradeLevels,
    pub capabilities: CapabilitySet,
    /// Refund the tower would fetch if sold now.
    pub sell_value: u32,
}

/// A projectile as presented to consumers. Visual fields only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: ProjectileId,
    pub position: Point,
    pub target: Point,
    pub angle: f64,
    pub size: f64,
    pub color: String,
    pub splash_radius: Option<f64>,
}

/// Running totals for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreView {
    pub pops: u32,
    pub leaks: u32,
    /// Cash awarded for pops only.
    pub cash_from_pops: u32,
    /// Cash awarded for clearing waves.
    pub cash_from_waves: u32,
    pub towers_placed: u32,
    pub waves_cleared: u32,
}
