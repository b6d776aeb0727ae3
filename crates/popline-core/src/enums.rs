//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::{FAST_SPEED_MULTIPLIER, NORMAL_SPEED_MULTIPLIER};

/// Enemy tier, weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    Red,
    Blue,
    Green,
    Yellow,
    Pink,
    Black,
    White,
    Zebra,
    Rainbow,
    Ceramic,
    Moab,
    Bfb,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 12] = [
        EnemyKind::Red,
        EnemyKind::Blue,
        EnemyKind::Green,
        EnemyKind::Yellow,
        EnemyKind::Pink,
        EnemyKind::Black,
        EnemyKind::White,
        EnemyKind::Zebra,
        EnemyKind::Rainbow,
        EnemyKind::Ceramic,
        EnemyKind::Moab,
        EnemyKind::Bfb,
    ];
}

/// Tower type. Selects the catalog entry for base stats and upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    DartMonkey,
    TackShooter,
    SniperMonkey,
    BoomerangThrower,
    NinjaMonkey,
    BombTower,
    IceTower,
    GlueGunner,
    MonkeyBuccaneer,
    SuperMonkey,
    MonkeyApprentice,
    SpikeFactory,
    RoadSpikes,
    ExplodingPineapple,
}

impl TowerKind {
    pub const ALL: [TowerKind; 14] = [
        TowerKind::DartMonkey,
        TowerKind::TackShooter,
        TowerKind::SniperMonkey,
        TowerKind::BoomerangThrower,
        TowerKind::NinjaMonkey,
        TowerKind::BombTower,
        TowerKind::IceTower,
        TowerKind::GlueGunner,
        TowerKind::MonkeyBuccaneer,
        TowerKind::SuperMonkey,
        TowerKind::MonkeyApprentice,
        TowerKind::SpikeFactory,
        TowerKind::RoadSpikes,
        TowerKind::ExplodingPineapple,
    ];
}

/// Policy a tower uses to pick one enemy out of the eligible set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetingMode {
    /// Furthest along the path.
    #[default]
    First,
    /// Least far along the path.
    Last,
    /// Highest layer, ties broken by current health.
    Strong,
    /// Nearest to the tower.
    Close,
}

/// One of the two mutually exclusive upgrade tracks of a tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradePath {
    Path1,
    Path2,
}

impl UpgradePath {
    /// The path that gets locked when this one is chosen.
    pub fn other(self) -> Self {
        match self {
            UpgradePath::Path1 => UpgradePath::Path2,
            UpgradePath::Path2 => UpgradePath::Path1,
        }
    }
}

/// Game speed setting. Widens the per-tick elapsed time rather than
/// running extra ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameSpeed {
    #[default]
    Normal,
    Fast,
}

impl GameSpeed {
    pub fn multiplier(self) -> f64 {
        match self {
            GameSpeed::Normal => NORMAL_SPEED_MULTIPLIER,
            GameSpeed::Fast => FAST_SPEED_MULTIPLIER,
        }
    }
}

/// Difficulty preset. Determines the defender's starting resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Impoppable,
}

impl Difficulty {
    pub fn starting_money(self) -> u32 {
        match self {
            Difficulty::Easy => 1000,
            Difficulty::Medium => 650,
            Difficulty::Hard => 400,
            Difficulty::Impoppable => 250,
        }
    }

    pub fn starting_health(self) -> u32 {
        match self {
            Difficulty::Easy => 150,
            Difficulty::Medium => 100,
            Difficulty::Hard => 75,
            Difficulty::Impoppable => 1,
        }
    }
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks advance the battlefield.
    #[default]
    Running,
    /// Ticks are no-ops until resumed.
    Paused,
    /// All waves cleared with no enemies remaining.
    Victory,
    /// Defender health reached zero.
    Defeat,
}

impl GamePhase {
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Defeat)
    }
}
