//! Events emitted by the simulation for UI and audio feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::error::CommandRejection;
use crate::types::{EnemyId, ProjectileId, TowerId};

/// Something that happened since the previous snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    WaveStarted {
        wave: u32,
    },
    /// The wave finished spawning and every enemy is gone.
    WaveCompleted {
        wave: u32,
        reward: u32,
    },
    TowerFired {
        tower: TowerId,
        enemy: EnemyId,
        projectile: ProjectileId,
    },
    /// An enemy's health reached zero.
    EnemyPopped {
        enemy: EnemyId,
        kind: EnemyKind,
        cash: u32,
        children: u32,
    },
    /// An enemy reached the end of the path.
    EnemyLeaked {
        enemy: EnemyId,
        kind: EnemyKind,
        damage: u32,
    },
    TowerPlaced {
        tower: TowerId,
        kind: TowerKind,
        cost: u32,
    },
    TowerUpgraded {
        tower: TowerId,
        path: UpgradePath,
        level: u32,
        cost: u32,
    },
    TowerSold {
        tower: TowerId,
        refund: u32,
    },
    /// A queued command failed validation.
    CommandRejected {
        reason: CommandRejection,
    },
    Victory,
    Defeat,
}
