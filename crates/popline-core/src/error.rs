//! Reasons a player command can be refused.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::UpgradePath;
use crate::types::TowerId;

/// A command that failed validation. Rejection never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CommandRejection {
    #[error("a wave is already spawning")]
    WaveInProgress,
    #[error("enemies from the previous wave are still alive")]
    EnemiesRemaining,
    #[error("every wave has already been started")]
    NoWavesRemaining,
    #[error("the game is over")]
    GameOver,
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },
    #[error("position is too close to the path")]
    OnPath,
    #[error("position is too close to another tower")]
    TooCloseToTower,
    #[error("position is outside the playable area")]
    OutOfBounds,
    #[error("no tower with id {0}")]
    UnknownTower(TowerId),
    #[error("upgrade path locked: {other:?} already upgraded")]
    PathLocked { other: UpgradePath },
    #[error("no further upgrades on this path")]
    MaxUpgradeLevel,
    #[error("a path needs at least two waypoints")]
    InvalidPath,
}
