//! Entity components stored in the simulation world.
//!
//! Components are plain data structs. Game logic lives in systems, not
//! components; the only behaviour here is the capability set's lookup
//! helpers.

use std::mem;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EnemyId, Point, ProjectileId, TowerId};

/// Timed status effect carried by an enemy. Slow and damage-over-time share
/// one duration and expire together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    /// Fraction of speed removed (0..1).
    pub slow: f64,
    /// Damage-over-time rate carried with the effect.
    pub dot: f64,
    /// Seconds until the whole effect expires.
    pub duration: f64,
}

/// A hostile unit walking the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    /// Health the enemy was created with. Denominator for health display
    /// and the regrow cap.
    pub layer: f64,
    pub health: f64,
    /// Catalog speed (tiles/sec baseline).
    pub speed: f64,
    pub cash_prize: u32,
    pub position: Point,
    /// Index of the waypoint the current segment starts from.
    pub target: usize,
    /// Fraction (0..1) of the current segment traversed.
    pub path_progress: f64,
    /// Cumulative path distance travelled in pixels.
    pub total_distance: f64,
    /// Facing in radians.
    pub angle: f64,
    pub effects: Option<StatusEffects>,
    pub is_camo: bool,
    pub is_regrow: bool,
    pub is_moab: bool,
    /// Tiers spawned in place of this enemy when it dies, in order.
    pub children: Vec<EnemyKind>,
}

/// Levels reached on each upgrade path. At most one is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevels {
    pub path1: u32,
    pub path2: u32,
}

impl UpgradeLevels {
    pub fn level(&self, path: UpgradePath) -> u32 {
        match path {
            UpgradePath::Path1 => self.path1,
            UpgradePath::Path2 => self.path2,
        }
    }

    pub fn level_mut(&mut self, path: UpgradePath) -> &mut u32 {
        match path {
            UpgradePath::Path1 => &mut self.path1,
            UpgradePath::Path2 => &mut self.path2,
        }
    }
}

/// Special ability granted to a tower by its catalog entry or an upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Capability {
    /// Bloons popped per shot.
    Pierce { count: u32 },
    /// Projectiles damage everything within `radius` of the impact point.
    Splash { radius: f64 },
    /// Projectiles slow the enemy they hit by `factor`.
    Slow { factor: f64 },
    /// Projectiles carry a damage-over-time payload.
    DamageOverTime { rate: f64 },
    /// Tower can target camo enemies.
    CamoDetection,
    Seeking,
    /// Chance of sending a bloon back to the start.
    Distraction { chance: f64 },
    /// Multiplier on projectile flight speed.
    ProjectileSpeed { multiplier: f64 },
    /// Extra damage dealt to MOAB-class enemies.
    MoabBonus { amount: f64 },
    /// Overrides how long applied status effects last.
    FreezeDuration { secs: f64 },
    FreezeDamage,
    Permafrost { factor: f64 },
    FreezeImmune,
    GrapeShot,
}

/// Capabilities attached to a tower, at most one per variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapabilitySet(Vec<Capability>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a capability, replacing any existing one of the same variant.
    pub fn grant(&mut self, capability: Capability) {
        match self
            .0
            .iter_mut()
            .find(|c| mem::discriminant(*c) == mem::discriminant(&capability))
        {
            Some(existing) => *existing = capability,
            None => self.0.push(capability),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn detects_camo(&self) -> bool {
        self.0.contains(&Capability::CamoDetection)
    }

    pub fn splash_radius(&self) -> Option<f64> {
        self.0.iter().find_map(|c| match c {
            Capability::Splash { radius } => Some(*radius),
            _ => None,
        })
    }

    pub fn slow_factor(&self) -> Option<f64> {
        self.0.iter().find_map(|c| match c {
            Capability::Slow { factor } => Some(*factor),
            _ => None,
        })
    }

    pub fn dot_rate(&self) -> Option<f64> {
        self.0.iter().find_map(|c| match c {
            Capability::DamageOverTime { rate } => Some(*rate),
            _ => None,
        })
    }

    pub fn projectile_speed_multiplier(&self) -> f64 {
        self.0
            .iter()
            .find_map(|c| match c {
                Capability::ProjectileSpeed { multiplier } => Some(*multiplier),
                _ => None,
            })
            .unwrap_or(1.0)
    }

    pub fn moab_bonus(&self) -> f64 {
        self.0
            .iter()
            .find_map(|c| match c {
                Capability::MoabBonus { amount } => Some(*amount),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    pub fn effect_duration(&self) -> Option<f64> {
        self.0.iter().find_map(|c| match c {
            Capability::FreezeDuration { secs } => Some(*secs),
            _ => None,
        })
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = CapabilitySet::new();
        for capability in iter {
            set.grant(capability);
        }
        set
    }
}

/// A stationary defensive unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    pub id: TowerId,
    pub kind: TowerKind,
    pub position: Point,
    /// Purchase price. Sell refunds are computed from this.
    pub cost: u32,
    /// Seconds between shots (lower is faster).
    pub fire_rate: f64,
    pub range: f64,
    pub damage: f64,
    /// Cooldown counter. Fires when it reaches zero or below.
    pub target_timer: f64,
    /// Facing in radians, updated on each shot.
    pub angle: f64,
    pub targeting_mode: TargetingMode,
    pub upgrades: UpgradeLevels,
    pub capabilities: CapabilitySet,
}

/// Status payload a projectile transfers on a direct hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectPayload {
    pub slow: Option<f64>,
    pub dot: Option<f64>,
    pub duration: f64,
}

/// A projectile in flight toward a committed point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub source: TowerId,
    /// Enemy selected at fire time. Only consulted for direct hits.
    pub target_enemy: EnemyId,
    pub position: Point,
    /// Where the target stood when the shot was fired.
    pub target: Point,
    pub damage: f64,
    /// Added to `damage` against MOAB-class enemies.
    pub moab_bonus: f64,
    /// Pixels per second. Zero or less lands on the tick it is fired.
    pub speed: f64,
    pub size: f64,
    pub color: String,
    pub angle: f64,
    pub effects: Option<EffectPayload>,
    pub splash_radius: Option<f64>,
}
