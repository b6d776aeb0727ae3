//! Static unit catalogs: enemy tiers, tower base stats, upgrade trees, and
//! projectile profiles.
//!
//! Catalog data is immutable process-wide configuration. Entities copy what
//! they need out of these tables at construction or upgrade time; nothing
//! ever writes back.

use serde::Serialize;

use crate::components::Capability;
use crate::enums::{EnemyKind, TowerKind, UpgradePath};

/// Base stats for an enemy tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemySpec {
    pub health: f64,
    pub speed: f64,
    pub cash_prize: u32,
    /// Tiers released when this one dies.
    pub children: &'static [EnemyKind],
    /// MOAB-class: large units that cost the defender more when they leak.
    pub is_moab: bool,
}

/// Get the catalog entry for an enemy tier.
pub fn enemy_spec(kind: EnemyKind) -> EnemySpec {
    use EnemyKind::*;

    let (health, speed, cash_prize, children, is_moab): (f64, f64, u32, &'static [EnemyKind], bool) =
        match kind {
            Red => (1.0, 1.0, 1, &[], false),
            Blue => (1.0, 1.4, 2, &[Red], false),
            Green => (1.0, 1.8, 3, &[Blue], false),
            Yellow => (1.0, 3.2, 4, &[Green], false),
            Pink => (1.0, 3.5, 5, &[Yellow], false),
            Black => (1.0, 1.8, 11, &[Pink, Pink], false),
            White => (1.0, 2.0, 11, &[Pink, Pink], false),
            Zebra => (1.0, 1.8, 23, &[Black, White], false),
            Rainbow => (1.0, 1.8, 47, &[Zebra, Zebra], false),
            Ceramic => (10.0, 2.5, 95, &[Rainbow, Rainbow], false),
            Moab => (200.0, 1.0, 381, &[Ceramic, Ceramic, Ceramic, Ceramic], true),
            Bfb => (700.0, 0.5, 1525, &[Moab, Moab, Moab, Moab], true),
        };

    EnemySpec {
        health,
        speed,
        cash_prize,
        children,
        is_moab,
    }
}

/// A stat change or capability applied by an upgrade tier. Stat changes
/// are absolute replacements, not deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum UpgradeEffect {
    FireRate(f64),
    Range(f64),
    Damage(f64),
    Grant(Capability),
}

/// One purchasable step on an upgrade path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UpgradeTier {
    pub name: &'static str,
    pub cost: u32,
    pub description: &'static str,
    pub effects: &'static [UpgradeEffect],
}

/// Visual and flight parameters of the projectile a tower fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileProfile {
    /// Pixels per second. Zero means the shot lands instantly.
    pub speed: f64,
    pub size: f64,
    pub color: &'static str,
    pub splash_radius: Option<f64>,
    pub slow: Option<f64>,
}

/// Base stats, upgrade tree, and projectile profile for a tower type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TowerSpec {
    pub name: &'static str,
    pub cost: u32,
    pub fire_rate: f64,
    pub range: f64,
    pub damage: f64,
    pub path1: &'static [UpgradeTier],
    pub path2: &'static [UpgradeTier],
    pub projectile: ProjectileProfile,
}

impl TowerSpec {
    pub fn upgrades(&self, path: UpgradePath) -> &'static [UpgradeTier] {
        match path {
            UpgradePath::Path1 => self.path1,
            UpgradePath::Path2 => self.path2,
        }
    }

    /// The tier bought next on `path` from `current_level`, if any.
    pub fn next_upgrade(&self, path: UpgradePath, current_level: u32) -> Option<&'static UpgradeTier> {
        self.upgrades(path).get(current_level as usize)
    }
}

const fn projectile(speed: f64, size: f64, color: &'static str) -> ProjectileProfile {
    ProjectileProfile {
        speed,
        size,
        color,
        splash_radius: None,
        slow: None,
    }
}

const NO_UPGRADES: &[UpgradeTier] = &[];

const DART_PATH1: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Sharp Darts",
        cost: 140,
        description: "Can pop 2 bloons per shot",
        effects: &[UpgradeEffect::Grant(Capability::Pierce { count: 2 })],
    },
    UpgradeTier {
        name: "Razor Sharp Darts",
        cost: 220,
        description: "Can pop 3 bloons per shot",
        effects: &[UpgradeEffect::Grant(Capability::Pierce { count: 3 })],
    },
];

const DART_PATH2: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Long Range Darts",
        cost: 90,
        description: "Increased range",
        effects: &[UpgradeEffect::Range(125.0)],
    },
    UpgradeTier {
        name: "Enhanced Eyesight",
        cost: 120,
        description: "Further increased range",
        effects: &[UpgradeEffect::Range(150.0)],
    },
];

const TACK_PATH1: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Faster Shooting",
        cost: 210,
        description: "Shoots tacks faster",
        effects: &[UpgradeEffect::FireRate(0.8)],
    },
    UpgradeTier {
        name: "Even Faster Shooting",
        cost: 300,
        description: "Shoots even faster",
        effects: &[UpgradeEffect::FireRate(0.6)],
    },
];

const TACK_PATH2: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Extra Range",
        cost: 100,
        description: "Increased range",
        effects: &[UpgradeEffect::Range(85.0)],
    },
    UpgradeTier {
        name: "Super Range",
        cost: 225,
        description: "Even more range",
        effects: &[UpgradeEffect::Range(100.0)],
    },
];

const SNIPER_PATH1: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Point Five Oh",
        cost: 400,
        description: "Increased damage to MOAB class bloons",
        effects: &[UpgradeEffect::Damage(4.0)],
    },
    UpgradeTier {
        name: "Full Metal Jacket",
        cost: 850,
        description: "Even more damage to all bloon types",
        effects: &[UpgradeEffect::Damage(6.0)],
    },
];

const SNIPER_PATH2: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Faster Firing",
        cost: 300,
        description: "Shoots faster",
        effects: &[UpgradeEffect::FireRate(2.0)],
    },
    UpgradeTier {
        name: "Night Vision Goggles",
        cost: 350,
        description: "Can detect camo bloons",
        effects: &[UpgradeEffect::Grant(Capability::CamoDetection)],
    },
];

const NINJA_PATH1: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Ninja Discipline",
        cost: 300,
        description: "Increased attack speed and range",
        effects: &[UpgradeEffect::FireRate(0.5), UpgradeEffect::Range(140.0)],
    },
    UpgradeTier {
        name: "Sharp Shurikens",
        cost: 400,
        description: "Shurikens can pop 4 bloons each",
        effects: &[UpgradeEffect::Grant(Capability::Pierce { count: 4 })],
    },
];

const NINJA_PATH2: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Seeking Shuriken",
        cost: 350,
        description: "Shurikens seek out bloons",
        effects: &[UpgradeEffect::Grant(Capability::Seeking)],
    },
    UpgradeTier {
        name: "Distraction",
        cost: 450,
        description: "Bloons may be sent back to the start",
        effects: &[UpgradeEffect::Grant(Capability::Distraction { chance: 0.2 })],
    },
];

const BOMB_PATH1: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Bigger Bombs",
        cost: 400,
        description: "Explosions affect a larger area",
        effects: &[UpgradeEffect::Grant(Capability::Splash { radius: 45.0 })],
    },
    UpgradeTier {
        name: "Extra Range",
        cost: 250,
        description: "Increased attack range",
        effects: &[UpgradeEffect::Range(110.0)],
    },
];

const BOMB_PATH2: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Missile Launcher",
        cost: 500,
        description: "Shoots missiles that move faster",
        effects: &[UpgradeEffect::Grant(Capability::ProjectileSpeed { multiplier: 1.5 })],
    },
    UpgradeTier {
        name: "MOAB Mauler",
        cost: 900,
        description: "Does extra damage to MOAB class bloons",
        effects: &[UpgradeEffect::Grant(Capability::MoabBonus { amount: 10.0 })],
    },
];

const ICE_PATH1: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Enhanced Freeze",
        cost: 225,
        description: "Freezes bloons for longer",
        effects: &[UpgradeEffect::Grant(Capability::FreezeDuration { secs: 2.5 })],
    },
    UpgradeTier {
        name: "Snap Freeze",
        cost: 400,
        description: "Can pop bloons while freezing",
        effects: &[
            UpgradeEffect::Damage(1.0),
            UpgradeEffect::Grant(Capability::FreezeDamage),
        ],
    },
];

const ICE_PATH2: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Permafrost",
        cost: 300,
        description: "Slows bloons permanently after thaw",
        effects: &[UpgradeEffect::Grant(Capability::Permafrost { factor: 0.5 })],
    },
    UpgradeTier {
        name: "Deep Freeze",
        cost: 450,
        description: "Can freeze white and zebra bloons",
        effects: &[UpgradeEffect::Grant(Capability::FreezeImmune)],
    },
];

const BUCCANEER_PATH1: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Faster Shooting",
        cost: 300,
        description: "Shoots faster",
        effects: &[UpgradeEffect::FireRate(0.7)],
    },
    UpgradeTier {
        name: "Grape Shot",
        cost: 500,
        description: "Adds grapes that do extra damage",
        effects: &[UpgradeEffect::Grant(Capability::GrapeShot)],
    },
];

const BUCCANEER_PATH2: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Longer Range",
        cost: 200,
        description: "Increased attack range",
        effects: &[UpgradeEffect::Range(130.0)],
    },
    UpgradeTier {
        name: "Crow's Nest",
        cost: 400,
        description: "Can detect camo bloons",
        effects: &[UpgradeEffect::Grant(Capability::CamoDetection)],
    },
];

const SUPER_PATH1: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Laser Vision",
        cost: 1500,
        description: "Shoots powerful laser beams",
        effects: &[UpgradeEffect::Damage(2.0)],
    },
    UpgradeTier {
        name: "Plasma Vision",
        cost: 3000,
        description: "Shoots even more powerful plasma",
        effects: &[UpgradeEffect::Damage(3.0), UpgradeEffect::FireRate(0.03)],
    },
];

const SUPER_PATH2: &[UpgradeTier] = &[
    UpgradeTier {
        name: "Super Range",
        cost: 1000,
        description: "Greatly increased range",
        effects: &[UpgradeEffect::Range(180.0)],
    },
    UpgradeTier {
        name: "Epic Range",
        cost: 1500,
        description: "Even more range",
        effects: &[UpgradeEffect::Range(220.0)],
    },
];

/// Get the catalog entry for a tower type.
pub fn tower_spec(kind: TowerKind) -> TowerSpec {
    use TowerKind::*;

    match kind {
        DartMonkey => TowerSpec {
            name: "Dart Monkey",
            cost: 215,
            fire_rate: 1.3,
            range: 100.0,
            damage: 1.0,
            path1: DART_PATH1,
            path2: DART_PATH2,
            projectile: projectile(30.0, 6.0, "#FFD700"),
        },
        TackShooter => TowerSpec {
            name: "Tack Shooter",
            cost: 360,
            fire_rate: 1.0,
            range: 70.0,
            damage: 1.0,
            path1: TACK_PATH1,
            path2: TACK_PATH2,
            projectile: projectile(24.0, 4.0, "#FF4444"),
        },
        SniperMonkey => TowerSpec {
            name: "Sniper Monkey",
            cost: 430,
            fire_rate: 2.9,
            range: 300.0,
            damage: 2.0,
            path1: SNIPER_PATH1,
            path2: SNIPER_PATH2,
            projectile: projectile(60.0, 4.0, "#FFFF00"),
        },
        BoomerangThrower => TowerSpec {
            name: "Boomerang Thrower",
            cost: 430,
            fire_rate: 1.0,
            range: 90.0,
            damage: 1.0,
            path1: NO_UPGRADES,
            path2: NO_UPGRADES,
            projectile: projectile(20.0, 8.0, "#FF6B6B"),
        },
        NinjaMonkey => TowerSpec {
            name: "Ninja Monkey",
            cost: 500,
            fire_rate: 0.7,
            range: 120.0,
            damage: 1.0,
            path1: NINJA_PATH1,
            path2: NINJA_PATH2,
            projectile: projectile(36.0, 5.0, "#4B0082"),
        },
        BombTower => TowerSpec {
            name: "Bomb Tower",
            cost: 650,
            fire_rate: 1.5,
            range: 90.0,
            damage: 1.0,
            path1: BOMB_PATH1,
            path2: BOMB_PATH2,
            projectile: ProjectileProfile {
                splash_radius: Some(30.0),
                ..projectile(16.0, 10.0, "#000000")
            },
        },
        IceTower => TowerSpec {
            name: "Ice Tower",
            cost: 380,
            fire_rate: 1.2,
            range: 80.0,
            damage: 1.0,
            path1: ICE_PATH1,
            path2: ICE_PATH2,
            projectile: ProjectileProfile {
                slow: Some(0.5),
                ..projectile(0.0, 40.0, "rgba(135, 206, 235, 0.5)")
            },
        },
        GlueGunner => TowerSpec {
            name: "Glue Gunner",
            cost: 325,
            fire_rate: 1.1,
            range: 100.0,
            damage: 1.0,
            path1: NO_UPGRADES,
            path2: NO_UPGRADES,
            projectile: ProjectileProfile {
                slow: Some(0.7),
                ..projectile(20.0, 6.0, "#98FF98")
            },
        },
        MonkeyBuccaneer => TowerSpec {
            name: "Monkey Buccaneer",
            cost: 550,
            fire_rate: 1.0,
            range: 110.0,
            damage: 1.0,
            path1: BUCCANEER_PATH1,
            path2: BUCCANEER_PATH2,
            projectile: projectile(24.0, 7.0, "#4169E1"),
        },
        SuperMonkey => TowerSpec {
            name: "Super Monkey",
            cost: 2500,
            fire_rate: 0.05,
            range: 140.0,
            damage: 1.0,
            path1: SUPER_PATH1,
            path2: SUPER_PATH2,
            projectile: projectile(50.0, 4.0, "#FFD700"),
        },
        MonkeyApprentice => TowerSpec {
            name: "Monkey Apprentice",
            cost: 595,
            fire_rate: 1.0,
            range: 60.0,
            damage: 1.0,
            path1: NO_UPGRADES,
            path2: NO_UPGRADES,
            projectile: projectile(28.0, 8.0, "#9370DB"),
        },
        SpikeFactory => TowerSpec {
            name: "Spike Factory",
            cost: 650,
            fire_rate: 2.0,
            range: 40.0,
            damage: 1.0,
            path1: NO_UPGRADES,
            path2: NO_UPGRADES,
            projectile: projectile(0.0, 6.0, "#808080"),
        },
        RoadSpikes => TowerSpec {
            name: "Road Spikes",
            cost: 30,
            fire_rate: 5.0,
            range: 40.0,
            damage: 1.0,
            path1: NO_UPGRADES,
            path2: NO_UPGRADES,
            projectile: projectile(0.0, 6.0, "#808080"),
        },
        ExplodingPineapple => TowerSpec {
            name: "Exploding Pineapple",
            cost: 25,
            fire_rate: 2.0,
            range: 60.0,
            damage: 1.0,
            path1: NO_UPGRADES,
            path2: NO_UPGRADES,
            projectile: projectile(0.0, 6.0, "#808080"),
        },
    }
}
