//! Entity factories: build enemies, towers, and projectiles from the
//! catalogs and spawn them into the world.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use popline_core::catalog::{enemy_spec, tower_spec, UpgradeEffect, UpgradeTier};
use popline_core::components::*;
use popline_core::constants::*;
use popline_core::enums::*;
use popline_core::types::{EnemyId, Point, ProjectileId, TowerId};

use crate::path::Path;

/// Monotonic identity source. Ids are never reused within a game.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_enemy: u32,
    next_tower: u32,
    next_projectile: u32,
}

impl IdAllocator {
    pub fn enemy(&mut self) -> EnemyId {
        let id = EnemyId(self.next_enemy);
        self.next_enemy += 1;
        id
    }

    pub fn tower(&mut self) -> TowerId {
        let id = TowerId(self.next_tower);
        self.next_tower += 1;
        id
    }

    pub fn projectile(&mut self) -> ProjectileId {
        let id = ProjectileId(self.next_projectile);
        self.next_projectile += 1;
        id
    }
}

/// Build a fresh enemy of `kind` with full catalog health.
pub fn build_enemy(id: EnemyId, kind: EnemyKind, position: Point, camo: bool, regrow: bool) -> Enemy {
    let spec = enemy_spec(kind);
    Enemy {
        id,
        kind,
        layer: spec.health,
        health: spec.health,
        speed: spec.speed,
        cash_prize: spec.cash_prize,
        position,
        target: 0,
        path_progress: 0.0,
        total_distance: 0.0,
        angle: 0.0,
        effects: None,
        is_camo: camo,
        is_regrow: regrow,
        is_moab: spec.is_moab,
        children: spec.children.to_vec(),
    }
}

/// Build a child of `parent`: fresh catalog stats at the parent's place on
/// the path, inheriting its camo and regrow flags.
pub fn build_child(id: EnemyId, kind: EnemyKind, parent: &Enemy) -> Enemy {
    Enemy {
        target: parent.target,
        path_progress: parent.path_progress,
        total_distance: parent.total_distance,
        angle: parent.angle,
        ..build_enemy(id, kind, parent.position, parent.is_camo, parent.is_regrow)
    }
}

/// Spawn a new enemy at the start of the path with lateral jitter.
pub fn spawn_enemy(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    ids: &mut IdAllocator,
    path: &Path,
    kind: EnemyKind,
    camo: bool,
    regrow: bool,
) -> hecs::Entity {
    let start = path.start();
    let half = SPAWN_JITTER / 2.0;
    let jitter: f64 = rng.gen_range(-half..half);
    let position = Point::new(start.x, start.y + jitter);

    let mut enemy = build_enemy(ids.enemy(), kind, position, camo, regrow);
    if let Some((a, b)) = path.segment(0) {
        enemy.angle = a.angle_to(&b);
    }
    world.spawn((enemy,))
}

/// Build a tower of `kind` at base catalog stats.
pub fn build_tower(id: TowerId, kind: TowerKind, position: Point) -> Tower {
    let spec = tower_spec(kind);
    Tower {
        id,
        kind,
        position,
        cost: spec.cost,
        fire_rate: spec.fire_rate,
        range: spec.range,
        damage: spec.damage,
        target_timer: 0.0,
        angle: 0.0,
        targeting_mode: TargetingMode::default(),
        upgrades: UpgradeLevels::default(),
        capabilities: CapabilitySet::new(),
    }
}

/// Apply an upgrade tier's stat overrides and capability grants.
pub fn apply_upgrade(tower: &mut Tower, tier: &UpgradeTier) {
    for effect in tier.effects {
        match *effect {
            UpgradeEffect::FireRate(secs) => tower.fire_rate = secs,
            UpgradeEffect::Range(range) => tower.range = range,
            UpgradeEffect::Damage(damage) => tower.damage = damage,
            UpgradeEffect::Grant(capability) => tower.capabilities.grant(capability),
        }
    }
}

/// Refund for selling a tower: a fixed share of its purchase price, rounded down.
pub fn sell_value(tower: &Tower) -> u32 {
    (tower.cost as f64 * SELL_REFUND_RATIO).floor() as u32
}

/// Build the projectile `tower` fires at an enemy standing at `target`.
/// The target point is committed; the projectile never tracks the enemy.
pub fn build_projectile(
    id: ProjectileId,
    tower: &Tower,
    target_enemy: EnemyId,
    target: Point,
) -> Projectile {
    let profile = tower_spec(tower.kind).projectile;
    let caps = &tower.capabilities;

    let slow = caps.slow_factor().or(profile.slow);
    let dot = caps.dot_rate();
    let effects = (slow.is_some() || dot.is_some()).then(|| EffectPayload {
        slow,
        dot,
        duration: caps.effect_duration().unwrap_or(EFFECT_DURATION_SECS),
    });

    Projectile {
        id,
        source: tower.id,
        target_enemy,
        position: tower.position,
        target,
        damage: tower.damage,
        moab_bonus: caps.moab_bonus(),
        speed: profile.speed * caps.projectile_speed_multiplier(),
        size: profile.size,
        color: profile.color.to_string(),
        angle: tower.position.angle_to(&target),
        effects,
        splash_radius: caps.splash_radius().or(profile.splash_radius),
    }
}
