//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! Read-only: it never modifies the world.

use hecs::World;

use popline_core::components::{Enemy, Projectile, Tower};
use popline_core::enums::*;
use popline_core::events::GameEvent;
use popline_core::state::*;
use popline_core::types::SimTime;

use crate::economy::{Economy, ScoreState};
use crate::path::Path;
use crate::world_setup::sell_value;

/// Engine-held state that is not stored in the world.
pub struct SnapshotContext<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub speed: GameSpeed,
    pub difficulty: Difficulty,
    pub wave: WaveView,
    pub economy: &'a Economy,
    pub score: &'a ScoreState,
    pub path: &'a Path,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(world: &World, ctx: SnapshotContext<'_>, events: Vec<GameEvent>) -> GameStateSnapshot {
    GameStateSnapshot {
        time: ctx.time,
        phase: ctx.phase,
        speed: ctx.speed,
        difficulty: ctx.difficulty,
        wave: ctx.wave,
        economy: ctx.economy.view(),
        path: ctx.path.waypoints().to_vec(),
        enemies: build_enemies(world),
        towers: build_towers(world),
        projectiles: build_projectiles(world),
        score: ctx.score.view(),
        events,
    }
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<&Enemy>()
        .iter()
        .map(|(_, e)| EnemyView {
            id: e.id,
            kind: e.kind,
            position: e.position,
            angle: e.angle,
            health: e.health,
            layer: e.layer,
            target: e.target,
            path_progress: e.path_progress,
            total_distance: e.total_distance,
            slow: e.effects.map_or(0.0, |fx| fx.slow),
            is_camo: e.is_camo,
            is_regrow: e.is_regrow,
            is_moab: e.is_moab,
        })
        .collect();

    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_towers(world: &World) -> Vec<TowerView> {
    let mut towers: Vec<TowerView> = world
        .query::<&Tower>()
        .iter()
        .map(|(_, t)| TowerView {
            id: t.id,
            kind: t.kind,
            position: t.position,
            angle: t.angle,
            range: t.range,
            fire_rate: t.fire_rate,
            damage: t.damage,
            targeting_mode: t.targeting_mode,
            upgrades: t.upgrades,
            capabilities: t.capabilities.clone(),
            sell_value: sell_value(t),
        })
        .collect();

    towers.sort_by_key(|t| t.id);
    towers
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<&Projectile>()
        .iter()
        .map(|(_, p)| ProjectileView {
            id: p.id,
            position: p.position,
            target: p.target,
            angle: p.angle,
            size: p.size,
            color: p.color.clone(),
            splash_radius: p.splash_radius,
        })
        .collect();

    projectiles.sort_by_key(|p| p.id);
    projectiles
}
