//! Enemy motion along the path, status-effect decay, regrow, and leaks.

use hecs::{Entity, World};
use log::debug;

use popline_core::components::Enemy;
use popline_core::constants::*;
use popline_core::events::GameEvent;

use crate::economy::{Economy, ScoreState};
use crate::path::Path;

/// Result of advancing one enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    Moving,
    /// Reached the final waypoint. The caller removes the enemy.
    Exited,
}

/// Advance a single enemy along `path` by `elapsed` seconds.
///
/// Reaching the end of a segment takes the tick on its own: the enemy
/// turns toward the next segment and resumes moving on the following tick.
pub fn advance(enemy: &mut Enemy, path: &Path, elapsed: f64) -> MotionOutcome {
    if enemy.path_progress >= 1.0 {
        enemy.target += 1;
        enemy.path_progress = 0.0;
        match path.segment(enemy.target) {
            Some((start, end)) => enemy.angle = start.angle_to(&end),
            None => return MotionOutcome::Exited,
        }
    } else {
        let Some((start, end)) = path.segment(enemy.target) else {
            return MotionOutcome::Exited;
        };
        let slow = enemy.effects.map_or(0.0, |e| e.slow);
        let speed = enemy.speed * ENEMY_SPEED_SCALE * (1.0 - slow);
        let length = start.distance_to(&end);

        let before = enemy.path_progress;
        enemy.path_progress = if length <= f64::EPSILON {
            1.0
        } else {
            (before + speed * elapsed / length).min(1.0)
        };
        enemy.position = start.lerp(&end, enemy.path_progress);
        enemy.total_distance += (enemy.path_progress - before) * length;
        enemy.angle = start.angle_to(&end);
    }

    if let Some(effects) = enemy.effects.as_mut() {
        effects.duration -= elapsed;
        if effects.duration <= 0.0 {
            enemy.effects = None;
        }
    }

    if enemy.is_regrow && enemy.health < enemy.layer {
        enemy.health = (enemy.health + REGROW_RATE * elapsed).min(enemy.layer);
    }

    MotionOutcome::Moving
}

/// Defender damage dealt by a leaking enemy.
pub fn leak_damage(enemy: &Enemy) -> u32 {
    if enemy.is_moab {
        MOAB_LEAK_DAMAGE
    } else {
        LEAK_DAMAGE
    }
}

/// Move every enemy and queue leaked ones for despawn.
/// Returns true if the defender died this tick.
pub fn run(
    world: &mut World,
    path: &Path,
    elapsed: f64,
    economy: &mut Economy,
    score: &mut ScoreState,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) -> bool {
    let mut enemies: Vec<(Entity, &mut Enemy)> = world.query_mut::<&mut Enemy>().into_iter().collect();
    enemies.sort_by_key(|(_, enemy)| enemy.id);

    let mut dead = false;
    for (entity, enemy) in enemies {
        if advance(enemy, path, elapsed) == MotionOutcome::Exited {
            let damage = leak_damage(enemy);
            dead |= economy.take_damage(damage);
            score.leaks += 1;
            debug!("{} ({:?}) leaked for {damage}", enemy.id, enemy.kind);
            events.push(GameEvent::EnemyLeaked {
                enemy: enemy.id,
                kind: enemy.kind,
                damage,
            });
            despawn_buffer.push(entity);
        }
    }
    dead
}
