//! Projectile flight and hit resolution.
//!
//! Projectiles fly toward the point their target occupied at fire time. On
//! arrival a splash projectile damages everything within its radius of the
//! impact point; any other projectile damages its original target if that
//! enemy is still alive. Each enemy is popped at most once per tick.

use std::collections::HashSet;

use hecs::{Entity, World};
use log::debug;

use popline_core::components::{EffectPayload, Enemy, Projectile, StatusEffects};
use popline_core::events::GameEvent;
use popline_core::types::EnemyId;

use crate::economy::{Economy, ScoreState};

/// Move a projectile toward its committed target. Returns true on arrival,
/// in which case the projectile sits exactly on the target point.
pub fn advance(projectile: &mut Projectile, elapsed: f64) -> bool {
    let step = projectile.speed * elapsed;
    let remaining = projectile.position.distance_to(&projectile.target);

    if projectile.speed <= 0.0 || remaining <= step {
        projectile.position = projectile.target;
        return true;
    }

    projectile.position = projectile
        .position
        .lerp(&projectile.target, step / remaining);
    projectile.angle = projectile.position.angle_to(&projectile.target);
    false
}

/// Damage a projectile deals to `enemy`, including any MOAB-class bonus.
pub fn damage_against(projectile: &Projectile, enemy: &Enemy) -> f64 {
    if enemy.is_moab {
        projectile.damage + projectile.moab_bonus
    } else {
        projectile.damage
    }
}

/// Merge a direct-hit payload into an enemy's effects. Payload magnitudes
/// replace existing ones and the shared duration restarts.
pub fn apply_effects(enemy: &mut Enemy, payload: &EffectPayload) {
    let current = enemy.effects.unwrap_or_default();
    enemy.effects = Some(StatusEffects {
        slow: payload.slow.unwrap_or(current.slow),
        dot: payload.dot.unwrap_or(current.dot),
        duration: payload.duration,
    });
}

/// Enemies popped during one resolution pass, in pop order.
#[derive(Debug, Default)]
pub struct Resolution {
    pub popped: Vec<(Entity, Enemy)>,
    killed: HashSet<EnemyId>,
}

impl Resolution {
    pub fn is_killed(&self, id: EnemyId) -> bool {
        self.killed.contains(&id)
    }

    /// Record a pop. Returns false if the enemy was already popped.
    fn record(&mut self, entity: Entity, enemy: &Enemy) -> bool {
        if !self.killed.insert(enemy.id) {
            return false;
        }
        self.popped.push((entity, enemy.clone()));
        true
    }
}

/// Apply one landed projectile to the live enemy set.
pub fn resolve_hit(projectile: &Projectile, enemies: &mut [(Entity, &mut Enemy)], resolution: &mut Resolution) {
    match projectile.splash_radius {
        Some(radius) => {
            for (entity, enemy) in enemies.iter_mut() {
                if resolution.is_killed(enemy.id) || enemy.position.distance_to(&projectile.position) > radius {
                    continue;
                }
                let damage = damage_against(projectile, enemy);
                enemy.health -= damage;
                check_pop(*entity, enemy, resolution);
            }
        }
        None => {
            let Some((entity, enemy)) = enemies
                .iter_mut()
                .find(|(_, e)| e.id == projectile.target_enemy && !resolution.is_killed(e.id))
            else {
                // Target already gone: the shot is wasted.
                return;
            };
            if let Some(payload) = &projectile.effects {
                apply_effects(enemy, payload);
            }
            let damage = damage_against(projectile, enemy);
            enemy.health -= damage;
            check_pop(*entity, enemy, resolution);
        }
    }
}

fn check_pop(entity: Entity, enemy: &mut Enemy, resolution: &mut Resolution) {
    if enemy.health <= 0.0 {
        enemy.health = 0.0;
        resolution.record(entity, enemy);
    }
}

/// Advance every projectile, resolve the ones that land, and pay out pops.
/// Landed projectiles and popped enemies are queued for despawn; the popped
/// enemies are returned for decomposition.
pub fn run(
    world: &mut World,
    elapsed: f64,
    economy: &mut Economy,
    score: &mut ScoreState,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) -> Vec<Enemy> {
    let mut landed: Vec<Projectile> = Vec::new();
    {
        let mut projectiles: Vec<(Entity, &mut Projectile)> =
            world.query_mut::<&mut Projectile>().into_iter().collect();
        projectiles.sort_by_key(|(_, p)| p.id);

        for (entity, projectile) in projectiles {
            if advance(projectile, elapsed) {
                landed.push(projectile.clone());
                despawn_buffer.push(entity);
            }
        }
    }

    if landed.is_empty() {
        return Vec::new();
    }

    let mut resolution = Resolution::default();
    {
        let mut enemies: Vec<(Entity, &mut Enemy)> = world.query_mut::<&mut Enemy>().into_iter().collect();
        enemies.sort_by_key(|(_, e)| e.id);

        for projectile in &landed {
            resolve_hit(projectile, &mut enemies, &mut resolution);
        }
    }

    let mut popped = Vec::with_capacity(resolution.popped.len());
    for (entity, enemy) in resolution.popped {
        economy.earn(enemy.cash_prize);
        score.pops += 1;
        score.cash_from_pops += enemy.cash_prize;
        debug!("{} ({:?}) popped for ${}", enemy.id, enemy.kind, enemy.cash_prize);
        events.push(GameEvent::EnemyPopped {
            enemy: enemy.id,
            kind: enemy.kind,
            cash: enemy.cash_prize,
            children: enemy.children.len() as u32,
        });
        despawn_buffer.push(entity);
        popped.push(enemy);
    }
    popped
}
