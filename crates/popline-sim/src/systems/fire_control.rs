//! Fire control system: tower cooldowns, target selection, and firing.

use hecs::{Entity, World};
use log::trace;

use popline_core::components::{Enemy, Projectile, Tower};
use popline_core::enums::TargetingMode;
use popline_core::events::GameEvent;
use popline_core::types::{EnemyId, Point};

use crate::world_setup::{self, IdAllocator};

/// The slice of an enemy that targeting looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCandidate {
    pub id: EnemyId,
    pub position: Point,
    pub total_distance: f64,
    pub layer: f64,
    pub health: f64,
    pub is_camo: bool,
}

impl From<&Enemy> for TargetCandidate {
    fn from(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id,
            position: enemy.position,
            total_distance: enemy.total_distance,
            layer: enemy.layer,
            health: enemy.health,
            is_camo: enemy.is_camo,
        }
    }
}

/// Whether `tower` may shoot at `candidate` right now.
pub fn is_eligible(tower: &Tower, candidate: &TargetCandidate) -> bool {
    if candidate.is_camo && !tower.capabilities.detects_camo() {
        return false;
    }
    tower.position.distance_to(&candidate.position) <= tower.range
}

/// True if `challenger` should replace `best` under `mode`. Strict
/// comparisons keep the earlier candidate on ties.
fn beats(mode: TargetingMode, tower: Point, challenger: &TargetCandidate, best: &TargetCandidate) -> bool {
    match mode {
        TargetingMode::First => challenger.total_distance > best.total_distance,
        TargetingMode::Last => challenger.total_distance < best.total_distance,
        TargetingMode::Strong => {
            challenger.layer > best.layer
                || (challenger.layer == best.layer && challenger.health > best.health)
        }
        TargetingMode::Close => tower.distance_to(&challenger.position) < tower.distance_to(&best.position),
    }
}

/// Pick one eligible candidate according to the tower's targeting mode.
///
/// `candidates` must be in a stable order (by id); remaining ties resolve
/// to the earliest entry.
pub fn select_target<'a>(tower: &Tower, candidates: &'a [TargetCandidate]) -> Option<&'a TargetCandidate> {
    let mut best: Option<&'a TargetCandidate> = None;
    for candidate in candidates.iter().filter(|c| is_eligible(tower, c)) {
        match best {
            Some(b) if !beats(tower.targeting_mode, tower.position, candidate, b) => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Count down one tower's cooldown and fire if ready and a target exists.
///
/// With no eligible target the timer stays at or below zero so the tower
/// retries next tick without paying the cooldown again.
pub fn advance<'a>(
    tower: &mut Tower,
    candidates: &'a [TargetCandidate],
    elapsed: f64,
) -> Option<&'a TargetCandidate> {
    tower.target_timer -= elapsed;
    if tower.target_timer > 0.0 {
        return None;
    }

    let target = select_target(tower, candidates)?;
    tower.target_timer = tower.fire_rate;
    tower.angle = tower.position.angle_to(&target.position);
    Some(target)
}

/// Run fire control for every tower, spawning the projectiles fired.
pub fn run(world: &mut World, ids: &mut IdAllocator, events: &mut Vec<GameEvent>, elapsed: f64) {
    let mut candidates: Vec<TargetCandidate> = world
        .query::<&Enemy>()
        .iter()
        .map(|(_, enemy)| TargetCandidate::from(enemy))
        .collect();
    candidates.sort_by_key(|c| c.id);

    let mut fired: Vec<Projectile> = Vec::new();
    {
        let mut towers: Vec<(Entity, &mut Tower)> = world.query_mut::<&mut Tower>().into_iter().collect();
        towers.sort_by_key(|(_, tower)| tower.id);

        for (_entity, tower) in towers {
            let Some(target) = advance(tower, &candidates, elapsed) else {
                continue;
            };
            let projectile = world_setup::build_projectile(ids.projectile(), tower, target.id, target.position);
            trace!("{} fired at {}", tower.id, target.id);
            events.push(GameEvent::TowerFired {
                tower: tower.id,
                enemy: target.id,
                projectile: projectile.id,
            });
            fired.push(projectile);
        }
    }

    for projectile in fired {
        world.spawn((projectile,));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popline_core::components::Capability;
    use popline_core::enums::TowerKind;
    use popline_core::types::TowerId;

    use crate::world_setup::build_tower;

    fn candidate(id: u32, x: f64, total_distance: f64) -> TargetCandidate {
        TargetCandidate {
            id: EnemyId(id),
            position: Point::new(x, 0.0),
            total_distance,
            layer: 1.0,
            health: 1.0,
            is_camo: false,
        }
    }

    fn dart_at_origin() -> Tower {
        build_tower(TowerId(0), TowerKind::DartMonkey, Point::new(0.0, 0.0))
    }

    #[test]
    fn first_picks_furthest_along() {
        let tower = dart_at_origin();
        let candidates = [candidate(0, 30.0, 50.0), candidate(1, 60.0, 80.0)];
        assert_eq!(select_target(&tower, &candidates).map(|c| c.id), Some(EnemyId(1)));
    }

    #[test]
    fn last_and_close_modes() {
        let mut tower = dart_at_origin();
        let candidates = [candidate(0, 90.0, 50.0), candidate(1, 20.0, 80.0)];

        tower.targeting_mode = TargetingMode::Last;
        assert_eq!(select_target(&tower, &candidates).map(|c| c.id), Some(EnemyId(0)));

        tower.targeting_mode = TargetingMode::Close;
        assert_eq!(select_target(&tower, &candidates).map(|c| c.id), Some(EnemyId(1)));
    }

    #[test]
    fn strong_breaks_layer_ties_by_health() {
        let mut tower = dart_at_origin();
        tower.targeting_mode = TargetingMode::Strong;
        let mut a = candidate(0, 10.0, 0.0);
        let mut b = candidate(1, 20.0, 0.0);
        let mut c = candidate(2, 30.0, 0.0);
        a.layer = 10.0;
        a.health = 4.0;
        b.layer = 10.0;
        b.health = 7.0;
        c.layer = 1.0;
        c.health = 1.0;

        assert_eq!(select_target(&tower, &[a, b, c]).map(|t| t.id), Some(EnemyId(1)));
    }

    #[test]
    fn out_of_range_and_camo_are_ineligible() {
        let mut tower = dart_at_origin();
        let far = candidate(0, 150.0, 500.0);
        let mut hidden = candidate(1, 10.0, 400.0);
        hidden.is_camo = true;

        assert!(select_target(&tower, &[far, hidden]).is_none());

        tower.capabilities.grant(Capability::CamoDetection);
        assert_eq!(select_target(&tower, &[far, hidden]).map(|c| c.id), Some(EnemyId(1)));
    }

    #[test]
    fn ties_keep_the_earlier_candidate() {
        let tower = dart_at_origin();
        let candidates = [candidate(4, 10.0, 60.0), candidate(7, 20.0, 60.0)];
        assert_eq!(select_target(&tower, &candidates).map(|c| c.id), Some(EnemyId(4)));
    }

    #[test]
    fn cooldown_resets_only_on_fire() {
        let mut tower = dart_at_origin();
        assert!(advance(&mut tower, &[], 0.5).is_none());
        assert_eq!(tower.target_timer, -0.5);

        let candidates = [candidate(0, 50.0, 10.0)];
        assert!(advance(&mut tower, &candidates, 0.1).is_some());
        assert_eq!(tower.target_timer, tower.fire_rate);

        assert!(advance(&mut tower, &candidates, 0.1).is_none());
    }

    #[test]
    fn run_spawns_projectile_at_committed_point() {
        let mut world = World::new();
        world.spawn((dart_at_origin(),));
        let red = crate::world_setup::build_enemy(
            EnemyId(0),
            popline_core::enums::EnemyKind::Red,
            Point::new(40.0, 30.0),
            false,
            false,
        );
        world.spawn((red,));

        let mut ids = IdAllocator::default();
        let mut events = Vec::new();
        run(&mut world, &mut ids, &mut events, 0.1);

        let projectiles: Vec<Projectile> = world.query::<&Projectile>().iter().map(|(_, p)| p.clone()).collect();
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].target, Point::new(40.0, 30.0));
        assert_eq!(projectiles[0].target_enemy, EnemyId(0));
        assert_eq!(events.len(), 1);
    }
}
