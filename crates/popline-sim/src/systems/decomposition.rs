//! Death decomposition: popped enemies release their child tiers in place.

use hecs::World;

use popline_core::components::Enemy;

use crate::world_setup::{self, IdAllocator};

/// Build the children released by `parent`, one per listed tier, in order.
/// The weakest tier lists no children and simply vanishes.
pub fn decompose(parent: &Enemy, ids: &mut IdAllocator) -> Vec<Enemy> {
    parent
        .children
        .iter()
        .map(|&kind| world_setup::build_child(ids.enemy(), kind, parent))
        .collect()
}

/// Spawn the children of every popped enemy. Returns how many were spawned.
pub fn run(world: &mut World, popped: &[Enemy], ids: &mut IdAllocator) -> usize {
    let mut spawned = 0;
    for parent in popped {
        for child in decompose(parent, ids) {
            world.spawn((child,));
            spawned += 1;
        }
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use popline_core::enums::EnemyKind;
    use popline_core::types::{EnemyId, Point};

    use crate::world_setup::build_enemy;

    #[test]
    fn red_vanishes() {
        let red = build_enemy(EnemyId(0), EnemyKind::Red, Point::default(), false, false);
        let mut ids = IdAllocator::default();
        assert!(decompose(&red, &mut ids).is_empty());
    }

    #[test]
    fn ceramic_releases_two_rainbows_in_place() {
        let mut ceramic = build_enemy(EnemyId(0), EnemyKind::Ceramic, Point::new(320.0, 100.0), false, true);
        ceramic.target = 2;
        ceramic.path_progress = 0.4;
        let mut ids = IdAllocator::default();
        ids.enemy();

        let children = decompose(&ceramic, &mut ids);
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.kind, EnemyKind::Rainbow);
            assert_eq!(child.target, 2);
            assert_eq!(child.path_progress, 0.4);
            assert!(child.is_regrow);
            assert_eq!(child.health, 1.0);
        }
        assert_ne!(children[0].id, children[1].id);
        assert_ne!(children[0].id, ceramic.id);
    }

    #[test]
    fn run_spawns_into_world() {
        let mut world = World::new();
        let zebra = build_enemy(EnemyId(0), EnemyKind::Zebra, Point::default(), false, false);
        let mut ids = IdAllocator::default();
        assert_eq!(run(&mut world, &[zebra], &mut ids), 2);

        let mut kinds: Vec<EnemyKind> = world.query::<&Enemy>().iter().map(|(_, e)| e.kind).collect();
        kinds.sort();
        assert_eq!(kinds, vec![EnemyKind::Black, EnemyKind::White]);
    }
}
