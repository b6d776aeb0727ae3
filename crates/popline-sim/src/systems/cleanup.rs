//! Cleanup system: removes entities queued for despawn by earlier systems.

use hecs::{Entity, World};

/// Despawn every buffered entity. Entities already gone are ignored.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_buffer_and_tolerates_duplicates() {
        let mut world = World::new();
        let a = world.spawn((1u32,));
        let b = world.spawn((2u32,));
        let mut buffer = vec![a, a, b];

        run(&mut world, &mut buffer);
        assert!(buffer.is_empty());
        assert_eq!(world.len(), 0);
    }
}
