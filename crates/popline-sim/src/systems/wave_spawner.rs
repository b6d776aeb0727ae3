//! Wave spawning system: emits enemies from the current wave's groups on
//! their spacing timers.

use hecs::World;
use log::{debug, info};
use rand_chacha::ChaCha8Rng;

use popline_core::constants::{DEFAULT_GROUP_SPACING, SPAWN_EPSILON};
use popline_core::enums::EnemyKind;
use popline_core::error::CommandRejection;
use popline_core::state::WaveView;

use crate::path::Path;
use crate::scenario::{BloonGroup, Wave};
use crate::world_setup::{self, IdAllocator};

/// Spawner progress. The script itself is never mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaveState {
    /// Waves started so far. The wave being spawned is `waves[current_wave - 1]`.
    pub current_wave: u32,
    pub is_spawning: bool,
    /// Seconds accumulated toward the next spawn.
    pub spawn_timer: f64,
    /// Group of the current wave being emitted.
    pub spawn_index: usize,
    /// Members of the current group still to spawn.
    pub remaining: u32,
    /// Set when a wave starts; cleared once it has been paid out.
    pub awaiting_clear: bool,
}

/// One enemy the spawner wants created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnOrder {
    pub kind: EnemyKind,
    pub camo: bool,
    pub regrow: bool,
}

impl WaveState {
    /// Try to start the next wave. On success returns the 1-based wave number.
    pub fn start(
        &mut self,
        alive_enemies: usize,
        waves: &[Wave],
    ) -> Result<u32, CommandRejection> {
        if self.is_spawning {
            return Err(CommandRejection::WaveInProgress);
        }
        if alive_enemies > 0 {
            return Err(CommandRejection::EnemiesRemaining);
        }
        let Some(wave) = waves.get(self.current_wave as usize) else {
            return Err(CommandRejection::NoWavesRemaining);
        };

        self.current_wave += 1;
        self.is_spawning = true;
        self.awaiting_clear = true;
        self.spawn_index = 0;
        self.enter_group(wave);
        // Prime the timer so the first member appears on the first advance.
        self.spawn_timer = self.current_group(wave).map_or(0.0, group_spacing);
        Ok(self.current_wave)
    }

    /// The wave currently being spawned, if any.
    pub fn active_wave<'a>(&self, waves: &'a [Wave]) -> Option<&'a Wave> {
        if !self.is_spawning {
            return None;
        }
        waves.get((self.current_wave as usize).checked_sub(1)?)
    }

    pub fn view(&self, total_waves: usize) -> WaveView {
        WaveView {
            current_wave: self.current_wave,
            total_waves: total_waves as u32,
            is_spawning: self.is_spawning,
            spawn_index: self.spawn_index as u32,
        }
    }

    fn current_group<'a>(&self, wave: &'a Wave) -> Option<&'a BloonGroup> {
        wave.groups.get(self.spawn_index)
    }

    /// Move to the first non-empty group at or after `spawn_index`, or
    /// finish the wave if there is none.
    fn enter_group(&mut self, wave: &Wave) {
        while let Some(group) = wave.groups.get(self.spawn_index) {
            if group.count > 0 {
                self.remaining = group.count;
                return;
            }
            self.spawn_index += 1;
        }
        self.finish();
    }

    fn finish(&mut self) {
        self.is_spawning = false;
        self.spawn_timer = 0.0;
        self.spawn_index = 0;
        self.remaining = 0;
    }
}

fn group_spacing(group: &BloonGroup) -> f64 {
    if group.spacing > 0.0 {
        group.spacing
    } else {
        DEFAULT_GROUP_SPACING
    }
}

/// Advance the spawner by `elapsed` seconds and return the enemies due.
///
/// Large elapsed steps can emit several enemies, and can cross group
/// boundaries, in one call.
pub fn advance(state: &mut WaveState, wave: &Wave, elapsed: f64) -> Vec<SpawnOrder> {
    let mut orders = Vec::new();
    if !state.is_spawning {
        return orders;
    }

    state.spawn_timer += elapsed;
    while state.is_spawning {
        let Some(group) = state.current_group(wave) else {
            state.finish();
            break;
        };
        let spacing = group_spacing(group);
        if state.spawn_timer + SPAWN_EPSILON < spacing {
            break;
        }

        orders.push(SpawnOrder {
            kind: group.kind,
            camo: group.camo,
            regrow: group.regrow,
        });
        state.spawn_timer -= spacing;
        state.remaining = state.remaining.saturating_sub(1);

        if state.remaining == 0 {
            state.spawn_index += 1;
            state.enter_group(wave);
        }
    }

    orders
}

/// Run the spawner for one tick, spawning due enemies at the path start.
/// Returns the number of enemies spawned.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    ids: &mut IdAllocator,
    state: &mut WaveState,
    waves: &[Wave],
    path: &Path,
    elapsed: f64,
) -> usize {
    let Some(wave) = state.active_wave(waves) else {
        return 0;
    };

    let orders = advance(state, wave, elapsed);
    for order in &orders {
        world_setup::spawn_enemy(world, rng, ids, path, order.kind, order.camo, order.regrow);
    }

    if !orders.is_empty() {
        debug!("wave {}: spawned {} enemies", state.current_wave, orders.len());
    }
    if !state.is_spawning {
        info!("wave {} finished spawning", state.current_wave);
    }
    orders.len()
}
