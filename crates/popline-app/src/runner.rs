//! Scripted sessions: build an engine from an `AppConfig`, buy the
//! configured towers, and keep waves coming.

use log::{info, warn};

use popline_core::commands::{CommandOutcome, PlayerCommand};
use popline_core::constants::TICK_RATE;
use popline_core::state::GameStateSnapshot;
use popline_core::types::Point;
use popline_sim::SimulationEngine;

use crate::config::AppConfig;

/// Create an engine for `config` with its tower placements applied.
/// Rejected placements and upgrades are logged and skipped.
pub fn prepare_engine(config: &AppConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config.sim_config());

    for placement in &config.towers {
        let command = PlayerCommand::PlaceTower {
            kind: placement.kind,
            position: Point::new(placement.x, placement.y),
        };
        let tower = match engine.apply_command(command) {
            Ok(CommandOutcome::TowerPlaced { tower }) => tower,
            Ok(other) => {
                warn!("unexpected outcome placing {:?}: {other:?}", placement.kind);
                continue;
            }
            Err(reason) => {
                warn!(
                    "skipping {:?} at ({}, {}): {reason}",
                    placement.kind, placement.x, placement.y
                );
                continue;
            }
        };

        for &path in &placement.upgrades {
            if let Err(reason) = engine.apply_command(PlayerCommand::UpgradeTower { tower, path }) {
                warn!("{tower}: {path:?} upgrade skipped: {reason}");
            }
        }
    }

    info!(
        "session ready: {} towers, ${} left",
        engine.snapshot().towers.len(),
        engine.economy().money
    );
    engine
}

/// Whether the next wave may be started right now.
pub fn ready_for_next_wave(snapshot: &GameStateSnapshot) -> bool {
    !snapshot.phase.is_over()
        && !snapshot.wave.is_spawning
        && snapshot.enemies.is_empty()
        && snapshot.wave.current_wave < snapshot.wave.total_waves
}

/// Run a whole session as fast as possible and return the final snapshot.
pub fn run_headless(config: &AppConfig) -> GameStateSnapshot {
    let mut engine = prepare_engine(config);
    let mut snapshot = engine.snapshot();

    while snapshot.time.tick < config.max_ticks && !snapshot.phase.is_over() {
        if config.auto_start_waves && ready_for_next_wave(&snapshot) {
            engine.queue_command(PlayerCommand::StartWave);
        }
        snapshot = engine.tick();

        if snapshot.time.tick % (TICK_RATE as u64 * 60) == 0 {
            info!(
                "tick {}: wave {}/{}, ${}, {} health",
                snapshot.time.tick,
                snapshot.wave.current_wave,
                snapshot.wave.total_waves,
                snapshot.economy.money,
                snapshot.economy.health
            );
        }
    }
    snapshot
}

/// One-line summary of how a session ended.
pub fn summarize(snapshot: &GameStateSnapshot) -> String {
    format!(
        "{:?} after {} ticks ({:.0} s): wave {}/{}, ${}, {} health, {} pops, {} leaks",
        snapshot.phase,
        snapshot.time.tick,
        snapshot.time.elapsed_secs,
        snapshot.wave.current_wave,
        snapshot.wave.total_waves,
        snapshot.economy.money,
        snapshot.economy.health,
        snapshot.score.pops,
        snapshot.score.leaks
    )
}
