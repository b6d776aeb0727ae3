//! Game loop thread: runs the simulation engine at 30 Hz and publishes
//! snapshots.
//!
//! The engine is created inside the thread. Commands arrive via an `mpsc`
//! channel and are applied at the next tick boundary. The latest snapshot
//! is stored in shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::{debug, info};

use popline_core::commands::PlayerCommand;
use popline_core::constants::TICK_RATE;
use popline_core::state::GameStateSnapshot;

use crate::config::AppConfig;
use crate::runner;
use crate::state::GameLoopCommand;

/// Wall-clock duration of one tick. Game speed widens the simulated step
/// instead of shortening this.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the host to use.
pub fn spawn_game_loop(
    config: AppConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> mpsc::Sender<GameLoopCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("popline-game-loop".into())
        .spawn(move || {
            run_game_loop(&config, cmd_rx, &latest_snapshot);
        })
        .expect("Failed to spawn game loop thread");

    cmd_tx
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: &AppConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let mut engine = runner::prepare_engine(config);
    let mut snapshot = engine.snapshot();
    let mut next_tick_time = Instant::now();
    info!("game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!("game loop stopped at tick {}", snapshot.time.tick);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        if config.auto_start_waves && runner::ready_for_next_wave(&snapshot) {
            engine.queue_command(PlayerCommand::StartWave);
        }

        // 2. Advance one tick (the engine handles pause and game over)
        snapshot = engine.tick();
        for event in &snapshot.events {
            debug!("event: {event:?}");
        }

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind: reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}
