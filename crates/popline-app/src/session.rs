//! Host-facing handlers for a realtime session. They bridge callers to
//! the game loop thread via its command channel.

use thiserror::Error;

use popline_core::commands::PlayerCommand;
use popline_core::state::GameStateSnapshot;

use crate::config::AppConfig;
use crate::game_loop;
use crate::state::{AppState, GameLoopCommand};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session already running")]
    AlreadyRunning,
    #[error("session not started")]
    NotStarted,
    #[error("game loop has stopped")]
    Disconnected,
    #[error("session state lock poisoned")]
    Poisoned,
}

impl<T> From<std::sync::PoisonError<T>> for SessionError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        SessionError::Poisoned
    }
}

/// Start the game loop thread if it is not already running.
pub fn start_session(state: &AppState, config: AppConfig) -> Result<(), SessionError> {
    let mut running = state.running.lock()?;
    if *running {
        return Err(SessionError::AlreadyRunning);
    }

    let cmd_tx = game_loop::spawn_game_loop(config, state.latest_snapshot.clone());
    *state.command_tx.lock()? = Some(cmd_tx);
    *running = true;
    Ok(())
}

/// Forward a player command to the loop; it is applied at the next tick.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), SessionError> {
    send(state, GameLoopCommand::PlayerCommand(command))
}

/// Ask the loop to stop. The session can be started again afterwards.
pub fn stop_session(state: &AppState) -> Result<(), SessionError> {
    send(state, GameLoopCommand::Shutdown)?;
    *state.command_tx.lock()? = None;
    *state.running.lock()? = false;
    Ok(())
}

/// The most recent snapshot published by the loop, if any.
pub fn get_snapshot(state: &AppState) -> Result<Option<GameStateSnapshot>, SessionError> {
    Ok(state.latest_snapshot.lock()?.clone())
}

fn send(state: &AppState, command: GameLoopCommand) -> Result<(), SessionError> {
    let tx_lock = state.command_tx.lock()?;
    match tx_lock.as_ref() {
        Some(tx) => tx.send(command).map_err(|_| SessionError::Disconnected),
        None => Err(SessionError::NotStarted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_need_a_running_session() {
        let state = AppState::new();
        assert_eq!(
            send_command(&state, PlayerCommand::StartWave),
            Err(SessionError::NotStarted)
        );
        assert_eq!(stop_session(&state), Err(SessionError::NotStarted));
        assert!(matches!(get_snapshot(&state), Ok(None)));
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let state = AppState::new();
        start_session(&state, AppConfig::default()).unwrap();
        assert_eq!(
            start_session(&state, AppConfig::default()),
            Err(SessionError::AlreadyRunning)
        );
        stop_session(&state).unwrap();
        assert!(!*state.running.lock().unwrap());
    }
}
