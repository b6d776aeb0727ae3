//! `popline [CONFIG.toml] [--json]`
//!
//! Runs one scripted session and logs how it ended. Set `RUST_LOG=debug`
//! for per-enemy detail.

use std::process::ExitCode;
use std::time::Duration;

use log::{error, info};

use popline_app::config::AppConfig;
use popline_app::runner;
use popline_app::session;
use popline_app::state::AppState;
use popline_core::state::GameStateSnapshot;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config_path = None;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => config_path = Some(arg),
        }
    }

    let config = match config_path {
        Some(path) => match AppConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("{path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    let result = if config.realtime {
        run_realtime(config)
    } else {
        Ok(runner::run_headless(&config))
    };

    let snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("session failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("{}", runner::summarize(&snapshot));
    if json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                error!("failed to encode snapshot: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

/// Drive the session from the loop thread, polling until it ends.
fn run_realtime(config: AppConfig) -> Result<GameStateSnapshot, session::SessionError> {
    let max_ticks = config.max_ticks;
    let state = AppState::new();
    session::start_session(&state, config)?;

    loop {
        std::thread::sleep(Duration::from_millis(250));
        let Some(snapshot) = session::get_snapshot(&state)? else {
            continue;
        };
        if snapshot.phase.is_over() || snapshot.time.tick >= max_ticks {
            session::stop_session(&state)?;
            return Ok(snapshot);
        }
    }
}
