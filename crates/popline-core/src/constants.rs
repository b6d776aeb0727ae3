//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Nominal seconds per tick, before the speed multiplier.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Elapsed-time multiplier at normal game speed.
pub const NORMAL_SPEED_MULTIPLIER: f64 = 10.0;

/// Elapsed-time multiplier at fast-forward.
pub const FAST_SPEED_MULTIPLIER: f64 = 100.0;

// --- Map ---

/// Playfield width in pixels.
pub const MAP_WIDTH: f64 = 700.0;

/// Playfield height in pixels.
pub const MAP_HEIGHT: f64 = 500.0;

/// Towers may not be placed closer than this to the playfield edge.
pub const MAP_MARGIN: f64 = 20.0;

/// Minimum distance between a tower and any path segment.
pub const PATH_MARGIN: f64 = 30.0;

/// Minimum distance between two towers.
pub const MIN_TOWER_SPACING: f64 = 30.0;

// --- Enemies ---

/// Scale from catalog speed units to path pixels per second.
pub const ENEMY_SPEED_SCALE: f64 = 2.0;

/// Health regenerated per second by regrow enemies.
pub const REGROW_RATE: f64 = 0.5;

/// Total lateral spread of spawn jitter in pixels (half above, half below).
pub const SPAWN_JITTER: f64 = 10.0;

/// Defender health lost when a regular enemy leaks.
pub const LEAK_DAMAGE: u32 = 1;

/// Defender health lost when a MOAB-class enemy leaks.
pub const MOAB_LEAK_DAMAGE: u32 = 10;

// --- Waves ---

/// Spacing used for groups that author zero or negative spacing.
pub const DEFAULT_GROUP_SPACING: f64 = 1.0;

/// Tolerance on spawn-timer comparisons so that accumulated 1/30 s steps
/// land exactly on whole-second spacings.
pub const SPAWN_EPSILON: f64 = 1e-9;

/// Flat cash reward for clearing a wave.
pub const WAVE_REWARD_BASE: u32 = 100;

/// Additional reward per wave number cleared.
pub const WAVE_REWARD_PER_WAVE: u32 = 50;

// --- Towers and projectiles ---

/// Fraction of a tower's purchase cost refunded on sale.
pub const SELL_REFUND_RATIO: f64 = 0.8;

/// Seconds a status effect lasts once applied.
pub const EFFECT_DURATION_SECS: f64 = 3.0;

// --- Defender ---

/// Starting money at the default difficulty.
pub const STARTING_MONEY: u32 = 650;

/// Starting health at the default difficulty.
pub const STARTING_HEALTH: u32 = 100;
