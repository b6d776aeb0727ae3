//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems, and produces `GameStateSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use popline_core::catalog::tower_spec;
use popline_core::commands::{CommandOutcome, PlayerCommand};
use popline_core::components::{Enemy, Tower};
use popline_core::constants::{DT, WAVE_REWARD_BASE, WAVE_REWARD_PER_WAVE};
use popline_core::enums::{Difficulty, GamePhase, GameSpeed, TargetingMode, TowerKind, UpgradePath};
use popline_core::error::CommandRejection;
use popline_core::events::GameEvent;
use popline_core::state::GameStateSnapshot;
use popline_core::types::{Point, SimTime, TowerId};

use crate::economy::{Economy, ScoreState};
use crate::path::Path;
use crate::placement;
use crate::scenario::MapDefinition;
use crate::systems;
use crate::systems::snapshot::SnapshotContext;
use crate::systems::wave_spawner::WaveState;
use crate::world_setup::{self, IdAllocator};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub speed: GameSpeed,
    pub difficulty: Difficulty,
    pub map: MapDefinition,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            speed: GameSpeed::default(),
            difficulty: Difficulty::default(),
            map: MapDefinition::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    speed: GameSpeed,
    difficulty: Difficulty,
    seed: u64,
    rng: ChaCha8Rng,
    ids: IdAllocator,
    map: MapDefinition,
    wave_state: WaveState,
    economy: Economy,
    score: ScoreState,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            speed: config.speed,
            difficulty: config.difficulty,
            seed: config.seed,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ids: IdAllocator::default(),
            map: config.map,
            wave_state: WaveState::default(),
            economy: Economy::new(config.difficulty),
            score: ScoreState::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Validate and apply a command immediately, between ticks.
    /// A rejected command leaves the simulation untouched.
    pub fn apply_command(&mut self, command: PlayerCommand) -> Result<CommandOutcome, CommandRejection> {
        match command {
            PlayerCommand::StartWave => self.start_wave(),
            PlayerCommand::PlaceTower { kind, position } => self.place_tower(kind, position),
            PlayerCommand::UpgradeTower { tower, path } => self.upgrade_tower(tower, path),
            PlayerCommand::SellTower { tower } => self.sell_tower(tower),
            PlayerCommand::SetTargetingMode { tower, mode } => self.set_targeting_mode(tower, mode),
            PlayerCommand::SetPath { waypoints } => {
                self.ensure_not_over()?;
                self.map.path = Path::new(waypoints)?;
                info!("path replaced ({} waypoints)", self.map.path.len());
                Ok(CommandOutcome::Applied)
            }
            PlayerCommand::SetSpeed { speed } => {
                self.speed = speed;
                Ok(CommandOutcome::Applied)
            }
            PlayerCommand::Pause => {
                self.ensure_not_over()?;
                self.phase = GamePhase::Paused;
                Ok(CommandOutcome::Applied)
            }
            PlayerCommand::Resume => {
                self.ensure_not_over()?;
                self.phase = GamePhase::Running;
                Ok(CommandOutcome::Applied)
            }
            PlayerCommand::NewGame { difficulty } => {
                self.reset(difficulty);
                Ok(CommandOutcome::Applied)
            }
        }
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Running {
            let elapsed = self.tick_elapsed();
            self.run_systems(elapsed);
            self.time.advance(elapsed);
        }

        let events = std::mem::take(&mut self.events);
        self.build_snapshot(events)
    }

    /// The current state without advancing. Pending events stay pending.
    pub fn snapshot(&self) -> GameStateSnapshot {
        self.build_snapshot(Vec::new())
    }

    /// Simulated seconds covered by one tick at the current speed.
    pub fn tick_elapsed(&self) -> f64 {
        DT * self.speed.multiplier()
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    pub fn economy(&self) -> Economy {
        self.economy
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn wave_state(&self) -> WaveState {
        self.wave_state
    }

    pub fn map(&self) -> &MapDefinition {
        &self.map
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn alive_enemies(&self) -> usize {
        self.world.query::<&Enemy>().iter().count()
    }

    /// Insert a prepared enemy directly (for tests that stage a battlefield).
    #[cfg(test)]
    pub fn insert_enemy(&mut self, build: impl FnOnce(popline_core::types::EnemyId) -> Enemy) -> Entity {
        let enemy = build(self.ids.enemy());
        self.world.spawn((enemy,))
    }

    /// Process all queued commands. Rejections become events.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            let label = format!("{command:?}");
            if let Err(reason) = self.apply_command(command) {
                warn!("rejected {label}: {reason}");
                self.events.push(GameEvent::CommandRejected { reason });
            }
        }
    }

    fn ensure_not_over(&self) -> Result<(), CommandRejection> {
        if self.phase.is_over() {
            return Err(CommandRejection::GameOver);
        }
        Ok(())
    }

    fn start_wave(&mut self) -> Result<CommandOutcome, CommandRejection> {
        self.ensure_not_over()?;
        let alive = self.alive_enemies();
        let wave = self.wave_state.start(alive, &self.map.waves)?;
        info!("wave {wave}/{} started", self.map.waves.len());
        self.events.push(GameEvent::WaveStarted { wave });
        Ok(CommandOutcome::WaveStarted { wave })
    }

    fn place_tower(&mut self, kind: TowerKind, position: Point) -> Result<CommandOutcome, CommandRejection> {
        self.ensure_not_over()?;
        let cost = tower_spec(kind).cost;

        let existing: Vec<Point> = self
            .world
            .query::<&Tower>()
            .iter()
            .map(|(_, t)| t.position)
            .collect();
        placement::validate(position, &self.map.path, existing)?;
        self.economy.spend(cost)?;

        let id = self.ids.tower();
        self.world
            .spawn((world_setup::build_tower(id, kind, position),));
        self.score.towers_placed += 1;
        debug!("placed {kind:?} as {id} at ({:.0}, {:.0})", position.x, position.y);
        self.events.push(GameEvent::TowerPlaced { tower: id, kind, cost });
        Ok(CommandOutcome::TowerPlaced { tower: id })
    }

    fn upgrade_tower(&mut self, id: TowerId, path: UpgradePath) -> Result<CommandOutcome, CommandRejection> {
        self.ensure_not_over()?;
        let entity = self.tower_entity(id)?;
        let mut tower = self
            .world
            .get::<&mut Tower>(entity)
            .map_err(|_| CommandRejection::UnknownTower(id))?;

        let other = path.other();
        if tower.upgrades.level(other) > 0 {
            return Err(CommandRejection::PathLocked { other });
        }
        let tier = tower_spec(tower.kind)
            .next_upgrade(path, tower.upgrades.level(path))
            .ok_or(CommandRejection::MaxUpgradeLevel)?;
        self.economy.spend(tier.cost)?;

        world_setup::apply_upgrade(&mut tower, tier);
        let level = tower.upgrades.level_mut(path);
        *level += 1;
        let level = *level;
        drop(tower);

        debug!("{id} bought {} ({path:?} level {level})", tier.name);
        self.events.push(GameEvent::TowerUpgraded {
            tower: id,
            path,
            level,
            cost: tier.cost,
        });
        Ok(CommandOutcome::TowerUpgraded { tower: id, path, level })
    }

    fn sell_tower(&mut self, id: TowerId) -> Result<CommandOutcome, CommandRejection> {
        self.ensure_not_over()?;
        let entity = self.tower_entity(id)?;
        let refund = self
            .world
            .get::<&Tower>(entity)
            .map(|tower| world_setup::sell_value(&tower))
            .map_err(|_| CommandRejection::UnknownTower(id))?;
        self.world
            .despawn(entity)
            .map_err(|_| CommandRejection::UnknownTower(id))?;

        self.economy.earn(refund);
        debug!("sold {id} for {refund}");
        self.events.push(GameEvent::TowerSold { tower: id, refund });
        Ok(CommandOutcome::TowerSold { tower: id, refund })
    }

    fn set_targeting_mode(&mut self, id: TowerId, mode: TargetingMode) -> Result<CommandOutcome, CommandRejection> {
        let entity = self.tower_entity(id)?;
        let mut tower = self
            .world
            .get::<&mut Tower>(entity)
            .map_err(|_| CommandRejection::UnknownTower(id))?;
        tower.targeting_mode = mode;
        Ok(CommandOutcome::Applied)
    }

    fn tower_entity(&self, id: TowerId) -> Result<Entity, CommandRejection> {
        self.world
            .query::<&Tower>()
            .iter()
            .find(|(_, t)| t.id == id)
            .map(|(entity, _)| entity)
            .ok_or(CommandRejection::UnknownTower(id))
    }

    /// Start over on the current map with fresh resources.
    fn reset(&mut self, difficulty: Difficulty) {
        self.world.clear();
        self.time = SimTime::default();
        self.phase = GamePhase::Running;
        self.difficulty = difficulty;
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.ids = IdAllocator::default();
        self.wave_state = WaveState::default();
        self.economy = Economy::new(difficulty);
        self.score = ScoreState::default();
        self.despawn_buffer.clear();
        self.events.clear();
        info!("new game ({difficulty:?})");
    }

    /// Run all systems in order.
    fn run_systems(&mut self, elapsed: f64) {
        // 1. Wave spawning (new enemies move this same tick)
        systems::wave_spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.ids,
            &mut self.wave_state,
            &self.map.waves,
            &self.map.path,
            elapsed,
        );

        // 2. Enemy motion and leaks
        let defeated = systems::movement::run(
            &mut self.world,
            &self.map.path,
            elapsed,
            &mut self.economy,
            &mut self.score,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        if defeated {
            self.phase = GamePhase::Defeat;
            info!("defeat on wave {}", self.wave_state.current_wave);
            self.events.push(GameEvent::Defeat);
            return;
        }

        // 3. Targeting and firing
        systems::fire_control::run(&mut self.world, &mut self.ids, &mut self.events, elapsed);

        // 4. Projectile flight and hit resolution
        let popped = systems::projectiles::run(
            &mut self.world,
            elapsed,
            &mut self.economy,
            &mut self.score,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        // 5. Death decomposition
        systems::decomposition::run(&mut self.world, &popped, &mut self.ids);

        // 6. Wave completion
        self.check_wave_complete();
    }

    /// Pay out or declare victory once a started wave has fully cleared.
    fn check_wave_complete(&mut self) {
        if !self.wave_state.awaiting_clear || self.wave_state.is_spawning || self.alive_enemies() > 0 {
            return;
        }
        self.wave_state.awaiting_clear = false;
        self.score.waves_cleared += 1;

        let wave = self.wave_state.current_wave;
        if wave as usize >= self.map.waves.len() {
            self.events.push(GameEvent::WaveCompleted { wave, reward: 0 });
            self.phase = GamePhase::Victory;
            info!("victory after wave {wave}");
            self.events.push(GameEvent::Victory);
            return;
        }

        let reward = WAVE_REWARD_BASE + WAVE_REWARD_PER_WAVE * wave;
        self.economy.earn(reward);
        self.score.cash_from_waves += reward;
        info!("wave {wave} cleared, reward {reward}");
        self.events.push(GameEvent::WaveCompleted { wave, reward });
    }

    fn build_snapshot(&self, events: Vec<GameEvent>) -> GameStateSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotContext {
                time: self.time,
                phase: self.phase,
                speed: self.speed,
                difficulty: self.difficulty,
                wave: self.wave_state.view(self.map.waves.len()),
                economy: &self.economy,
                score: &self.score,
                path: &self.map.path,
            },
            events,
        )
    }
}
