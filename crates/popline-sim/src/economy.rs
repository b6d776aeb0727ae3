//! Defender resources and running score.
//!
//! Stored on `SimulationEngine`, NOT as ECS entities.

use popline_core::enums::Difficulty;
use popline_core::error::CommandRejection;
use popline_core::state::{EconomyView, ScoreView};

/// Money and health of the defender. Both are non-negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Economy {
    pub money: u32,
    pub health: u32,
}

impl Economy {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            money: difficulty.starting_money(),
            health: difficulty.starting_health(),
        }
    }

    /// Check that `cost` is affordable without spending it.
    pub fn check_funds(&self, cost: u32) -> Result<(), CommandRejection> {
        if cost > self.money {
            return Err(CommandRejection::InsufficientFunds {
                needed: cost,
                available: self.money,
            });
        }
        Ok(())
    }

    pub fn spend(&mut self, cost: u32) -> Result<(), CommandRejection> {
        self.check_funds(cost)?;
        self.money -= cost;
        Ok(())
    }

    pub fn earn(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Deduct health, clamping at zero. Returns true once the defender is dead.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    pub fn view(&self) -> EconomyView {
        EconomyView {
            money: self.money,
            health: self.health,
        }
    }
}

/// Running score state tracked by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub pops: u32,
    pub leaks: u32,
    pub cash_from_pops: u32,
    pub cash_from_waves: u32,
    pub towers_placed: u32,
    pub waves_cleared: u32,
}

impl ScoreState {
    pub fn view(&self) -> ScoreView {
        ScoreView {
            pops: self.pops,
            leaks: self.leaks,
            cash_from_pops: self.cash_from_pops,
            cash_from_waves: self.cash_from_waves,
            towers_placed: self.towers_placed,
            waves_cleared: self.waves_cleared,
        }
    }
}
