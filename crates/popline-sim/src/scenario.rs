//! Map definitions: the path enemies follow and the authored wave scripts.
//!
//! Wave scripts are immutable. Spawner progress lives in `WaveState`,
//! never in the script itself.

use std::sync::Arc;

use popline_core::enums::EnemyKind;
use popline_core::types::Point;

use crate::path::Path;

/// A run of identical enemies within a wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloonGroup {
    pub kind: EnemyKind,
    pub count: u32,
    /// Seconds between individual spawns.
    pub spacing: f64,
    pub camo: bool,
    pub regrow: bool,
}

impl BloonGroup {
    pub fn new(kind: EnemyKind, count: u32, spacing: f64) -> Self {
        Self {
            kind,
            count,
            spacing,
            camo: false,
            regrow: false,
        }
    }

    pub fn camo(mut self) -> Self {
        self.camo = true;
        self
    }

    pub fn regrow(mut self) -> Self {
        self.regrow = true;
        self
    }
}

/// An ordered list of groups, emitted front to back.
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    pub groups: Vec<BloonGroup>,
}

impl Wave {
    pub fn new(groups: Vec<BloonGroup>) -> Self {
        Self { groups }
    }

    /// Number of enemies the wave spawns directly (children excluded).
    pub fn total_spawns(&self) -> u32 {
        self.groups.iter().map(|g| g.count).sum()
    }
}

/// A playable map: its path and its wave script.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDefinition {
    pub name: String,
    pub path: Path,
    pub waves: Arc<[Wave]>,
}

impl Default for MapDefinition {
    fn default() -> Self {
        monkey_lane()
    }
}

/// "Monkey Lane": an S-bend across the field with twenty escalating waves.
pub fn monkey_lane() -> MapDefinition {
    let path = Path::from_fixed([
        Point::new(0.0, 250.0),
        Point::new(200.0, 250.0),
        Point::new(200.0, 100.0),
        Point::new(500.0, 100.0),
        Point::new(500.0, 400.0),
        Point::new(700.0, 400.0),
    ]);

    MapDefinition {
        name: "Monkey Lane".to_string(),
        path,
        waves: monkey_lane_waves().into(),
    }
}

fn monkey_lane_waves() -> Vec<Wave> {
    use EnemyKind::*;

    let g = BloonGroup::new;

    vec![
        // 1-5: basic tiers
        Wave::new(vec![g(Red, 20, 1.0)]),
        Wave::new(vec![g(Red, 30, 0.8), g(Blue, 15, 1.0)]),
        Wave::new(vec![g(Red, 25, 0.7), g(Blue, 20, 0.8), g(Green, 10, 1.0)]),
        Wave::new(vec![g(Blue, 30, 0.7), g(Green, 15, 0.8)]),
        Wave::new(vec![g(Green, 30, 0.6), g(Yellow, 10, 0.8)]),
        // 6-10: fast and layered tiers
        Wave::new(vec![g(Yellow, 25, 0.5), g(Pink, 10, 0.7)]),
        Wave::new(vec![g(Pink, 30, 0.4), g(Black, 5, 1.0)]),
        Wave::new(vec![g(Black, 15, 0.8), g(White, 15, 0.8)]),
        Wave::new(vec![g(White, 20, 0.7), g(Zebra, 8, 1.0)]),
        Wave::new(vec![g(Rainbow, 10, 1.2)]),
        // 11-14: ceramics, camo, regrow
        Wave::new(vec![g(Rainbow, 15, 1.0), g(Ceramic, 3, 2.0)]),
        Wave::new(vec![g(Green, 30, 0.5).camo(), g(Yellow, 20, 0.6).camo()]),
        Wave::new(vec![g(Pink, 25, 0.4).regrow(), g(Black, 10, 0.8).regrow()]),
        Wave::new(vec![g(Rainbow, 15, 1.0).regrow(), g(Ceramic, 5, 1.5).camo()]),
        // 15-20: MOAB class
        Wave::new(vec![g(Rainbow, 20, 0.8), g(Ceramic, 6, 1.5), g(Moab, 1, 0.0)]),
        Wave::new(vec![g(Moab, 2, 3.0)]),
        Wave::new(vec![g(Ceramic, 15, 1.0).camo().regrow(), g(Moab, 3, 2.5)]),
        Wave::new(vec![g(Rainbow, 30, 0.6).regrow(), g(Moab, 4, 2.0)]),
        Wave::new(vec![g(Ceramic, 20, 0.8).camo(), g(Moab, 2, 3.0), g(Bfb, 1, 0.0)]),
        Wave::new(vec![g(Moab, 4, 2.0), g(Bfb, 2, 4.0)]),
    ]
}
