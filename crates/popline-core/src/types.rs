//! Fundamental geometric and simulation types.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position on the battlefield (pixels, y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulated time in seconds, including the speed multiplier.
    pub elapsed_secs: f64,
}

/// Stable identity of an enemy. Allocated monotonically by the engine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EnemyId(pub u32);

/// Stable identity of a placed tower.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TowerId(pub u32);

/// Stable identity of an in-flight projectile.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProjectileId(pub u32);

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        DVec2::from(*self).distance(DVec2::from(*other))
    }

    /// Angle of the vector from `self` to `other` in radians (atan2, x axis = 0).
    pub fn angle_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Linear interpolation toward `other` by `t` (0 = self, 1 = other).
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        DVec2::from(*self).lerp(DVec2::from(*other), t).into()
    }

    /// Shortest distance from this point to the segment `start..end`.
    ///
    /// A degenerate segment (start == end) measures to `start`.
    pub fn distance_to_segment(&self, start: &Point, end: &Point) -> f64 {
        let p = DVec2::from(*self);
        let a = DVec2::from(*start);
        let ab = DVec2::from(*end) - a;
        let len_sq = ab.length_squared();
        if len_sq == 0.0 {
            return p.distance(a);
        }
        let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
        p.distance(a + ab * t)
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        DVec2::new(p.x, p.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point::new(v.x, v.y)
    }
}

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for TowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl SimTime {
    /// Advance by one tick covering `elapsed_secs` of simulated time.
    pub fn advance(&mut self, elapsed_secs: f64) {
        self.tick += 1;
        self.elapsed_secs += elapsed_secs;
    }
}
