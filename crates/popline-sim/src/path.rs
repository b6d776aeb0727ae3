//! The polyline enemies walk along.
//!
//! A `Path` is an immutable, cheaply clonable snapshot. Editing the path
//! publishes a new snapshot between ticks; nothing mutates waypoints in
//! place.

use std::sync::Arc;

use popline_core::error::CommandRejection;
use popline_core::types::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    waypoints: Arc<[Point]>,
}

impl Path {
    /// Build a path. At least two waypoints are required.
    pub fn new(waypoints: Vec<Point>) -> Result<Self, CommandRejection> {
        if waypoints.len() < 2 {
            return Err(CommandRejection::InvalidPath);
        }
        Ok(Self {
            waypoints: waypoints.into(),
        })
    }

    /// Build a path from a fixed-size waypoint list, checked at compile time.
    pub fn from_fixed<const N: usize>(waypoints: [Point; N]) -> Self {
        const { assert!(N >= 2, "a path needs at least two waypoints") };
        Self {
            waypoints: Arc::new(waypoints),
        }
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    pub fn start(&self) -> Point {
        self.waypoints[0]
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false: construction guarantees two or more waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The segment starting at waypoint `index`, if one exists.
    pub fn segment(&self, index: usize) -> Option<(Point, Point)> {
        let start = *self.waypoints.get(index)?;
        let end = *self.waypoints.get(index + 1)?;
        Some((start, end))
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.waypoints.windows(2).map(|w| (w[0], w[1]))
    }

    /// Shortest distance from `point` to any segment.
    pub fn distance_to(&self, point: &Point) -> f64 {
        self.segments()
            .map(|(a, b)| point.distance_to_segment(&a, &b))
            .fold(f64::INFINITY, f64::min)
    }

    /// Total length in pixels.
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance_to(&b)).sum()
    }
}
