//! Tower placement rules.

use popline_core::constants::*;
use popline_core::error::CommandRejection;
use popline_core::types::Point;

use crate::path::Path;

/// Check that `position` is a legal spot for a new tower: inside the
/// playfield margin, clear of the path, and clear of every existing tower.
/// Affordability is checked separately by the caller.
pub fn validate(
    position: Point,
    path: &Path,
    towers: impl IntoIterator<Item = Point>,
) -> Result<(), CommandRejection> {
    let in_bounds = (MAP_MARGIN..=MAP_WIDTH - MAP_MARGIN).contains(&position.x)
        && (MAP_MARGIN..=MAP_HEIGHT - MAP_MARGIN).contains(&position.y);
    if !in_bounds {
        return Err(CommandRejection::OutOfBounds);
    }

    if path.distance_to(&position) < PATH_MARGIN {
        return Err(CommandRejection::OnPath);
    }

    if towers
        .into_iter()
        .any(|other| other.distance_to(&position) < MIN_TOWER_SPACING)
    {
        return Err(CommandRejection::TooCloseToTower);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::monkey_lane;

    const NO_TOWERS: [Point; 0] = [];

    #[test]
    fn open_ground_is_valid() {
        let path = monkey_lane().path;
        assert_eq!(validate(Point::new(100.0, 150.0), &path, NO_TOWERS), Ok(()));
    }

    #[test]
    fn path_margin_is_exclusive_at_the_boundary() {
        let path = monkey_lane().path;
        // First segment runs along y = 250.
        assert_eq!(
            validate(Point::new(100.0, 229.0), &path, NO_TOWERS),
            Err(CommandRejection::OnPath)
        );
        assert_eq!(validate(Point::new(100.0, 220.0), &path, NO_TOWERS), Ok(()));
    }

    #[test]
    fn towers_need_spacing() {
        let path = monkey_lane().path;
        let existing = [Point::new(100.0, 150.0)];
        assert_eq!(
            validate(Point::new(120.0, 150.0), &path, existing),
            Err(CommandRejection::TooCloseToTower)
        );
        assert_eq!(validate(Point::new(130.0, 150.0), &path, existing), Ok(()));
    }

    #[test]
    fn edges_are_out_of_bounds() {
        let path = monkey_lane().path;
        assert_eq!(
            validate(Point::new(10.0, 150.0), &path, NO_TOWERS),
            Err(CommandRejection::OutOfBounds)
        );
        assert_eq!(
            validate(Point::new(100.0, 490.0), &path, NO_TOWERS),
            Err(CommandRejection::OutOfBounds)
        );
    }
}
