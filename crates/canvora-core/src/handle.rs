//! Resize handles and manipulation directions.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Handle size in canvas units (for host rendering).
pub const HANDLE_SIZE: f64 = 8.0;
/// Default handle hit tolerance in canvas units.
pub const HANDLE_HIT_TOLERANCE: f64 = 12.0;

/// Direction of a manipulation: one of the eight resize grips, or a plain
/// move of the whole object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Move,
}

impl Direction {
    /// All eight resize grips, corners first.
    pub const GRIPS: [Direction; 8] = [
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Check if this is a corner grip.
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Direction::NorthWest | Direction::NorthEast | Direction::SouthWest | Direction::SouthEast
        )
    }

    /// Check if this is an edge grip.
    pub fn is_edge(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::East | Direction::South | Direction::West
        )
    }

    /// Check if dragging this grip moves the left edge.
    pub fn touches_left(self) -> bool {
        matches!(self, Direction::West | Direction::NorthWest | Direction::SouthWest)
    }

    /// Check if dragging this grip moves the right edge.
    pub fn touches_right(self) -> bool {
        matches!(self, Direction::East | Direction::NorthEast | Direction::SouthEast)
    }

    /// Check if dragging this grip moves the top edge.
    pub fn touches_top(self) -> bool {
        matches!(self, Direction::North | Direction::NorthWest | Direction::NorthEast)
    }

    /// Check if dragging this grip moves the bottom edge.
    pub fn touches_bottom(self) -> bool {
        matches!(self, Direction::South | Direction::SouthWest | Direction::SouthEast)
    }

    /// Compass code used by hosts ("nw", "e", ..., "move").
    pub fn code(self) -> &'static str {
        match self {
            Direction::North => "n",
            Direction::NorthEast => "ne",
            Direction::East => "e",
            Direction::SouthEast => "se",
            Direction::South => "s",
            Direction::SouthWest => "sw",
            Direction::West => "w",
            Direction::NorthWest => "nw",
            Direction::Move => "move",
        }
    }

    /// Parse a compass code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "n" => Some(Direction::North),
            "ne" => Some(Direction::NorthEast),
            "e" => Some(Direction::East),
            "se" => Some(Direction::SouthEast),
            "s" => Some(Direction::South),
            "sw" => Some(Direction::SouthWest),
            "w" => Some(Direction::West),
            "nw" => Some(Direction::NorthWest),
            "move" => Some(Direction::Move),
            _ => None,
        }
    }

    /// CSS cursor name for host cursor feedback.
    pub fn cursor(self) -> &'static str {
        match self {
            Direction::North | Direction::South => "ns-resize",
            Direction::East | Direction::West => "ew-resize",
            Direction::NorthWest | Direction::SouthEast => "nwse-resize",
            Direction::NorthEast | Direction::SouthWest => "nesw-resize",
            Direction::Move => "move",
        }
    }
}

/// A resize handle with its position and direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    /// Which grip this handle is.
    pub direction: Direction,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, direction: Direction) -> Self {
        Self { position, direction }
    }

    /// Check if a point (in canvas coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The eight resize handles for a bounding rectangle: four corners plus four
/// edge midpoints.
pub fn handles_for(bounds: Rect) -> Vec<Handle> {
    let cx = (bounds.x0 + bounds.x1) / 2.0;
    let cy = (bounds.y0 + bounds.y1) / 2.0;
    vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), Direction::NorthWest),
        Handle::new(Point::new(bounds.x1, bounds.y0), Direction::NorthEast),
        Handle::new(Point::new(bounds.x0, bounds.y1), Direction::SouthWest),
        Handle::new(Point::new(bounds.x1, bounds.y1), Direction::SouthEast),
        Handle::new(Point::new(cx, bounds.y0), Direction::North),
        Handle::new(Point::new(bounds.x1, cy), Direction::East),
        Handle::new(Point::new(cx, bounds.y1), Direction::South),
        Handle::new(Point::new(bounds.x0, cy), Direction::West),
    ]
}

/// Find which grip (if any) is hit at the given point.
pub fn hit_test_handles(bounds: Rect, point: Point, tolerance: f64) -> Option<Direction> {
    handles_for(bounds)
        .iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_handles() {
        let handles = handles_for(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(handles.len(), 8);
        assert!(handles.iter().all(|h| h.direction.is_corner() || h.direction.is_edge()));
    }

    #[test]
    fn test_handle_positions() {
        let handles = handles_for(Rect::new(0.0, 0.0, 100.0, 50.0));
        let east = handles.iter().find(|h| h.direction == Direction::East).unwrap();
        assert_eq!(east.position, Point::new(100.0, 25.0));
        let nw = handles.iter().find(|h| h.direction == Direction::NorthWest).unwrap();
        assert_eq!(nw.position, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_hit_test_handles() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(
            hit_test_handles(bounds, Point::new(98.0, 97.0), 5.0),
            Some(Direction::SouthEast)
        );
        assert_eq!(
            hit_test_handles(bounds, Point::new(50.0, 2.0), 5.0),
            Some(Direction::North)
        );
        assert_eq!(hit_test_handles(bounds, Point::new(50.0, 50.0), 5.0), None);
    }

    #[test]
    fn test_corner_beats_edge_on_overlap() {
        // Corners are listed before edge midpoints, so an ambiguous hit near
        // a corner resolves to the corner grip.
        let bounds = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert_eq!(
            hit_test_handles(bounds, Point::new(2.0, 10.0), 12.0),
            Some(Direction::NorthWest)
        );
    }

    #[test]
    fn test_codes_round_trip() {
        for grip in Direction::GRIPS {
            assert_eq!(Direction::from_code(grip.code()), Some(grip));
        }
        assert_eq!(Direction::from_code("move"), Some(Direction::Move));
        assert_eq!(Direction::from_code("x"), None);
    }

    #[test]
    fn test_edge_flags() {
        assert!(Direction::NorthWest.touches_left());
        assert!(Direction::NorthWest.touches_top());
        assert!(!Direction::NorthWest.touches_right());
        assert!(Direction::East.touches_right());
        assert!(!Direction::East.touches_top());
        assert!(Direction::SouthEast.is_corner());
        assert!(Direction::South.is_edge());
        assert!(!Direction::Move.is_corner());
    }
}
