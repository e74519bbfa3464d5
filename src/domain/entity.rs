//! Coordinates, directions and the player token.
use std::fmt;

/// A cell position. Signed so a candidate step past the left or top
/// edge is representable before the bounds check rejects it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// The neighbouring coordinate one step in `dir`.
    /// `None` only on integer overflow; bounds are the field's concern.
    pub fn offset(self, dir: Direction) -> Option<Coord> {
        let (dx, dy) = dir.delta();
        Some(Coord {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Movement direction (one cell per input event, no diagonals)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector in screen space (y grows downward).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Coord,
}

impl Player {
    pub fn new(pos: Coord) -> Self {
        Player { pos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_unit_steps() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            assert_eq!(dx.abs() + dy.abs(), 1, "{dir:?}");
        }
    }

    #[test]
    fn offset_moves_one_cell() {
        let c = Coord::new(3, 3);
        assert_eq!(c.offset(Direction::Up), Some(Coord::new(3, 2)));
        assert_eq!(c.offset(Direction::Down), Some(Coord::new(3, 4)));
        assert_eq!(c.offset(Direction::Left), Some(Coord::new(2, 3)));
        assert_eq!(c.offset(Direction::Right), Some(Coord::new(4, 3)));
    }

    #[test]
    fn offset_past_origin_goes_negative() {
        assert_eq!(Coord::new(0, 5).offset(Direction::Left), Some(Coord::new(-1, 5)));
    }

    #[test]
    fn offset_overflow_is_none() {
        assert_eq!(Coord::new(i32::MAX, 0).offset(Direction::Right), None);
    }

    #[test]
    fn display_format() {
        assert_eq!(Coord::new(40, 12).to_string(), "(40, 12)");
    }
}
