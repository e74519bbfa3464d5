//! Movement resolution: pure, one cell per call.
//!
//! ┌──────────────────────────────┬────────────┐
//! │ Condition (priority order)   │ Result     │
//! ├──────────────────────────────┼────────────┤
//! │ candidate outside the field  │ HitEdge    │
//! │ candidate is a Wall          │ HitWall    │
//! │ otherwise (Empty or Special) │ Moved      │
//! └──────────────────────────────┴────────────┘
//!
//! Rejections are normal outcomes, not errors.

use super::entity::{Coord, Direction};
use super::field::Field;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    Moved(Coord),
    HitEdge,
    HitWall(Coord),
}

pub fn try_step(field: &Field, current: Coord, dir: Direction) -> StepOutcome {
    let candidate = match current.offset(dir) {
        Some(c) if field.contains(c) => c,
        _ => return StepOutcome::HitEdge,
    };
    if field.is_walkable(candidate) {
        StepOutcome::Moved(candidate)
    } else {
        StepOutcome::HitWall(candidate)
    }
}

/// The player's coordinate after attempting one step. Unchanged on rejection.
pub fn resolve(field: &Field, current: Coord, dir: Direction) -> Coord {
    match try_step(field, current, dir) {
        StepOutcome::Moved(next) => next,
        StepOutcome::HitEdge | StepOutcome::HitWall(_) => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::TileKind;

    fn field_from(rows: &[&str]) -> Field {
        let h = rows.len();
        let w = rows[0].len();
        let mut f = Field::new(w, h);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let kind = match ch {
                    '#' => TileKind::Wall,
                    '*' => TileKind::Special,
                    _ => TileKind::Empty,
                };
                f.set_tile(Coord::new(x as i32, y as i32), kind).unwrap();
            }
        }
        f
    }

    #[test]
    fn left_edge_rejects() {
        let f = Field::new(80, 25);
        let start = Coord::new(0, 5);
        assert_eq!(try_step(&f, start, Direction::Left), StepOutcome::HitEdge);
        assert_eq!(resolve(&f, start, Direction::Left), start);
    }

    #[test]
    fn wall_below_rejects() {
        let mut f = Field::new(80, 25);
        f.set_tile(Coord::new(10, 10), TileKind::Wall).unwrap();
        let start = Coord::new(10, 9);
        assert_eq!(
            try_step(&f, start, Direction::Down),
            StepOutcome::HitWall(Coord::new(10, 10))
        );
        assert_eq!(resolve(&f, start, Direction::Down), start);
    }

    #[test]
    fn rejection_is_idempotent() {
        let f = field_from(&[
            ".#.",
            "...",
        ]);
        let start = Coord::new(1, 1);
        let once = resolve(&f, start, Direction::Up);
        let twice = resolve(&f, once, Direction::Up);
        assert_eq!(once, start);
        assert_eq!(twice, start);
    }

    #[test]
    fn special_is_entered() {
        let f = field_from(&[".*"]);
        assert_eq!(
            resolve(&f, Coord::new(0, 0), Direction::Right),
            Coord::new(1, 0)
        );
    }

    #[test]
    fn never_leaves_the_field() {
        let f = field_from(&[
            "..#.",
            "#...",
            "..#.",
        ]);
        for y in 0..3 {
            for x in 0..4 {
                let c = Coord::new(x, y);
                if !f.is_walkable(c) {
                    continue;
                }
                for dir in Direction::ALL {
                    let next = resolve(&f, c, dir);
                    assert!(f.contains(next), "{c} {dir:?} -> {next}");
                    assert!(f.is_walkable(next));
                    let (dx, dy) = (next.x - c.x, next.y - c.y);
                    assert!(dx.abs() + dy.abs() <= 1);
                }
            }
        }
    }

    #[test]
    fn every_wall_neighbour_is_blocked() {
        let f = field_from(&[
            "...",
            ".#.",
            "...",
        ]);
        let wall = Coord::new(1, 1);
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let from = Coord::new(wall.x - dx, wall.y - dy);
            assert_eq!(resolve(&f, from, dir), from);
        }
    }

    #[test]
    fn open_step_moves() {
        let f = Field::new(3, 3);
        assert_eq!(
            try_step(&f, Coord::new(1, 1), Direction::Up),
            StepOutcome::Moved(Coord::new(1, 0))
        );
    }
}
