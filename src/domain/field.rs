//! Field: the authoritative store of tile kinds.
//!
//! ## Layout
//!
//! A single flat arena of `TileKind`, length `width * height`,
//! indexed by `y * width + x`. Every access goes through `index()`,
//! which is the only place bounds are checked.
//!
//! ## Special tile tracking
//!
//! The field remembers where the special tile is, so clearing it is
//! O(1) and at most one `Special` cell ever exists:
//!   - writing `Special` relocates it (the previous cell becomes `Empty`)
//!   - overwriting the special cell with anything else drops the tracking

use thiserror::Error;

use super::entity::Coord;
use super::tile::TileKind;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Contract violation: callers validate coordinates before use.
    #[error("coordinate {coord} is outside the {width}x{height} field")]
    OutOfBounds {
        coord: Coord,
        width: usize,
        height: usize,
    },
}

#[derive(Clone, Debug)]
pub struct Field {
    width: usize,
    height: usize,
    cells: Vec<TileKind>,
    special: Option<Coord>,
}

// ── Construction / dimensions ──

impl Field {
    /// An all-`Empty` field.
    pub fn new(width: usize, height: usize) -> Self {
        Field {
            width,
            height,
            cells: vec![TileKind::Empty; width * height],
            special: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The player's start and reset position: `(W/2, H/2)`.
    pub fn center(&self) -> Coord {
        Coord::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as usize) < self.width && (c.y as usize) < self.height
    }

    #[inline]
    fn index(&self, c: Coord) -> Result<usize, FieldError> {
        if self.contains(c) {
            Ok(c.y as usize * self.width + c.x as usize)
        } else {
            Err(FieldError::OutOfBounds {
                coord: c,
                width: self.width,
                height: self.height,
            })
        }
    }
}

// ── Tile query / mutation API ──

impl Field {
    pub fn tile_at(&self, c: Coord) -> Result<TileKind, FieldError> {
        self.index(c).map(|i| self.cells[i])
    }

    /// Like `tile_at`, for callers that treat out-of-bounds as "nothing there".
    #[inline]
    pub fn get(&self, c: Coord) -> Option<TileKind> {
        self.tile_at(c).ok()
    }

    pub fn set_tile(&mut self, c: Coord, kind: TileKind) -> Result<(), FieldError> {
        let idx = self.index(c)?;
        if kind.is_special() {
            if let Some(old) = self.special.filter(|&old| old != c) {
                let old_idx = self.index(old)?;
                self.cells[old_idx] = TileKind::Empty;
            }
            self.special = Some(c);
        } else if self.special == Some(c) {
            self.special = None;
        }
        self.cells[idx] = kind;
        Ok(())
    }

    /// Walls block; `Special` does not. Out-of-bounds is never walkable.
    #[inline]
    pub fn is_walkable(&self, c: Coord) -> bool {
        self.get(c).is_some_and(TileKind::is_walkable)
    }

    pub fn special(&self) -> Option<Coord> {
        self.special
    }

    /// Reset the special cell to `Empty`, returning where it was.
    pub fn clear_special(&mut self) -> Option<Coord> {
        let old = self.special.take()?;
        if let Ok(idx) = self.index(old) {
            self.cells[idx] = TileKind::Empty;
        }
        Some(old)
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.cells.iter().filter(|&&t| t == kind).count()
    }

    /// Row slices, top to bottom. Used by the renderer as the grid snapshot.
    pub fn rows(&self) -> impl Iterator<Item = &[TileKind]> {
        self.cells.chunks(self.width.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_field_is_empty() {
        let f = Field::new(80, 25);
        assert_eq!(f.cell_count(), 2000);
        assert_eq!(f.count(TileKind::Empty), 2000);
        assert_eq!(f.special(), None);
    }

    #[test]
    fn center_is_half_dimensions() {
        assert_eq!(Field::new(80, 25).center(), Coord::new(40, 12));
        assert_eq!(Field::new(1, 1).center(), Coord::new(0, 0));
    }

    #[test]
    fn tile_at_out_of_bounds_is_error() {
        let f = Field::new(4, 3);
        for c in [Coord::new(-1, 0), Coord::new(0, -1), Coord::new(4, 0), Coord::new(0, 3)] {
            assert_eq!(
                f.tile_at(c),
                Err(FieldError::OutOfBounds { coord: c, width: 4, height: 3 })
            );
        }
        assert_eq!(f.tile_at(Coord::new(3, 2)), Ok(TileKind::Empty));
    }

    #[test]
    fn set_tile_out_of_bounds_leaves_field_untouched() {
        let mut f = Field::new(2, 2);
        assert!(f.set_tile(Coord::new(2, 0), TileKind::Wall).is_err());
        assert_eq!(f.count(TileKind::Wall), 0);
    }

    #[test]
    fn arena_is_row_major() {
        let mut f = Field::new(3, 2);
        f.set_tile(Coord::new(2, 1), TileKind::Wall).unwrap();
        let rows: Vec<_> = f.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][2], TileKind::Wall);
        assert_eq!(rows[0], &[TileKind::Empty; 3]);
    }

    #[test]
    fn special_is_walkable_wall_is_not() {
        let mut f = Field::new(3, 1);
        f.set_tile(Coord::new(0, 0), TileKind::Wall).unwrap();
        f.set_tile(Coord::new(1, 0), TileKind::Special).unwrap();
        assert!(!f.is_walkable(Coord::new(0, 0)));
        assert!(f.is_walkable(Coord::new(1, 0)));
        assert!(f.is_walkable(Coord::new(2, 0)));
        assert!(!f.is_walkable(Coord::new(3, 0)));
    }

    #[test]
    fn writing_special_relocates_it() {
        let mut f = Field::new(5, 5);
        f.set_tile(Coord::new(1, 1), TileKind::Special).unwrap();
        f.set_tile(Coord::new(3, 3), TileKind::Special).unwrap();
        assert_eq!(f.special(), Some(Coord::new(3, 3)));
        assert_eq!(f.tile_at(Coord::new(1, 1)), Ok(TileKind::Empty));
        assert_eq!(f.count(TileKind::Special), 1);
    }

    #[test]
    fn special_over_wall_clears_the_wall() {
        let mut f = Field::new(5, 5);
        f.set_tile(Coord::new(2, 2), TileKind::Wall).unwrap();
        f.set_tile(Coord::new(2, 2), TileKind::Special).unwrap();
        assert_eq!(f.count(TileKind::Wall), 0);
        assert_eq!(f.special(), Some(Coord::new(2, 2)));
    }

    #[test]
    fn overwriting_special_drops_tracking() {
        let mut f = Field::new(5, 5);
        f.set_tile(Coord::new(2, 2), TileKind::Special).unwrap();
        f.set_tile(Coord::new(2, 2), TileKind::Wall).unwrap();
        assert_eq!(f.special(), None);
        assert_eq!(f.count(TileKind::Special), 0);
    }

    #[test]
    fn clear_special_empties_the_cell() {
        let mut f = Field::new(5, 5);
        f.set_tile(Coord::new(4, 0), TileKind::Special).unwrap();
        assert_eq!(f.clear_special(), Some(Coord::new(4, 0)));
        assert_eq!(f.tile_at(Coord::new(4, 0)), Ok(TileKind::Empty));
        assert_eq!(f.clear_special(), None);
    }
}
