//! Random placement: uniform rejection sampling over the whole field.
//!
//! Each request draws `x ∈ [0, W)`, `y ∈ [0, H)` until the draw is not
//! forbidden, then writes the tile there. Nothing else is avoided: a
//! wall draw may land on an existing wall, and a special draw may land
//! on a wall and replace it.
//!
//! Precondition: the forbidden set must not cover the entire field.
//! This is checked up front; the retry cap is a second line for
//! pathological RNGs and surfaces as a fatal error.

use std::collections::HashSet;

use log::{debug, info};
use rand::Rng;
use thiserror::Error;

use super::entity::Coord;
use super::field::{Field, FieldError};
use super::tile::TileKind;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 1_000_000;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("forbidden cells cover all {cells} cells of the field")]
    ForbiddenCoversGrid { cells: usize },
    #[error("no allowed cell drawn after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// What to place and where it must not go. Transient, never stored.
#[derive(Clone, Copy, Debug)]
pub struct PlacementRequest<'a> {
    pub kind: TileKind,
    pub forbidden: &'a [Coord],
}

pub struct Placer<R> {
    rng: R,
    max_attempts: u32,
}

impl<R: Rng> Placer<R> {
    pub fn new(rng: R, max_attempts: u32) -> Self {
        Placer {
            rng,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn place(&mut self, field: &mut Field, req: PlacementRequest<'_>) -> Result<Coord, PlacementError> {
        let cells = field.cell_count();
        let blocked: HashSet<Coord> = req
            .forbidden
            .iter()
            .copied()
            .filter(|&c| field.contains(c))
            .collect();
        if blocked.len() >= cells {
            return Err(PlacementError::ForbiddenCoversGrid { cells });
        }

        for attempt in 1..=self.max_attempts {
            let c = Coord::new(
                self.rng.gen_range(0..field.width()) as i32,
                self.rng.gen_range(0..field.height()) as i32,
            );
            if blocked.contains(&c) {
                continue;
            }
            field.set_tile(c, req.kind)?;
            debug!("placed {:?} at {c} after {attempt} draw(s)", req.kind);
            return Ok(c);
        }

        Err(PlacementError::Exhausted { attempts: self.max_attempts })
    }

    /// Scatter `count` walls, each an independent draw that only avoids
    /// `start`. Repeat draws collapse onto one wall, so the final wall
    /// count can be lower than `count`.
    pub fn scatter_walls(&mut self, field: &mut Field, count: u32, start: Coord) -> Result<(), PlacementError> {
        let forbidden = [start];
        for _ in 0..count {
            self.place(field, PlacementRequest { kind: TileKind::Wall, forbidden: &forbidden })?;
        }
        info!(
            "scattered {count} wall draws, {} distinct wall cells",
            field.count(TileKind::Wall)
        );
        Ok(())
    }
}
