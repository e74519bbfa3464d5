//! GameState: everything a running session owns.
//!
//! ## Ownership
//!
//! One owned struct, passed by `&mut` into the control loop. The field,
//! the player and the mode live here; nothing is global.
//!
//! ## Lifecycle
//!
//!   1. `generate()` builds an empty field, scatters walls (never on the
//!      centre), then places the special tile (never on the centre).
//!   2. The player starts at the centre, in `Mode::Intro`.
//!   3. `step()` drives every later change.

use log::info;
use rand::rngs::StdRng;

use crate::config::FieldConfig;
use crate::domain::entity::{Coord, Player};
use crate::domain::field::Field;
use crate::domain::placement::{PlacementError, PlacementRequest, Placer};
use crate::domain::tile::TileKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    /// One-time banner before play starts.
    Intro,
    Exploring,
    /// Encounter pause; any input returns to exploring.
    Overlay,
}

/// Session counters shown in the status bar and the exit summary.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Stats {
    pub moves: u32,
    pub blocked: u32,
    pub encounters: u32,
}

pub struct GameState {
    pub field: Field,
    pub player: Player,
    pub mode: Mode,
    pub stats: Stats,
    pub placer: Placer<StdRng>,
}

/// Render request: what the presentation layer needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct View<'a> {
    pub field: &'a Field,
    pub player: Coord,
    pub mode: Mode,
    pub stats: Stats,
}

// ── Construction ──

impl GameState {
    /// Wrap an already-populated field. The player starts at its centre.
    pub fn new(field: Field, placer: Placer<StdRng>) -> Self {
        let start = field.center();
        GameState {
            field,
            player: Player::new(start),
            mode: Mode::Intro,
            stats: Stats::default(),
            placer,
        }
    }

    pub fn generate(cfg: &FieldConfig, mut placer: Placer<StdRng>) -> Result<Self, PlacementError> {
        let mut field = Field::new(cfg.width, cfg.height);
        let start = field.center();

        // Walls first: a later special draw may replace one, never the reverse.
        placer.scatter_walls(&mut field, cfg.wall_count, start)?;
        let special = placer.place(
            &mut field,
            PlacementRequest { kind: TileKind::Special, forbidden: &[start] },
        )?;

        info!(
            "generated {}x{} field: {} walls, special at {special}, start at {start}",
            cfg.width,
            cfg.height,
            field.count(TileKind::Wall),
        );
        Ok(GameState::new(field, placer))
    }

    pub fn view(&self) -> View<'_> {
        View {
            field: &self.field,
            player: self.player.pos,
            mode: self.mode,
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::placement::DEFAULT_MAX_ATTEMPTS;
    use rand::SeedableRng;

    fn placer(seed: u64) -> Placer<StdRng> {
        Placer::new(StdRng::seed_from_u64(seed), DEFAULT_MAX_ATTEMPTS)
    }

    #[test]
    fn generated_field_has_one_special_and_clear_start() {
        let cfg = FieldConfig { width: 80, height: 25, wall_count: 750 };
        for seed in 0..20 {
            let state = GameState::generate(&cfg, placer(seed)).unwrap();
            assert_eq!(state.player.pos, Coord::new(40, 12));
            assert_eq!(state.mode, Mode::Intro);
            assert_eq!(state.field.count(TileKind::Special), 1);
            let special = state.field.special().unwrap();
            assert_ne!(special, state.player.pos);
            assert!(state.field.is_walkable(state.player.pos));
        }
    }

    #[test]
    fn wall_count_zero_gives_open_field() {
        let cfg = FieldConfig { width: 10, height: 5, wall_count: 0 };
        let state = GameState::generate(&cfg, placer(1)).unwrap();
        assert_eq!(state.field.count(TileKind::Wall), 0);
        assert_eq!(state.field.count(TileKind::Empty), 49);
    }

    #[test]
    fn view_mirrors_state() {
        let cfg = FieldConfig { width: 8, height: 4, wall_count: 3 };
        let state = GameState::generate(&cfg, placer(2)).unwrap();
        let v = state.view();
        assert_eq!(v.player, state.player.pos);
        assert_eq!(v.mode, Mode::Intro);
        assert_eq!(v.field.width(), 8);
        assert_eq!(v.stats, Stats::default());
    }
}
