//! Events crossing the core boundary.

use crate::domain::entity::{Coord, Direction};

/// Discrete input from the presentation layer, already mapped per mode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    Move(Direction),
    Confirm,
    Quit,
}

/// Emitted while processing one input.
/// The presentation layer consumes these for sound; the loop logs them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    ExplorationStarted,
    Moved { from: Coord, to: Coord },
    Blocked { at: Coord, direction: Direction, by_wall: bool },
    EncounterStarted { at: Coord },
    EncounterEnded,
    SpecialPlaced { at: Coord },
}
