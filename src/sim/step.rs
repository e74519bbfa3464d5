//! The step function: applies one input event to the game state.
//!
//! Transition table:
//!
//! ┌────────────┬──────────────┬──────────────────────────────────────┐
//! │ Mode       │ Input        │ Effect                               │
//! ├────────────┼──────────────┼──────────────────────────────────────┤
//! │ Intro      │ Quit         │ terminate                            │
//! │ Intro      │ anything     │ → Exploring                          │
//! │ Exploring  │ Move(dir)    │ resolve step; on special → Overlay   │
//! │ Exploring  │ Confirm      │ nothing                              │
//! │ Exploring  │ Quit         │ terminate                            │
//! │ Overlay    │ anything     │ clear special, recentre, respawn     │
//! │            │ (Quit too)   │ special, → Exploring                 │
//! └────────────┴──────────────┴──────────────────────────────────────┘
//!
//! At most one mode transition and one field mutation per input.

use log::{debug, info};

use crate::domain::entity::Direction;
use crate::domain::movement::{self, StepOutcome};
use crate::domain::placement::{PlacementError, PlacementRequest};
use crate::domain::tile::TileKind;
use super::event::{GameEvent, InputEvent};
use super::state::{GameState, Mode};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepResult {
    pub flow: Flow,
    pub events: Vec<GameEvent>,
}

impl StepResult {
    fn cont(events: Vec<GameEvent>) -> Self {
        StepResult { flow: Flow::Continue, events }
    }

    fn quit() -> Self {
        StepResult { flow: Flow::Quit, events: vec![] }
    }
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

/// Errors only when respawning the special tile fails, which the
/// caller treats as fatal.
pub fn step(state: &mut GameState, input: InputEvent) -> Result<StepResult, PlacementError> {
    match state.mode {
        Mode::Intro => Ok(match input {
            InputEvent::Quit => StepResult::quit(),
            _ => {
                state.mode = Mode::Exploring;
                info!("exploration started at {}", state.player.pos);
                StepResult::cont(vec![GameEvent::ExplorationStarted])
            }
        }),
        Mode::Exploring => Ok(match input {
            InputEvent::Quit => {
                info!("quit while exploring");
                StepResult::quit()
            }
            InputEvent::Confirm => StepResult::cont(vec![]),
            InputEvent::Move(dir) => StepResult::cont(resolve_move(state, dir)),
        }),
        // Every input confirms here, Quit included.
        Mode::Overlay => end_encounter(state).map(StepResult::cont),
    }
}

// ══════════════════════════════════════════════════════════════
// Exploring
// ══════════════════════════════════════════════════════════════

fn resolve_move(state: &mut GameState, dir: Direction) -> Vec<GameEvent> {
    let from = state.player.pos;
    let to = movement::resolve(&state.field, from, dir);
    let mut events = Vec::with_capacity(2);

    if to == from {
        let outcome = movement::try_step(&state.field, from, dir);
        state.stats.blocked += 1;
        debug!("move {dir:?} from {from} rejected: {outcome:?}");
        events.push(GameEvent::Blocked {
            at: from,
            direction: dir,
            by_wall: matches!(outcome, StepOutcome::HitWall(_)),
        });
        return events;
    }

    state.player.pos = to;
    state.stats.moves += 1;
    events.push(GameEvent::Moved { from, to });

    // Encounter check happens once per processed move, not per frame.
    if state.field.special() == Some(to) {
        state.mode = Mode::Overlay;
        info!("encounter at {}", state.player.pos);
        events.push(GameEvent::EncounterStarted { at: state.player.pos });
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Overlay exit
// ══════════════════════════════════════════════════════════════

/// Walls persist; only the special cell is cleared. The new special
/// tile forbids just the recentred player, so it may land on a wall.
fn end_encounter(state: &mut GameState) -> Result<Vec<GameEvent>, PlacementError> {
    let old = state.field.clear_special();
    state.player.pos = state.field.center();

    let start = state.player.pos;
    let at = state.placer.place(
        &mut state.field,
        PlacementRequest { kind: TileKind::Special, forbidden: &[start] },
    )?;

    state.stats.encounters += 1;
    state.mode = Mode::Exploring;
    info!(
        "encounter #{} cleared (special was {:?}), new special at {at}",
        state.stats.encounters, old
    );

    Ok(vec![GameEvent::EncounterEnded, GameEvent::SpecialPlaced { at }])
}
