//! Input source: keyboard (crossterm) plus optional gamepad.
//!
//! Blocks until one discrete event is available, mapping raw keys per
//! mode:
//!   - Intro:     Esc / Ctrl+C quit, any other key confirms
//!   - Exploring: arrows / WASD move, Esc / Ctrl+C quit
//!   - Overlay:   every key confirms (Esc included)
//!
//! Only Press and Repeat events count; Release is ignored so terminals
//! with keyboard enhancement do not double-fire.

use std::io;
#[cfg(feature = "gamepad")]
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::GamepadConfig;
use crate::domain::entity::Direction;
use crate::sim::driver::EventSource;
use crate::sim::event::InputEvent;
use crate::sim::state::Mode;
use super::gamepad::GamepadState;

/// How long one keyboard poll waits before the gamepad is checked.
#[cfg(feature = "gamepad")]
const POLL_INTERVAL: Duration = Duration::from_millis(20);

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];

pub struct InputState {
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    gamepad: GamepadState,
}

impl InputState {
    pub fn new(gamepad_cfg: &GamepadConfig) -> Self {
        let mut gamepad = GamepadState::new();
        gamepad.load_button_config(gamepad_cfg);
        InputState { gamepad }
    }
}

impl EventSource for InputState {
    fn next_event(&mut self, mode: Mode) -> io::Result<InputEvent> {
        loop {
            if let Some(ev) = next_terminal_event()?.and_then(|e| map_event(e, mode)) {
                return Ok(ev);
            }

            #[cfg(feature = "gamepad")]
            {
                self.gamepad.update();
                if let Some(ev) = self.gamepad.event_for(mode) {
                    return Ok(ev);
                }
            }
        }
    }
}

/// With a gamepad to service, wait at most one poll interval.
#[cfg(feature = "gamepad")]
fn next_terminal_event() -> io::Result<Option<Event>> {
    if event::poll(POLL_INTERVAL)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Keyboard only: block until the terminal delivers something.
#[cfg(not(feature = "gamepad"))]
fn next_terminal_event() -> io::Result<Option<Event>> {
    event::read().map(Some)
}

/// Keys map per mode; resize, mouse, focus and paste events carry no input.
fn map_event(ev: Event, mode: Mode) -> Option<InputEvent> {
    match ev {
        Event::Key(key) => map_key(key, mode),
        _ => None,
    }
}

/// Map a raw key event to a core input for the current mode.
pub fn map_key(key: KeyEvent, mode: Mode) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if mode == Mode::Overlay {
        return Some(InputEvent::Confirm);
    }

    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));
    if key.code == KeyCode::Esc || ctrl_c {
        return Some(InputEvent::Quit);
    }

    match mode {
        Mode::Intro => Some(InputEvent::Confirm),
        _ => direction_for(key.code).map(InputEvent::Move),
    }
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    if KEYS_UP.contains(&code) {
        Some(Direction::Up)
    } else if KEYS_DOWN.contains(&code) {
        Some(Direction::Down)
    } else if KEYS_LEFT.contains(&code) {
        Some(Direction::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Some(Direction::Right)
    } else {
        None
    }
}
