//! Gamepad input tracker using gilrs.
//!
//! Button mapping is loaded from config.toml via `load_button_config()`.
//! Default mapping:
//!   D-pad / Left Stick    →  Movement (one step per press)
//!   A / Start             →  Confirm
//!   Select                →  Quit
//!
//! Without the "gamepad" feature this tracks nothing and never
//! produces an event.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use log::warn;

use crate::config::GamepadConfig;
use crate::domain::entity::Direction;
use crate::sim::event::InputEvent;
use crate::sim::state::Mode;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-input state: held (level) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

impl BtnState {
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn set(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
        }
        self.held = held;
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    confirm: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::A, Btn::Start],
            quit: vec![Btn::Select],
        }
    }
}

/// Directional inputs, indexed like `Direction::ALL`.
const DIRS: usize = 4;

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],
    dpad: [BtnState; DIRS],
    stick: [BtnState; DIRS],
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,

    action_map: ActionMap,
}

fn dir_index(dir: Direction) -> usize {
    match dir {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

impl GamepadState {
    pub fn new() -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: match Gilrs::new() {
                Ok(g) => Some(g),
                Err(e) => {
                    warn!("gamepad support unavailable: {e}");
                    None
                }
            },
            buttons: [BtnState::default(); BTN_COUNT],
            dpad: [BtnState::default(); DIRS],
            stick: [BtnState::default(); DIRS],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
        }
    }

    /// Load button mapping from config. Unknown names are skipped; an
    /// action whose list resolves to nothing keeps its default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names
                .iter()
                .filter_map(|s| {
                    let btn = Btn::from_name(s);
                    if btn.is_none() {
                        warn!("unknown gamepad button name {s:?}");
                    }
                    btn
                })
                .collect()
        }
        let cf = parse_list(&cfg.confirm);
        if !cf.is_empty() { self.action_map.confirm = cf; }
        let qt = parse_list(&cfg.quit);
        if !qt.is_empty() { self.action_map.quit = qt; }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => self.set_button(btn, true),
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(axis, value, _) => self.update_axis(axis, value),
                EventType::Disconnected => self.release_all(),
                _ => {}
            }
        }

        // Derive stick digital states (y axis points up)
        let (sx, sy) = (self.stick_x, self.stick_y);
        self.stick[dir_index(Direction::Up)].set(sy > STICK_DEADZONE);
        self.stick[dir_index(Direction::Down)].set(sy < -STICK_DEADZONE);
        self.stick[dir_index(Direction::Left)].set(sx < -STICK_DEADZONE);
        self.stick[dir_index(Direction::Right)].set(sx > STICK_DEADZONE);
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        let dir = match gilrs_btn {
            Button::DPadUp => Some(Direction::Up),
            Button::DPadDown => Some(Direction::Down),
            Button::DPadLeft => Some(Direction::Left),
            Button::DPadRight => Some(Direction::Right),
            _ => None,
        };
        if let Some(dir) = dir {
            self.dpad[dir_index(dir)].set(held);
            return;
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.buttons[btn as usize].set(held);
        }
    }

    #[cfg(feature = "gamepad")]
    fn update_axis(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::LeftStickX => self.stick_x = value,
            Axis::LeftStickY => self.stick_y = value,
            _ => {}
        }
    }

    // ── Mode-aware mapping ──

    /// The input this poll produced for `mode`, if any.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    pub fn event_for(&self, mode: Mode) -> Option<InputEvent> {
        match mode {
            Mode::Overlay => self.anything_pressed().then_some(InputEvent::Confirm),
            Mode::Intro => {
                if self.any_just_pressed(&self.action_map.quit) {
                    Some(InputEvent::Quit)
                } else {
                    self.anything_pressed().then_some(InputEvent::Confirm)
                }
            }
            Mode::Exploring => {
                if self.any_just_pressed(&self.action_map.quit) {
                    Some(InputEvent::Quit)
                } else if let Some(dir) = self.direction_pressed() {
                    Some(InputEvent::Move(dir))
                } else {
                    self.any_just_pressed(&self.action_map.confirm)
                        .then_some(InputEvent::Confirm)
                }
            }
        }
    }

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    fn direction_pressed(&self) -> Option<Direction> {
        Direction::ALL.into_iter().find(|&d| {
            let i = dir_index(d);
            self.dpad[i].just_pressed || self.stick[i].just_pressed
        })
    }

    fn anything_pressed(&self) -> bool {
        self.buttons.iter().any(|b| b.just_pressed) || self.direction_pressed().is_some()
    }

    // ── Internal ──

    fn clear_just_pressed(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            b.just_pressed = false;
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            *b = BtnState::default();
        }
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}
