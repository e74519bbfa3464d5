//! Control loop: block on input, step, render, pace.
//!
//! Single-threaded. Each iteration processes exactly one input to
//! completion, then issues one render request, then sleeps the fixed
//! frame delay. A quit ends the loop before any further render.

use std::io;
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::error::AppError;
use super::event::{GameEvent, InputEvent};
use super::state::{GameState, Mode, View};
use super::step::{self, Flow};

/// Blocking source of discrete input, mapped for the current mode.
pub trait EventSource {
    fn next_event(&mut self, mode: Mode) -> io::Result<InputEvent>;
}

/// Receives render requests and the events behind them.
pub trait Presenter {
    fn present(&mut self, view: &View<'_>) -> io::Result<()>;

    /// Called once per processed input, before `present`.
    fn react(&mut self, _events: &[GameEvent]) {}
}

pub fn run<S, P>(
    state: &mut GameState,
    source: &mut S,
    presenter: &mut P,
    frame_delay: Duration,
) -> Result<(), AppError>
where
    S: EventSource,
    P: Presenter,
{
    presenter.present(&state.view())?;

    loop {
        let input = source.next_event(state.mode)?;
        let result = step::step(state, input)?;

        for event in &result.events {
            debug!("{event:?}");
        }
        presenter.react(&result.events);

        if result.flow == Flow::Quit {
            info!("loop ended: {:?}", state.stats);
            return Ok(());
        }

        presenter.present(&state.view())?;
        if !frame_delay.is_zero() {
            thread::sleep(frame_delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::domain::entity::{Coord, Direction};
    use crate::domain::field::Field;
    use crate::domain::placement::{Placer, DEFAULT_MAX_ATTEMPTS};
    use crate::domain::tile::TileKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Scripted {
        inputs: VecDeque<InputEvent>,
        modes_seen: Vec<Mode>,
    }

    impl Scripted {
        fn new(inputs: &[InputEvent]) -> Self {
            Scripted { inputs: inputs.iter().copied().collect(), modes_seen: vec![] }
        }
    }

    impl EventSource for Scripted {
        fn next_event(&mut self, mode: Mode) -> io::Result<InputEvent> {
            self.modes_seen.push(mode);
            self.inputs
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }
    }

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(Mode, Coord)>,
        events: Vec<GameEvent>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, view: &View<'_>) -> io::Result<()> {
            self.frames.push((view.mode, view.player));
            Ok(())
        }

        fn react(&mut self, events: &[GameEvent]) {
            self.events.extend_from_slice(events);
        }
    }

    fn state() -> GameState {
        let mut field = Field::new(80, 25);
        field.set_tile(Coord::new(41, 12), TileKind::Special).unwrap();
        GameState::new(field, Placer::new(StdRng::seed_from_u64(4), DEFAULT_MAX_ATTEMPTS))
    }

    #[test]
    fn full_session_renders_once_per_input() {
        let mut s = state();
        let mut src = Scripted::new(&[
            InputEvent::Confirm,
            InputEvent::Move(Direction::Right),
            InputEvent::Confirm,
            InputEvent::Confirm,
            InputEvent::Quit,
        ]);
        let mut rec = Recorder::default();

        run(&mut s, &mut src, &mut rec, Duration::ZERO).unwrap();

        assert_eq!(
            rec.frames,
            vec![
                (Mode::Intro, Coord::new(40, 12)),
                (Mode::Exploring, Coord::new(40, 12)),
                (Mode::Overlay, Coord::new(41, 12)),
                (Mode::Exploring, Coord::new(40, 12)),
                (Mode::Exploring, Coord::new(40, 12)),
            ]
        );
        assert_eq!(
            src.modes_seen,
            vec![Mode::Intro, Mode::Exploring, Mode::Overlay, Mode::Exploring, Mode::Exploring]
        );
        assert!(rec.events.contains(&GameEvent::EncounterEnded));
    }

    #[test]
    fn quit_stops_before_rendering() {
        let mut s = state();
        s.mode = Mode::Exploring;
        let mut src = Scripted::new(&[InputEvent::Quit, InputEvent::Confirm]);
        let mut rec = Recorder::default();

        run(&mut s, &mut src, &mut rec, Duration::ZERO).unwrap();

        assert_eq!(rec.frames.len(), 1);
        assert_eq!(src.inputs.len(), 1, "no input read after quit");
    }

    #[test]
    fn source_error_propagates() {
        let mut s = state();
        let mut src = Scripted::new(&[InputEvent::Confirm]);
        let mut rec = Recorder::default();

        let err = run(&mut s, &mut src, &mut rec, Duration::ZERO).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(rec.frames.len(), 2);
    }
}
