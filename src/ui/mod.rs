pub mod gamepad;
pub mod input;
pub mod renderer;
pub mod sound;

use std::io;

use crate::error::AppError;
use crate::sim::driver::Presenter;
use crate::sim::event::GameEvent;
use crate::sim::state::View;
use renderer::Renderer;
use sound::SoundEngine;

/// Terminal output plus optional sound, driven by the control loop.
pub struct TerminalPresenter {
    renderer: Renderer,
    sound: Option<SoundEngine>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        TerminalPresenter { renderer: Renderer::new(), sound: None }
    }

    /// Take over the terminal. Audio is opened afterwards so a missing
    /// device never blocks play.
    pub fn init(&mut self) -> Result<(), AppError> {
        self.renderer.init()?;
        self.sound = SoundEngine::new();
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        self.renderer.cleanup()
    }
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, view: &View<'_>) -> io::Result<()> {
        self.renderer.render(view)
    }

    fn react(&mut self, events: &[GameEvent]) {
        if let Some(sfx) = &self.sound {
            sound::play_events(sfx, events);
        }
    }
}
