//! Entry point: load config, generate the field, run the loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::process::ExitCode;

use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::GameConfig;
use domain::placement::Placer;
use sim::driver;
use sim::state::GameState;
use ui::input::InputState;
use ui::TerminalPresenter;

fn main() -> ExitCode {
    logging::init();
    let config = GameConfig::load();

    let rng = match config.seed {
        Some(seed) => {
            info!("using fixed seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let placer = Placer::new(rng, config.placement.max_attempts);

    let mut state = match GameState::generate(&config.field, placer) {
        Ok(s) => s,
        Err(e) => {
            error!("field generation failed: {e}");
            eprintln!("Field generation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut presenter = TerminalPresenter::new();
    if let Err(e) = presenter.init() {
        error!("terminal init failed: {e}");
        eprintln!("Terminal init failed: {e}");
        return ExitCode::FAILURE;
    }

    let mut input = InputState::new(&config.gamepad);
    let result = driver::run(
        &mut state,
        &mut input,
        &mut presenter,
        config.timing.frame_delay(),
    );

    if let Err(e) = presenter.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("{e}");
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let s = state.stats;
    println!();
    println!("Thanks for walking the grid!");
    println!(
        "Moves: {}  Bumps: {}  Encounters: {}",
        s.moves, s.blocked, s.encounters
    );
    ExitCode::SUCCESS
}
