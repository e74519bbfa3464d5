//! Errors surfaced at the binary edge.

use std::io;

use thiserror::Error;

use crate::domain::placement::PlacementError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal i/o error: {0}")]
    Io(#[from] io::Error),

    /// Field generation or special-tile respawn could not place a tile.
    #[error("placement failed: {0}")]
    Placement(#[from] PlacementError),

    /// Checked before the terminal is touched; nothing to restore.
    #[error("terminal reports {colors} colours, at least 8 are required")]
    UnsupportedTerminal { colors: u16 },
}
