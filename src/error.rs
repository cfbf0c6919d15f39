//! Fatal startup failures.

use std::io;

use thiserror::Error;

/// Everything that can stop the game before the first frame is drawn.
/// Whatever was acquired before the failing step has already been released
/// by the time one of these reaches `main`.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("could not enable raw terminal mode: {0}")]
    RawMode(#[source] io::Error),

    #[error("could not enter the alternate screen: {0}")]
    AlternateScreen(#[source] io::Error),

    #[error("could not configure the drawing surface: {0}")]
    Surface(#[source] io::Error),

    #[error("terminal is {cols}x{rows}; at least {min_cols}x{min_rows} is needed to draw the playfield and HUD")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },
}
