//! Raw-mode terminal setup with guaranteed teardown.

use std::io::{self, Write};

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use log::{info, warn};

use crate::error::InitError;

/// Smallest grid on which the playfield and both HUD lines stay legible.
pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 12;

/// Tracks every terminal mode that was switched on so `Drop` can undo
/// exactly those, whether the game ended normally, failed halfway through
/// startup, or unwound from a panic.
#[derive(Debug, Default)]
pub struct TerminalSession {
    raw_mode: bool,
    alternate_screen: bool,
    cursor_hidden: bool,
    keyboard_enhanced: bool,
    cols: u16,
    rows: u16,
}

impl TerminalSession {
    pub fn start() -> Result<Self, InitError> {
        let mut session = Self::default();
        let mut out = io::stdout();

        terminal::enable_raw_mode().map_err(InitError::RawMode)?;
        session.raw_mode = true;

        out.execute(terminal::EnterAlternateScreen)
            .map_err(InitError::AlternateScreen)?;
        session.alternate_screen = true;

        out.execute(cursor::Hide).map_err(InitError::Surface)?;
        session.cursor_hidden = true;

        let (cols, rows) = terminal::size().map_err(InitError::Surface)?;
        check_size(cols, rows)?;
        session.cols = cols;
        session.rows = rows;

        // Request key-release (and key-repeat) events from the terminal.
        // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
        session.keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
            && out
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok();
        if !session.keyboard_enhanced {
            warn!("terminal does not report key releases; held keys expire after a short window");
        }

        info!("terminal session started ({}x{})", cols, rows);
        Ok(session)
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn reports_key_releases(&self) -> bool {
        self.keyboard_enhanced
    }
}

pub fn check_size(cols: u16, rows: u16) -> Result<(), InitError> {
    if cols < MIN_COLS || rows < MIN_ROWS {
        return Err(InitError::TerminalTooSmall {
            cols,
            rows,
            min_cols: MIN_COLS,
            min_rows: MIN_ROWS,
        });
    }
    Ok(())
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        if self.cursor_hidden {
            let _ = out.execute(cursor::Show);
        }
        if self.alternate_screen {
            let _ = out.execute(terminal::LeaveAlternateScreen);
        }
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
        }
        let _ = out.flush();
    }
}
