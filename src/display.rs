/// Frame composition — what goes where, in which colour.
///
/// Each function receives a surface and an immutable view of the game
/// state.  No game logic is performed; this module only translates state
/// into surface calls.

use std::io;

use crossterm::style::Color;

use crate::config::{Resolution, BLINK_INTERVAL_MS};
use crate::entities::{GameState, Immunity, Rect};
use crate::surface::Surface;

// ── Colour palette ───────────────────────────────────────────────────────────

pub const C_BACKGROUND: Color = Color::Black;
pub const C_PLAYER: Color = Color::Blue;
pub const C_PLAYER_BLINK_ON: Color = Color::White;
pub const C_PLAYER_BLINK_OFF: Color = Color::Black;
pub const C_ENEMY: Color = Color::Green;
pub const C_TEXT: Color = Color::White;
pub const C_HIGHLIGHT: Color = Color::Yellow;

/// HUD anchors in playfield pixels.
const SCORE_POS: (i32, i32) = (10, 10);
const LIVES_POS: (i32, i32) = (10, 50);

/// Player colour for this instant: blue normally, alternating white/black
/// every `BLINK_INTERVAL_MS` of immunity.
pub fn player_color(state: &GameState, now: u64) -> Color {
    match state.immunity {
        Immunity::Normal => C_PLAYER,
        Immunity::Immune { since } => {
            if (now.saturating_sub(since) / BLINK_INTERVAL_MS) % 2 == 0 {
                C_PLAYER_BLINK_ON
            } else {
                C_PLAYER_BLINK_OFF
            }
        }
    }
}

/// Render one complete frame.
pub fn render<S: Surface>(surface: &mut S, state: &GameState, now: u64) -> io::Result<()> {
    surface.clear(C_BACKGROUND)?;

    surface.fill_rect(state.player.rect(), player_color(state, now))?;
    for enemy in state.enemies.iter().filter(|e| e.active) {
        surface.fill_rect(enemy.rect(), C_ENEMY)?;
    }

    surface.draw_text(&format!("Score: {}", state.score), SCORE_POS.0, SCORE_POS.1, C_TEXT)?;
    surface.draw_text(&format!("Lives: {}", state.lives), LIVES_POS.0, LIVES_POS.1, C_TEXT)?;

    surface.present()
}

// ── Menu ─────────────────────────────────────────────────────────────────────

pub fn render_menu<S: Surface>(
    surface: &mut S,
    selected: Resolution,
    fullscreen: bool,
) -> io::Result<()> {
    surface.clear(C_BACKGROUND)?;
    surface.draw_text("Select Resolution:", 50, 50, C_TEXT)?;

    let mut y = 100;
    for res in Resolution::ALL {
        let (color, marker) = if res == selected {
            (C_HIGHLIGHT, ">")
        } else {
            (C_TEXT, " ")
        };
        surface.draw_text(
            &format!("{} Press {} for {}", marker, res.hotkey(), res),
            50,
            y,
            color,
        )?;
        y += 50;
    }

    let fs = if fullscreen { "on" } else { "off" };
    surface.draw_text(&format!("  Press F to toggle fullscreen ({})", fs), 50, y, C_TEXT)?;
    surface.draw_text("  Enter: play   Esc / Q: quit", 50, y + 50, C_TEXT)?;

    // Sample squares so the scaling can be judged before playing.
    surface.fill_rect(Rect::new(50, y + 110, 20, 20), C_PLAYER)?;
    surface.fill_rect(Rect::new(90, y + 110, 20, 20), C_ENEMY)?;

    surface.present()
}
