/// The session: owned collaborators plus the blocking menu and frame loops.

use std::io;
use std::time::Duration;

use log::info;
use rand::Rng;

use crate::clock::Clock;
use crate::compute::{expire_immunity, init_state, tick};
use crate::config::{GameConfig, Resolution, FRAME_DELAY};
use crate::display;
use crate::entities::{GameState, GameStatus};
use crate::input::{sample_controls, InputEvent, InputSource, Key};
use crate::surface::Surface;

/// Redraw period of the menu.
pub const MENU_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuChoice {
    pub resolution: Resolution,
    pub fullscreen: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuResult {
    Start(MenuChoice),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Quit signal received mid-run.
    Quit,
    /// Lives ran out.
    GameOver,
}

/// Everything acquired at startup, owned in one place and handed to the
/// loops instead of living in globals.
pub struct Session<S, I, C> {
    pub surface: S,
    pub input: I,
    pub clock: C,
}

impl<S: Surface, I: InputSource, C: Clock> Session<S, I, C> {
    pub fn new(surface: S, input: I, clock: C) -> Self {
        Self {
            surface,
            input,
            clock,
        }
    }

    /// Block until the player picks a resolution (Enter) or quits
    /// (Esc / Q / Ctrl-C).  `1`/`2`/`3` select, `F` toggles fullscreen.
    pub fn show_menu(&mut self, initial: MenuChoice) -> io::Result<MenuResult> {
        let mut choice = initial;
        self.apply_playfield(choice);

        loop {
            while let Some(ev) = self.input.poll_event() {
                match ev {
                    InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => {
                        return Ok(MenuResult::Quit);
                    }
                    InputEvent::KeyDown(Key::Enter) => {
                        info!(
                            "menu: starting at {} (fullscreen {})",
                            choice.resolution, choice.fullscreen
                        );
                        return Ok(MenuResult::Start(choice));
                    }
                    InputEvent::KeyDown(Key::Char('f')) => {
                        choice.fullscreen = !choice.fullscreen;
                        self.apply_playfield(choice);
                    }
                    InputEvent::KeyDown(Key::Char(c)) => {
                        if let Some(res) = Resolution::from_hotkey(c) {
                            choice.resolution = res;
                            self.apply_playfield(choice);
                        }
                    }
                    InputEvent::Resize { cols, rows } => self.surface.resize(cols, rows),
                    InputEvent::KeyDown(_) => {}
                }
            }

            display::render_menu(&mut self.surface, choice.resolution, choice.fullscreen)?;
            self.clock.sleep(MENU_DELAY);
        }
    }

    /// Run one game until lives reach zero or a quit signal arrives.
    /// Returns how it ended and the final state.
    pub fn play(
        &mut self,
        config: GameConfig,
        fullscreen: bool,
        rng: &mut impl Rng,
    ) -> io::Result<(RunOutcome, GameState)> {
        self.surface.set_playfield(config.width, config.height, fullscreen);

        let start = self.clock.now_ms();
        let mut state = init_state(config, rng);
        info!(
            "run started: {}x{} playfield, {} enemies",
            config.width, config.height, config.enemy_count
        );

        loop {
            let frame_start = self.clock.now_ms();
            let now = frame_start.saturating_sub(start);

            // ── Drain all pending input events (non-blocking) ────────────────
            let mut quit = false;
            while let Some(ev) = self.input.poll_event() {
                match ev {
                    InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => quit = true,
                    InputEvent::Resize { cols, rows } => self.surface.resize(cols, rows),
                    InputEvent::KeyDown(_) => {}
                }
            }
            if quit {
                info!("run quit at {} ms with score {}", now, state.score);
                return Ok((RunOutcome::Quit, state));
            }

            let controls = sample_controls(&self.input);
            state = tick(&state, &controls, now, rng);

            display::render(&mut self.surface, &state, now)?;

            if state.status == GameStatus::GameOver {
                info!("game over at {} ms with score {}", now, state.score);
                return Ok((RunOutcome::GameOver, state));
            }

            state = expire_immunity(&state, now);

            let elapsed = self.clock.now_ms().saturating_sub(frame_start);
            let budget = FRAME_DELAY.as_millis() as u64;
            if elapsed < budget {
                self.clock.sleep(Duration::from_millis(budget - elapsed));
            }
        }
    }

    fn apply_playfield(&mut self, choice: MenuChoice) {
        let (w, h) = choice.resolution.dimensions();
        self.surface.set_playfield(w, h, choice.fullscreen);
    }
}
