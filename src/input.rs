/// Keyboard input — discrete events plus "is this key held" queries.
///
/// Terminals deliver key presses, not key state.  `TerminalInput` rebuilds
/// the state from the event stream: on terminals that report release events
/// (keyboard-enhancement capable: kitty, Ghostty, ...) a key is held until
/// it is released. Elsewhere a fresh press stays held for
/// `FIRST_HOLD_WINDOW`, long enough to bridge the OS key-repeat delay, and
/// once repeats arrive each one keeps it held for `HOLD_WINDOW`, which is
/// longer than the repeat interval.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, warn};

use crate::entities::Controls;

/// How long a repeat keeps a key held when no release event will arrive.
pub const HOLD_WINDOW: Duration = Duration::from_millis(133);
/// How long a first press keeps a key held before repeats start.
pub const FIRST_HOLD_WINDOW: Duration = Duration::from_millis(600);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    /// Letters are folded to lowercase.
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    Resize { cols: u16, rows: u16 },
}

pub trait InputSource {
    /// Next pending event, without blocking.
    fn poll_event(&mut self) -> Option<InputEvent>;
    fn is_pressed(&self, key: Key) -> bool;
}

/// Snapshot of the four direction keys: W/A/S/D or the arrow keys.
pub fn sample_controls(input: &impl InputSource) -> Controls {
    Controls {
        up: input.is_pressed(Key::Up) || input.is_pressed(Key::Char('w')),
        down: input.is_pressed(Key::Down) || input.is_pressed(Key::Char('s')),
        left: input.is_pressed(Key::Left) || input.is_pressed(Key::Char('a')),
        right: input.is_pressed(Key::Right) || input.is_pressed(Key::Char('d')),
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Char(c) => Some(Key::Char(c.to_ascii_lowercase())),
        _ => None,
    }
}

fn is_quit(key: Key, modifiers: KeyModifiers) -> bool {
    match key {
        Key::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        Key::Char('q') => true,
        _ => false,
    }
}

// ── Terminal implementation ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
struct Held {
    /// When the last press/repeat arrived.
    at: Instant,
    /// Auto-repeat has started for this key.
    repeating: bool,
}

impl Held {
    fn window(&self) -> Duration {
        if self.repeating {
            HOLD_WINDOW
        } else {
            FIRST_HOLD_WINDOW
        }
    }

    fn is_fresh(&self) -> bool {
        self.at.elapsed() <= self.window()
    }
}

pub struct TerminalInput {
    rx: mpsc::Receiver<Event>,
    held: HashMap<Key, Held>,
    /// Release events are reported, so presses never expire on their own.
    releases_reported: bool,
}

impl TerminalInput {
    /// Dedicate a thread exclusively to blocking event reads, sending them
    /// through a channel so the game loop never has to block on I/O.
    pub fn spawn(releases_reported: bool) -> Self {
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(e) => {
                    warn!("terminal event read failed: {}", e);
                    break;
                }
            }
        });
        Self::from_receiver(rx, releases_reported)
    }

    pub fn from_receiver(rx: mpsc::Receiver<Event>, releases_reported: bool) -> Self {
        Self {
            rx,
            held: HashMap::new(),
            releases_reported,
        }
    }
}

impl InputSource for TerminalInput {
    fn poll_event(&mut self) -> Option<InputEvent> {
        while let Ok(ev) = self.rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, modifiers, kind, .. }) => {
                    let Some(key) = map_key(code) else {
                        continue;
                    };
                    match kind {
                        KeyEventKind::Press => {
                            // Classic terminals report OS auto-repeat as
                            // further presses of a key that is still held.
                            let repeating = self.held.get(&key).is_some_and(Held::is_fresh);
                            self.held.insert(key, Held { at: Instant::now(), repeating });
                            if is_quit(key, modifiers) {
                                return Some(InputEvent::Quit);
                            }
                            return Some(InputEvent::KeyDown(key));
                        }
                        // Repeat: refresh timestamp so key stays "held"
                        KeyEventKind::Repeat => {
                            self.held.insert(key, Held { at: Instant::now(), repeating: true });
                        }
                        KeyEventKind::Release => {
                            self.held.remove(&key);
                        }
                    }
                }
                Event::Resize(cols, rows) => {
                    debug!("terminal resized to {}x{}", cols, rows);
                    return Some(InputEvent::Resize { cols, rows });
                }
                _ => {}
            }
        }
        None
    }

    fn is_pressed(&self, key: Key) -> bool {
        self.held
            .get(&key)
            .map(|held| self.releases_reported || held.is_fresh())
            .unwrap_or(false)
    }
}
