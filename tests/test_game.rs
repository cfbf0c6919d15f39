use std::cell::Cell;
use std::collections::{HashSet, VecDeque};
use std::io;
use std::time::Duration;

use crossterm::style::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;

use squarix::clock::Clock;
use squarix::config::*;
use squarix::display::{self, C_ENEMY, C_PLAYER, C_TEXT};
use squarix::entities::*;
use squarix::input::{InputEvent, InputSource, Key};
use squarix::surface::Surface;
use squarix::{MenuChoice, MenuResult, RunOutcome, Session};

// ── Fakes ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum Op {
    Clear(Color),
    Rect(Rect, Color),
    Text(String, i32, i32, Color),
    Present,
    Playfield(i32, i32, bool),
}

#[derive(Default)]
struct RecordingSurface {
    ops: Vec<Op>,
}

impl RecordingSurface {
    fn presents(&self) -> usize {
        self.ops.iter().filter(|op| **op == Op::Present).count()
    }

    /// Ops of the last complete frame (from its Clear up to its Present).
    fn last_frame(&self) -> &[Op] {
        let end = self.ops.iter().rposition(|op| *op == Op::Present).unwrap();
        let start = self.ops[..end]
            .iter()
            .rposition(|op| matches!(op, Op::Clear(_)))
            .unwrap();
        &self.ops[start..=end]
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) -> io::Result<()> {
        self.ops.push(Op::Clear(color));
        Ok(())
    }
    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        self.ops.push(Op::Rect(rect, color));
        Ok(())
    }
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) -> io::Result<()> {
        self.ops.push(Op::Text(text.to_string(), x, y, color));
        Ok(())
    }
    fn present(&mut self) -> io::Result<()> {
        self.ops.push(Op::Present);
        Ok(())
    }
    fn set_playfield(&mut self, width: i32, height: i32, fullscreen: bool) {
        self.ops.push(Op::Playfield(width, height, fullscreen));
    }
}

/// Each poll pops one entry; `None` ends the current drain.  Once the
/// script runs out the next poll yields `Quit` and later ones nothing.
struct ScriptedInput {
    polls: VecDeque<Option<InputEvent>>,
    held: HashSet<Key>,
    quit_sent: bool,
}

impl ScriptedInput {
    fn new(polls: Vec<Option<InputEvent>>) -> Self {
        Self {
            polls: polls.into(),
            held: HashSet::new(),
            quit_sent: false,
        }
    }

    /// `frames` drains with nothing pending, then a quit.
    fn idle_frames(frames: usize) -> Self {
        Self::new(vec![None; frames])
    }
}

impl InputSource for ScriptedInput {
    fn poll_event(&mut self) -> Option<InputEvent> {
        match self.polls.pop_front() {
            Some(entry) => entry,
            None if !self.quit_sent => {
                self.quit_sent = true;
                Some(InputEvent::Quit)
            }
            None => None,
        }
    }
    fn is_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

/// Time only moves when the loop sleeps.
#[derive(Default)]
struct ManualClock {
    now: Cell<u64>,
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
    fn sleep(&self, duration: Duration) {
        self.now.set(self.now.get() + duration.as_millis() as u64);
    }
}

fn session(input: ScriptedInput) -> Session<RecordingSurface, ScriptedInput, ManualClock> {
    Session::new(RecordingSurface::default(), input, ManualClock::default())
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Frame loop ───────────────────────────────────────────────────────────────

#[test]
fn quit_before_first_frame_draws_nothing() {
    let mut s = session(ScriptedInput::new(vec![Some(InputEvent::Quit)]));
    let (outcome, state) = s.play(GameConfig::default(), false, &mut seeded_rng()).unwrap();
    assert_eq!(outcome, RunOutcome::Quit);
    assert_eq!(state.frame, 0);
    assert_eq!(s.surface.presents(), 0);
}

#[test]
fn each_frame_draws_player_enemies_and_hud() {
    let mut s = session(ScriptedInput::idle_frames(3));
    let (outcome, state) = s.play(GameConfig::default(), false, &mut seeded_rng()).unwrap();
    assert_eq!(outcome, RunOutcome::Quit);
    assert_eq!(state.frame, 3);
    assert_eq!(s.surface.presents(), 3);
    assert_eq!(s.surface.ops[0], Op::Playfield(800, 600, false));

    let frame = s.surface.last_frame();
    let enemy_rects = frame
        .iter()
        .filter(|op| matches!(op, Op::Rect(_, c) if *c == C_ENEMY))
        .count();
    assert_eq!(enemy_rects, DEFAULT_ENEMY_COUNT);
    assert!(frame.contains(&Op::Text(format!("Score: {}", state.score), 10, 10, C_TEXT)));
    assert!(frame.contains(&Op::Text(format!("Lives: {}", state.lives), 10, 50, C_TEXT)));
}

#[test]
fn frames_are_paced_by_the_clock() {
    let mut s = session(ScriptedInput::idle_frames(70));
    let (_, state) = s.play(GameConfig::default(), false, &mut seeded_rng()).unwrap();
    // Frame k runs at 16·(k-1) ms; the 70th at 1104 ms.
    assert_eq!(s.clock.now_ms(), 70 * FRAME_DELAY.as_millis() as u64);
    assert_eq!(state.score, 1);
}

#[test]
fn escape_ends_the_run() {
    let mut s = session(ScriptedInput::new(vec![
        None,
        Some(InputEvent::KeyDown(Key::Char('x'))),
        Some(InputEvent::KeyDown(Key::Escape)),
    ]));
    let (outcome, state) = s.play(GameConfig::default(), false, &mut seeded_rng()).unwrap();
    assert_eq!(outcome, RunOutcome::Quit);
    assert_eq!(state.frame, 1);
}

#[test]
fn crowded_field_runs_out_of_lives() {
    let mut s = session(ScriptedInput::idle_frames(20_000));
    let cfg = GameConfig::new(Resolution::R800x600, MAX_ENEMY_COUNT);
    let (outcome, state) = s.play(cfg, false, &mut seeded_rng()).unwrap();
    assert_eq!(outcome, RunOutcome::GameOver);
    assert_eq!(state.lives, 0);
    assert_eq!(state.status, GameStatus::GameOver);
    // The final frame is still drawn.
    let frame = s.surface.last_frame();
    assert!(frame.contains(&Op::Text("Lives: 0".to_string(), 10, 50, C_TEXT)));
}

#[test]
fn held_key_steers_the_player() {
    let mut input = ScriptedInput::idle_frames(1);
    input.held.insert(Key::Char('a'));
    let mut s = session(input);
    // A single enemy only interferes if it spawned on top of the centre.
    let cfg = GameConfig::new(Resolution::R800x600, 1);
    let (_, state) = s.play(cfg, false, &mut seeded_rng()).unwrap();
    assert!(
        state.lives < INITIAL_LIVES || state.player == Player { x: 400 - PLAYER_SPEED, y: 300 },
        "player at {:?}",
        state.player
    );
}

// ── Menu ─────────────────────────────────────────────────────────────────────

fn default_choice() -> MenuChoice {
    MenuChoice {
        resolution: Resolution::R800x600,
        fullscreen: false,
    }
}

#[test]
fn menu_selects_resolution_and_fullscreen() {
    let mut s = session(ScriptedInput::new(vec![
        Some(InputEvent::KeyDown(Key::Char('2'))),
        Some(InputEvent::KeyDown(Key::Char('f'))),
        None,
        Some(InputEvent::KeyDown(Key::Char('3'))),
        Some(InputEvent::KeyDown(Key::Char('9'))),
        Some(InputEvent::KeyDown(Key::Enter)),
    ]));
    let result = s.show_menu(default_choice()).unwrap();
    assert_eq!(
        result,
        MenuResult::Start(MenuChoice {
            resolution: Resolution::R1280x720,
            fullscreen: true,
        })
    );
    assert!(s.surface.ops.contains(&Op::Playfield(1024, 768, true)));
    assert_eq!(s.surface.presents(), 1);
    assert_eq!(s.clock.now_ms(), 100);
}

#[test]
fn menu_escape_and_quit_leave() {
    let mut s = session(ScriptedInput::new(vec![Some(InputEvent::KeyDown(Key::Escape))]));
    assert_eq!(s.show_menu(default_choice()).unwrap(), MenuResult::Quit);

    let mut s = session(ScriptedInput::new(vec![None, None]));
    assert_eq!(s.show_menu(default_choice()).unwrap(), MenuResult::Quit);
    assert_eq!(s.surface.presents(), 2);
}

#[test]
fn menu_highlights_the_selection() {
    let mut s = session(ScriptedInput::new(vec![
        Some(InputEvent::KeyDown(Key::Char('2'))),
        None,
    ]));
    s.show_menu(default_choice()).unwrap();
    let frame = s.surface.last_frame();
    assert!(frame.contains(&Op::Text(
        "> Press 2 for 1024x768".to_string(),
        50,
        150,
        display::C_HIGHLIGHT
    )));
    assert!(frame.contains(&Op::Text("  Press 1 for 800x600".to_string(), 50, 100, C_TEXT)));
}

// ── Player colour ────────────────────────────────────────────────────────────

#[test]
fn player_blinks_while_immune() {
    let mut rng = seeded_rng();
    let mut state = squarix::compute::init_state(GameConfig::default(), &mut rng);
    assert_eq!(display::player_color(&state, 0), C_PLAYER);

    state.immunity = Immunity::Immune { since: 1000 };
    assert_eq!(display::player_color(&state, 1000), display::C_PLAYER_BLINK_ON);
    assert_eq!(display::player_color(&state, 1499), display::C_PLAYER_BLINK_ON);
    assert_eq!(display::player_color(&state, 1500), display::C_PLAYER_BLINK_OFF);
    assert_eq!(display::player_color(&state, 2000), display::C_PLAYER_BLINK_ON);
}
