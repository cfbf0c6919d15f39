/// All game entity types — pure data, no logic.

use crate::config::{GameConfig, ENEMY_SIZE, PLAYER_SIZE};

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in playfield pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict box overlap: touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

// ── Status ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Post-collision invulnerability.  `since` is the run clock (ms) at which
/// the window opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Immunity {
    Normal,
    Immune { since: u64 },
}

impl Immunity {
    pub fn is_immune(&self) -> bool {
        matches!(self, Immunity::Immune { .. })
    }
}

// ── Player & enemy ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_SIZE, PLAYER_SIZE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
    pub active: bool,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, ENEMY_SIZE, ENEMY_SIZE)
    }
}

// ── Input snapshot ───────────────────────────────────────────────────────────

/// Directional keys held during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    /// Created once per run; never grows or shrinks.
    pub enemies: Vec<Enemy>,
    pub score: u32,
    pub lives: u32,
    pub immunity: Immunity,
    /// Run clock of the last registered collision, if any.
    pub last_collision: Option<u64>,
    pub last_score_update: u64,
    pub status: GameStatus,
    pub frame: u64,
    pub config: GameConfig,
}
