/// Fixed tuning constants and the small amount of per-run configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ── Fixed constants ──────────────────────────────────────────────────────────

pub const PLAYER_SIZE: i32 = 20;
/// Pixels moved per frame for each held direction key.
pub const PLAYER_SPEED: i32 = 5;
pub const INITIAL_LIVES: u32 = 3;

pub const ENEMY_SIZE: i32 = 20;
/// Pixels moved per frame on each axis while chasing.
pub const ENEMY_SPEED: i32 = 2;
pub const DEFAULT_ENEMY_COUNT: usize = 5;
pub const MAX_ENEMY_COUNT: usize = 64;

pub const FRAME_DELAY: Duration = Duration::from_millis(16); // ≈60 FPS

pub const SCORE_INTERVAL_MS: u64 = 1000;
pub const IMMUNITY_DURATION_MS: u64 = 3000;
/// Half-period of the player's blink while immune.
pub const BLINK_INTERVAL_MS: u64 = 500;
/// Minimum gap between two registered player-enemy collisions.
pub const COLLISION_COOLDOWN_MS: u64 = 100;

/// Attempts made to place a relocated enemy clear of every other enemy
/// before the last draw is kept.
pub const RELOCATE_ATTEMPTS: u32 = 8;

// ── Resolution ───────────────────────────────────────────────────────────────

/// Playfield sizes offered by the menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    R800x600,
    R1024x768,
    R1280x720,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [
        Resolution::R800x600,
        Resolution::R1024x768,
        Resolution::R1280x720,
    ];

    pub fn dimensions(self) -> (i32, i32) {
        match self {
            Resolution::R800x600 => (800, 600),
            Resolution::R1024x768 => (1024, 768),
            Resolution::R1280x720 => (1280, 720),
        }
    }

    /// Menu hotkey for this resolution.
    pub fn hotkey(self) -> char {
        match self {
            Resolution::R800x600 => '1',
            Resolution::R1024x768 => '2',
            Resolution::R1280x720 => '3',
        }
    }

    pub fn from_hotkey(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.hotkey() == c)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.dimensions();
        write!(f, "{}x{}", w, h)
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.to_string() == s)
            .ok_or_else(|| format!("unsupported resolution '{}' (expected 800x600, 1024x768 or 1280x720)", s))
    }
}

// ── Per-run configuration ────────────────────────────────────────────────────

/// Everything that may differ between two runs.  Copied into the game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub enemy_count: usize,
}

impl GameConfig {
    pub fn new(resolution: Resolution, enemy_count: usize) -> Self {
        let (width, height) = resolution.dimensions();
        Self {
            width,
            height,
            enemy_count: enemy_count.clamp(1, MAX_ENEMY_COUNT),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Resolution::default(), DEFAULT_ENEMY_COUNT)
    }
}
