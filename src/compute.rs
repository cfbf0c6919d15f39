/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (plus the run clock in milliseconds and, where needed, an RNG
/// handle) and returns a brand-new `GameState`.  Side effects are limited to
/// the injected RNG.

use log::debug;
use rand::Rng;

use crate::config::{
    GameConfig, COLLISION_COOLDOWN_MS, ENEMY_SIZE, ENEMY_SPEED, IMMUNITY_DURATION_MS,
    INITIAL_LIVES, PLAYER_SIZE, PLAYER_SPEED, RELOCATE_ATTEMPTS, SCORE_INTERVAL_MS,
};
use crate::entities::{Controls, Enemy, GameState, GameStatus, Immunity, Player};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Uniform top-left corner for an entity of `size` inside the playfield.
pub fn random_position(config: &GameConfig, size: i32, rng: &mut impl Rng) -> (i32, i32) {
    let x = rng.gen_range(0..(config.width - size).max(1));
    let y = rng.gen_range(0..(config.height - size).max(1));
    (x, y)
}

fn clamp_axis(value: i32, dimension: i32, size: i32) -> i32 {
    value.clamp(0, (dimension - size).max(0))
}

/// Step of `speed` from `from` toward `to`; zero when already aligned.
fn step_toward(from: i32, to: i32, speed: i32) -> i32 {
    from + (to - from).signum() * speed
}

pub fn cooldown_elapsed(state: &GameState, now: u64) -> bool {
    state
        .last_collision
        .map_or(true, |t| now.saturating_sub(t) >= COLLISION_COOLDOWN_MS)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial state: player centred, every enemy active at a random
/// position.  The run clock starts at 0.
pub fn init_state(config: GameConfig, rng: &mut impl Rng) -> GameState {
    let enemies = (0..config.enemy_count)
        .map(|_| {
            let (x, y) = random_position(&config, ENEMY_SIZE, rng);
            Enemy { x, y, active: true }
        })
        .collect();

    GameState {
        player: Player {
            x: clamp_axis(config.width / 2, config.width, PLAYER_SIZE),
            y: clamp_axis(config.height / 2, config.height, PLAYER_SIZE),
        },
        enemies,
        score: 0,
        lives: INITIAL_LIVES,
        immunity: Immunity::Normal,
        last_collision: None,
        last_score_update: 0,
        status: GameStatus::Playing,
        frame: 0,
        config,
    }
}

// ── Input-driven movement ────────────────────────────────────────────────────

/// Apply held direction keys, then clamp.  Axes are independent, so a
/// diagonal covers more ground than a straight move.  Immunity freezes
/// player control entirely.
pub fn move_player(state: &GameState, controls: &Controls) -> GameState {
    let mut x = state.player.x;
    let mut y = state.player.y;

    if !state.immunity.is_immune() {
        if controls.up {
            y -= PLAYER_SPEED;
        }
        if controls.down {
            y += PLAYER_SPEED;
        }
        if controls.left {
            x -= PLAYER_SPEED;
        }
        if controls.right {
            x += PLAYER_SPEED;
        }
    }

    GameState {
        player: Player {
            x: clamp_axis(x, state.config.width, PLAYER_SIZE),
            y: clamp_axis(y, state.config.height, PLAYER_SIZE),
        },
        ..state.clone()
    }
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Player ↔ enemy test.  Skipped while immune or inside the cooldown window;
/// at most one hit is registered per call.
pub fn check_player_collision(state: &GameState, now: u64, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Playing
        || state.immunity.is_immune()
        || !cooldown_elapsed(state, now)
    {
        return state.clone();
    }

    let player_rect = state.player.rect();
    let hit = state
        .enemies
        .iter()
        .position(|e| e.active && player_rect.overlaps(&e.rect()));

    let Some(index) = hit else {
        return state.clone();
    };

    let lives = state.lives.saturating_sub(1);
    debug!(
        "collision with enemy {} at frame {} ({} lives left)",
        index, state.frame, lives
    );

    if lives == 0 {
        return GameState {
            lives,
            status: GameStatus::GameOver,
            last_collision: Some(now),
            ..state.clone()
        };
    }

    let (x, y) = random_position(&state.config, PLAYER_SIZE, rng);
    debug!("player respawned at ({}, {}); immune from {} ms", x, y, now);
    GameState {
        player: Player { x, y },
        lives,
        immunity: Immunity::Immune { since: now },
        last_collision: Some(now),
        ..state.clone()
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

/// Greedy per-axis chase: every active enemy steps toward the player on
/// each axis, then clamps.  Frozen while the player is immune.
pub fn pursue_player(state: &GameState) -> GameState {
    if state.immunity.is_immune() {
        return state.clone();
    }

    let target = state.player;
    let cfg = &state.config;
    let enemies = state
        .enemies
        .iter()
        .map(|e| {
            if !e.active {
                return *e;
            }
            Enemy {
                x: clamp_axis(step_toward(e.x, target.x, ENEMY_SPEED), cfg.width, ENEMY_SIZE),
                y: clamp_axis(step_toward(e.y, target.y, ENEMY_SPEED), cfg.height, ENEMY_SIZE),
                ..*e
            }
        })
        .collect();

    GameState {
        enemies,
        ..state.clone()
    }
}

/// Pairwise enemy ↔ enemy pass.  On overlap the higher-indexed enemy is
/// relocated; the lower-indexed one never moves.  A relocation is redrawn
/// up to `RELOCATE_ATTEMPTS` times until it lands clear of every other
/// active enemy.  Frozen while the player is immune.
pub fn resolve_enemy_overlaps(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.immunity.is_immune() {
        return state.clone();
    }

    let mut enemies = state.enemies.clone();
    for i in 0..enemies.len() {
        for j in (i + 1)..enemies.len() {
            if !(enemies[i].active && enemies[j].active) {
                continue;
            }
            if !enemies[i].rect().overlaps(&enemies[j].rect()) {
                continue;
            }

            for _ in 0..RELOCATE_ATTEMPTS {
                let (x, y) = random_position(&state.config, ENEMY_SIZE, rng);
                enemies[j].x = x;
                enemies[j].y = y;
                let candidate = enemies[j].rect();
                let clear = enemies
                    .iter()
                    .enumerate()
                    .all(|(k, e)| k == j || !e.active || !e.rect().overlaps(&candidate));
                if clear {
                    break;
                }
            }
            debug!(
                "enemy {} overlapped enemy {}; relocated to ({}, {})",
                j, i, enemies[j].x, enemies[j].y
            );
        }
    }

    GameState {
        enemies,
        ..state.clone()
    }
}

// ── Timers ───────────────────────────────────────────────────────────────────

/// +1 for every full score interval since the last update.  The update
/// timestamp advances by whole intervals, so the score always equals the
/// number of intervals elapsed and never drifts with frame timing.
pub fn update_score(state: &GameState, now: u64) -> GameState {
    let mut score = state.score;
    let mut last = state.last_score_update;
    while now.saturating_sub(last) >= SCORE_INTERVAL_MS {
        score += 1;
        last += SCORE_INTERVAL_MS;
    }
    GameState {
        score,
        last_score_update: last,
        ..state.clone()
    }
}

/// Immune → Normal once the fixed duration has elapsed.
pub fn expire_immunity(state: &GameState, now: u64) -> GameState {
    match state.immunity {
        Immunity::Immune { since } if now.saturating_sub(since) >= IMMUNITY_DURATION_MS => {
            debug!("immunity ended at {} ms", now);
            GameState {
                immunity: Immunity::Normal,
                ..state.clone()
            }
        }
        _ => state.clone(),
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ───────────────────────────

/// Advance the simulation by one frame up to (but not including) rendering:
/// player movement and clamping, player ↔ enemy collision, pursuit, enemy ↔
/// enemy resolution, score.  A run that ends this frame skips the enemy
/// steps but is still scored.  Immunity expiry runs after the frame is drawn,
/// see [`expire_immunity`].
pub fn tick(state: &GameState, controls: &Controls, now: u64, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    let state = GameState {
        frame: state.frame + 1,
        ..move_player(state, controls)
    };
    let state = check_player_collision(&state, now, rng);
    // The score timer still runs on the frame that ends the run.
    let state = if state.status == GameStatus::GameOver {
        state
    } else {
        resolve_enemy_overlaps(&pursue_player(&state), rng)
    };
    update_score(&state, now)
}
