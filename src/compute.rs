/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameSession` (plus the current time and, where needed, an RNG handle)
/// and returns a brand-new `GameSession`.  Side effects are limited to the
/// injected RNG and log output.

use std::time::Duration;

use glam::Vec2;
use log::{debug, info};
use rand::Rng;

use crate::assets::SpriteSizes;
use crate::config::{GameConfig, Playfield};
use crate::entities::{
    Bullet, DifficultyProfile, Direction, Enemy, EnemyKind, Flow, GameSession, GameStatus, Hud,
    Key, Level, Obstacle, Player, BOSS_MAX_HEALTH,
};

pub const PLAYER_START: Vec2 = Vec2::new(640.0, 700.0);
pub const PLAYER_STEP: f32 = 5.0;
pub const BULLET_STEP: f32 = 10.0;
pub const OBSTACLE_STEP: f32 = 5.0;
/// New enemies and obstacles appear at this height, above the top edge.
pub const SPAWN_Y: f32 = -50.0;
pub const SCORE_PER_KILL: u32 = 10;

pub const MENU_INSTRUCTIONS: &str = "2. Instructions";
pub const HELP_TEXT: &str = "Use arrows to move, space to shoot.";

// ── Difficulty tables ────────────────────────────────────────────────────────

impl Level {
    /// 0 = Easy, 1 = Medium, 2 = Hard.
    pub fn from_index(index: u8) -> Option<Level> {
        match index {
            0 => Some(Level::Easy),
            1 => Some(Level::Medium),
            2 => Some(Level::Hard),
            _ => None,
        }
    }

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Level::Easy => DifficultyProfile {
                enemy_speed_multiplier: 0.8,
                obstacle_speed_multiplier: 0.8,
                starting_lives: 5,
            },
            Level::Medium => DifficultyProfile {
                enemy_speed_multiplier: 1.0,
                obstacle_speed_multiplier: 1.0,
                starting_lives: 3,
            },
            Level::Hard => DifficultyProfile {
                enemy_speed_multiplier: 1.5,
                obstacle_speed_multiplier: 1.5,
                starting_lives: 2,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Easy => "EASY",
            Level::Medium => "MEDIUM",
            Level::Hard => "HARD",
        }
    }
}

/// Per-frame displacement before the difficulty multiplier.
pub fn enemy_velocity(kind: &EnemyKind) -> Vec2 {
    match kind {
        EnemyKind::Chicken => Vec2::new(0.0, 1.0),
        EnemyKind::Chicken2 => Vec2::new(1.5, 2.0),
        EnemyKind::Boss { .. } => Vec2::new(0.0, 2.0),
    }
}

/// Keep a `size`-sized box at `pos` inside the playfield.
fn clamp_to_field(pos: Vec2, size: Vec2, field: &Playfield) -> Vec2 {
    let limit = (Vec2::new(field.width, field.height) - size).max(Vec2::ZERO);
    pos.min(limit).max(Vec2::ZERO)
}

fn hud_for(score: u32, lives: u32) -> Hud {
    Hud {
        score_text: format!("Score: {}", score),
        lives_text: format!("Lives: {}", lives),
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the session shown at startup: the main menu, Medium difficulty.
/// On a playfield too small for the usual start position the player is
/// pulled inside it.
pub fn init_state(config: &GameConfig, sizes: SpriteSizes) -> GameSession {
    let level = Level::Medium;
    let profile = level.profile();
    GameSession {
        player: Player {
            pos: clamp_to_field(PLAYER_START, sizes.ship, &config.playfield),
            size: sizes.ship,
            lives: profile.starting_lives,
        },
        bullets: Vec::new(),
        enemies: Vec::new(),
        obstacles: Vec::new(),
        score: 0,
        final_score: 0,
        level,
        profile,
        status: GameStatus::Menu,
        instructions: MENU_INSTRUCTIONS,
        hud: hud_for(0, profile.starting_lives),
        last_shot_at: None,
        last_enemy_spawn_at: Duration::ZERO,
        last_obstacle_spawn_at: Duration::ZERO,
        boss_spawned: false,
        frame: 0,
        playfield: config.playfield,
        timing: config.timing,
        boss: config.boss,
        sizes,
    }
}

fn new_boss(state: &GameSession) -> Enemy {
    let size = state.sizes.boss;
    let x = ((state.playfield.width - size.x) / 2.0).max(0.0);
    Enemy::new(
        EnemyKind::Boss { health: BOSS_MAX_HEALTH },
        Vec2::new(x, -size.y),
        &state.sizes,
    )
}

/// Uniform horizontal spawn position keeping the whole entity inside the field.
fn spawn_x(rng: &mut impl Rng, field_width: f32, entity_width: f32) -> f32 {
    rng.gen_range(0.0..=(field_width - entity_width).max(0.0))
}

// ── Difficulty & session transitions ─────────────────────────────────────────

/// Select difficulty 0 (Easy), 1 (Medium) or 2 (Hard).  Any other index
/// leaves the session untouched.  Entities and score are not reset here.
pub fn set_difficulty(state: &GameSession, index: u8) -> GameSession {
    match Level::from_index(index) {
        Some(level) => GameSession {
            level,
            profile: level.profile(),
            ..state.clone()
        },
        None => state.clone(),
    }
}

/// Reset the session for a fresh round and enter the play state.  The
/// player keeps its position; only lives are restored.
pub fn start_game(state: &GameSession, now: Duration) -> GameSession {
    let lives = state.profile.starting_lives;
    info!("Starting game on {} with {} lives", state.level.label(), lives);
    GameSession {
        player: Player {
            lives,
            ..state.player.clone()
        },
        bullets: Vec::new(),
        enemies: Vec::new(),
        obstacles: Vec::new(),
        score: 0,
        final_score: 0,
        status: GameStatus::Playing,
        hud: hud_for(0, lives),
        last_shot_at: None,
        last_enemy_spawn_at: now,
        last_obstacle_spawn_at: now,
        boss_spawned: false,
        frame: 0,
        ..state.clone()
    }
}

/// Place a boss above the top edge at horizontal position `x`.
pub fn spawn_boss(state: &GameSession, x: f32) -> GameSession {
    let mut boss = new_boss(state);
    boss.pos.x = x;
    info!("Boss spawned at x={:.0}", x);
    let mut enemies = state.enemies.clone();
    enemies.push(boss);
    GameSession {
        enemies,
        boss_spawned: true,
        ..state.clone()
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Apply one frame of input.  `keys` holds every key that is down this
/// frame; keys with no meaning in the current state are ignored.
pub fn handle_input(state: &GameSession, keys: &[Key], now: Duration) -> (GameSession, Flow) {
    let down = |key: Key| keys.contains(&key);
    let mut next = state.clone();

    match next.status {
        GameStatus::Menu => {
            if down(Key::Num1) {
                info!("Menu -> difficulty select");
                next.status = GameStatus::DifficultySelect;
            } else if down(Key::Num2) {
                next.instructions = HELP_TEXT;
            } else if down(Key::Num3) {
                info!("Exit selected from menu");
                return (next, Flow::Exit);
            }
        }
        GameStatus::DifficultySelect => {
            let choice = [(Key::Num4, 0), (Key::Num5, 1), (Key::Num6, 2)]
                .into_iter()
                .find(|(key, _)| down(*key));
            if let Some((_, index)) = choice {
                next = start_game(&set_difficulty(&next, index), now);
            }
        }
        GameStatus::Playing | GameStatus::GameOver => {}
    }

    if next.status == GameStatus::Playing {
        let moves = [
            (Key::Left, Direction::Left),
            (Key::Right, Direction::Right),
            (Key::Up, Direction::Up),
            (Key::Down, Direction::Down),
        ];
        for (key, direction) in moves {
            if down(key) {
                next = move_player(&next, direction);
            }
        }
        if down(Key::Space) {
            next = player_fire(&next, now);
        }
    }

    if next.status == GameStatus::GameOver {
        if down(Key::R) {
            next = start_game(&next, now);
        } else if down(Key::M) {
            info!("Game over -> menu");
            next.status = GameStatus::Menu;
        }
    }

    (next, Flow::Continue)
}

/// Move the player one step, clamped to the playfield.
pub fn move_player(state: &GameSession, direction: Direction) -> GameSession {
    let delta = match direction {
        Direction::Left => Vec2::new(-PLAYER_STEP, 0.0),
        Direction::Right => Vec2::new(PLAYER_STEP, 0.0),
        Direction::Up => Vec2::new(0.0, -PLAYER_STEP),
        Direction::Down => Vec2::new(0.0, PLAYER_STEP),
    };
    let pos = clamp_to_field(state.player.pos + delta, state.player.size, &state.playfield);
    GameSession {
        player: Player {
            pos,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire a bullet from the centre of the player's top edge, at most once
/// per fire cooldown.
pub fn player_fire(state: &GameSession, now: Duration) -> GameSession {
    let cooldown = state.timing.fire_cooldown();
    let ready = state
        .last_shot_at
        .map_or(true, |last| now.saturating_sub(last) > cooldown);
    if !ready {
        return state.clone();
    }

    let size = state.sizes.bullet;
    let player = &state.player;
    let bullet = Bullet {
        pos: Vec2::new(player.pos.x + (player.size.x - size.x) / 2.0, player.pos.y),
        size,
    };
    let mut bullets = state.bullets.clone();
    bullets.push(bullet);
    GameSession {
        bullets,
        last_shot_at: Some(now),
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  Only the play state changes; in
/// every other state the session is returned as is.  All randomness comes
/// through `rng` so callers control determinism.
pub fn tick(state: &GameSession, now: Duration, rng: &mut impl Rng) -> GameSession {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let frame = state.frame + 1;
    let field = state.playfield;
    let sizes = state.sizes;

    // ── 1. Move bullets, drop those fully above the top edge ────────────────
    let bullets: Vec<Bullet> = state
        .bullets
        .iter()
        .map(|b| Bullet {
            pos: b.pos - Vec2::new(0.0, BULLET_STEP),
            ..b.clone()
        })
        .filter(|b| b.bounds().max().y >= 0.0)
        .collect();

    // ── 2. Spawn and move enemies ───────────────────────────────────────────
    let mut enemies = state.enemies.clone();
    let mut last_enemy_spawn_at = state.last_enemy_spawn_at;
    if now.saturating_sub(last_enemy_spawn_at) > state.timing.enemy_spawn_interval() {
        let x = spawn_x(rng, field.width, sizes.chicken.x);
        enemies.push(Enemy::new(EnemyKind::Chicken, Vec2::new(x, SPAWN_Y), &sizes));
        last_enemy_spawn_at = now;
    }

    let mut boss_spawned = state.boss_spawned;
    if state.boss.enabled && !boss_spawned && state.score >= state.boss.score_threshold {
        info!("Boss entering at score {}", state.score);
        enemies.push(new_boss(state));
        boss_spawned = true;
    }

    let enemy_mult = state.profile.enemy_speed_multiplier;
    let mut escorts: Vec<Enemy> = Vec::new();
    for enemy in enemies.iter_mut() {
        enemy.pos += enemy_velocity(&enemy.kind) * enemy_mult;
        if enemy.is_boss() && rng.gen_ratio(1, state.boss.spawn_one_in) {
            let kind = if rng.gen_bool(0.5) {
                EnemyKind::Chicken
            } else {
                EnemyKind::Chicken2
            };
            let escort = Enemy::new(kind, Vec2::new(0.0, SPAWN_Y), &sizes);
            let x = spawn_x(rng, field.width, escort.size.x);
            escorts.push(Enemy {
                pos: Vec2::new(x, SPAWN_Y),
                ..escort
            });
        }
    }
    enemies.extend(escorts);
    // Past the bottom edge: gone, no penalty.
    enemies.retain(|e| e.pos.y <= field.height);

    // ── 3. Spawn and move obstacles ─────────────────────────────────────────
    let mut obstacles = state.obstacles.clone();
    let mut last_obstacle_spawn_at = state.last_obstacle_spawn_at;
    if now.saturating_sub(last_obstacle_spawn_at) > state.timing.obstacle_spawn_interval() {
        let x = spawn_x(rng, field.width, sizes.obstacle.x);
        obstacles.push(Obstacle {
            pos: Vec2::new(x, SPAWN_Y),
            size: sizes.obstacle,
        });
        last_obstacle_spawn_at = now;
    }
    let obstacle_step = Vec2::new(0.0, OBSTACLE_STEP * state.profile.obstacle_speed_multiplier);
    let mut obstacles: Vec<Obstacle> = obstacles
        .into_iter()
        .map(|o| Obstacle {
            pos: o.pos + obstacle_step,
            ..o
        })
        .filter(|o| o.pos.y <= field.height)
        .collect();

    // ── 4. Collision: bullets ↔ enemies ─────────────────────────────────────
    // First enemy in insertion order wins; one enemy per bullet per frame.
    // Basic enemies let the bullet fly on; the boss absorbs it.
    let mut score = state.score;
    let mut spent_bullets: Vec<usize> = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        let bullet_box = bullet.bounds();
        let Some(ei) = enemies
            .iter()
            .position(|e| bullet_box.intersects(&e.bounds()))
        else {
            continue;
        };

        let destroyed = if enemies[ei].is_boss() {
            enemies[ei].take_damage();
            spent_bullets.push(bi);
            enemies[ei].is_dead()
        } else {
            true
        };

        if destroyed {
            let enemy = enemies.remove(ei);
            if enemy.is_boss() {
                info!("Boss defeated");
            }
            debug!("Frame {}: {:?} destroyed at {:?}", frame, enemy.kind, enemy.pos);
            score += SCORE_PER_KILL;
        }
    }

    // ── 5. Collision: bullets ↔ obstacles ───────────────────────────────────
    let bullets: Vec<Bullet> = bullets
        .into_iter()
        .enumerate()
        .filter(|(i, b)| {
            !spent_bullets.contains(i)
                && !obstacles.iter().any(|o| b.bounds().intersects(&o.bounds()))
        })
        .map(|(_, b)| b)
        .collect();

    // ── 6. Collision: player ↔ obstacles ────────────────────────────────────
    // No invulnerability window: every overlapping obstacle costs a life.
    let player_box = state.player.bounds();
    let before = obstacles.len();
    obstacles.retain(|o| !o.bounds().intersects(&player_box));
    let hits = (before - obstacles.len()) as u32;
    if hits > 0 {
        debug!("Frame {}: player hit by {} obstacle(s)", frame, hits);
    }
    let lives = state.player.lives.saturating_sub(hits);

    // ── 7. HUD ──────────────────────────────────────────────────────────────
    let hud = hud_for(score, lives);

    // ── 8. Game over ────────────────────────────────────────────────────────
    let (status, final_score) = if lives == 0 {
        info!("Game over with score {}", score);
        (GameStatus::GameOver, score)
    } else {
        (GameStatus::Playing, state.final_score)
    };

    GameSession {
        player: Player {
            lives,
            ..state.player.clone()
        },
        bullets,
        enemies,
        obstacles,
        score,
        final_score,
        status,
        hud,
        last_enemy_spawn_at,
        last_obstacle_spawn_at,
        boss_spawned,
        frame,
        ..state.clone()
    }
}
