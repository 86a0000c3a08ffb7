/// All game entity types.  Plain data plus the bounding-box accessors the
/// collision pass needs; behaviour lives in `compute`.

use std::time::Duration;

use glam::Vec2;

use crate::assets::SpriteSizes;
use crate::config::{BossConfig, Playfield, Timing};
use crate::geometry::Bounds;

pub const BOSS_MAX_HEALTH: i32 = 100;
pub const BOSS_HIT_DAMAGE: i32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

/// Parameters derived from a `Level`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    pub enemy_speed_multiplier: f32,
    pub obstacle_speed_multiplier: f32,
    pub starting_lives: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    DifficultySelect,
    Playing,
    GameOver,
}

/// Keys the game reacts to.  Anything else never reaches the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Left,
    Right,
    Up,
    Down,
    Space,
    R,
    M,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// What the frame loop should do after input handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

// ── Player & projectiles ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub lives: u32,
}

impl Player {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, self.size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Bullet {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, self.size)
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    /// Slow vertical drift.
    Chicken,
    /// Faster diagonal drift.
    Chicken2,
    /// Slow vertical drift; takes several hits and spawns escorts.
    Boss { health: i32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, sizes: &SpriteSizes) -> Self {
        let size = match kind {
            EnemyKind::Chicken => sizes.chicken,
            EnemyKind::Chicken2 => sizes.chicken2,
            EnemyKind::Boss { .. } => sizes.boss,
        };
        Enemy { pos, size, kind }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, self.size)
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss { .. })
    }

    /// Only the boss carries health; basic enemies have nothing to deduct.
    pub fn take_damage(&mut self) {
        if let EnemyKind::Boss { health } = &mut self.kind {
            *health -= BOSS_HIT_DAMAGE;
        }
    }

    pub fn is_dead(&self) -> bool {
        match self.kind {
            EnemyKind::Boss { health } => health <= 0,
            EnemyKind::Chicken | EnemyKind::Chicken2 => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, self.size)
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Text lines shown in the play-state HUD.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hud {
    pub score_text: String,
    pub lives_text: String,
}

/// The entire game session.  Cloneable so the pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub player: Player,
    pub bullets: Vec<Bullet>,
    /// Insertion order is the collision scan order.
    pub enemies: Vec<Enemy>,
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Score captured when the session ended.
    pub final_score: u32,
    pub level: Level,
    pub profile: DifficultyProfile,
    pub status: GameStatus,
    /// Second menu line; replaced by the help text on request.
    pub instructions: &'static str,
    pub hud: Hud,
    /// Timestamps are offsets from program start.  `None` until the first shot.
    pub last_shot_at: Option<Duration>,
    pub last_enemy_spawn_at: Duration,
    pub last_obstacle_spawn_at: Duration,
    pub boss_spawned: bool,
    pub frame: u64,
    pub playfield: Playfield,
    pub timing: Timing,
    pub boss: BossConfig,
    pub sizes: SpriteSizes,
}
