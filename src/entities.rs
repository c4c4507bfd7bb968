/// All game entity types: pure data, no logic beyond geometry helpers.
///
/// Coordinates are viewport pixels: origin top-left, y grows downward.

// ── Geometry ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Anything with an axis-aligned bounding box.
pub trait Bounds {
    fn bounds(&self) -> Rect;
}

impl Bounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

macro_rules! impl_bounds {
    ($($ty:ty),* $(,)?) => {
        $(impl Bounds for $ty {
            fn bounds(&self) -> Rect {
                self.rect
            }
        })*
    };
}

pub type EntityId = u64;

// ── Player ───────────────────────────────────────────────────────────────────

/// Score, lives and invulnerability live in `GameState`, not here.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerBullet {
    pub id: EntityId,
    pub rect: Rect,
    /// Pixels travelled upward per tick.
    pub speed: f32,
    /// Fired while the special weapon is active; may penetrate enemies.
    pub special: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBullet {
    pub id: EntityId,
    pub rect: Rect,
    /// Pixels travelled downward per tick.
    pub speed: f32,
}

// ── Enemies ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub rect: Rect,
    /// Cosmetic variant, 0..=2 (grid row modulo 3).
    pub kind: u8,
    pub health: u32,
}

/// An enemy that left the formation to pursue the player.
#[derive(Clone, Debug, PartialEq)]
pub struct DiveBomber {
    pub id: EntityId,
    pub rect: Rect,
    pub kind: u8,
    /// Player centre x at the moment of detaching.
    pub target_x: f32,
    pub speed: f32,
}

// ── Pickups & effects ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Adds one life.
    Life,
    /// Activates the special weapon (3-bullet spread, faster fire, screen clear).
    Special,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub id: EntityId,
    pub rect: Rect,
    pub kind: PowerUpKind,
    pub speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleColor {
    Orange,
    Yellow,
    Magenta,
    Green,
    Cyan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExplosionParticle {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: ParticleColor,
    pub size: f32,
    /// Ticks left before removal.
    pub life: u32,
}

impl_bounds!(Player, PlayerBullet, EnemyBullet, Enemy, DiveBomber, PowerUp);

// ── Game state ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Score, progression and timers for one run.  Only changed through
/// `state::dispatch`.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub status: GameStatus,
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub high_score: u32,
    pub special_weapon: bool,
    /// Ticks elapsed since the special weapon was activated.
    pub special_weapon_timer: u64,
    pub is_invulnerable: bool,
    /// Ticks of invulnerability left.
    pub invulnerable_timer: u64,
    /// Lives lost during this run.
    pub deaths: u32,
}

impl GameState {
    pub fn new(initial_lives: u32) -> Self {
        GameState {
            status: GameStatus::Idle,
            score: 0,
            level: 1,
            lives: initial_lives,
            high_score: 0,
            special_weapon: false,
            special_weapon_timer: 0,
            is_invulnerable: false,
            invulnerable_timer: 0,
            deaths: 0,
        }
    }
}
