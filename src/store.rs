/// Entity store: owns every mutable collection of the simulation and the
/// operations that create, move and prune entities.
///
/// All randomness comes through the caller's RNG so tests can seed it.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::entities::{
    DiveBomber, Enemy, EnemyBullet, EntityId, ExplosionParticle, ParticleColor, Player,
    PlayerBullet, PowerUp, PowerUpKind, Rect,
};
use crate::math::{direction, random_bool, random_int, random_range};

/// Explosion scales; the particle count is bucketed by scale.
pub const EXPLOSION_SMALL: f32 = 0.5;
pub const EXPLOSION_MEDIUM: f32 = 1.0;
pub const EXPLOSION_LARGE: f32 = 1.5;
pub const EXPLOSION_PLAYER: f32 = 2.0;

/// Horizontal direction shared by every enemy in the formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationDirection {
    Left,
    Right,
}

impl FormationDirection {
    pub fn sign(self) -> f32 {
        match self {
            FormationDirection::Left => -1.0,
            FormationDirection::Right => 1.0,
        }
    }

    fn reversed(self) -> Self {
        match self {
            FormationDirection::Left => FormationDirection::Right,
            FormationDirection::Right => FormationDirection::Left,
        }
    }
}

/// What a single formation move did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationStep {
    /// Nothing to move.
    Empty,
    Shifted,
    /// Edge reached: direction flipped and the formation dropped one row.
    SteppedDown,
}

#[derive(Clone, Debug)]
pub struct EntityStore {
    pub player: Player,
    pub player_bullets: Vec<PlayerBullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub enemies: Vec<Enemy>,
    pub dive_bombers: Vec<DiveBomber>,
    pub power_ups: Vec<PowerUp>,
    pub explosions: Vec<ExplosionParticle>,
    pub direction: FormationDirection,
    next_id: EntityId,
    config: GameConfig,
}

impl EntityStore {
    pub fn new(config: &GameConfig) -> Self {
        EntityStore {
            player: Player {
                rect: player_start(config),
            },
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            dive_bombers: Vec::new(),
            power_ups: Vec::new(),
            explosions: Vec::new(),
            direction: FormationDirection::Right,
            next_id: 0,
            config: config.clone(),
        }
    }

    /// Viewport width and height in pixels.
    pub fn viewport(&self) -> (f32, f32) {
        (self.config.game.width, self.config.game.height)
    }

    fn next_id(&mut self) -> EntityId {
        self.next_id += 1;
        self.next_id
    }

    // ── Level setup ──────────────────────────────────────────────────────────

    /// Replace the enemy collection with a fresh row-major grid.
    ///
    /// The horizontal margin is reduced (and the grid centred) when the
    /// configured margin would push the widest grids past the right edge.
    pub fn init_enemies(&mut self, difficulty: &Difficulty) {
        let e = &self.config.enemies;
        let (w, h, gap) = (e.width, e.height, e.gap);
        let cols = difficulty.enemy_cols as f32;
        let grid_width = cols * w + (cols - 1.0).max(0.0) * gap;
        let margin_x = e
            .margin_x
            .min(((self.config.game.width - grid_width) / 2.0).max(0.0));
        let margin_y = e.margin_y;

        let mut enemies = Vec::with_capacity((difficulty.enemy_rows * difficulty.enemy_cols) as usize);
        for row in 0..difficulty.enemy_rows {
            for col in 0..difficulty.enemy_cols {
                let rect = Rect::new(
                    col as f32 * (w + gap) + margin_x,
                    row as f32 * (h + gap) + margin_y,
                    w,
                    h,
                );
                enemies.push(Enemy {
                    id: self.next_id(),
                    rect,
                    kind: (row % 3) as u8,
                    health: difficulty.enemy_health,
                });
            }
        }
        self.enemies = enemies;
        self.direction = FormationDirection::Right;
    }

    /// Clear every transient collection, recentre the player and lay out the
    /// grid for `difficulty`.
    pub fn reset_all(&mut self, difficulty: &Difficulty) {
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.dive_bombers.clear();
        self.power_ups.clear();
        self.explosions.clear();
        self.player.rect = player_start(&self.config);
        self.init_enemies(difficulty);
    }

    // ── Player ───────────────────────────────────────────────────────────────

    pub fn move_player(&mut self, left: bool, right: bool) {
        let speed = self.config.player.speed;
        let max_x = self.config.game.width - self.player.rect.width;
        let mut x = self.player.rect.x;
        if left {
            x -= speed;
        }
        if right {
            x += speed;
        }
        self.player.rect.x = x.max(0.0).min(max_x);
    }

    // ── Spawning ─────────────────────────────────────────────────────────────

    /// One bullet, or a centre/left/right spread when `special`.  All share
    /// the spawn y just above the player's top edge.
    pub fn spawn_player_bullet(&mut self, special: bool) {
        let b = &self.config.bullets;
        let (width, height) = (b.player_width, b.player_height);
        let speed = if special { b.special_speed } else { b.player_speed };
        let spread = b.special_spread;

        let (cx, _) = self.player.rect.center();
        let x = cx - width / 2.0;
        let y = self.player.rect.y - height;

        let offsets = if special { vec![0.0, -spread, spread] } else { vec![0.0] };
        for dx in offsets {
            let id = self.next_id();
            self.player_bullets.push(PlayerBullet {
                id,
                rect: Rect::new(x + dx, y, width, height),
                speed,
                special,
            });
        }
    }

    pub fn spawn_enemy_bullet(&mut self, from: &Rect, level: u32) {
        let b = &self.config.bullets;
        let (width, height) = (b.enemy_width, b.enemy_height);
        let speed = b.enemy_base_speed + level as f32 * b.enemy_speed_per_level;
        let (cx, _) = from.center();
        let rect = Rect::new(cx - width / 2.0, from.bottom(), width, height);
        let id = self.next_id();
        self.enemy_bullets.push(EnemyBullet { id, rect, speed });
    }

    /// Detach the enemy with `enemy_id` from the formation and turn it into a
    /// dive bomber aimed at the player's current centre.  Returns `false` when
    /// no such enemy exists.
    pub fn spawn_dive_bomber(&mut self, enemy_id: EntityId, level: u32) -> bool {
        let Some(index) = self.enemies.iter().position(|e| e.id == enemy_id) else {
            return false;
        };
        let enemy = self.enemies.remove(index);
        let e = &self.config.enemies;
        let (target_x, _) = self.player.rect.center();
        self.dive_bombers.push(DiveBomber {
            id: enemy.id,
            rect: enemy.rect,
            kind: enemy.kind,
            target_x,
            speed: e.dive_bomber_speed + level as f32 * e.dive_bomber_speed_per_level,
        });
        true
    }

    pub fn spawn_power_up(&mut self, rng: &mut impl Rng) {
        let p = &self.config.power_ups;
        let (width, height, speed) = (p.width, p.height, p.speed);
        let kind = if random_bool(rng, p.life_probability) {
            PowerUpKind::Life
        } else {
            PowerUpKind::Special
        };
        let x = random_range(rng, 0.0, self.config.game.width - width);
        let id = self.next_id();
        self.power_ups.push(PowerUp {
            id,
            rect: Rect::new(x, -height, width, height),
            kind,
            speed,
        });
    }

    /// Burst of particles evenly spread around the full circle.
    pub fn spawn_explosion(
        &mut self,
        x: f32,
        y: f32,
        scale: f32,
        color: ParticleColor,
        rng: &mut impl Rng,
    ) {
        let p = &self.config.particles;
        let count = explosion_particle_count(scale, &self.config);
        let (base_life, jitter) = (p.base_life, p.life_jitter);

        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            let speed = random_range(rng, 1.0, 4.0);
            let id = self.next_id();
            self.explosions.push(ExplosionParticle {
                id,
                x,
                y,
                vx: angle.cos() * speed * scale,
                vy: angle.sin() * speed * scale,
                color,
                size: 2.0 + random_range(rng, 0.0, 3.0) * scale,
                life: base_life + random_int(rng, 0, jitter),
            });
        }
    }

    /// Special-weapon screen clear: explode every formation enemy and wipe
    /// enemy bullets and dive bombers.  Returns the number of enemies removed.
    pub fn clear_all_enemies(&mut self, rng: &mut impl Rng) -> usize {
        let centers: Vec<(f32, f32)> = self.enemies.iter().map(|e| e.rect.center()).collect();
        for (x, y) in &centers {
            self.spawn_explosion(*x, *y, EXPLOSION_LARGE, ParticleColor::Cyan, rng);
        }
        self.enemies.clear();
        self.enemy_bullets.clear();
        self.dive_bombers.clear();
        centers.len()
    }

    // ── Per-tick movement ────────────────────────────────────────────────────

    /// Move bullets, power-ups, dive bombers and particles by one tick and
    /// prune whatever left the viewport or burned out.
    pub fn advance(&mut self) {
        let height = self.config.game.height;

        for bullet in &mut self.player_bullets {
            bullet.rect.y -= bullet.speed;
        }
        self.player_bullets.retain(|b| b.rect.bottom() > 0.0);

        for bullet in &mut self.enemy_bullets {
            bullet.rect.y += bullet.speed;
        }
        self.enemy_bullets.retain(|b| b.rect.y < height);

        for power_up in &mut self.power_ups {
            power_up.rect.y += power_up.speed;
        }
        self.power_ups.retain(|p| p.rect.y < height);

        let damping = self.config.enemies.dive_vertical_damping;
        for bomber in &mut self.dive_bombers {
            let (dx, dy) = direction(bomber.rect.x, bomber.rect.y, bomber.target_x, height);
            bomber.rect.x += dx * bomber.speed;
            bomber.rect.y += dy * bomber.speed * damping;
        }
        self.dive_bombers.retain(|b| b.rect.y < height);

        let decay = self.config.particles.decay;
        for particle in &mut self.explosions {
            particle.x += particle.vx;
            particle.y += particle.vy;
            particle.life = particle.life.saturating_sub(1);
            particle.size *= decay;
        }
        self.explosions.retain(|p| p.life > 0);
    }

    /// One lockstep formation move at `speed` pixels.
    ///
    /// The edge test uses the bounds before moving: if the next shift would
    /// reach the edge, the formation reverses and drops by one row step
    /// instead of moving sideways.
    pub fn move_formation(&mut self, speed: f32) -> FormationStep {
        if self.enemies.is_empty() {
            return FormationStep::Empty;
        }

        let width = self.config.game.width;
        let leftmost = self
            .enemies
            .iter()
            .map(|e| e.rect.x)
            .fold(f32::INFINITY, f32::min);
        let rightmost = self
            .enemies
            .iter()
            .map(|e| e.rect.right())
            .fold(f32::NEG_INFINITY, f32::max);

        let hits_edge = match self.direction {
            FormationDirection::Right => rightmost + speed >= width,
            FormationDirection::Left => leftmost - speed <= 0.0,
        };

        if hits_edge {
            self.direction = self.direction.reversed();
            let step = self.config.enemies.row_step;
            for enemy in &mut self.enemies {
                enemy.rect.y += step;
            }
            FormationStep::SteppedDown
        } else {
            let dx = speed * self.direction.sign();
            for enemy in &mut self.enemies {
                enemy.rect.x += dx;
            }
            FormationStep::Shifted
        }
    }
}

pub fn player_start(config: &GameConfig) -> Rect {
    let p = &config.player;
    Rect::new(
        config.game.width / 2.0 - p.width / 2.0,
        config.game.height - p.height - p.bottom_margin,
        p.width,
        p.height,
    )
}

pub fn explosion_particle_count(scale: f32, config: &GameConfig) -> usize {
    let p = &config.particles;
    if scale < 1.0 {
        p.count_small
    } else if scale < 1.5 {
        p.count_medium
    } else {
        p.count_large
    }
}
