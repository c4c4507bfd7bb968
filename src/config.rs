/// Every tunable of the simulation, in one place.
///
/// Defaults reproduce the arcade feel of the reference game; a JSON file can
/// override any subset of fields (missing ones keep their default).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    /// Milliseconds between simulation ticks.
    pub tick_ms: u64,
    pub initial_lives: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            width: 600.0,
            height: 800.0,
            tick_ms: 16,
            initial_lives: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Gap between the player's bottom edge and the viewport bottom.
    pub bottom_margin: f32,
    pub shoot_interval_ms: u64,
    pub special_shoot_interval_ms: u64,
    pub invulnerability_ms: u64,
    pub special_weapon_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            width: 40.0,
            height: 40.0,
            speed: 8.0,
            bottom_margin: 20.0,
            shoot_interval_ms: 300,
            special_shoot_interval_ms: 150,
            invulnerability_ms: 2000,
            special_weapon_ms: 10_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub special_speed: f32,
    /// Chance that a special bullet survives an enemy hit.
    pub special_penetration: f64,
    /// Horizontal offset of the two side bullets in a special spread.
    pub special_spread: f32,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_base_speed: f32,
    pub enemy_speed_per_level: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        BulletConfig {
            player_width: 4.0,
            player_height: 15.0,
            player_speed: 10.0,
            special_speed: 12.0,
            special_penetration: 0.7,
            special_spread: 15.0,
            enemy_width: 4.0,
            enemy_height: 10.0,
            enemy_base_speed: 5.0,
            enemy_speed_per_level: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f32,
    pub height: f32,
    pub gap: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub base_points: u32,
    /// Levels above this one award `bonus_multiplier` times the base points.
    pub bonus_after_level: u32,
    pub bonus_multiplier: u32,
    /// Formation moves once every this many ticks.
    pub formation_move_every: u64,
    pub row_step: f32,
    pub dive_bomber_speed: f32,
    pub dive_bomber_speed_per_level: f32,
    pub dive_bomber_points: u32,
    /// Vertical component damping for dive bombers.
    pub dive_vertical_damping: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        EnemyConfig {
            width: 40.0,
            height: 40.0,
            gap: 20.0,
            margin_x: 60.0,
            margin_y: 60.0,
            base_points: 100,
            bonus_after_level: 10,
            bonus_multiplier: 2,
            formation_move_every: 2,
            row_step: 20.0,
            dive_bomber_speed: 5.0,
            dive_bomber_speed_per_level: 0.5,
            dive_bomber_points: 300,
            dive_vertical_damping: 0.7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Share of spawned power-ups that grant a life; the rest are special.
    pub life_probability: f64,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        PowerUpConfig {
            width: 30.0,
            height: 30.0,
            speed: 2.0,
            life_probability: 0.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count_small: usize,
    pub count_medium: usize,
    pub count_large: usize,
    pub base_life: u32,
    pub life_jitter: u32,
    pub decay: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        ParticleConfig {
            count_small: 8,
            count_medium: 15,
            count_large: 25,
            base_life: 40,
            life_jitter: 20,
            decay: 0.95,
        }
    }
}

/// Base values, per-level rates and caps for the difficulty curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub base_rows: u32,
    pub row_cap: u32,
    pub base_cols: u32,
    pub col_cap: u32,
    pub base_speed: f32,
    pub speed_per_level: f32,
    pub speed_cap: f32,
    pub health_every_levels: u32,
    pub base_fire_interval_ms: u64,
    pub fire_interval_per_level_ms: u64,
    pub fire_interval_floor_ms: u64,
    pub dive_chance_per_level: f64,
    pub dive_chance_cap: f64,
    pub dive_min_level: u32,
    pub power_up_chance_per_level: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        DifficultyConfig {
            base_rows: 4,
            row_cap: 7,
            base_cols: 8,
            col_cap: 10,
            base_speed: 2.0,
            speed_per_level: 0.3,
            speed_cap: 7.0,
            health_every_levels: 5,
            base_fire_interval_ms: 200,
            fire_interval_per_level_ms: 10,
            fire_interval_floor_ms: 50,
            dive_chance_per_level: 0.001,
            dive_chance_cap: 0.02,
            dive_min_level: 3,
            power_up_chance_per_level: 0.0005,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    pub enabled: bool,
    pub initial_rating: i32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        AdaptiveConfig {
            enabled: true,
            initial_rating: 50,
        }
    }
}

// ── Root ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game: ViewportConfig,
    pub player: PlayerConfig,
    pub bullets: BulletConfig,
    pub enemies: EnemyConfig,
    pub power_ups: PowerUpConfig,
    pub particles: ParticleConfig,
    pub difficulty: DifficultyConfig,
    pub adaptive: AdaptiveConfig,
}

impl GameConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Number of whole ticks covering `ms` milliseconds (at least one).
    pub fn ticks_for(&self, ms: u64) -> u64 {
        (ms / self.game.tick_ms.max(1)).max(1)
    }

    pub fn invulnerability_ticks(&self) -> u64 {
        self.ticks_for(self.player.invulnerability_ms)
    }

    pub fn special_weapon_ticks(&self) -> u64 {
        self.ticks_for(self.player.special_weapon_ms)
    }

    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.game.tick_ms == 0 {
            return Err(invalid("game.tick_ms must be positive"));
        }
        if self.game.initial_lives == 0 {
            return Err(invalid("game.initial_lives must be positive"));
        }
        if self.enemies.formation_move_every == 0 {
            return Err(invalid("enemies.formation_move_every must be positive"));
        }

        let sizes = [
            ("game.width", self.game.width),
            ("game.height", self.game.height),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("player.speed", self.player.speed),
            ("bullets.player_width", self.bullets.player_width),
            ("bullets.player_height", self.bullets.player_height),
            ("bullets.player_speed", self.bullets.player_speed),
            ("bullets.special_speed", self.bullets.special_speed),
            ("bullets.enemy_width", self.bullets.enemy_width),
            ("bullets.enemy_height", self.bullets.enemy_height),
            ("bullets.enemy_base_speed", self.bullets.enemy_base_speed),
            ("enemies.width", self.enemies.width),
            ("enemies.height", self.enemies.height),
            ("enemies.dive_bomber_speed", self.enemies.dive_bomber_speed),
            ("power_ups.width", self.power_ups.width),
            ("power_ups.height", self.power_ups.height),
            ("power_ups.speed", self.power_ups.speed),
            ("difficulty.base_speed", self.difficulty.base_speed),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(&format!("{name} must be positive, got {value}")));
            }
        }

        let probabilities = [
            ("bullets.special_penetration", self.bullets.special_penetration),
            ("power_ups.life_probability", self.power_ups.life_probability),
            ("difficulty.dive_chance_cap", self.difficulty.dive_chance_cap),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(&format!("{name} must lie in [0, 1], got {value}")));
            }
        }

        let d = &self.difficulty;
        if d.base_rows == 0 || d.base_cols == 0 {
            return Err(invalid("difficulty.base_rows and base_cols must be positive"));
        }
        if d.row_cap < d.base_rows || d.col_cap < d.base_cols {
            return Err(invalid("difficulty row/col caps must not be below their base"));
        }
        if d.speed_cap < d.base_speed {
            return Err(invalid("difficulty.speed_cap must not be below base_speed"));
        }
        if d.fire_interval_floor_ms == 0 || d.fire_interval_floor_ms > d.base_fire_interval_ms {
            return Err(invalid(
                "difficulty.fire_interval_floor_ms must be in 1..=base_fire_interval_ms",
            ));
        }
        if d.health_every_levels == 0 {
            return Err(invalid("difficulty.health_every_levels must be positive"));
        }
        if !(0..=100).contains(&self.adaptive.initial_rating) {
            return Err(invalid("adaptive.initial_rating must lie in [0, 100]"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> GameError {
    GameError::InvalidConfig(msg.to_string())
}
