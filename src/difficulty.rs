/// Difficulty curve and the adaptive skill layer on top of it.
///
/// `difficulty_for` is a pure level → parameters table.  `AdaptiveDifficulty`
/// keeps a skill rating updated once per level transition and produces a
/// multiplier that `Difficulty::scaled` applies; turning the adaptive layer off
/// leaves the base numbers untouched.

use log::debug;

use crate::config::{AdaptiveConfig, GameConfig};

#[derive(Clone, Debug, PartialEq)]
pub struct Difficulty {
    pub enemy_rows: u32,
    pub enemy_cols: u32,
    pub enemy_speed: f32,
    pub enemy_health: u32,
    pub enemy_fire_interval_ms: u64,
    pub dive_bomber_chance: f64,
    pub power_up_chance: f64,
}

pub fn difficulty_for(level: u32, config: &GameConfig) -> Difficulty {
    let d = &config.difficulty;
    let level_f = level as f32;

    Difficulty {
        enemy_rows: (d.base_rows + level / 3).min(d.row_cap),
        enemy_cols: (d.base_cols + level / 4).min(d.col_cap),
        enemy_speed: (d.base_speed + level_f * d.speed_per_level).min(d.speed_cap),
        enemy_health: 1 + level / d.health_every_levels.max(1),
        enemy_fire_interval_ms: d
            .base_fire_interval_ms
            .saturating_sub(level as u64 * d.fire_interval_per_level_ms)
            .max(d.fire_interval_floor_ms),
        dive_bomber_chance: if level >= d.dive_min_level {
            (d.dive_chance_per_level * level as f64).min(d.dive_chance_cap)
        } else {
            0.0
        },
        power_up_chance: (d.power_up_chance_per_level * level as f64).min(1.0),
    }
}

impl Difficulty {
    /// Apply an adaptive multiplier: faster enemies and a shorter fire
    /// interval when `multiplier > 1`.  The speed cap and fire-interval floor
    /// still hold.
    pub fn scaled(&self, multiplier: f64, config: &GameConfig) -> Difficulty {
        if (multiplier - 1.0).abs() < f64::EPSILON {
            return self.clone();
        }
        let interval = (self.enemy_fire_interval_ms as f64 / multiplier).round() as u64;
        Difficulty {
            enemy_speed: (self.enemy_speed * multiplier as f32).min(config.difficulty.speed_cap),
            enemy_fire_interval_ms: interval.max(config.difficulty.fire_interval_floor_ms),
            ..self.clone()
        }
    }
}

// ── Adaptive layer ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct AdaptationRecord {
    pub level: u32,
    pub skill_rating: i32,
    pub multiplier: f64,
}

#[derive(Clone, Debug)]
pub struct AdaptiveDifficulty {
    enabled: bool,
    skill_rating: i32,
    multiplier: f64,
    history: Vec<AdaptationRecord>,
}

impl AdaptiveDifficulty {
    pub fn new(config: &AdaptiveConfig) -> Self {
        AdaptiveDifficulty {
            enabled: config.enabled,
            skill_rating: config.initial_rating.clamp(0, 100),
            multiplier: 1.0,
            history: Vec::new(),
        }
    }

    pub fn skill_rating(&self) -> i32 {
        self.skill_rating
    }

    /// Current multiplier; always 1.0 while the layer is disabled.
    pub fn multiplier(&self) -> f64 {
        if self.enabled {
            self.multiplier
        } else {
            1.0
        }
    }

    pub fn history(&self) -> &[AdaptationRecord] {
        &self.history
    }

    /// Re-rate the player after finishing a level.
    ///
    /// `level` is the level just reached; score and deaths are run totals.
    pub fn on_level_complete(&mut self, score: u32, deaths: u32, level: u32) {
        let levels = level.max(1) as f64;
        let score_per_level = score as f64 / levels;
        let death_ratio = deaths as f64 / levels;

        let delta = if score_per_level > 1000.0 && death_ratio < 1.0 {
            5
        } else if score_per_level < 500.0 && death_ratio > 2.0 {
            -5
        } else if score_per_level > 800.0 {
            2
        } else if score_per_level < 300.0 {
            -2
        } else {
            0
        };

        self.skill_rating = (self.skill_rating + delta).clamp(0, 100);
        self.multiplier = multiplier_for(self.skill_rating);
        self.history.push(AdaptationRecord {
            level,
            skill_rating: self.skill_rating,
            multiplier: self.multiplier,
        });
        debug!(
            "adaptive difficulty: level={} rating={} multiplier={:.3}",
            level, self.skill_rating, self.multiplier
        );
    }
}

/// Ratings above 70 harden the game (up to 1.3×), below 30 soften it
/// (down to 0.8×).
pub fn multiplier_for(rating: i32) -> f64 {
    if rating > 70 {
        1.0 + (rating - 70) as f64 / 100.0
    } else if rating < 30 {
        1.0 - (30 - rating) as f64 / 150.0
    } else {
        1.0
    }
}
