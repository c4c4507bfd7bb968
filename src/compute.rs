/// The fixed-tick game loop.
///
/// `Game` owns the entity store, the game state and the spawn timers.  Each
/// call to `tick` runs one synchronous pass:
///
///   control intents → timers → player → entity advance → spawn rolls →
///   collisions → loss / level checks → high-score persistence
///
/// All randomness comes through the injected RNG and all time through the
/// `now_ms` argument, so tests drive it deterministically with a seeded
/// `StdRng` and hand-picked timestamps.

use log::{debug, info};
use rand::Rng;

use crate::collision::{enemies_reached_player, resolve_collisions};
use crate::config::GameConfig;
use crate::difficulty::{difficulty_for, AdaptiveDifficulty, Difficulty};
use crate::entities::{EntityId, GameState, GameStatus, Rect};
use crate::error::Result;
use crate::input::{FireGate, InputIntents};
use crate::math::{random_bool, random_pick};
use crate::persistence::{load_or_zero, save_logged, HighScoreStore};
use crate::state::{dispatch, dispatch_all, GameAction};
use crate::store::EntityStore;

/// Read-only copy of everything the renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub state: GameState,
    pub entities: EntityStore,
    pub skill_rating: i32,
    pub difficulty_multiplier: f64,
}

pub struct Game<S: HighScoreStore> {
    pub config: GameConfig,
    pub state: GameState,
    pub store: EntityStore,
    adaptive: AdaptiveDifficulty,
    fire_gate: FireGate,
    previous_input: InputIntents,
    last_enemy_shot_ms: u64,
    /// Ticks run while playing in the current level; gates formation moves.
    level_ticks: u64,
    /// Simulation clock used by `step`; frozen while not playing.
    clock_ms: u64,
    persisted_high_score: u32,
    scores: S,
}

impl<S: HighScoreStore> Game<S> {
    /// Validate the configuration and load the persisted high score.
    pub fn new(config: GameConfig, scores: S) -> Result<Self> {
        config.validate()?;
        let high_score = load_or_zero(&scores);
        let state = dispatch(
            &GameState::new(config.game.initial_lives),
            GameAction::LoadHighScore(high_score),
            &config,
        );
        let mut store = EntityStore::new(&config);
        store.init_enemies(&difficulty_for(state.level, &config));

        Ok(Game {
            adaptive: AdaptiveDifficulty::new(&config.adaptive),
            fire_gate: FireGate::new(&config),
            store,
            state,
            previous_input: InputIntents::default(),
            last_enemy_shot_ms: 0,
            level_ticks: 0,
            clock_ms: 0,
            persisted_high_score: high_score,
            scores,
            config,
        })
    }

    pub fn high_scores(&self) -> &S {
        &self.scores
    }

    /// Simulation time reached by `step`.
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn adaptive(&self) -> &AdaptiveDifficulty {
        &self.adaptive
    }

    /// Difficulty for the current level with the adaptive multiplier applied.
    pub fn difficulty(&self) -> Difficulty {
        difficulty_for(self.state.level, &self.config)
            .scaled(self.adaptive.multiplier(), &self.config)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            entities: self.store.clone(),
            skill_rating: self.adaptive.skill_rating(),
            difficulty_multiplier: self.adaptive.multiplier(),
        }
    }

    fn apply(&mut self, action: GameAction) {
        self.state = dispatch(&self.state, action, &self.config);
    }

    /// Begin a fresh run: reset state (keeping the high score) and entities.
    pub fn start_game(&mut self, now_ms: u64) {
        self.apply(GameAction::StartGame);
        let difficulty = self.difficulty();
        self.store.reset_all(&difficulty);
        self.fire_gate.reset();
        self.last_enemy_shot_ms = now_ms;
        self.level_ticks = 0;
    }

    /// Run one tick at the internal simulation clock.  The clock only moves
    /// on playing ticks, so time spent paused or idle is discarded.
    pub fn step(&mut self, input: InputIntents, rng: &mut impl Rng) {
        let now = self.clock_ms;
        let was_playing = self.state.status == GameStatus::Playing;
        self.tick(input, now, rng);
        if was_playing || self.state.status == GameStatus::Playing {
            self.clock_ms += self.config.game.tick_ms;
        }
    }

    /// Advance the simulation by one tick at simulation time `now_ms`.
    pub fn tick(&mut self, input: InputIntents, now_ms: u64, rng: &mut impl Rng) {
        let prev = self.previous_input;
        self.previous_input = input;
        let start = input.start && !prev.start;
        let pause = input.pause && !prev.pause;
        let exit = input.exit && !prev.exit;

        match self.state.status {
            GameStatus::Idle | GameStatus::GameOver => {
                if start {
                    self.start_game(now_ms);
                }
                return;
            }
            GameStatus::Paused => {
                if exit {
                    self.apply(GameAction::ExitGame);
                } else if pause {
                    self.apply(GameAction::ResumeGame);
                }
                return;
            }
            GameStatus::Playing => {
                if exit {
                    self.apply(GameAction::ExitGame);
                    return;
                }
                if pause {
                    self.apply(GameAction::PauseGame);
                    return;
                }
            }
        }

        self.level_ticks += 1;
        let difficulty = self.difficulty();

        // ── 1. Timers ────────────────────────────────────────────────────────
        self.apply(GameAction::UpdateInvulnerabilityTimer);
        if self.state.special_weapon {
            self.apply(GameAction::UpdateSpecialWeaponTimer);
        }

        // ── 2. Player ────────────────────────────────────────────────────────
        self.store.move_player(input.move_left, input.move_right);
        if input.fire && self.fire_gate.try_fire(now_ms, self.state.special_weapon) {
            self.store.spawn_player_bullet(self.state.special_weapon);
        }
        if input.special_weapon && self.state.special_weapon {
            let cleared = self.store.clear_all_enemies(rng);
            debug!("special weapon cleared {} enemies", cleared);
            self.apply(GameAction::ResetSpecialWeapon);
        }

        // ── 3. Movement ──────────────────────────────────────────────────────
        self.store.advance();
        if self.level_ticks % self.config.enemies.formation_move_every == 0 {
            self.store.move_formation(difficulty.enemy_speed);
        }

        // ── 4. Spawn rolls ───────────────────────────────────────────────────
        self.roll_enemy_fire(&difficulty, now_ms, rng);
        self.roll_dive_bombers(&difficulty, rng);
        if random_bool(rng, difficulty.power_up_chance) {
            self.store.spawn_power_up(rng);
        }

        // ── 5. Collisions ────────────────────────────────────────────────────
        let actions = resolve_collisions(&mut self.store, &self.state, &self.config, rng);
        self.state = dispatch_all(&self.state, actions, &self.config);

        // ── 6. Loss and level completion ─────────────────────────────────────
        if self.state.status == GameStatus::Playing && enemies_reached_player(&self.store) {
            info!("enemies reached the player");
            self.apply(GameAction::GameOver);
        }
        if self.state.status == GameStatus::Playing
            && self.store.enemies.is_empty()
            && self.store.dive_bombers.is_empty()
        {
            self.advance_level();
        }

        self.persist_high_score();
    }

    fn roll_enemy_fire(&mut self, difficulty: &Difficulty, now_ms: u64, rng: &mut impl Rng) {
        if now_ms.saturating_sub(self.last_enemy_shot_ms) <= difficulty.enemy_fire_interval_ms {
            return;
        }
        let shooters: Vec<Rect> = self
            .store
            .enemies
            .iter()
            .filter(|e| e.rect.y > 0.0)
            .map(|e| e.rect)
            .collect();
        if let Some(from) = random_pick(rng, &shooters) {
            self.store.spawn_enemy_bullet(from, self.state.level);
            self.last_enemy_shot_ms = now_ms;
        }
    }

    fn roll_dive_bombers(&mut self, difficulty: &Difficulty, rng: &mut impl Rng) {
        if difficulty.dive_bomber_chance <= 0.0 {
            return;
        }
        let top_third = self.config.game.height / 3.0;
        let mut divers: Vec<EntityId> = self
            .store
            .enemies
            .iter()
            .filter(|e| e.rect.y < top_third)
            .map(|e| e.id)
            .collect();
        divers.retain(|_| random_bool(rng, difficulty.dive_bomber_chance));
        for id in divers {
            self.store.spawn_dive_bomber(id, self.state.level);
        }
    }

    fn advance_level(&mut self) {
        self.apply(GameAction::NextLevel);
        self.adaptive
            .on_level_complete(self.state.score, self.state.deaths, self.state.level);
        let difficulty = self.difficulty();
        info!(
            "level {} reached: {}x{} enemies, speed {:.2}, health {}",
            self.state.level,
            difficulty.enemy_rows,
            difficulty.enemy_cols,
            difficulty.enemy_speed,
            difficulty.enemy_health
        );
        self.store.reset_all(&difficulty);
        self.level_ticks = 0;
    }

    fn persist_high_score(&mut self) {
        if self.state.high_score > self.persisted_high_score {
            save_logged(&self.scores, self.state.high_score);
            self.persisted_high_score = self.state.high_score;
        }
    }
}
