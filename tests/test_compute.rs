use rand::rngs::StdRng;
use rand::SeedableRng;

use galaga_shooter::compute::Game;
use galaga_shooter::config::GameConfig;
use galaga_shooter::entities::*;
use galaga_shooter::error::GameError;
use galaga_shooter::input::InputIntents;
use galaga_shooter::persistence::{HighScoreStore, MemoryHighScoreStore};
use galaga_shooter::state::{dispatch, GameAction};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn new_game() -> Game<MemoryHighScoreStore> {
    match Game::new(GameConfig::default(), MemoryHighScoreStore::new(0)) {
        Ok(game) => game,
        Err(err) => panic!("default config rejected: {err}"),
    }
}

fn idle() -> InputIntents {
    InputIntents::default()
}

fn start() -> InputIntents {
    InputIntents {
        start: true,
        ..Default::default()
    }
}

fn fire() -> InputIntents {
    InputIntents {
        fire: true,
        ..Default::default()
    }
}

fn pause() -> InputIntents {
    InputIntents {
        pause: true,
        ..Default::default()
    }
}

fn exit() -> InputIntents {
    InputIntents {
        exit: true,
        ..Default::default()
    }
}

fn started(rng: &mut StdRng) -> Game<MemoryHighScoreStore> {
    let mut g = new_game();
    g.tick(start(), 0, rng);
    assert_eq!(g.state.status, GameStatus::Playing);
    g
}

fn activate_special(g: &mut Game<MemoryHighScoreStore>) {
    g.state = dispatch(&g.state, GameAction::SetSpecialWeapon(true), &g.config);
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_game_is_idle_with_loaded_high_score() {
    let g = Game::new(GameConfig::default(), MemoryHighScoreStore::new(1234));
    let Ok(g) = g else {
        panic!("default config rejected");
    };
    assert_eq!(g.state.status, GameStatus::Idle);
    assert_eq!(g.state.high_score, 1234);
    assert_eq!(g.store.enemies.len(), 32);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = GameConfig::default();
    config.game.tick_ms = 0;
    let result = Game::new(config, MemoryHighScoreStore::new(0));
    assert!(matches!(result, Err(GameError::InvalidConfig(_))));
}

// ── Control intents ───────────────────────────────────────────────────────────

#[test]
fn idle_game_ignores_everything_but_start() {
    let mut rng = seeded_rng();
    let mut g = new_game();
    let before = g.store.enemies.clone();
    for _ in 0..10 {
        g.tick(fire(), 1000, &mut rng);
    }
    assert_eq!(g.state.status, GameStatus::Idle);
    assert!(g.store.player_bullets.is_empty());
    assert_eq!(g.store.enemies, before);
}

#[test]
fn held_start_key_does_not_restart() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    g.state.status = GameStatus::GameOver;

    g.tick(start(), 16, &mut rng);
    assert_eq!(g.state.status, GameStatus::GameOver);

    g.tick(idle(), 32, &mut rng);
    g.tick(start(), 48, &mut rng);
    assert_eq!(g.state.status, GameStatus::Playing);
    assert_eq!(g.state.score, 0);
    assert_eq!(g.state.level, 1);
}

#[test]
fn pause_freezes_the_world() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    g.tick(pause(), 16, &mut rng);
    assert_eq!(g.state.status, GameStatus::Paused);

    let enemies = g.store.enemies.clone();
    let player = g.store.player.clone();
    for i in 0..20 {
        let input = if i < 10 { pause() } else { fire() };
        g.tick(input, 32 + i * 16, &mut rng);
    }
    assert_eq!(g.state.status, GameStatus::Paused);
    assert_eq!(g.store.enemies, enemies);
    assert_eq!(g.store.player, player);
    assert!(g.store.player_bullets.is_empty());

    g.tick(pause(), 400, &mut rng);
    assert_eq!(g.state.status, GameStatus::Playing);
}

#[test]
fn exit_returns_to_idle() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    g.tick(exit(), 16, &mut rng);
    assert_eq!(g.state.status, GameStatus::Idle);

    let mut g = started(&mut rng);
    g.tick(pause(), 16, &mut rng);
    g.tick(exit(), 32, &mut rng);
    assert_eq!(g.state.status, GameStatus::Idle);
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn movement_intents_move_player() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    let left = InputIntents {
        move_left: true,
        ..Default::default()
    };
    g.tick(left, 16, &mut rng);
    assert_eq!(g.store.player.rect.x, 272.0);
}

#[test]
fn normal_fire_is_rate_limited() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);

    g.tick(fire(), 0, &mut rng);
    assert_eq!(g.store.player_bullets.len(), 1);
    g.tick(fire(), 300, &mut rng);
    assert_eq!(g.store.player_bullets.len(), 1);
    g.tick(fire(), 301, &mut rng);
    assert_eq!(g.store.player_bullets.len(), 2);
}

#[test]
fn special_fire_spreads_and_fires_faster() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    activate_special(&mut g);

    g.tick(fire(), 0, &mut rng);
    assert_eq!(g.store.player_bullets.len(), 3);
    g.tick(fire(), 140, &mut rng);
    assert_eq!(g.store.player_bullets.len(), 3);
    g.tick(fire(), 151, &mut rng);
    assert_eq!(g.store.player_bullets.len(), 6);
}

#[test]
fn special_weapon_clears_the_screen_and_advances_level() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    activate_special(&mut g);
    let special = InputIntents {
        special_weapon: true,
        ..Default::default()
    };

    g.tick(special, 16, &mut rng);

    assert!(!g.state.special_weapon);
    assert_eq!(g.state.level, 2);
    assert_eq!(g.store.enemies.len(), 32);
}

#[test]
fn special_intent_without_weapon_does_nothing() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    let special = InputIntents {
        special_weapon: true,
        ..Default::default()
    };
    g.tick(special, 16, &mut rng);
    assert_eq!(g.state.level, 1);
    assert_eq!(g.store.enemies.len(), 32);
}

// ── Progression ───────────────────────────────────────────────────────────────

#[test]
fn clearing_the_formation_starts_next_level() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    g.store.enemies.clear();

    g.tick(idle(), 16, &mut rng);

    assert_eq!(g.state.level, 2);
    assert_eq!(g.store.enemies.len(), 32);
    assert_eq!(g.adaptive().history().len(), 1);
    assert_eq!(g.adaptive().history()[0].level, 2);
}

#[test]
fn dive_bombers_appear_from_level_three() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    g.state.level = 20;
    let difficulty = g.difficulty();
    g.store.reset_all(&difficulty);
    let total = g.store.enemies.len();

    let mut found = false;
    for i in 1..200 {
        g.tick(idle(), i * 16, &mut rng);
        if !g.store.dive_bombers.is_empty() {
            found = true;
            break;
        }
    }
    assert!(found, "no dive bomber detached in 200 ticks");
    assert!(g.store.enemies.len() + g.store.dive_bombers.len() <= total);
    for bomber in &g.store.dive_bombers {
        assert!(g.store.enemies.iter().all(|e| e.id != bomber.id));
    }
}

// ── Spawn rolls ───────────────────────────────────────────────────────────────

#[test]
fn enemy_fire_respects_interval() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    assert_eq!(g.difficulty().enemy_fire_interval_ms, 190);

    g.tick(idle(), 190, &mut rng);
    assert_eq!(g.store.enemy_bullets.len(), 0);
    g.tick(idle(), 191, &mut rng);
    assert_eq!(g.store.enemy_bullets.len(), 1);

    g.tick(idle(), 381, &mut rng);
    assert_eq!(g.store.enemy_bullets.len(), 1);
    g.tick(idle(), 382, &mut rng);
    assert_eq!(g.store.enemy_bullets.len(), 2);
}

#[test]
fn enemies_above_viewport_do_not_fire() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    for enemy in &mut g.store.enemies {
        enemy.rect.y = -10.0;
    }

    g.tick(idle(), 500, &mut rng);
    assert!(g.store.enemy_bullets.is_empty());
    assert_eq!(g.state.status, GameStatus::Playing);

    // No shot was taken, so the interval has not restarted
    for enemy in &mut g.store.enemies {
        enemy.rect.y = 60.0;
    }
    g.tick(idle(), 516, &mut rng);
    assert_eq!(g.store.enemy_bullets.len(), 1);
}

#[test]
fn power_up_rolls_every_tick_at_full_chance() {
    let mut rng = seeded_rng();
    let mut config = GameConfig::default();
    config.difficulty.power_up_chance_per_level = 1.0;
    let mut g = match Game::new(config, MemoryHighScoreStore::new(0)) {
        Ok(g) => g,
        Err(err) => panic!("{err}"),
    };
    g.tick(start(), 0, &mut rng);

    g.tick(idle(), 16, &mut rng);
    assert_eq!(g.store.power_ups.len(), 1);
    assert_eq!(g.store.power_ups[0].rect.y, -30.0);
    g.tick(idle(), 32, &mut rng);
    assert_eq!(g.store.power_ups.len(), 2);
}

// ── Loss ──────────────────────────────────────────────────────────────────────

#[test]
fn enemies_reaching_player_end_the_game() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    g.state.score = 5000;
    g.store.enemies[0].rect.y = 720.0;

    g.tick(idle(), 16, &mut rng);

    assert_eq!(g.state.status, GameStatus::GameOver);
    assert_eq!(g.state.high_score, 5000);
    assert_eq!(g.high_scores().save_count(), 1);
    assert_eq!(g.high_scores().load().ok(), Some(5000));
}

#[test]
fn lower_score_does_not_overwrite_best() {
    let mut rng = seeded_rng();
    let mut g = match Game::new(GameConfig::default(), MemoryHighScoreStore::new(9000)) {
        Ok(g) => g,
        Err(err) => panic!("{err}"),
    };
    g.tick(start(), 0, &mut rng);
    g.state.score = 5000;
    g.store.enemies[0].rect.y = 720.0;

    g.tick(idle(), 16, &mut rng);

    assert_eq!(g.state.status, GameStatus::GameOver);
    assert_eq!(g.state.high_score, 9000);
    assert_eq!(g.high_scores().save_count(), 0);
}

#[test]
fn last_life_lost_ends_game_in_same_tick() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    g.state.lives = 1;
    g.store.enemy_bullets.push(EnemyBullet {
        id: 9999,
        rect: Rect::new(295.0, 745.0, 4.0, 10.0),
        speed: 5.5,
    });

    g.tick(idle(), 16, &mut rng);

    assert_eq!(g.state.lives, 0);
    assert_eq!(g.state.status, GameStatus::GameOver);
}

#[test]
fn life_pickup_in_fatal_tick_does_not_revive() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    g.state.lives = 1;
    g.store.enemy_bullets.push(EnemyBullet {
        id: 9999,
        rect: Rect::new(295.0, 745.0, 4.0, 10.0),
        speed: 5.5,
    });
    g.store.power_ups.push(PowerUp {
        id: 9998,
        rect: Rect::new(285.0, 745.0, 30.0, 30.0),
        kind: PowerUpKind::Life,
        speed: 2.0,
    });

    g.tick(idle(), 16, &mut rng);

    assert_eq!(g.state.status, GameStatus::GameOver);
    assert_eq!(g.state.lives, 0);
    assert_eq!(g.state.deaths, 1);
}

// ── Clock & snapshot ──────────────────────────────────────────────────────────

#[test]
fn clock_only_runs_while_playing() {
    let mut rng = seeded_rng();
    let mut g = new_game();
    g.step(idle(), &mut rng);
    assert_eq!(g.clock_ms(), 0);

    g.step(start(), &mut rng);
    assert_eq!(g.clock_ms(), 16);
    g.step(idle(), &mut rng);
    assert_eq!(g.clock_ms(), 32);

    g.step(pause(), &mut rng);
    assert_eq!(g.state.status, GameStatus::Paused);
    let paused_at = g.clock_ms();
    for _ in 0..10 {
        g.step(idle(), &mut rng);
    }
    assert_eq!(g.clock_ms(), paused_at);

    g.step(pause(), &mut rng);
    assert_eq!(g.state.status, GameStatus::Playing);
    assert_eq!(g.clock_ms(), paused_at + 16);
}

#[test]
fn snapshot_is_a_detached_copy() {
    let mut rng = seeded_rng();
    let mut g = started(&mut rng);
    let snap = g.snapshot();
    g.store.enemies.clear();
    g.state.score = 700;
    assert_eq!(snap.entities.enemies.len(), 32);
    assert_eq!(snap.state.score, 0);
    assert_eq!(snap.skill_rating, 50);
}

// ── Long-run invariants ───────────────────────────────────────────────────────

#[test]
fn long_run_keeps_invariants() {
    let mut rng = seeded_rng();
    let mut g = new_game();
    let mut prev_status = g.state.status;
    let mut prev_score = 0;

    for i in 0..3000u64 {
        let input = InputIntents {
            fire: true,
            move_left: (i / 50) % 2 == 0,
            move_right: (i / 50) % 2 == 1,
            start: i % 2 == 0,
            ..Default::default()
        };
        g.step(input, &mut rng);

        if prev_status == GameStatus::Playing && g.state.status == GameStatus::Playing {
            assert!(g.state.score >= prev_score, "score decreased at tick {i}");
        }
        if g.state.lives == 0 {
            assert_eq!(g.state.status, GameStatus::GameOver);
        }
        if g.state.status == GameStatus::GameOver {
            assert!(g.state.high_score >= g.state.score);
        }
        for e in &g.store.enemies {
            assert!(e.rect.x >= 0.0 && e.rect.right() <= 600.0);
        }
        let p = &g.store.player.rect;
        assert!(p.x >= 0.0 && p.right() <= 600.0);

        prev_status = g.state.status;
        prev_score = g.state.score;
    }
}
