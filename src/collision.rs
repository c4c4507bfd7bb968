/// Collision engine: AABB overlap and the ordered per-tick resolution pass.
///
/// Removals are recorded in per-collection marker vectors while scanning and
/// applied once at the end, so every step sees the same indices as the
/// pre-tick collections.  Score and life changes come back as `GameAction`s
/// for the caller to dispatch.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bounds, GameState, ParticleColor, PowerUpKind};
use crate::state::GameAction;
use crate::store::{EntityStore, EXPLOSION_LARGE, EXPLOSION_MEDIUM, EXPLOSION_PLAYER, EXPLOSION_SMALL};

pub fn overlaps(a: &impl Bounds, b: &impl Bounds) -> bool {
    let a = a.bounds();
    let b = b.bounds();
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Points for destroying a formation enemy at `level`.
pub fn enemy_points(level: u32, config: &GameConfig) -> u32 {
    let e = &config.enemies;
    if level > e.bonus_after_level {
        e.base_points * e.bonus_multiplier
    } else {
        e.base_points
    }
}

struct PendingExplosion {
    x: f32,
    y: f32,
    scale: f32,
    color: ParticleColor,
}

/// Run the five collision checks in order and commit the removals.
///
/// 1. player bullets ↔ enemies (at most one enemy per bullet)
/// 2. surviving player bullets ↔ dive bombers
/// 3. player ↔ enemy bullets (skipped while invulnerable, one hit max)
/// 4. player ↔ dive bombers (same gate, one hit max)
/// 5. player ↔ power-ups (ungated, any number)
pub fn resolve_collisions(
    store: &mut EntityStore,
    state: &GameState,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Vec<GameAction> {
    let mut actions = Vec::new();
    let mut explosions: Vec<PendingExplosion> = Vec::new();

    let mut bullet_gone = vec![false; store.player_bullets.len()];
    let mut enemy_gone = vec![false; store.enemies.len()];
    let mut bomber_gone = vec![false; store.dive_bombers.len()];
    let mut enemy_bullet_gone = vec![false; store.enemy_bullets.len()];
    let mut power_up_gone = vec![false; store.power_ups.len()];

    // ── 1. Player bullets ↔ enemies ──────────────────────────────────────────
    let penetration = config.bullets.special_penetration;
    for (bi, bullet) in store.player_bullets.iter().enumerate() {
        for (ei, enemy) in store.enemies.iter_mut().enumerate() {
            if enemy_gone[ei] || !overlaps(bullet, &*enemy) {
                continue;
            }
            explosions.push(PendingExplosion {
                x: bullet.rect.x,
                y: bullet.rect.y,
                scale: EXPLOSION_SMALL,
                color: ParticleColor::Orange,
            });

            if enemy.health > 1 && !bullet.special {
                enemy.health -= 1;
            } else {
                enemy_gone[ei] = true;
                let (x, y) = enemy.rect.center();
                explosions.push(PendingExplosion {
                    x,
                    y,
                    scale: EXPLOSION_LARGE,
                    color: ParticleColor::Orange,
                });
                actions.push(GameAction::AddScore(enemy_points(state.level, config)));
            }

            if !bullet.special || rng.gen::<f64>() > penetration {
                bullet_gone[bi] = true;
            }
            break;
        }
    }

    // ── 2. Player bullets ↔ dive bombers ─────────────────────────────────────
    for (bi, bullet) in store.player_bullets.iter().enumerate() {
        if bullet_gone[bi] {
            continue;
        }
        for (di, bomber) in store.dive_bombers.iter().enumerate() {
            if bomber_gone[di] || !overlaps(bullet, bomber) {
                continue;
            }
            bomber_gone[di] = true;
            bullet_gone[bi] = true;
            let (x, y) = bomber.rect.center();
            explosions.push(PendingExplosion {
                x,
                y,
                scale: EXPLOSION_LARGE,
                color: ParticleColor::Yellow,
            });
            actions.push(GameAction::AddScore(config.enemies.dive_bomber_points));
            break;
        }
    }

    // ── 3 & 4. Player ↔ enemy bullets, then ↔ dive bombers ──────────────────
    let player = store.player.clone();
    let (px, py) = player.rect.center();
    let mut invulnerable = state.is_invulnerable;

    if !invulnerable {
        if let Some(i) = store.enemy_bullets.iter().position(|b| overlaps(&player, b)) {
            enemy_bullet_gone[i] = true;
            explosions.push(PendingExplosion {
                x: px,
                y: py,
                scale: EXPLOSION_PLAYER,
                color: ParticleColor::Magenta,
            });
            actions.push(GameAction::LoseLife);
            invulnerable = true;
        }
    }

    if !invulnerable {
        let hit = store
            .dive_bombers
            .iter()
            .enumerate()
            .find(|(i, b)| !bomber_gone[*i] && overlaps(&player, *b))
            .map(|(i, _)| i);
        if let Some(i) = hit {
            bomber_gone[i] = true;
            explosions.push(PendingExplosion {
                x: px,
                y: py,
                scale: EXPLOSION_PLAYER,
                color: ParticleColor::Magenta,
            });
            actions.push(GameAction::LoseLife);
        }
    }

    // ── 5. Player ↔ power-ups ────────────────────────────────────────────────
    for (i, power_up) in store.power_ups.iter().enumerate() {
        if !overlaps(&player, power_up) {
            continue;
        }
        power_up_gone[i] = true;
        let (x, y) = power_up.rect.center();
        explosions.push(PendingExplosion {
            x,
            y,
            scale: EXPLOSION_MEDIUM,
            color: ParticleColor::Green,
        });
        actions.push(match power_up.kind {
            PowerUpKind::Life => GameAction::GainLife,
            PowerUpKind::Special => GameAction::SetSpecialWeapon(true),
        });
    }

    // ── Commit ───────────────────────────────────────────────────────────────
    retain_unmarked(&mut store.player_bullets, &bullet_gone);
    retain_unmarked(&mut store.enemies, &enemy_gone);
    retain_unmarked(&mut store.dive_bombers, &bomber_gone);
    retain_unmarked(&mut store.enemy_bullets, &enemy_bullet_gone);
    retain_unmarked(&mut store.power_ups, &power_up_gone);

    for e in explosions {
        store.spawn_explosion(e.x, e.y, e.scale, e.color, rng);
    }

    actions
}

/// `true` once any formation enemy's bottom edge reaches the player's top.
pub fn enemies_reached_player(store: &EntityStore) -> bool {
    let player_y = store.player.rect.y;
    store.enemies.iter().any(|e| e.rect.bottom() >= player_y)
}

fn retain_unmarked<T>(items: &mut Vec<T>, removed: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !removed[index];
        index += 1;
        keep
    });
}
