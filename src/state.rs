/// The game state machine.
///
/// `dispatch` is pure: it takes the current `GameState` and an action and
/// returns a brand-new state.  Transitions that make no sense from the current
/// status (pausing while idle, resuming while playing, …) return the state
/// unchanged.

use log::info;

use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameAction {
    StartGame,
    PauseGame,
    ResumeGame,
    GameOver,
    ExitGame,
    AddScore(u32),
    NextLevel,
    LoseLife,
    GainLife,
    SetInvulnerable(bool),
    UpdateInvulnerabilityTimer,
    SetSpecialWeapon(bool),
    UpdateSpecialWeaponTimer,
    ResetSpecialWeapon,
    LoadHighScore(u32),
}

pub fn dispatch(state: &GameState, action: GameAction, config: &GameConfig) -> GameState {
    match action {
        GameAction::StartGame => {
            info!("game started (high score {})", state.high_score);
            GameState {
                status: GameStatus::Playing,
                high_score: state.high_score,
                ..GameState::new(config.game.initial_lives)
            }
        }

        GameAction::PauseGame if state.status == GameStatus::Playing => GameState {
            status: GameStatus::Paused,
            ..state.clone()
        },

        GameAction::ResumeGame if state.status == GameStatus::Paused => GameState {
            status: GameStatus::Playing,
            ..state.clone()
        },

        GameAction::GameOver if is_active(state.status) => game_over(state.clone()),

        GameAction::ExitGame if is_active(state.status) => GameState {
            status: GameStatus::Idle,
            ..state.clone()
        },

        GameAction::AddScore(points) => GameState {
            score: state.score.saturating_add(points),
            ..state.clone()
        },

        GameAction::NextLevel => GameState {
            level: state.level + 1,
            ..state.clone()
        },

        GameAction::LoseLife => {
            let lives = state.lives.saturating_sub(1);
            info!("life lost, {} remaining", lives);
            let next = GameState {
                lives,
                deaths: state.deaths + 1,
                is_invulnerable: true,
                invulnerable_timer: config.invulnerability_ticks(),
                ..state.clone()
            };
            if lives == 0 {
                game_over(next)
            } else {
                next
            }
        }

        GameAction::GainLife => GameState {
            lives: state.lives + 1,
            ..state.clone()
        },

        GameAction::SetInvulnerable(on) => GameState {
            is_invulnerable: on,
            invulnerable_timer: if on { config.invulnerability_ticks() } else { 0 },
            ..state.clone()
        },

        GameAction::UpdateInvulnerabilityTimer if state.is_invulnerable => {
            let remaining = state.invulnerable_timer.saturating_sub(1);
            GameState {
                invulnerable_timer: remaining,
                is_invulnerable: remaining > 0,
                ..state.clone()
            }
        }

        // Activation restarts the countdown.
        GameAction::SetSpecialWeapon(on) => GameState {
            special_weapon: on,
            special_weapon_timer: if on { 0 } else { state.special_weapon_timer },
            ..state.clone()
        },

        GameAction::UpdateSpecialWeaponTimer if state.special_weapon => {
            let timer = state.special_weapon_timer + 1;
            let active = timer < config.special_weapon_ticks();
            if !active {
                info!("special weapon expired");
            }
            GameState {
                special_weapon_timer: timer,
                special_weapon: active,
                ..state.clone()
            }
        }

        GameAction::ResetSpecialWeapon => GameState {
            special_weapon: false,
            special_weapon_timer: 0,
            ..state.clone()
        },

        GameAction::LoadHighScore(score) => GameState {
            high_score: score,
            ..state.clone()
        },

        _ => state.clone(),
    }
}

/// Apply a sequence of actions in order.  Once an action ends the game the
/// rest are dropped, so a game-over state never gains lives or score.
pub fn dispatch_all(
    state: &GameState,
    actions: impl IntoIterator<Item = GameAction>,
    config: &GameConfig,
) -> GameState {
    let mut current = state.clone();
    for action in actions {
        let next = dispatch(&current, action, config);
        let ended = next.status == GameStatus::GameOver && current.status != GameStatus::GameOver;
        current = next;
        if ended {
            break;
        }
    }
    current
}

fn is_active(status: GameStatus) -> bool {
    matches!(status, GameStatus::Playing | GameStatus::Paused)
}

fn game_over(state: GameState) -> GameState {
    info!("game over: score {} level {}", state.score, state.level);
    GameState {
        status: GameStatus::GameOver,
        high_score: state.high_score.max(state.score),
        ..state
    }
}
