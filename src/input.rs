/// Input mapping: raw crossterm key events → a persistent set of intents.
///
/// The mapper records the frame each key was last seen (press or repeat) and
/// treats a key as held while that stamp is fresh.  This covers both
/// terminals that report key releases (the key is dropped on `Release`) and
/// classic terminals that only emit repeated `Press` events (the key expires
/// after `HOLD_WINDOW` frames of silence).

use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

use crate::config::GameConfig;

/// A key counts as held if it was seen within this many frames.
pub const HOLD_WINDOW: u64 = 4;

/// Boolean intents sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputIntents {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    pub special_weapon: bool,
    pub start: bool,
    pub pause: bool,
    pub exit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Intent {
    MoveLeft,
    MoveRight,
    Fire,
    SpecialWeapon,
    Start,
    Pause,
    Exit,
}

fn intent_for(code: &KeyCode) -> Option<Intent> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Intent::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Intent::MoveRight),
        KeyCode::Char(' ') => Some(Intent::Fire),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Intent::SpecialWeapon),
        KeyCode::Enter => Some(Intent::Start),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Intent::Pause),
        KeyCode::Esc => Some(Intent::Exit),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct InputMapper {
    last_seen: HashMap<Intent, u64>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one terminal event observed during `frame`.
    pub fn handle_event(&mut self, event: &Event, frame: u64) {
        let Event::Key(KeyEvent { code, kind, .. }) = event else {
            return;
        };
        let Some(intent) = intent_for(code) else {
            return;
        };
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(intent, frame);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&intent);
            }
        }
    }

    fn is_held(&self, intent: Intent, frame: u64) -> bool {
        self.last_seen
            .get(&intent)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Copy-out of the current intents for the tick at `frame`.
    pub fn snapshot(&self, frame: u64) -> InputIntents {
        InputIntents {
            move_left: self.is_held(Intent::MoveLeft, frame),
            move_right: self.is_held(Intent::MoveRight, frame),
            fire: self.is_held(Intent::Fire, frame),
            special_weapon: self.is_held(Intent::SpecialWeapon, frame),
            start: self.is_held(Intent::Start, frame),
            pause: self.is_held(Intent::Pause, frame),
            exit: self.is_held(Intent::Exit, frame),
        }
    }
}

// ── Fire rate limiting ───────────────────────────────────────────────────────

/// Minimum spacing between player shots, shorter while the special weapon
/// is active.  Times are simulation milliseconds.
#[derive(Clone, Debug)]
pub struct FireGate {
    last_shot_ms: Option<u64>,
    interval_ms: u64,
    special_interval_ms: u64,
}

impl FireGate {
    pub fn new(config: &GameConfig) -> Self {
        FireGate {
            last_shot_ms: None,
            interval_ms: config.player.shoot_interval_ms,
            special_interval_ms: config.player.special_shoot_interval_ms,
        }
    }

    /// Returns `true` and records the shot when more than the interval has
    /// passed since the previous one.
    pub fn try_fire(&mut self, now_ms: u64, special: bool) -> bool {
        let interval = if special {
            self.special_interval_ms
        } else {
            self.interval_ms
        };
        let ready = match self.last_shot_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > interval,
        };
        if ready {
            self.last_shot_ms = Some(now_ms);
        }
        ready
    }

    pub fn reset(&mut self) {
        self.last_shot_ms = None;
    }
}
