use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use galaga_shooter::config::GameConfig;
use galaga_shooter::input::*;

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn release(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new_with_kind(
        code,
        KeyModifiers::NONE,
        KeyEventKind::Release,
    ))
}

// ── Key mapping ───────────────────────────────────────────────────────────────

#[test]
fn keys_map_to_intents() {
    let mut mapper = InputMapper::new();
    for code in [
        KeyCode::Left,
        KeyCode::Char('d'),
        KeyCode::Char(' '),
        KeyCode::Char('Z'),
        KeyCode::Enter,
        KeyCode::Char('p'),
        KeyCode::Esc,
    ] {
        mapper.handle_event(&press(code), 1);
    }
    let intents = mapper.snapshot(1);
    assert_eq!(
        intents,
        InputIntents {
            move_left: true,
            move_right: true,
            fire: true,
            special_weapon: true,
            start: true,
            pause: true,
            exit: true,
        }
    );
}

#[test]
fn unmapped_keys_are_ignored() {
    let mut mapper = InputMapper::new();
    mapper.handle_event(&press(KeyCode::Char('x')), 1);
    mapper.handle_event(&Event::FocusLost, 1);
    assert_eq!(mapper.snapshot(1), InputIntents::default());
}

// ── Hold window ───────────────────────────────────────────────────────────────

#[test]
fn key_stays_held_within_window() {
    let mut mapper = InputMapper::new();
    mapper.handle_event(&press(KeyCode::Char('a')), 10);
    assert!(mapper.snapshot(10).move_left);
    assert!(mapper.snapshot(10 + HOLD_WINDOW).move_left);
    assert!(!mapper.snapshot(11 + HOLD_WINDOW).move_left);
}

#[test]
fn repeat_refreshes_hold() {
    let mut mapper = InputMapper::new();
    mapper.handle_event(&press(KeyCode::Right), 1);
    mapper.handle_event(&press(KeyCode::Right), 5);
    assert!(mapper.snapshot(8).move_right);
}

#[test]
fn release_drops_key_immediately() {
    let mut mapper = InputMapper::new();
    mapper.handle_event(&press(KeyCode::Char(' ')), 1);
    mapper.handle_event(&release(KeyCode::Char(' ')), 2);
    assert!(!mapper.snapshot(2).fire);
}

// ── Fire gate ─────────────────────────────────────────────────────────────────

#[test]
fn first_shot_is_always_allowed() {
    let mut gate = FireGate::new(&GameConfig::default());
    assert!(gate.try_fire(0, false));
}

#[test]
fn normal_interval_is_strict() {
    let mut gate = FireGate::new(&GameConfig::default());
    assert!(gate.try_fire(1000, false));
    assert!(!gate.try_fire(1300, false));
    assert!(gate.try_fire(1301, false));
}

#[test]
fn special_interval_is_shorter() {
    let mut gate = FireGate::new(&GameConfig::default());
    assert!(gate.try_fire(0, true));
    assert!(!gate.try_fire(150, true));
    assert!(gate.try_fire(151, true));
}

#[test]
fn reset_allows_immediate_shot() {
    let mut gate = FireGate::new(&GameConfig::default());
    assert!(gate.try_fire(500, false));
    gate.reset();
    assert!(gate.try_fire(501, false));
}
