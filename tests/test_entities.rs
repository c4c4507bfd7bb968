use galaga_shooter::collision::overlaps;
use galaga_shooter::entities::*;

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_edges_and_center() {
    let r = Rect::new(98.0, 105.0, 40.0, 40.0);
    assert_eq!(r.right(), 138.0);
    assert_eq!(r.bottom(), 145.0);
    assert_eq!(r.center(), (118.0, 125.0));
}

#[test]
fn entity_bounds_are_their_rect() {
    let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
    let enemy = Enemy {
        id: 7,
        rect,
        kind: 0,
        health: 1,
    };
    assert_eq!(enemy.bounds(), rect);
    assert_eq!(rect.bounds(), rect);
}

// ── Overlap ───────────────────────────────────────────────────────────────────

#[test]
fn overlapping_rects_collide() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(5.0, 5.0, 10.0, 10.0);
    assert!(overlaps(&a, &b));
    assert!(overlaps(&b, &a));
}

#[test]
fn touching_edges_do_not_collide() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(!overlaps(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!overlaps(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
}

#[test]
fn contained_rect_collides() {
    let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    let inner = Rect::new(40.0, 40.0, 4.0, 4.0);
    assert!(overlaps(&outer, &inner));
}

#[test]
fn mixed_entity_types_collide() {
    let bullet = PlayerBullet {
        id: 1,
        rect: Rect::new(100.0, 100.0, 4.0, 15.0),
        speed: 10.0,
        special: false,
    };
    let bomber = DiveBomber {
        id: 2,
        rect: Rect::new(90.0, 90.0, 40.0, 40.0),
        kind: 1,
        target_x: 300.0,
        speed: 5.0,
    };
    assert!(overlaps(&bullet, &bomber));
}

// ── GameState ─────────────────────────────────────────────────────────────────

#[test]
fn new_state_is_idle_at_level_one() {
    let s = GameState::new(3);
    assert_eq!(s.status, GameStatus::Idle);
    assert_eq!(s.level, 1);
    assert_eq!(s.lives, 3);
    assert_eq!(s.score, 0);
    assert!(!s.special_weapon);
    assert!(!s.is_invulnerable);
}

#[test]
fn cloned_state_is_independent() {
    let s = GameState::new(3);
    let mut copy = s.clone();
    copy.score = 900;
    copy.status = GameStatus::Playing;
    assert_eq!(s.score, 0);
    assert_eq!(s.status, GameStatus::Idle);
}
