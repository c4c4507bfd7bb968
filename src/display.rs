/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable `Snapshot`.  No
/// game logic is performed; this module only maps viewport pixels onto
/// terminal cells and translates entities into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use galaga_shooter::compute::Snapshot;
use galaga_shooter::entities::{
    DiveBomber, Enemy, ExplosionParticle, GameStatus, ParticleColor, PowerUp, PowerUpKind, Rect,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_PLAYER_BLINK: Color = Color::DarkGrey;
const C_ENEMY: [Color; 3] = [Color::Green, Color::Red, Color::Blue];
const C_DIVE_BOMBER: Color = Color::Yellow;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_SPECIAL: Color = Color::Magenta;
const C_BULLET_ENEMY: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_POWERUP_LIFE: Color = Color::Yellow;
const C_POWERUP_SPECIAL: Color = Color::Magenta;
const C_SPECIAL_ACTIVE: Color = Color::Magenta;

/// Maps viewport pixels to the terminal play area (inside the border,
/// between the HUD row and the hint row).
struct Viewport {
    cols: u16,
    rows: u16,
    sx: f32,
    sy: f32,
}

impl Viewport {
    fn new(term_w: u16, term_h: u16, world_w: f32, world_h: f32) -> Self {
        let cols = term_w.saturating_sub(2).max(1);
        let rows = term_h.saturating_sub(4).max(1);
        Viewport {
            cols,
            rows,
            sx: cols as f32 / world_w,
            sy: rows as f32 / world_h,
        }
    }

    /// Terminal cell for a world point, or `None` when it lies outside.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let cx = (x * self.sx).floor();
        let cy = (y * self.sy).floor();
        if cx < 0.0 || cy < 0.0 || cx >= self.cols as f32 || cy >= self.rows as f32 {
            return None;
        }
        Some((cx as u16 + 1, cy as u16 + 2))
    }

    fn centre_cell(&self, rect: &Rect) -> Option<(u16, u16)> {
        let (x, y) = rect.center();
        self.cell(x, y)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snap: &Snapshot) -> std::io::Result<()> {
    let (term_w, term_h) = terminal::size()?;
    let (world_w, world_h) = snap.entities.viewport();
    let view = Viewport::new(term_w, term_h, world_w, world_h);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, term_w, term_h)?;
    draw_hud(out, snap, term_w)?;

    for particle in &snap.entities.explosions {
        draw_particle(out, &view, particle)?;
    }
    for enemy in &snap.entities.enemies {
        draw_enemy(out, &view, enemy)?;
    }
    for bomber in &snap.entities.dive_bombers {
        draw_dive_bomber(out, &view, bomber)?;
    }
    for power_up in &snap.entities.power_ups {
        draw_power_up(out, &view, power_up)?;
    }
    for bullet in &snap.entities.player_bullets {
        let color = if bullet.special { C_BULLET_SPECIAL } else { C_BULLET_PLAYER };
        draw_glyph(out, &view, &bullet.rect, color, "║")?;
    }
    for bullet in &snap.entities.enemy_bullets {
        draw_glyph(out, &view, &bullet.rect, C_BULLET_ENEMY, "↓")?;
    }

    draw_player(out, &view, snap)?;
    draw_controls_hint(out, term_h)?;

    match snap.state.status {
        GameStatus::Idle => draw_banner(
            out,
            term_w,
            term_h,
            &[("★  G A L A G A  ★", Color::Cyan), ("ENTER - Start", Color::White)],
        )?,
        GameStatus::Paused => draw_banner(
            out,
            term_w,
            term_h,
            &[("── PAUSED ──", Color::Cyan), ("P - Resume  ESC - Exit", Color::White)],
        )?,
        GameStatus::GameOver => draw_game_over(out, snap, term_w, term_h)?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, term_h.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, term_w: u16, term_h: u16) -> std::io::Result<()> {
    let w = term_w as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, term_h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..term_h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(term_w.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snap: &Snapshot, term_w: u16) -> std::io::Result<()> {
    let state = &snap.state;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>7}  Hi:{:>7}",
        state.score, state.high_score
    )))?;

    let level_str = format!("[ LEVEL {} · AI x{:.2} ]", state.level, snap.difficulty_multiplier);
    let lx = (term_w / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    let special_tag = if state.special_weapon { "[★ SPECIAL] " } else { "" };
    let lives_str = format!("Lives:{}", "♥".repeat(state.lives.min(9) as usize));
    let right_len = special_tag.chars().count() + lives_str.chars().count();
    let rx = term_w.saturating_sub(right_len as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    if !special_tag.is_empty() {
        out.queue(style::SetForegroundColor(C_SPECIAL_ACTIVE))?;
        out.queue(Print(special_tag))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_glyph<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    color: Color,
    glyph: &str,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.centre_cell(rect) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, view: &Viewport, snap: &Snapshot) -> std::io::Result<()> {
    // Blink every few ticks while invulnerable
    let blink = snap.state.is_invulnerable && (snap.state.invulnerable_timer / 4) % 2 == 0;
    let color = if blink { C_PLAYER_BLINK } else { C_PLAYER };
    let rect = &snap.entities.player.rect;
    if let Some((col, row)) = view.centre_cell(rect) {
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("▲"))?;
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row + 1))?;
        out.queue(Print("/█\\"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, view: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    let color = C_ENEMY[enemy.kind as usize % C_ENEMY.len()];
    let sprite = match enemy.kind {
        0 => "«▼»",
        1 => "(◎)",
        _ => "<Ψ>",
    };
    if let Some((col, row)) = view.centre_cell(&enemy.rect) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(sprite))?;
    }
    Ok(())
}

fn draw_dive_bomber<W: Write>(
    out: &mut W,
    view: &Viewport,
    bomber: &DiveBomber,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.centre_cell(&bomber.rect) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
        out.queue(style::SetForegroundColor(C_DIVE_BOMBER))?;
        out.queue(Print("\\V/"))?;
    }
    Ok(())
}

/// ♥ grants a life, ★ the special weapon.
fn draw_power_up<W: Write>(out: &mut W, view: &Viewport, power_up: &PowerUp) -> std::io::Result<()> {
    let (glyph, color) = match power_up.kind {
        PowerUpKind::Life => ("♥", C_POWERUP_LIFE),
        PowerUpKind::Special => ("★", C_POWERUP_SPECIAL),
    };
    draw_glyph(out, view, &power_up.rect, color, glyph)
}

fn draw_particle<W: Write>(
    out: &mut W,
    view: &Viewport,
    particle: &ExplosionParticle,
) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(particle.x, particle.y) else {
        return Ok(());
    };
    let color = match particle.color {
        ParticleColor::Orange => Color::DarkYellow,
        ParticleColor::Yellow => Color::Yellow,
        ParticleColor::Magenta => Color::Magenta,
        ParticleColor::Green => Color::Green,
        ParticleColor::Cyan => Color::Cyan,
    };
    let glyph = if particle.size > 3.0 { "*" } else { "·" };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, term_h: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, term_h.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   SPACE : Shoot   Z : Special   P : Pause   ESC : Exit   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    term_w: u16,
    term_h: u16,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = term_w / 2;
    let start_row = (term_h / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_game_over<W: Write>(
    out: &mut W,
    snap: &Snapshot,
    term_w: u16,
    term_h: u16,
) -> std::io::Result<()> {
    let state = &snap.state;
    let new_best = state.score >= state.high_score && state.score > 0;
    let score_line = format!("Final Score: {:>7}", state.score);
    let best_line = if new_best {
        format!("★ NEW BEST: {:>7} ★", state.high_score)
    } else {
        format!("Best Score:  {:>7}", state.high_score)
    };

    let lines: Vec<(&str, Color)> = vec![
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        (best_line.as_str(), if new_best { Color::Yellow } else { Color::DarkGrey }),
        ("ENTER - Play Again  Q - Quit", Color::White),
    ];
    draw_banner(out, term_w, term_h, &lines)
}
