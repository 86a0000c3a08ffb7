/// Rendering layer — all terminal output lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game session.  No game logic is performed; this module only translates
/// playfield coordinates into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use chicken_shooter::assets::{SpriteId, SpriteSheet, CELL_HEIGHT, CELL_WIDTH};
use chicken_shooter::entities::{EnemyKind, GameSession, GameStatus, Level};
use glam::Vec2;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_TITLE: Color = Color::Cyan;
const C_MENU: Color = Color::White;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_BULLET: Color = Color::Cyan;
const C_CHICKEN: Color = Color::Yellow;
const C_CHICKEN2: Color = Color::Green;
const C_BOSS: Color = Color::Magenta;
const C_OBSTACLE: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

/// Terminal column of the playfield's left edge.
const FIELD_LEFT: u16 = 1;
/// Terminal row of the playfield's top edge (row 0 is the HUD, row 1 the border).
const FIELD_TOP: u16 = 2;

/// Where the playfield lands on the terminal.
struct Viewport {
    cols: u16,
    rows: u16,
    term_width: u16,
    term_height: u16,
}

impl Viewport {
    fn new(state: &GameSession, term_width: u16, term_height: u16) -> Self {
        Viewport {
            cols: (state.playfield.width / CELL_WIDTH).ceil() as u16,
            rows: (state.playfield.height / CELL_HEIGHT).ceil() as u16,
            term_width,
            term_height,
        }
    }

    /// Terminal cell for a playfield cell, if both are on screen.
    fn cell(&self, col: i32, row: i32) -> Option<(u16, u16)> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        let x = FIELD_LEFT.saturating_add(col as u16);
        let y = FIELD_TOP.saturating_add(row as u16);
        (x < self.term_width && y < self.term_height).then_some((x, y))
    }

    fn centre_col(&self, text: &str) -> u16 {
        (FIELD_LEFT + self.cols / 2).saturating_sub(text.chars().count() as u16 / 2)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame for the current state.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameSession,
    sprites: &SpriteSheet,
) -> std::io::Result<()> {
    let (term_width, term_height) = terminal::size()?;
    let view = Viewport::new(state, term_width, term_height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, &view)?;

    match state.status {
        GameStatus::Menu => draw_menu(out, state, &view)?,
        GameStatus::DifficultySelect => draw_difficulty_select(out, &view)?,
        GameStatus::Playing => {
            draw_hud(out, state, &view)?;
            draw_entities(out, state, sprites, &view)?;
        }
        GameStatus::GameOver => draw_game_over(out, state, &view)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, term_height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let bottom = FIELD_TOP.saturating_add(view.rows);

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, FIELD_TOP - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;

    if bottom < view.term_height {
        out.queue(cursor::MoveTo(0, bottom))?;
        out.queue(Print(format!("└{}┘", "─".repeat(w))))?;
    }

    for row in FIELD_TOP..bottom.min(view.term_height) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(FIELD_LEFT.saturating_add(view.cols), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn draw_lines<W: Write>(
    out: &mut W,
    view: &Viewport,
    first_row: u16,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    for (i, (text, color)) in lines.iter().enumerate() {
        let row = first_row + i as u16 * 2;
        if row >= view.term_height {
            break;
        }
        out.queue(cursor::MoveTo(view.centre_col(text), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, state: &GameSession, view: &Viewport) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("★  CHICKEN  SHOOTER  ★", C_TITLE),
        ("1. Play Game", C_MENU),
        (state.instructions, C_MENU),
        ("3. Exit", C_MENU),
    ];
    draw_lines(out, view, FIELD_TOP + view.rows / 4, lines)?;
    draw_controls_hint(out, view)
}

fn draw_difficulty_select<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("★  CHICKEN  SHOOTER  ★", C_TITLE),
        ("4. Easy", level_color(Level::Easy)),
        ("5. Medium", level_color(Level::Medium)),
        ("6. Hard", level_color(Level::Hard)),
    ];
    draw_lines(out, view, FIELD_TOP + view.rows / 4, lines)
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Easy => Color::Green,
        Level::Medium => Color::Yellow,
        Level::Hard => Color::Red,
    }
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameSession, view: &Viewport) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&state.hud.score_text))?;

    // Level — centre
    let level_str = format!("[ {} ]", state.level.label());
    out.queue(cursor::MoveTo(view.centre_col(&level_str), 0))?;
    out.queue(style::SetForegroundColor(level_color(state.level)))?;
    out.queue(Print(&level_str))?;

    // Lives — right
    let rx = FIELD_LEFT
        .saturating_add(view.cols)
        .saturating_sub(state.hud.lives_text.chars().count() as u16);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&state.hud.lives_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_entities<W: Write>(
    out: &mut W,
    state: &GameSession,
    sprites: &SpriteSheet,
    view: &Viewport,
) -> std::io::Result<()> {
    for obstacle in &state.obstacles {
        draw_sprite(out, view, sprites, SpriteId::Obstacle, obstacle.pos, C_OBSTACLE)?;
    }
    for enemy in &state.enemies {
        let (id, color) = match enemy.kind {
            EnemyKind::Chicken => (SpriteId::Chicken, C_CHICKEN),
            EnemyKind::Chicken2 => (SpriteId::Chicken2, C_CHICKEN2),
            EnemyKind::Boss { .. } => (SpriteId::Boss, C_BOSS),
        };
        draw_sprite(out, view, sprites, id, enemy.pos, color)?;
    }
    for bullet in &state.bullets {
        draw_sprite(out, view, sprites, SpriteId::Bullet, bullet.pos, C_BULLET)?;
    }
    draw_sprite(out, view, sprites, SpriteId::Ship, state.player.pos, C_PLAYER)
}

/// Draw glyph art with its top-left corner at `pos`.  Spaces are
/// transparent and cells outside the playfield are clipped.
fn draw_sprite<W: Write>(
    out: &mut W,
    view: &Viewport,
    sprites: &SpriteSheet,
    id: SpriteId,
    pos: Vec2,
    color: Color,
) -> std::io::Result<()> {
    let col0 = (pos.x / CELL_WIDTH).round() as i32;
    let row0 = (pos.y / CELL_HEIGHT).round() as i32;

    out.queue(style::SetForegroundColor(color))?;
    for (dy, line) in sprites.get(id).rows.iter().enumerate() {
        for (dx, ch) in line.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            if let Some((x, y)) = view.cell(col0 + dx as i32, row0 + dy as i32) {
                out.queue(cursor::MoveTo(x, y))?;
                out.queue(Print(ch))?;
            }
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let row = FIELD_TOP.saturating_add(view.rows).saturating_add(1);
    if row >= view.term_height {
        return Ok(());
    }
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Arrows : Move   SPACE : Shoot   Q / Esc : Quit"))?;
    Ok(())
}

// ── Game-over screen ──────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameSession,
    view: &Viewport,
) -> std::io::Result<()> {
    let score_line = format!("Your Score: {}", state.final_score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        ("Press R to Retry or M for Menu", Color::White),
    ];

    let start_row = FIELD_TOP.saturating_add((view.rows / 2).saturating_sub(lines.len() as u16 / 2));
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        if row >= view.term_height {
            break;
        }
        out.queue(cursor::MoveTo(view.centre_col(msg), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
