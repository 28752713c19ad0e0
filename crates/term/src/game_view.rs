//! GameView: maps a `SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::SessionSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{SessionState, Tile};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const PLAYFIELD_BG: Rgb = Rgb::new(20, 18, 16);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// A lightweight terminal renderer for the puzzle.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for the usual terminal glyph aspect ratio.
        Self { cell_w: 2, cell_h: 1 }
    }
}

impl GameView {
    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        // Oversized grids clip at the viewport edge.
        let frame_w = snap.width().saturating_mul(self.cell_w).saturating_add(2);
        let frame_h = snap.height().saturating_mul(self.cell_h).saturating_add(2);

        let start_x = viewport.width.saturating_sub(frame_w.saturating_add(PANEL_WIDTH)) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let border = CellStyle::plain(Rgb::new(180, 170, 150), PANEL_BG);
        draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        let visible_cols = usize::from(viewport.width / self.cell_w) + 1;
        let visible_rows = usize::from(viewport.height / self.cell_h) + 1;
        for (y, row) in snap.grid.rows().take(visible_rows).enumerate() {
            for (x, &tile) in row.iter().take(visible_cols).enumerate() {
                let (glyph, style) = tile_glyph(tile, snap.player_alive);
                self.fill_cell(fb, start_x, start_y, x as u16, y as u16, glyph, style);
            }
        }

        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        self.draw_side_panel(fb, snap, viewport, panel_x, start_y);
        draw_overlays(fb, snap, start_x, start_y, frame_w, frame_h);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Two-character glyphs are split across a 2-wide cell; anything wider
    /// repeats the second character.
    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        glyph: [char; 2],
        style: CellStyle,
    ) {
        let px = start_x.saturating_add(1).saturating_add(cell_x.saturating_mul(self.cell_w));
        let py = start_y.saturating_add(1).saturating_add(cell_y.saturating_mul(self.cell_h));
        for dy in 0..self.cell_h {
            for dx in 0..self.cell_w {
                let ch = if dx == 0 { glyph[0] } else { glyph[1] };
                fb.put_char(px.saturating_add(dx), py.saturating_add(dy), ch, style);
            }
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x.saturating_add(PANEL_WIDTH) > viewport.width {
            return;
        }

        let label = CellStyle::plain(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::plain(Rgb::new(200, 200, 200), PANEL_BG);
        let warn = CellStyle::plain(Rgb::new(255, 90, 60), PANEL_BG).bold();

        let mut y = start_y;
        fb.put_str(panel_x, y, "DIAMONDS", label);
        y += 1;
        let met = snap.diamonds_collected >= snap.diamonds_required;
        let count_style = if met {
            CellStyle::plain(Rgb::new(90, 220, 240), PANEL_BG).bold()
        } else {
            value
        };
        fb.put_fmt(
            panel_x,
            y,
            format_args!("{}/{}", snap.diamonds_collected, snap.diamonds_required),
            count_style,
        );
        y += 2;

        fb.put_str(panel_x, y, "TIME", label);
        y += 1;
        let time_style = if snap.time_remaining <= 10 { warn } else { value };
        fb.put_fmt(panel_x, y, format_args!("{}s", snap.time_remaining), time_style);
        y += 2;

        fb.put_str(panel_x, y, "STATE", label);
        y += 1;
        fb.put_str(panel_x, y, state_label(snap.state), value);
        y += 2;

        if snap.crush_pending {
            fb.put_str(panel_x, y, "DANGER!", warn);
        }
        y += 2;

        let dim = value.dim();
        fb.put_str(panel_x, y, "arrows/wasd", dim);
        fb.put_str(panel_x, y + 1, "r restart", dim);
        fb.put_str(panel_x, y + 2, "q quit", dim);
    }
}

const PANEL_WIDTH: u16 = 14;

fn state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "IDLE",
        SessionState::Running => "RUNNING",
        SessionState::Won => "WON",
        SessionState::Lost => "LOST",
    }
}

fn tile_glyph(tile: Tile, player_alive: bool) -> ([char; 2], CellStyle) {
    let on = |r, g, b| CellStyle::plain(Rgb::new(r, g, b), PLAYFIELD_BG);
    match tile {
        Tile::Empty => ([' ', ' '], on(0, 0, 0)),
        Tile::Wall => (['█', '█'], CellStyle::plain(Rgb::new(110, 110, 120), PLAYFIELD_BG)),
        Tile::Dirt => (['░', '░'], on(140, 100, 60).dim()),
        Tile::Boulder => (['(', ')'], on(170, 160, 150).bold()),
        Tile::Diamond => (['<', '>'], on(90, 220, 240).bold()),
        Tile::Player if player_alive => (['@', '@'], on(250, 220, 80).bold()),
        Tile::Player => (['x', 'x'], on(220, 60, 60).bold()),
        Tile::Exit => (['[', ']'], on(80, 230, 110).bold()),
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    let right = x.saturating_add(w - 1);
    let bottom = y.saturating_add(h - 1);
    fb.put_char(x, y, '┌', style);
    fb.put_char(right, y, '┐', style);
    fb.put_char(x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x.saturating_add(dx), y, '─', style);
        fb.put_char(x.saturating_add(dx), bottom, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y.saturating_add(dy), '│', style);
        fb.put_char(right, y.saturating_add(dy), '│', style);
    }
}

/// Banner text over the playfield. End-of-session banners take precedence
/// over the exit hint.
fn draw_overlays(fb: &mut FrameBuffer, snap: &SessionSnapshot, x: u16, y: u16, w: u16, h: u16) {
    let mid_y = y.saturating_add(h / 2);
    let banner = |fg| CellStyle::plain(fg, PANEL_BG).bold();

    let headline = match snap.state {
        SessionState::Won => Some(("YOU WIN!", banner(Rgb::new(80, 230, 110)))),
        SessionState::Lost => Some(("GAME OVER", banner(Rgb::new(255, 90, 60)))),
        SessionState::Idle => Some(("PRESS R TO START", banner(Rgb::new(255, 255, 255)))),
        SessionState::Running if snap.exit_hint_visible => {
            Some(("EXIT REVEALED!", banner(Rgb::new(250, 220, 80))))
        }
        SessionState::Running => None,
    };

    if let Some((text, style)) = headline {
        fb.put_str_centered(x, w, mid_y, text, style);
    }
    if snap.state.is_finished() {
        let prompt = CellStyle::plain(Rgb::new(220, 220, 220), PANEL_BG);
        fb.put_str_centered(x, w, mid_y.saturating_add(1), "press R to restart", prompt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_player_has_its_own_glyph() {
        let (alive, _) = tile_glyph(Tile::Player, true);
        let (dead, dead_style) = tile_glyph(Tile::Player, false);
        assert_ne!(alive, dead);
        assert_eq!(dead_style.fg, Rgb::new(220, 60, 60));
    }

    #[test]
    fn every_tile_has_a_distinct_glyph() {
        let tiles = [
            Tile::Empty,
            Tile::Wall,
            Tile::Dirt,
            Tile::Boulder,
            Tile::Diamond,
            Tile::Player,
            Tile::Exit,
        ];
        let glyphs: Vec<_> = tiles.iter().map(|&t| tile_glyph(t, true).0).collect();
        for (i, a) in glyphs.iter().enumerate() {
            for b in &glyphs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
