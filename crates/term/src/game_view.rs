//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{canonical, color_for, GameSnapshot, Shape};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Cell;

/// How long the TETRIS and level-up banners stay up
pub const FLASH_MS: u64 = 2000;

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Piece colors by color index (1..=7)
const PALETTE: [Rgb; 7] = [
    Rgb::new(0, 255, 255),
    Rgb::new(255, 165, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(128, 0, 128),
];

/// RGB for a board cell value; `None` for empty or out-of-range values
pub fn palette(cell: Cell) -> Option<Rgb> {
    PALETTE.get((cell as usize).checked_sub(1)?).copied()
}

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Board frame position inside the viewport
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer
    ///
    /// `now_ms` is the same clock the session runs on; it times the banner
    /// flashes. Callers can reuse one framebuffer across frames.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        now_ms: u64,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let board_w = snap.width * self.cell_w;
        let board_h = snap.height * self.cell_h;
        let frame = Frame {
            x: viewport.width.saturating_sub(board_w + 2) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(board_h + 2) / 2,
                AnchorY::Top => 0,
            },
            w: board_w + 2,
            h: board_h + 2,
        };

        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            board_w,
            board_h,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), PLAY_BG),
        );

        // Border turns red while the stack is in the top rows.
        let border_fg = if snap.danger_zone && !snap.game_over {
            Rgb::new(230, 60, 60)
        } else {
            Rgb::new(200, 200, 200)
        };
        self.draw_border(fb, frame, CellStyle::new(border_fg, PANEL_BG));

        for y in 0..snap.height {
            for x in 0..snap.width {
                match snap.cell(x, y).and_then(palette) {
                    Some(rgb) => self.draw_block(fb, frame, x as i16, y as i16, rgb),
                    None => {
                        let dot = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
                        self.fill_cell_rect(fb, frame, x as i16, y as i16, '·', dot);
                    }
                }
            }
        }

        if let (Some(active), Some(ghost_y)) = (snap.active, snap.ghost_y) {
            let ghost = CellStyle::new(Rgb::new(140, 140, 140), PLAY_BG).dim();
            for (x, y) in active.cells_at(ghost_y) {
                self.fill_cell_rect(fb, frame, x, y, '░', ghost);
            }
        }

        if let Some(active) = snap.active {
            if let Some(rgb) = palette(active.color) {
                for (x, y) in active.cells_at(active.y) {
                    self.draw_block(fb, frame, x, y, rgb);
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);
        self.draw_overlays(fb, snap, now_ms, frame);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, now_ms: u64, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, now_ms, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
        let Frame { x, y, w, h } = frame;
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Frame, x: i16, y: i16, rgb: Rgb) {
        let style = CellStyle::new(rgb, PLAY_BG).bold();
        self.fill_cell_rect(fb, frame, x, y, '█', style);
    }

    /// Fill one board cell; cells outside the play area (above the top row) are skipped
    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        cell_x: i16,
        cell_y: i16,
        ch: char,
        style: CellStyle,
    ) {
        let cols = (frame.w - 2) / self.cell_w;
        let rows = (frame.h - 2) / self.cell_h;
        if cell_x < 0 || cell_y < 0 || cell_x as u16 >= cols || cell_y as u16 >= rows {
            return;
        }
        let px = frame.x + 1 + cell_x as u16 * self.cell_w;
        let py = frame.y + 1 + cell_y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    /// Draw a small shape preview; returns the rows used
    fn draw_mini_shape(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        shape: &Shape,
        rgb: Rgb,
    ) -> u16 {
        let style = CellStyle::new(rgb, PANEL_BG).bold();
        for (dx, dy) in shape.cells() {
            fb.fill_rect(x + dx as u16 * 2, y + dy as u16, 2, 1, '█', style);
        }
        shape.height() as u16
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        for (name, v) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
            ("PIECES", snap.pieces_dropped),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), v, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "HIGH", label);
        y = y.saturating_add(1);
        match &snap.high_score {
            Some(best) if !snap.new_high_score => {
                let end = fb.put_u32(panel_x, y, best.score, value);
                fb.put_str(end + 1, y, &best.name, value);
            }
            _ if snap.new_high_score => {
                let gold = CellStyle::new(Rgb::new(255, 215, 0), PANEL_BG).bold();
                fb.put_u32(panel_x, y, snap.score, gold);
            }
            _ => {
                fb.put_str(panel_x, y, "-", value);
            }
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for id in snap.next_queue.iter() {
            let shape = canonical(*id);
            let rgb = palette(color_for(&shape, snap.level)).unwrap_or_default();
            y = y.saturating_add(self.draw_mini_shape(fb, panel_x, y, &shape, rgb) + 1);
        }

        y = y.saturating_add(1);
        fb.put_str(panel_x, y, "HOLD", label);
        y = y.saturating_add(1);
        match snap.hold {
            Some(shape) => {
                let mut rgb = palette(color_for(&shape, snap.level)).unwrap_or_default();
                if snap.hold_used {
                    rgb = rgb.scaled(1, 2);
                }
                self.draw_mini_shape(fb, panel_x, y, &shape, rgb);
            }
            None => {
                fb.put_str(panel_x, y, "-", value);
            }
        }
    }

    fn draw_overlays(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, now_ms: u64, frame: Frame) {
        let mid_y = frame.y.saturating_add(frame.h / 2);
        let recent = |at: Option<u64>| at.is_some_and(|t| now_ms.saturating_sub(t) < FLASH_MS);

        if snap.paused {
            self.draw_overlay_text(fb, frame, mid_y, "PAUSED", Rgb::new(255, 255, 255));
        } else if snap.game_over {
            self.draw_overlay_text(fb, frame, mid_y, "GAME OVER", Rgb::new(255, 80, 80));
            if snap.new_high_score {
                let y = mid_y.saturating_add(2);
                self.draw_overlay_text(fb, frame, y, "NEW HIGH SCORE", Rgb::new(255, 215, 0));
            }
            let y = mid_y.saturating_add(4);
            self.draw_overlay_text(fb, frame, y, "R TO RESTART", Rgb::new(200, 200, 200));
        } else if recent(snap.tetris_at_ms) {
            // Alternate colors every 100ms while the banner is up.
            let phase = snap.tetris_at_ms.map(|t| now_ms.saturating_sub(t) / 100).unwrap_or(0);
            let rgb = PALETTE[phase as usize % PALETTE.len()];
            self.draw_overlay_text(fb, frame, mid_y, "TETRIS!", rgb);
        } else if recent(snap.level_up_at_ms) {
            let mut text = [0u8; 16];
            let label = level_label(snap.level, &mut text);
            self.draw_overlay_text(fb, frame, mid_y, label, Rgb::new(255, 255, 255));
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, frame: Frame, y: u16, text: &str, fg: Rgb) {
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        fb.put_str(x, y, text, CellStyle::new(fg, PANEL_BG).bold());
    }
}

/// "LEVEL n" into a stack buffer
fn level_label(level: u32, buf: &mut [u8; 16]) -> &str {
    const PREFIX: &[u8] = b"LEVEL ";
    buf[..PREFIX.len()].copy_from_slice(PREFIX);
    let mut digits = [0u8; 10];
    let mut n = level;
    let mut len = 0;
    loop {
        digits[len] = b'0' + (n % 10) as u8;
        len += 1;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    for (i, d) in digits[..len].iter().rev().enumerate() {
        buf[PREFIX.len() + i] = *d;
    }
    std::str::from_utf8(&buf[..PREFIX.len() + len]).unwrap_or("LEVEL")
}
