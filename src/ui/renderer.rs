//! Presentation layer: double-buffered, diff-based terminal renderer.
//!
//! How it works:
//!   1. Build the next frame into `front` buffer (array of Cell)
//!   2. Compare each cell with `back` buffer (previous frame)
//!   3. Only emit terminal commands for cells that changed
//!   4. All commands are batched with `queue!`, flushed once at the end
//!   5. Swap front/back
//!
//! One field cell maps to one terminal column. The field is centred when
//! the terminal is larger and clipped when it is smaller.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{self, Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use log::{info, warn};

use crate::domain::entity::Coord;
use crate::domain::tile::TileKind;
use crate::error::AppError;
use crate::sim::state::{Mode, View};

const MIN_COLORS: u16 = 8;

// ── Glyphs ──

const GLYPH_PLAYER: char = '@';
const GLYPH_EMPTY: char = '.';
const GLYPH_WALL: char = '█';
const GLYPH_SPECIAL: char = '#';
const GLYPH_BORDER: char = '*';

const BG: Color = Color::Reset;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '\0', fg: Color::Magenta, bg: Color::Magenta };

    const fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: BG }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column; overflow is clipped.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg));
        }
    }

    /// Write a string horizontally centred within `[x0, x0 + span)`.
    fn put_centered(&mut self, x0: usize, span: usize, y: usize, s: &str, fg: Color) {
        let len = s.chars().count();
        self.put_str(x0 + span.saturating_sub(len) / 2, y, s, fg);
    }
}

/// Screen position of the field's top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Origin {
    x: usize,
    y: usize,
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_mode: Option<Mode>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_mode: None,
        }
    }

    /// Check colour support, then enter raw mode on the alternate screen.
    /// Fails before touching the terminal if colour is unsupported.
    pub fn init(&mut self) -> Result<(), AppError> {
        let colors = color_support();
        if colors < MIN_COLORS {
            return Err(AppError::UnsupportedTerminal { colors });
        }

        terminal::enable_raw_mode()?;
        let writer = &mut self.writer;
        enter_or_restore(
            || {
                execute!(
                    writer,
                    terminal::EnterAlternateScreen,
                    cursor::Hide,
                    SetBackgroundColor(BG),
                    Clear(ClearType::All)
                )
            },
            restore_terminal,
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        info!("terminal {tw}x{th}, {colors} colours");
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, view: &View<'_>) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(BG), Clear(ClearType::All))?;
        }

        // Detect mode change → clear for clean transition
        if self.last_mode != Some(view.mode) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(BG), Clear(ClearType::All))?;
            self.last_mode = Some(view.mode);
        }

        self.compose(view);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                // Position cursor only when not already there
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, view: &View<'_>) {
        self.front.clear();
        match view.mode {
            Mode::Intro => self.compose_intro(),
            Mode::Exploring => self.compose_field(view),
            Mode::Overlay => self.compose_overlay(view),
        }
    }

    /// Field plus one status row, centred in the terminal.
    fn origin(&self, view: &View<'_>) -> Origin {
        let (fw, fh) = (view.field.width(), view.field.height());
        Origin {
            x: self.term_w.saturating_sub(fw) / 2,
            y: self.term_h.saturating_sub(fh + 1) / 2,
        }
    }

    fn compose_field(&mut self, view: &View<'_>) {
        let o = self.origin(view);

        for (y, row) in view.field.rows().enumerate() {
            for (x, &tile) in row.iter().enumerate() {
                let cell = match tile {
                    TileKind::Empty => Cell::new(GLYPH_EMPTY, Color::DarkGrey),
                    TileKind::Wall => Cell::new(GLYPH_WALL, Color::Grey),
                    TileKind::Special => Cell::new(GLYPH_SPECIAL, Color::Magenta),
                };
                self.front.set(o.x + x, o.y + y, cell);
            }
        }

        // Player glyph overrides whatever tile is underneath
        let Coord { x: px, y: py } = view.player;
        if view.field.contains(view.player) {
            self.front.set(o.x + px as usize, o.y + py as usize, Cell::new(GLYPH_PLAYER, Color::Yellow));
        }

        // ── Status bar ──
        let s = view.stats;
        let status = format!(
            " {}  moves:{}  bumps:{}  encounters:{}   ←↑↓→/WASD move  Esc quit",
            view.player, s.moves, s.blocked, s.encounters
        );
        self.front.put_str(o.x, o.y + view.field.height(), &status, Color::Cyan);
    }

    /// Full-field bordered panel with placeholder text.
    fn compose_overlay(&mut self, view: &View<'_>) {
        let o = self.origin(view);
        let (w, h) = (view.field.width(), view.field.height());
        let border = Cell::new(GLYPH_BORDER, Color::Red);

        for x in 0..w {
            self.front.set(o.x + x, o.y, border);
            self.front.set(o.x + x, o.y + h.saturating_sub(1), border);
        }
        for y in 0..h {
            self.front.set(o.x, o.y + y, border);
            self.front.set(o.x + w.saturating_sub(1), o.y + y, border);
        }

        let mid = o.y + h / 2;
        self.front.put_centered(o.x, w, mid.saturating_sub(2), "!! ENCOUNTER !!", Color::Red);
        self.front.put_centered(o.x, w, mid, "Press any key to return", Color::White);
        let count = format!("encounter #{}", view.stats.encounters + 1);
        self.front.put_centered(o.x, w, mid + 2, &count, Color::DarkGrey);
    }

    fn compose_intro(&mut self) {
        let title = [
            r"  ____ ____  ___ ____  __        ___    _     _  __",
            r" / ___|  _ \|_ _|  _ \ \ \      / / \  | |   | |/ /",
            r"| |  _| |_) || || | | | \ \ /\ / / _ \ | |   | ' / ",
            r"| |_| |  _ < | || |_| |  \ V  V / ___ \| |___| . \ ",
            r" \____|_| \_\___|____/    \_/\_/_/   \_\_____|_|\_\",
        ];
        let help = [
            "Explore the field. Walls (█) block your way.",
            "Step onto the # tile to trigger an encounter.",
            "",
            "←↑↓→ / WASD   move",
            "Esc           quit",
        ];

        let block_h = title.len() + 2 + help.len() + 2 + 1;
        let top = self.term_h.saturating_sub(block_h) / 2;
        let span = self.term_w;

        for (i, line) in title.iter().enumerate() {
            self.front.put_centered(0, span, top + i, line, Color::Yellow);
        }
        let help_top = top + title.len() + 2;
        for (i, line) in help.iter().enumerate() {
            self.front.put_centered(0, span, help_top + i, line, Color::White);
        }
        self.front.put_centered(
            0,
            span,
            help_top + help.len() + 2,
            "Press any key to start",
            Color::Green,
        );
    }
}

/// Run `enter`; if it fails, run `restore` before handing back the error.
fn enter_or_restore(
    enter: impl FnOnce() -> io::Result<()>,
    restore: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    if let Err(e) = enter() {
        if let Err(restore_err) = restore() {
            warn!("terminal restore failed: {restore_err}");
        }
        return Err(e);
    }
    Ok(())
}

/// Undo raw mode and the alternate screen without going through a Renderer.
fn restore_terminal() -> io::Result<()> {
    execute!(
        io::stdout(),
        ResetColor,
        cursor::Show,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()
}

/// Colours the terminal can show. A `dumb` terminal counts as none.
fn color_support() -> u16 {
    match std::env::var("TERM") {
        Ok(term) if term == "dumb" => 0,
        _ => style::available_color_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::Field;
    use crate::sim::state::Stats;

    fn renderer(w: usize, h: usize) -> Renderer {
        let mut r = Renderer::new();
        r.resize(w, h);
        r
    }

    fn view(field: &Field, player: Coord, mode: Mode) -> View<'_> {
        View { field, player, mode, stats: Stats::default() }
    }

    fn row_text(r: &Renderer, y: usize) -> String {
        (0..r.front.width).map(|x| r.front.get(x, y).ch).collect()
    }

    #[test]
    fn field_glyphs_and_player_override() {
        let mut f = Field::new(4, 2);
        f.set_tile(Coord::new(0, 0), TileKind::Wall).unwrap();
        f.set_tile(Coord::new(3, 1), TileKind::Special).unwrap();
        let mut r = renderer(4, 3);

        r.compose(&view(&f, Coord::new(3, 1), Mode::Exploring));
        assert_eq!(row_text(&r, 0), "█...");
        // Player drawn on top of the special tile
        assert_eq!(row_text(&r, 1), "...@");
        assert_eq!(r.front.get(3, 1).fg, Color::Yellow);
    }

    #[test]
    fn field_is_centred_in_larger_terminal() {
        let f = Field::new(4, 2);
        let mut r = renderer(10, 9);
        r.compose(&view(&f, Coord::new(0, 0), Mode::Exploring));
        // origin = ((10-4)/2, (9-3)/2) = (3, 3)
        assert_eq!(r.front.get(3, 3).ch, '@');
        assert_eq!(r.front.get(4, 3).ch, '.');
        assert_eq!(r.front.get(2, 3).ch, ' ');
    }

    #[test]
    fn small_terminal_clips_without_panicking() {
        let f = Field::new(80, 25);
        let mut r = renderer(20, 5);
        r.compose(&view(&f, Coord::new(40, 12), Mode::Exploring));
        r.compose(&view(&f, Coord::new(40, 12), Mode::Overlay));
        r.compose(&view(&f, Coord::new(40, 12), Mode::Intro));
    }

    #[test]
    fn overlay_has_border_and_prompt() {
        let f = Field::new(30, 9);
        let mut r = renderer(30, 10);
        r.compose(&view(&f, Coord::new(15, 4), Mode::Overlay));
        assert_eq!(row_text(&r, 0), "*".repeat(30));
        assert_eq!(row_text(&r, 8), "*".repeat(30));
        assert!(row_text(&r, 4).contains("Press any key to return"));
        assert!(!row_text(&r, 4).contains('@'));
    }

    #[test]
    fn failed_screen_setup_is_rolled_back() {
        let mut restored = false;
        let err = enter_or_restore(
            || Err(io::Error::new(io::ErrorKind::BrokenPipe, "no tty")),
            || {
                restored = true;
                Ok(())
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(restored);
    }

    #[test]
    fn setup_error_survives_a_failing_restore() {
        let err = enter_or_restore(
            || Err(io::Error::new(io::ErrorKind::BrokenPipe, "no tty")),
            || Err(io::Error::new(io::ErrorKind::Other, "still no tty")),
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn successful_setup_is_left_alone() {
        let mut restored = false;
        enter_or_restore(
            || Ok(()),
            || {
                restored = true;
                Ok(())
            },
        )
        .unwrap();
        assert!(!restored);
    }

    #[test]
    fn intro_shows_start_prompt() {
        let f = Field::new(10, 5);
        let mut r = renderer(80, 24);
        r.compose(&view(&f, Coord::new(5, 2), Mode::Intro));
        let found = (0..24).any(|y| row_text(&r, y).contains("Press any key to start"));
        assert!(found);
    }
}
