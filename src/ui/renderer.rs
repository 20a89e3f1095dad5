/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. `draw()` turns the game state into pixel commands
///   2. The canvas executes them at board resolution (400×400)
///   3. The board is downsampled into `▀` glyphs: fg = upper sample,
///      bg = lower sample, so one terminal cell carries two pixels
///   4. HUD, banner and buttons are composed on top into `front`
///   5. Only cells that differ from `back` (previous frame) are emitted
///
/// Also the `Hud` port: score text and the game-over banner are state
/// held here and shown on the next frame.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::{Direction, BOARD_PIXELS, TILE_COUNT};
use crate::sim::session::Hud;
use crate::sim::state::GameState;
use super::canvas::{Canvas, Rgb};
use super::draw::draw;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell outside the board, so the
    /// terminal's own default never shows through between rows.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer: differs from any real cell.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

fn color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
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

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

// ── Layout ──

/// Terminal columns per game cell; two half-block rows make it square.
const CELL_W: usize = 2;
const SAMPLES_X: usize = TILE_COUNT as usize * CELL_W;
const SAMPLES_Y: usize = TILE_COUNT as usize * 2;
const SAMPLE_PX: usize = BOARD_PIXELS as usize / SAMPLES_X;

const BOARD_COLS: usize = SAMPLES_X;
const BOARD_ROWS: usize = SAMPLES_Y / 2;
const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 2;
const BUTTON_ROW: usize = BOARD_ROW + BOARD_ROWS + 1;
const HELP_ROW: usize = BUTTON_ROW + 2;
const LEFT: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const BANNER_BG: Color = Color::Rgb { r: 140, g: 30, b: 30 };
const BUTTON_BG: Color = Color::Rgb { r: 50, g: 70, b: 90 };

const BUTTONS: [(&str, Direction); 4] = [
    (" ▲ ", Direction::UP),
    (" ▼ ", Direction::DOWN),
    (" ◀ ", Direction::LEFT),
    (" ▶ ", Direction::RIGHT),
];

/// Clickable on-screen button, in terminal coordinates.
#[derive(Clone, Copy, Debug)]
struct HitBox {
    row: usize,
    cols: (usize, usize),
    dir: Direction,
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    canvas: Canvas,
    score_text: String,
    game_over_visible: bool,
    buttons: Vec<HitBox>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            canvas: Canvas::new(BOARD_PIXELS as usize, BOARD_PIXELS as usize),
            score_text: String::new(),
            game_over_visible: false,
            buttons: Vec::with_capacity(BUTTONS.len()),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, state: &GameState, timestamp_ms: f64) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.compose(state, timestamp_ms);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Which direction button, if any, is under a terminal position.
    pub fn button_at(&self, col: u16, row: u16) -> Option<Direction> {
        let (col, row) = (col as usize, row as usize);
        self.buttons
            .iter()
            .find(|b| b.row == row && col >= b.cols.0 && col < b.cols.1)
            .map(|b| b.dir)
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors, never ResetColor: the terminal default may differ.
        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
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
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, state: &GameState, timestamp_ms: f64) {
        self.front.clear();
        self.compose_hud();
        self.compose_board(state, timestamp_ms);
        if self.game_over_visible {
            self.compose_banner(state.score);
        }
        self.compose_buttons();
        self.front.put_str(
            LEFT,
            HELP_ROW,
            "Arrows/WASD: Steer  Space: Restart  Esc/Q: Quit",
            Color::DarkGrey,
            Cell::BASE_BG,
        );
    }

    fn compose_hud(&mut self) {
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG));
        }
        let hud = format!(" {} ", self.score_text);
        self.front.put_str(LEFT, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_board(&mut self, state: &GameState, timestamp_ms: f64) {
        self.canvas.execute(&draw(state, timestamp_ms));
        for row in 0..BOARD_ROWS {
            for col in 0..BOARD_COLS {
                let top = self.canvas.average(col * SAMPLE_PX, row * 2 * SAMPLE_PX, SAMPLE_PX, SAMPLE_PX);
                let bottom =
                    self.canvas.average(col * SAMPLE_PX, (row * 2 + 1) * SAMPLE_PX, SAMPLE_PX, SAMPLE_PX);
                self.front.set(LEFT + col, BOARD_ROW + row, Cell::new('▀', color(top), color(bottom)));
            }
        }
    }

    fn compose_banner(&mut self, score: u32) {
        let lines = [
            "                        ".to_string(),
            "       GAME  OVER       ".to_string(),
            format!("{:^24}", format!("Score: {score}")),
            "  Press Space to retry  ".to_string(),
            "                        ".to_string(),
        ];
        let top = BOARD_ROW + BOARD_ROWS / 2 - lines.len() / 2;
        let left = LEFT + (BOARD_COLS - 24) / 2;
        for (i, line) in lines.iter().enumerate() {
            self.front.put_str(left, top + i, line, Color::White, BANNER_BG);
        }
    }

    fn compose_buttons(&mut self) {
        self.buttons.clear();
        let mut x = LEFT + (BOARD_COLS - (BUTTONS.len() * 5 - 2)) / 2;
        for (label, dir) in BUTTONS {
            self.front.put_str(x, BUTTON_ROW, label, Color::White, BUTTON_BG);
            self.buttons.push(HitBox { row: BUTTON_ROW, cols: (x, x + 3), dir });
            x += 5;
        }
    }
}

impl Hud for Renderer {
    fn set_score_text(&mut self, score: u32) {
        self.score_text = format!("Score: {score}");
    }

    fn show_game_over(&mut self) {
        self.game_over_visible = true;
    }

    fn hide_game_over(&mut self) {
        self.game_over_visible = false;
    }
}
