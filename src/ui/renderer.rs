/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen layout (terminal rows):
///   0        HUD: dirt count
///   1        HUD: dig bars
///   2..17    the grid, one game cell = 2 terminal columns
///   18       message bar
///   20       key help

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Direction, Enemy, EnemyKind};
use crate::domain::grid::{GRID_HEIGHT, GRID_WIDTH};
use crate::domain::tile::Tile;
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every cell outside the grid. Never
    /// terminal-default, so diffing against `Clear` stays exact.
    const BASE_BG: Color = Color::Rgb { r: 12, g: 10, b: 8 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer. Differs from any
    /// real cell, so every position gets diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
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

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, x0: usize, x1: usize, y: usize, bg: Color) {
        for x in x0..x1 {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Layout ──

const CELL_W: usize = 2;
const MAP_COLS: usize = GRID_WIDTH * CELL_W;

const HUD_ROW: usize = 0;
const BARS_ROW: usize = 1;
const MAP_ROW: usize = 2;
const MSG_ROW: usize = MAP_ROW + GRID_HEIGHT + 1;
const HELP_ROW: usize = MSG_ROW + 2;

/// One HUD bar per this many dug cells.
const DIRT_PER_BAR: u32 = 10;
const MAX_BARS: usize = 30;

/// Number of HUD dig bars for a dirt count.
pub fn dig_bars(dirt_dug: u32) -> usize {
    ((dirt_dug / DIRT_PER_BAR) as usize).min(MAX_BARS)
}

// ── Palette ──

const DIRT_BG: Color = Color::Rgb { r: 139, g: 69, b: 19 };
const DIRT_FG: Color = Color::Rgb { r: 160, g: 90, b: 40 };
const TUNNEL_BG: Color = Color::Rgb { r: 50, g: 25, b: 10 };
const ROCK_BG: Color = Color::Rgb { r: 128, g: 128, b: 128 };
const ROCK_FG: Color = Color::Rgb { r: 90, g: 90, b: 90 };
const PLAYER_BG: Color = Color::Rgb { r: 255, g: 255, b: 255 };
const PLAYER_FG: Color = Color::Rgb { r: 0, g: 200, b: 255 };
const ENEMY_FG: Color = Color::Rgb { r: 255, g: 230, b: 0 };
const HUD_BG: Color = Color::Rgb { r: 30, g: 20, b: 12 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

fn tile_cells(tile: Tile) -> (char, Color, Color) {
    match tile {
        Tile::Empty => (' ', Color::White, Color::Rgb { r: 0, g: 0, b: 0 }),
        Tile::Dirt => ('░', DIRT_FG, DIRT_BG),
        Tile::Tunnel => (' ', Color::White, TUNNEL_BG),
        Tile::Rock => ('▓', ROCK_FG, ROCK_BG),
    }
}

fn enemy_bg(enemy: &Enemy) -> Color {
    match (enemy.kind, enemy.ghosting) {
        (EnemyKind::Chaser, false) => Color::Rgb { r: 255, g: 0, b: 0 },
        (EnemyKind::Chaser, true) => Color::Rgb { r: 100, g: 0, b: 0 },
        (EnemyKind::FireBreather, false) => Color::Rgb { r: 0, g: 255, b: 0 },
        (EnemyKind::FireBreather, true) => Color::Rgb { r: 0, g: 100, b: 0 },
    }
}

/// The two terminal glyphs of a game cell, with the arrow on the facing side.
fn facing_glyphs(dir: Direction) -> [char; 2] {
    match dir {
        Direction::Left => ['◀', ' '],
        Direction::Right => [' ', '▶'],
        Direction::Up => ['▲', '▲'],
        Direction::Down => ['▼', '▼'],
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    /// The terminal reports key releases (kitty keyboard protocol).
    pub keyboard_enhanced: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            keyboard_enhanced: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.keyboard_enhanced = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.keyboard_enhanced {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
            self.keyboard_enhanced = false;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change: full repaint for a clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            self.last_phase = Some(world.phase);
        }

        self.compose(world);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.cells.fill(Cell::INVALID);
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) { continue; }

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

    fn compose(&mut self, w: &WorldState) {
        self.front.clear();
        self.compose_hud(w);
        self.compose_map(w);
        self.compose_message(w);
        self.front.put_str(
            0, HELP_ROW,
            " Arrows/WASD:Dig  P:Pause  R:Restart  Q:Quit",
            Color::DarkGrey, Cell::BASE_BG,
        );

        match w.phase {
            Phase::GameOver => self.compose_game_over(w),
            Phase::Playing if w.paused => self.compose_pause_overlay(),
            Phase::Playing => {}
        }
    }

    fn compose_hud(&mut self, w: &WorldState) {
        self.front.fill_row(0, MAP_COLS, HUD_ROW, HUD_BG);
        self.front.fill_row(0, MAP_COLS, BARS_ROW, HUD_BG);

        let hud = format!(" DIRT {:<5} ENEMIES {}", w.player.dirt_dug, w.living_enemies().count());
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

        let bars = dig_bars(w.player.dirt_dug);
        for i in 0..bars {
            self.front.set(1 + i, BARS_ROW, Cell::new('▮', DIRT_BG, HUD_BG));
        }
    }

    fn compose_map(&mut self, w: &WorldState) {
        for (row, tiles) in w.grid.rows().enumerate() {
            for (col, &tile) in tiles.iter().enumerate() {
                let (ch, fg, bg) = tile_cells(tile);
                for half in 0..CELL_W {
                    self.front.set(col * CELL_W + half, MAP_ROW + row, Cell::new(ch, fg, bg));
                }
            }
        }

        let p = &w.player;
        self.compose_actor(p.col, p.row, p.facing, PLAYER_FG, PLAYER_BG);

        // Enemies last: a capture shows the enemy on the player's cell
        for e in w.living_enemies() {
            self.compose_actor(e.col, e.row, e.facing, ENEMY_FG, enemy_bg(e));
        }
    }

    fn compose_actor(&mut self, col: i32, row: i32, facing: Direction, fg: Color, bg: Color) {
        if col < 0 || row < 0 { return; }
        let (x, y) = (col as usize * CELL_W, MAP_ROW + row as usize);
        for (half, ch) in facing_glyphs(facing).into_iter().enumerate() {
            self.front.set(x + half, y, Cell::new(ch, fg, bg));
        }
    }

    fn compose_message(&mut self, w: &WorldState) {
        if w.message.is_empty() { return; }
        self.front.fill_row(0, MAP_COLS, MSG_ROW, MSG_BG);
        self.front.put_str(1, MSG_ROW, &w.message, Color::Black, MSG_BG);
    }

    /// Centered box over the grid.
    fn compose_box(&mut self, lines: &[(&str, Color)], bg: Color) {
        let box_w = MAP_COLS - 8;
        let box_h = lines.len() + 2;
        let x0 = (MAP_COLS - box_w) / 2;
        let y0 = MAP_ROW + (GRID_HEIGHT - box_h) / 2;

        for y in y0..y0 + box_h {
            self.front.fill_row(x0, x0 + box_w, y, bg);
        }
        for (i, (text, fg)) in lines.iter().enumerate() {
            let x = x0 + box_w.saturating_sub(text.chars().count()) / 2;
            self.front.put_str(x, y0 + 1 + i, text, *fg, bg);
        }
    }

    fn compose_game_over(&mut self, w: &WorldState) {
        let dug = format!("Dirt dug: {}", w.player.dirt_dug);
        let ticks = format!("Survived: {} ticks", w.tick);
        self.compose_box(&[
            ("HIT BY ENEMY!", Color::Rgb { r: 255, g: 60, b: 60 }),
            ("GAME OVER", Color::Rgb { r: 255, g: 60, b: 60 }),
            ("", Color::White),
            (dug.as_str(), Color::White),
            (ticks.as_str(), Color::White),
            ("", Color::White),
            ("R: Restart   Q: Quit", Color::Rgb { r: 80, g: 255, b: 80 }),
        ], Color::Rgb { r: 25, g: 0, b: 0 });
    }

    fn compose_pause_overlay(&mut self) {
        self.compose_box(&[
            ("PAUSED", Color::Rgb { r: 255, g: 220, b: 50 }),
            ("", Color::White),
            ("P: Resume   Q: Quit", Color::Rgb { r: 100, g: 200, b: 255 }),
        ], Color::Rgb { r: 40, g: 40, b: 40 });
    }
}
