/// Double-buffered, diff-based terminal renderer.
///
///   1. Compose the next screen into `front`
///   2. Compare with `back` (the previous screen)
///   3. Queue terminal commands only for cells that changed, flush once
///   4. Swap front/back
///
/// The renderer only ever sees a `Frame` (a detached copy of the grid and
/// counters) plus the current `Scene`. It never touches the live state.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::tile::Tile;
use crate::sim::resolve::Scene;
use crate::sim::world::Frame;

// ── Cell ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 12, g: 12, b: 24 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never equal to a real cell; filling `back` with it forces a repaint.
    const INVALID: Cell = Cell { ch: '\0', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: Cell::BASE_BG }
    }
}

// ── FrameBuffer ──

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
            *self = FrameBuffer::new(w, h);
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
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        self.put_str(self.width.saturating_sub(len) / 2, y, s, fg, bg);
    }
}

// ── Layout ──

/// Each grid cell takes two terminal columns so the maze looks square.
const CELL_W: usize = 2;
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const WALL_FG: Color = Color::Rgb { r: 40, g: 70, b: 200 };
const BEAN_FG: Color = Color::Rgb { r: 230, g: 200, b: 160 };
const HEART_FG: Color = Color::Rgb { r: 240, g: 60, b: 90 };
const PLAYER_FG: Color = Color::Rgb { r: 255, g: 220, b: 0 };
const GHOST_FG: Color = Color::Rgb { r: 120, g: 240, b: 240 };

/// Two-column rendering of a tile.
fn tile_cells(tile: Tile) -> [Cell; 2] {
    match tile {
        Tile::Floor => [Cell::BLANK, Cell::BLANK],
        Tile::Wall => [Cell::new('█', WALL_FG), Cell::new('█', WALL_FG)],
        Tile::Bean => [Cell::new('·', BEAN_FG), Cell::BLANK],
        Tile::Heart => [Cell::new('♥', HEART_FG), Cell::BLANK],
        Tile::Player => [Cell::new('●', PLAYER_FG), Cell::BLANK],
        Tile::Ghost => [Cell::new('ᗣ', GHOST_FG), Cell::BLANK],
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    last_scene: Option<Scene>,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            last_scene: None,
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
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.front.resize(tw as usize, th as usize);
        self.back.resize(tw as usize, th as usize);
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, frame: &Frame, scene: Scene) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let resized = tw as usize != self.front.width || th as usize != self.front.height;
        if resized || self.last_scene != Some(scene) {
            self.front.resize(tw as usize, th as usize);
            self.back.resize(tw as usize, th as usize);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_scene = Some(scene);
        }

        self.front.clear();
        compose(&mut self.front, frame, scene);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
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
}

// ── Compose ──

fn compose(buf: &mut FrameBuffer, frame: &Frame, scene: Scene) {
    compose_hud(buf, frame);
    compose_maze(buf, frame);
    match scene {
        Scene::Play => {}
        Scene::Win => compose_banner(buf, frame, "YOU WIN!", Color::Rgb { r: 80, g: 220, b: 80 }),
        Scene::Lose => compose_banner(buf, frame, "GAME OVER", Color::Rgb { r: 220, g: 60, b: 60 }),
    }
    let help_row = MAP_ROW + frame.grid.height + 1;
    let help = match scene {
        Scene::Play => " Arrows/WASD: move   Esc/Q: quit ",
        Scene::Win | Scene::Lose => " Enter: exit   Esc/Q: quit ",
    };
    buf.put_str(0, help_row, help, Color::DarkGrey, Cell::BASE_BG);
}

fn compose_hud(buf: &mut FrameBuffer, frame: &Frame) {
    let hud = format!(" GHOST MAZE   Score {:>5}/{:<5}  Life ", frame.score, frame.win_score);
    buf.put_str(0, HUD_ROW, &hud, Color::White, Cell::BASE_BG);
    let hearts_x = hud.chars().count();
    for i in 0..frame.life as usize {
        buf.set(hearts_x + i, HUD_ROW, Cell::new('♥', HEART_FG));
    }
}

fn compose_maze(buf: &mut FrameBuffer, frame: &Frame) {
    for (y, row) in frame.grid.rows().iter().enumerate() {
        for (x, &tile) in row.iter().enumerate() {
            let [left, right] = tile_cells(tile);
            buf.set(x * CELL_W, MAP_ROW + y, left);
            buf.set(x * CELL_W + 1, MAP_ROW + y, right);
        }
    }
}

/// Three-line box in the middle of the maze.
fn compose_banner(buf: &mut FrameBuffer, frame: &Frame, title: &str, bg: Color) {
    let mid = MAP_ROW + frame.grid.height / 2;
    let score = format!("  Score {}  ", frame.score);
    let width = title.len().max(score.len()) + 4;
    let pad = |s: &str| format!("{:^width$}", s, width = width);
    buf.put_centered_in(frame, mid - 1, &pad(""), bg);
    buf.put_centered_in(frame, mid, &pad(title), bg);
    buf.put_centered_in(frame, mid + 1, &pad(score.trim()), bg);
}

impl FrameBuffer {
    /// Center `s` over the maze area rather than the whole terminal.
    fn put_centered_in(&mut self, frame: &Frame, y: usize, s: &str, bg: Color) {
        let maze_w = frame.grid.width * CELL_W;
        if maze_w == 0 {
            return self.put_centered(y, s, Color::White, bg);
        }
        let x = maze_w.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, Color::White, bg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::resolve::tests::state_from;

    fn composed(rows: &[&str], scene: Scene) -> (FrameBuffer, Frame) {
        let frame = state_from(rows).frame();
        let mut buf = FrameBuffer::new(80, 30);
        compose(&mut buf, &frame, scene);
        (buf, frame)
    }

    fn row_text(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect()
    }

    #[test]
    fn maze_cells_are_two_columns_wide() {
        let (buf, _) = composed(&["#P.G*"], Scene::Play);
        assert_eq!(buf.get(0, MAP_ROW).ch, '█');
        assert_eq!(buf.get(1, MAP_ROW).ch, '█');
        assert_eq!(buf.get(2, MAP_ROW).ch, '●');
        assert_eq!(buf.get(4, MAP_ROW).ch, '·');
        assert_eq!(buf.get(6, MAP_ROW).ch, 'ᗣ');
        assert_eq!(buf.get(8, MAP_ROW).ch, '♥');
        assert_eq!(buf.get(9, MAP_ROW), Cell::BLANK);
    }

    #[test]
    fn hud_shows_score_and_one_heart_per_life() {
        let (buf, frame) = composed(&["P.."], Scene::Play);
        let hud = row_text(&buf, HUD_ROW);
        assert!(hud.contains("0/20"), "{hud}");
        assert_eq!(hud.matches('♥').count(), frame.life as usize);
    }

    #[test]
    fn end_scenes_draw_a_banner() {
        let rows = ["#########", "#P.....G#", "#########"];
        let (buf, _) = composed(&rows, Scene::Win);
        assert!((0..buf.height).any(|y| row_text(&buf, y).contains("YOU WIN!")));

        let (buf, _) = composed(&rows, Scene::Lose);
        assert!((0..buf.height).any(|y| row_text(&buf, y).contains("GAME OVER")));
        assert!(!(0..buf.height).any(|y| row_text(&buf, y).contains("YOU WIN!")));
    }
}
