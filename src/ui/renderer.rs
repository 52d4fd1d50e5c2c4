/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Glyph)
///   2. Compare each glyph with `back` buffer (previous frame)
///   3. Only emit terminal commands for glyphs that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen layout (each grid cell is two terminal columns wide):
///
/// ```text
///   row 0        Score: 40   Best: 120   Length: 7
///   row 1        ┌────────────────────────────────┐
///   rows 2..=25  │          playfield             │
///   row 26       └────────────────────────────────┘
///   row 27       P pause | R restart | Esc quit
/// ```

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use rand::Rng;

use crate::domain::grid::{Cell, Heading, COLUMNS, ROWS};
use crate::sim::event::Crash;
use crate::sim::session::{Mode, Session};

// ── Glyph: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    /// Explicit background for every "empty" terminal cell, so the
    /// playfield never shows the terminal's own default colour.
    const BASE_BG: Color = Color::Rgb { r: 30, g: 30, b: 30 };

    const BLANK: Glyph = Glyph { ch: ' ', fg: Color::White, bg: Glyph::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    /// Different from any real glyph, so every position will be diff'd.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Glyph { ch, fg, bg }
    }
}

// ── Palette ──

const GRID_MARK: Color = Color::Rgb { r: 60, g: 60, b: 60 };
const BORDER: Color = Color::Rgb { r: 90, g: 90, b: 90 };
const HEAD: Color = Color::Rgb { r: 0, g: 200, b: 0 };
const BODY: Color = Color::Rgb { r: 0, g: 170, b: 0 };
const FOOD: Color = Color::Rgb { r: 200, g: 0, b: 0 };
const HINT: Color = Color::Rgb { r: 180, g: 180, b: 180 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const OVERLAY_BG: Color = Color::Rgb { r: 45, g: 45, b: 45 };
const TITLE_RED: Color = Color::Rgb { r: 255, g: 60, b: 60 };
const TITLE_GOLD: Color = Color::Rgb { r: 255, g: 220, b: 50 };

// ── FrameBuffer: a 2D grid of Glyphs ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Glyph::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, g: Glyph) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = g;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Glyph::new(ch, fg, bg));
        }
    }

    /// Write a string horizontally centred between columns `left..left+span`.
    fn put_centered(&mut self, left: usize, span: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = left + span.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Glyph::new(' ', Color::White, bg));
        }
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

// ── Renderer ──

/// Terminal columns per grid cell.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const BORDER_TOP: usize = 1;
const FIELD_ROW: usize = BORDER_TOP + 1;
const BORDER_BOTTOM: usize = FIELD_ROW + ROWS;
const HINT_ROW: usize = BORDER_BOTTOM + 1;

pub const REQUIRED_COLS: usize = COLUMNS * CELL_W + 2;
pub const REQUIRED_ROWS: usize = HINT_ROW + 1;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_mode: Option<Mode>,
    show_grid: bool,
}

impl Renderer {
    pub fn new(show_grid: bool) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_mode: None,
            show_grid,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Glyph::BASE_BG),
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
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render<R: Rng>(&mut self, session: &Session<R>, pad_connected: bool) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
        }

        // Mode change → clear for a clean transition
        if self.last_mode != Some(session.mode()) {
            self.back.cells.fill(Glyph::INVALID);
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
            self.last_mode = Some(session.mode());
        }

        self.compose(session, pad_connected);
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
        // Force full repaint: back ≠ front for every glyph.
        self.back.cells.fill(Glyph::INVALID);
    }

    /// Left edge of the framed playfield (the border column).
    fn origin_x(&self) -> usize {
        self.term_w.saturating_sub(REQUIRED_COLS) / 2
    }

    // ── Diff flush: only write changed glyphs ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Glyph::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours; ResetColor would fall back to the
        // terminal's own default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Glyph::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let g = self.front.get(x, y);
                if g == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if g.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(g.fg))?;
                    last_fg = g.fg;
                }
                if g.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(g.bg))?;
                    last_bg = g.bg;
                }
                queue!(self.writer, Print(g.ch))?;

                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose<R: Rng>(&mut self, session: &Session<R>, pad_connected: bool) {
        self.front.clear();

        if self.term_w < REQUIRED_COLS || self.term_h < REQUIRED_ROWS {
            self.compose_too_small();
            return;
        }

        match session.mode() {
            Mode::Running => self.compose_game(session, pad_connected),
            Mode::Paused => {
                self.compose_game(session, pad_connected);
                self.compose_pause_overlay();
            }
            Mode::GameOver => self.compose_game_over(session),
            Mode::Won => self.compose_won(session),
        }
    }

    fn compose_game<R: Rng>(&mut self, session: &Session<R>, pad_connected: bool) {
        let ox = self.origin_x();

        // ── HUD row ──
        let hud = format!(
            " Score: {:<6} Best: {:<6} Length: {}",
            session.score(),
            session.best_score(),
            session.snake().len(),
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(ox, HUD_ROW, &hud, Color::White, HUD_BG);

        self.compose_border(ox);

        // ── Playfield ──
        for row in 0..ROWS {
            for col in 0..COLUMNS {
                let (x, y) = (ox + 1 + col * CELL_W, FIELD_ROW + row);
                let mark = if self.show_grid { '·' } else { ' ' };
                self.front.set(x, y, Glyph::new(mark, GRID_MARK, Glyph::BASE_BG));
                self.front.set(x + 1, y, Glyph::new(' ', GRID_MARK, Glyph::BASE_BG));
            }
        }

        if let Some(food) = session.food() {
            self.fill_cell(ox, food, FOOD, ' ');
        }

        // Tail first so the head is never hidden by an overlapping segment.
        let snake = session.snake();
        for (i, &seg) in snake.body().iter().enumerate().rev() {
            if i == 0 {
                self.fill_cell(ox, seg, HEAD, head_char(snake.heading()));
            } else {
                self.fill_cell(ox, seg, BODY, ' ');
            }
        }

        // ── Hint line ──
        let hint = if pad_connected {
            " P pause | R restart | Esc quit   Pad: Start pause, A restart"
        } else {
            " P pause | R restart | Esc quit"
        };
        self.front.put_str(ox, HINT_ROW, hint, HINT, Glyph::BASE_BG);
    }

    fn compose_border(&mut self, ox: usize) {
        let right = ox + REQUIRED_COLS - 1;
        for x in ox + 1..right {
            self.front.set(x, BORDER_TOP, Glyph::new('─', BORDER, Glyph::BASE_BG));
            self.front.set(x, BORDER_BOTTOM, Glyph::new('─', BORDER, Glyph::BASE_BG));
        }
        for y in FIELD_ROW..BORDER_BOTTOM {
            self.front.set(ox, y, Glyph::new('│', BORDER, Glyph::BASE_BG));
            self.front.set(right, y, Glyph::new('│', BORDER, Glyph::BASE_BG));
        }
        self.front.set(ox, BORDER_TOP, Glyph::new('┌', BORDER, Glyph::BASE_BG));
        self.front.set(right, BORDER_TOP, Glyph::new('┐', BORDER, Glyph::BASE_BG));
        self.front.set(ox, BORDER_BOTTOM, Glyph::new('└', BORDER, Glyph::BASE_BG));
        self.front.set(right, BORDER_BOTTOM, Glyph::new('┘', BORDER, Glyph::BASE_BG));
    }

    /// Paint one grid cell as a solid block, `mark` in its left half.
    /// Off-grid cells are skipped.
    fn fill_cell(&mut self, ox: usize, cell: Cell, color: Color, mark: char) {
        let (col, row) = (cell.column(), cell.row());
        if col < 0 || row < 0 || col as usize >= COLUMNS || row as usize >= ROWS {
            return;
        }
        let x = ox + 1 + col as usize * CELL_W;
        let y = FIELD_ROW + row as usize;
        self.front.set(x, y, Glyph::new(mark, Color::Black, color));
        for dx in 1..CELL_W {
            self.front.set(x + dx, y, Glyph::new(' ', Color::Black, color));
        }
    }

    fn compose_pause_overlay(&mut self) {
        let ox = self.origin_x();
        let box_w = 36;
        let box_h = 5;
        let bx = ox + (REQUIRED_COLS - box_w) / 2;
        let by = FIELD_ROW + (ROWS - box_h) / 2;

        for y in by..by + box_h {
            for x in bx..bx + box_w {
                self.front.set(x, y, Glyph::new(' ', Color::White, OVERLAY_BG));
            }
        }
        self.front.put_centered(bx, box_w, by + 1, "PAUSED", TITLE_GOLD, OVERLAY_BG);
        self.front.put_centered(bx, box_w, by + 3, "Press P to resume", HINT, OVERLAY_BG);
    }

    fn compose_game_over<R: Rng>(&mut self, session: &Session<R>) {
        let cause = match session.crash() {
            Some(Crash::Wall) => "You hit the wall.",
            Some(Crash::SelfBite) => "You ran into yourself.",
            None => "",
        };
        let score = format!("Final score: {}", session.score());
        let best = format!("Best this run: {}", session.best_score());
        let lines = [
            ("GAME OVER", TITLE_RED),
            ("", Color::White),
            (cause, HINT),
            ("", Color::White),
            (score.as_str(), Color::White),
            (best.as_str(), HINT),
            ("", Color::White),
            ("Press R to restart or Esc to quit", HINT),
        ];
        self.compose_centered_lines(&lines);
    }

    fn compose_won<R: Rng>(&mut self, session: &Session<R>) {
        let score = format!("Final score: {}", session.score());
        let lines = [
            ("BOARD FULL - YOU WIN!", TITLE_GOLD),
            ("", Color::White),
            (score.as_str(), Color::White),
            ("", Color::White),
            ("Press R to play again or Esc to quit", HINT),
        ];
        self.compose_centered_lines(&lines);
    }

    fn compose_too_small(&mut self) {
        let need = format!("Terminal too small: need {}x{}", REQUIRED_COLS, REQUIRED_ROWS);
        let have = format!("current size {}x{}", self.term_w, self.term_h);
        let lines = [
            (need.as_str(), TITLE_GOLD),
            (have.as_str(), HINT),
            ("Esc to quit", HINT),
        ];
        self.compose_centered_lines(&lines);
    }

    fn compose_centered_lines(&mut self, lines: &[(&str, Color)]) {
        let top = self.term_h.saturating_sub(lines.len()) / 2;
        for (i, (text, fg)) in lines.iter().enumerate() {
            self.front.put_centered(0, self.term_w, top + i, text, *fg, Glyph::BASE_BG);
        }
    }
}

fn head_char(heading: Heading) -> char {
    match heading {
        Heading::Up => '^',
        Heading::Down => 'v',
        Heading::Left => '<',
        Heading::Right => '>',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::Signal;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn renderer(w: usize, h: usize) -> Renderer {
        let mut r = Renderer::new(true);
        r.resize(w, h);
        r
    }

    fn screen(r: &Renderer) -> String {
        (0..r.front.height).map(|y| r.front.row_text(y)).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn running_frame_shows_snake_food_and_hud() {
        let session = Session::with_rng(StdRng::seed_from_u64(1));
        let mut r = renderer(REQUIRED_COLS, REQUIRED_ROWS);
        r.compose(&session, false);

        assert!(r.front.row_text(HUD_ROW).contains("Score: 0"));
        assert!(r.front.row_text(HINT_ROW).contains("P pause | R restart | Esc quit"));

        // Head at (320,240) = column 16, row 12.
        let head = r.front.get(1 + 16 * CELL_W, FIELD_ROW + 12);
        assert_eq!(head.bg, HEAD);
        assert_eq!(head.ch, '>');
        let neck = r.front.get(1 + 15 * CELL_W, FIELD_ROW + 12);
        assert_eq!(neck.bg, BODY);

        let food = session.food().unwrap();
        let g = r.front.get(1 + food.column() as usize * CELL_W, FIELD_ROW + food.row() as usize);
        assert_eq!(g.bg, FOOD);
    }

    #[test]
    fn pause_overlay_drawn_over_field() {
        let mut session = Session::with_rng(StdRng::seed_from_u64(2));
        session.handle_signal(Signal::TogglePause, &mut vec![]);
        let mut r = renderer(REQUIRED_COLS, REQUIRED_ROWS);
        r.compose(&session, false);
        let text = screen(&r);
        assert!(text.contains("PAUSED"));
        assert!(text.contains("Score: 0"));
    }

    #[test]
    fn game_over_view_replaces_field() {
        let mut session = Session::with_rng(StdRng::seed_from_u64(3));
        while session.mode() == Mode::Running {
            session.tick();
        }
        let mut r = renderer(100, 40);
        r.compose(&session, false);
        let text = screen(&r);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("You hit the wall."));
        assert!(text.contains("Final score:"));
        assert!(text.contains("Press R to restart or Esc to quit"));
        assert!(!text.contains('┌'));
    }

    #[test]
    fn small_terminal_gets_notice() {
        let session = Session::with_rng(StdRng::seed_from_u64(4));
        let mut r = renderer(40, 10);
        r.compose(&session, false);
        assert!(screen(&r).contains("Terminal too small"));
    }

    #[test]
    fn grid_marks_follow_setting() {
        let session = Session::with_rng(StdRng::seed_from_u64(5));
        let mut with_grid = renderer(REQUIRED_COLS, REQUIRED_ROWS);
        with_grid.compose(&session, false);
        let mut without = renderer(REQUIRED_COLS, REQUIRED_ROWS);
        without.show_grid = false;
        without.compose(&session, false);

        // Row 0 is never under the default snake; skip the food cell.
        let col = (0..COLUMNS as i32)
            .find(|&c| session.food() != Some(Cell::at(c, 0)))
            .unwrap() as usize;
        let x = 1 + col * CELL_W;
        assert_eq!(with_grid.front.get(x, FIELD_ROW).ch, '·');
        assert_eq!(without.front.get(x, FIELD_ROW).ch, ' ');
    }
}
