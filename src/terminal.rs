use crate::canvas::{Canvas, Color};
use crate::error::Result;
use crate::raster::{self, ClipBox};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

// Braille constants (2x4 dot grid per character)
const BRAILLE_BASE: u32 = 0x2800;
const DOTS_X: usize = 2;
const DOTS_Y: usize = 4;

// Bit for each dot, indexed [row][column]
const DOT_BITS: [[u32; DOTS_X]; DOTS_Y] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Minimum time between two screen refreshes from `present`
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Encode 2x4 dot pattern to braille character
fn encode_braille(dots: &[[bool; DOTS_X]; DOTS_Y]) -> char {
    let mut code: u32 = 0;
    for (row, bits) in dots.iter().zip(DOT_BITS.iter()) {
        for (&on, &bit) in row.iter().zip(bits.iter()) {
            if on {
                code |= bit;
            }
        }
    }
    char::from_u32(BRAILLE_BASE + code).unwrap_or(' ')
}

fn term_color(c: Color) -> TermColor {
    let [r, g, b] = c.0;
    TermColor::Rgb { r, g, b }
}

/// Canvas previewed in the terminal as colored braille.
///
/// The logical canvas keeps its pixel size; drawing is scaled uniformly
/// onto a dot grid of 2x4 dots per cell and centered. Each cell shows the
/// first lit dot's color.
pub struct TerminalCanvas {
    width: u32,
    height: u32,
    cols: u16,
    rows: u16,
    scale: f64,
    offset: (f64, f64),
    background: Color,
    dots: Vec<Option<Color>>,
    status: String,
    alternate_screen: bool,
    last_present: Option<Instant>,
}

impl TerminalCanvas {
    /// Take over the terminal (raw mode, alternate screen) for live drawing.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self> {
        let (cols, rows) = size()?;
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        let mut canvas = Self::with_cells(width, height, cols, rows, background);
        canvas.alternate_screen = true;
        Ok(canvas)
    }

    /// Off-screen canvas of `cols × rows` cells, for print mode.
    pub fn with_cells(width: u32, height: u32, cols: u16, rows: u16, background: Color) -> Self {
        let grid_w = cols as f64 * DOTS_X as f64;
        let grid_h = rows as f64 * DOTS_Y as f64;
        let scale = (grid_w / width.max(1) as f64).min(grid_h / height.max(1) as f64);
        let offset = (
            (grid_w - width as f64 * scale) / 2.0,
            (grid_h - height as f64 * scale) / 2.0,
        );
        Self {
            width,
            height,
            cols,
            rows,
            scale,
            offset,
            background,
            dots: vec![None; cols as usize * DOTS_X * rows as usize * DOTS_Y],
            status: String::new(),
            alternate_screen: false,
            last_present: None,
        }
    }

    /// Terminal size in cells
    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Text shown on the bottom row by `render`
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn grid_width(&self) -> usize {
        self.cols as usize * DOTS_X
    }

    fn grid_height(&self) -> usize {
        self.rows as usize * DOTS_Y
    }

    fn clip(&self) -> ClipBox {
        ClipBox::for_grid(self.grid_width() as u32, self.grid_height() as u32, 0.0)
    }

    fn to_dots(&self, x: f64, y: f64) -> (f64, f64) {
        (self.offset.0 + x * self.scale, self.offset.1 + y * self.scale)
    }

    fn plot(dots: &mut [Option<Color>], grid_w: usize, color: Color) -> impl FnMut(i32, i32) + '_ {
        move |x, y| dots[y as usize * grid_w + x as usize] = Some(color)
    }

    /// Braille glyph and color for one cell, `None` when nothing is lit.
    pub fn cell(&self, col: u16, row: u16) -> Option<(char, Color)> {
        let grid_w = self.grid_width();
        let mut dots = [[false; DOTS_X]; DOTS_Y];
        let mut color = None;
        for (dy, row_dots) in dots.iter_mut().enumerate() {
            for (dx, dot) in row_dots.iter_mut().enumerate() {
                let gx = col as usize * DOTS_X + dx;
                let gy = row as usize * DOTS_Y + dy;
                if let Some(c) = self.dots[gy * grid_w + gx] {
                    if c != self.background {
                        *dot = true;
                        color.get_or_insert(c);
                    }
                }
            }
        }
        color.map(|c| (encode_braille(&dots), c))
    }

    /// Redraw the whole screen from the dot grid.
    pub fn render(&mut self) -> Result<()> {
        let mut out = stdout();
        queue!(out, SetBackgroundColor(term_color(self.background)))?;
        for row in 0..self.rows {
            queue!(out, MoveTo(0, row))?;
            for col in 0..self.cols {
                match self.cell(col, row) {
                    Some((ch, color)) => queue!(out, SetForegroundColor(term_color(color)), Print(ch))?,
                    None => queue!(out, Print(' '))?,
                }
            }
        }
        if !self.status.is_empty() && self.rows > 0 {
            let status: String = self.status.chars().take(self.cols as usize).collect();
            queue!(
                out,
                MoveTo(0, self.rows - 1),
                SetForegroundColor(TermColor::DarkGrey),
                Print(status)
            )?;
        }
        queue!(out, ResetColor)?;
        out.flush()?;
        self.last_present = Some(Instant::now());
        Ok(())
    }

    /// Wait for a keypress with timeout
    pub fn wait_key(&self, timeout_ms: u64) -> Result<Option<KeyCode>> {
        if poll(Duration::from_millis(timeout_ms))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some(key_event.code));
            }
        }
        Ok(None)
    }

    /// Print the dot grid to stdout with ANSI colors (for print mode)
    pub fn print_to_stdout(&self) {
        for row in 0..self.rows {
            let mut line = String::new();
            for col in 0..self.cols {
                match self.cell(col, row) {
                    Some((ch, color)) => {
                        let [r, g, b] = color.0;
                        line.push_str(&format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, ch));
                    }
                    None => line.push(' '),
                }
            }
            println!("{}", line.trim_end());
        }
    }
}

impl Canvas for TerminalCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill(&mut self, color: Color) {
        self.background = color;
        self.dots.iter_mut().for_each(|d| *d = None);
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, stroke_width: f64) {
        let half = (stroke_width * self.scale / 2.0).max(0.5);
        let from = self.to_dots(x1, y1);
        let to = self.to_dots(x2, y2);
        let clip = self.clip();
        let grid_w = self.grid_width();
        raster::stroke_segment(from, to, (half, half), &clip, Self::plot(&mut self.dots, grid_w, color));
    }

    fn draw_ellipse(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let center = self.to_dots(cx, cy);
        let r = radius * self.scale;
        let clip = self.clip();
        let grid_w = self.grid_width();
        raster::fill_ellipse(center, (r, r), &clip, Self::plot(&mut self.dots, grid_w, color));
    }

    /// Refresh the screen, at most once per frame interval. Off-screen
    /// canvases never draw.
    fn present(&mut self) -> Result<()> {
        if !self.alternate_screen {
            return Ok(());
        }
        if let Some(last) = self.last_present {
            if last.elapsed() < FRAME_INTERVAL {
                return Ok(());
            }
        }
        self.render()
    }
}

impl Drop for TerminalCanvas {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), ResetColor, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}
