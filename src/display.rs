use crate::framebuffer::{Framebuffer, HEIGHT, WIDTH};
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the host loop to put the framebuffer on a screen. The
/// interpreter never talks to it directly, so any kind of screen will work.
pub trait Display {
    /// draw the whole framebuffer; sound_active lets the display show that
    /// the machine is beeping
    fn draw(&mut self, fb: &Framebuffer, sound_active: bool) -> Result<(), io::Error>;
}

fn x_bounds() -> [f64; 2] {
    [0.0, (WIDTH - 1) as f64]
}

fn y_bounds() -> [f64; 2] {
    [-1.0 * (HEIGHT - 1) as f64, 0.0]
}

/// canvas coords of every lit pixel; y grows downward on the chip-8 but
/// upward on the canvas
fn lit_points(fb: &Framebuffer) -> Vec<(f64, f64)> {
    fb.lit().map(|(x, y)| (x as f64, -1.0 * y as f64)).collect()
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(MonoTermDisplay { terminal })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, fb: &Framebuffer, sound_active: bool) -> Result<(), io::Error> {
        let title = if sound_active { "CHIP-8 *BEEP*" } else { "CHIP-8" };
        let points = lit_points(fb);

        // for now this assumes a 1:1 ratio between terminal cells and chip-8
        // pixels
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + WIDTH as u16, 2 + HEIGHT as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(x_bounds())
                .y_bounds(y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &points,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing the host loop without a terminal
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: usize,
    pub last_frame: Vec<u8>,
    pub beeped: bool,
}

impl DummyDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, fb: &Framebuffer, sound_active: bool) -> Result<(), io::Error> {
        self.frames += 1;
        self.last_frame = fb.cells().to_vec();
        self.beeped |= sound_active;
        Ok(())
    }
}
