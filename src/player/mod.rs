//! Player — the interactive frame driver.
//!
//! Pumps terminal input, keeps a fixed frame rate, and presents each
//! composed frame on the terminal. Game-specific input is not handled
//! here; the one control signal the loop honours is quit.

pub mod clock;
pub mod halfblock;

use std::io::{self, Write};
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::{cursor, execute, queue, style, terminal};

use crate::engine::Engine;
use crate::renderer::{RenderContext, Renderer};
use crate::types::Point;
use clock::Clock;
use halfblock::HalfCell;

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;
/// Menu bar plus status bar.
const CHROME_ROWS: u16 = 2;

const MENU_ITEMS: &[&str] = &[
    "[move] hover",
    "[click] draw",
    "[right-click] discard",
    "[h] hand",
    "[q][Esc] quit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct Player {
    engine: Engine,
    ctx: RenderContext,
    clock: Clock,
    pointer: Option<Point>,
    cols: u16,
    rows: u16,
    grid: Vec<Vec<HalfCell>>,
}

impl Player {
    pub fn new(engine: Engine, ctx: RenderContext, fps: u32) -> Self {
        Self {
            engine,
            ctx,
            clock: Clock::new(fps),
            pointer: None,
            cols: 80,
            rows: 24 - CHROME_ROWS,
            grid: Vec::new(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Run the loop until quit.
    ///
    /// Sets up the terminal and restores it on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        self.resize(term_w, term_h);

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        let _ = execute!(
            stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.render_menubar(stdout)?;
        loop {
            if self.pump_events()? == Control::Quit {
                break;
            }
            self.present(stdout)?;
            self.clock.tick();
        }
        Ok(())
    }

    /// Drain input until the current frame's deadline.
    fn pump_events(&mut self) -> Result<Control> {
        loop {
            let timeout = self.clock.remaining(Instant::now());
            if !event::poll(timeout)? {
                return Ok(Control::Continue);
            }
            if self.handle_event(event::read()?) == Control::Quit {
                return Ok(Control::Quit);
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) -> Control {
        match event {
            Event::Key(KeyEvent {
                code, modifiers, ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => return Control::Quit,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Control::Quit;
                }
                KeyCode::Char('h') => self.engine.toggle_hand(),
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                self.pointer = self.cell_to_canvas(column, row);
                match kind {
                    MouseEventKind::Up(MouseButton::Left) => {
                        self.engine.draw_card();
                    }
                    MouseEventKind::Up(MouseButton::Right) => {
                        self.engine.discard_last();
                    }
                    _ => {}
                }
            }
            Event::Resize(w, h) => self.resize(w, h),
            _ => {}
        }
        Control::Continue
    }

    fn resize(&mut self, term_w: u16, term_h: u16) {
        self.cols = term_w.max(1);
        self.rows = term_h.saturating_sub(CHROME_ROWS).max(1);
        self.grid.clear();
    }

    /// Map a terminal cell to canvas pixels; cells outside the canvas area
    /// leave no pointer.
    fn cell_to_canvas(&self, column: u16, row: u16) -> Option<Point> {
        let row = row.checked_sub(CANVAS_OFFSET)?;
        if row >= self.rows || column >= self.cols {
            return None;
        }
        let vp = self.ctx.viewport();
        Some(halfblock::cell_to_pixel(
            column,
            row,
            self.cols,
            self.rows,
            vp.width(),
            vp.height(),
        ))
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn present(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let viewport = *self.ctx.viewport();
        let frame = self.engine.resolve_frame(&viewport, self.pointer);
        Renderer::rasterize(&frame, &mut self.ctx);

        let next = halfblock::sample(self.ctx.canvas(), self.cols, self.rows);
        if self.grid.is_empty() {
            for (y, row) in next.iter().enumerate() {
                queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
                for cell in row {
                    print_cell(stdout, cell)?;
                }
            }
        } else {
            for change in halfblock::diff(&self.grid, &next) {
                queue!(stdout, cursor::MoveTo(change.x, change.y + CANVAS_OFFSET))?;
                print_cell(stdout, &change.cell)?;
            }
        }
        self.grid = next;
        self.render_status(stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::SetAttribute(style::Attribute::Dim),
            style::Print(format!(" {}", MENU_ITEMS.join("  "))),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status = format!(
            " hand {} | pile {} | {} ",
            self.engine.hand().len(),
            self.engine.draw_pile_len(),
            if self.engine.hand_visible() { "shown" } else { "hidden" },
        );
        queue!(
            stdout,
            style::ResetColor,
            cursor::MoveTo(0, self.rows + CANVAS_OFFSET),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::SetAttribute(style::Attribute::Dim),
            style::Print(status),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        Ok(())
    }
}

fn print_cell(stdout: &mut io::Stdout, cell: &HalfCell) -> Result<()> {
    let [r, g, b] = cell.top;
    let [br, bg, bb] = cell.bottom;
    queue!(
        stdout,
        style::SetForegroundColor(style::Color::Rgb { r, g, b }),
        style::SetBackgroundColor(style::Color::Rgb {
            r: br,
            g: bg,
            b: bb
        }),
        style::Print('\u{2580}'),
    )?;
    Ok(())
}
