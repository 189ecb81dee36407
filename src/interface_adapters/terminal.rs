// Terminal front end: cell-grid canvas, readout rows, and key input.

use crate::domain::LaunchParams;
use crate::interface_adapters::canvas::{Projection, Surface};
use crate::interface_adapters::readout::{ReadoutSink, format_sig};
use crate::use_cases::{FrameUpdate, RunLifecycle, Session};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, queue, style, terminal};
use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::warn;

/// Character cells standing in for the pixel surface.
pub const CANVAS_COLS: u16 = 80;
pub const CANVAS_ROWS: u16 = 30;

const BALL: &str = "●";
const TITLE_ROW: u16 = 0;
const CANVAS_TOP: u16 = 1;
const GROUND_ROW: u16 = CANVAS_TOP + CANVAS_ROWS;
const READOUT_ROW: u16 = GROUND_ROW + 1;
const HELP_ROW: u16 = READOUT_ROW + 3;

/// Puts the terminal into raw alternate-screen mode.
pub fn setup() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    if let Err(e) = execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide) {
        let _ = terminal::disable_raw_mode();
        return Err(e);
    }
    Ok(())
}

/// Restores the terminal to cooked mode.
pub fn teardown() -> io::Result<()> {
    execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()
}

/// Owns the interactive screen: ball cell, readout rows, static chrome.
///
/// The pixel surface is mapped onto a character grid, so a "pixel" circle
/// collapses to the single cell its center lands in.
pub struct TerminalView {
    out: Stdout,
    px_per_cell_x: f64,
    px_per_cell_y: f64,
    ball_cell: Option<(u16, u16)>,
}

impl TerminalView {
    pub fn new(out: Stdout, surface_width_px: f64, surface_height_px: f64) -> Self {
        Self {
            out,
            px_per_cell_x: surface_width_px / f64::from(CANVAS_COLS),
            px_per_cell_y: surface_height_px / f64::from(CANVAS_ROWS),
            ball_cell: None,
        }
    }

    /// Paints the parts of the screen that never change during a run.
    pub fn draw_chrome(&mut self, params: &LaunchParams) -> io::Result<()> {
        queue!(
            self.out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, TITLE_ROW),
            style::Print(format!(
                "flightdeck — height {} m · speed {} m/s · angle {}°",
                format_sig(params.height_m),
                format_sig(params.speed_mps),
                format_sig(params.angle_deg),
            )),
            cursor::MoveTo(0, GROUND_ROW),
            style::Print("─".repeat(usize::from(CANVAS_COLS))),
            cursor::MoveTo(0, HELP_ROW),
            style::Print("enter start/resume · space pause · r restart · q quit"),
        )?;
        self.out.flush()
    }

    fn cell_of(&self, x_px: f64, y_px: f64) -> Option<(u16, u16)> {
        if x_px < 0.0 || y_px < 0.0 {
            return None;
        }
        if y_px > self.px_per_cell_y * f64::from(CANVAS_ROWS) {
            return None;
        }
        let col = (x_px / self.px_per_cell_x).floor() as u32;
        if col >= u32::from(CANVAS_COLS) {
            return None;
        }
        // Ground level lands exactly on the bottom edge; keep it visible.
        let row = ((y_px / self.px_per_cell_y).floor() as u32).min(u32::from(CANVAS_ROWS) - 1);
        Some((col as u16, CANVAS_TOP + row as u16))
    }
}

impl Surface for TerminalView {
    fn clear(&mut self) -> io::Result<()> {
        // Only the ball moves; wiping its previous cell beats repainting
        // the whole grid every step.
        if let Some((col, row)) = self.ball_cell.take() {
            queue!(self.out, cursor::MoveTo(col, row), style::Print(" "))?;
        }
        Ok(())
    }

    fn fill_circle(&mut self, x_px: f64, y_px: f64) -> io::Result<()> {
        if let Some((col, row)) = self.cell_of(x_px, y_px) {
            queue!(self.out, cursor::MoveTo(col, row), style::Print(BALL))?;
            self.ball_cell = Some((col, row));
        }
        self.out.flush()
    }
}

impl ReadoutSink for TerminalView {
    fn publish(&mut self, frame: &FrameUpdate) -> io::Result<()> {
        let s = &frame.state;
        queue!(
            self.out,
            cursor::MoveTo(0, READOUT_ROW),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(format!(
                "time {} s    x {} m    y {} m",
                format_sig(s.t),
                format_sig(s.x),
                format_sig(s.y),
            )),
            cursor::MoveTo(0, READOUT_ROW + 1),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(format!(
                "vx {} m/s    vy {} m/s    net {} m/s",
                format_sig(s.vx),
                format_sig(s.vy),
                format_sig(s.net_speed()),
            )),
        )?;
        self.out.flush()
    }
}

/// Terminal-mode sink: one task owns the screen and plays both observer
/// roles, so ball and readouts never interleave their escape sequences.
pub async fn view_task(
    mut frame_rx: broadcast::Receiver<FrameUpdate>,
    mut view: TerminalView,
    projection: Projection,
) {
    loop {
        match frame_rx.recv().await {
            Ok(frame) => {
                let x = projection.x_px(frame.state.x);
                let y = projection.y_px(frame.state.y);
                let drawn = view
                    .clear()
                    .and_then(|_| view.fill_circle(x, y))
                    .and_then(|_| view.publish(&frame));
                if let Err(e) = drawn {
                    warn!(error = %e, "terminal draw failed; view exiting");
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "terminal view lagged; skipping to latest frame");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Blocking key loop; feeds the session until quit, stop, or a read error.
///
/// Runs on a blocking thread so `event::poll` never stalls the runtime.
pub fn input_loop(session: &Session, params: LaunchParams, stop: &AtomicBool) -> io::Result<()> {
    while !stop.load(Ordering::Relaxed) {
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Enter => match session.phase() {
                // Enter doubles as the resume affordance while paused.
                RunLifecycle::Paused => session.set_paused(false),
                RunLifecycle::Idle | RunLifecycle::Finished => {
                    let _ = session.start(params);
                }
                RunLifecycle::Running => {}
            },
            KeyCode::Char(' ') => match session.phase() {
                RunLifecycle::Running | RunLifecycle::Paused => session.toggle_pause(),
                RunLifecycle::Idle | RunLifecycle::Finished => {}
            },
            KeyCode::Char('r') => session.request_restart(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Char('q') | KeyCode::Esc => break,
            _ => {}
        }
    }
    Ok(())
}
