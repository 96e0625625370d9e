//! Terminal display surface
//!
//! Each character cell shows two vertically stacked pixels with an upper
//! half block: foreground is the top pixel, background the bottom one.

use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use sowai_core::{ClockError, ClockResult};
use sowai_runtime::{DisplaySurface, ShutdownSignal};
use sowai_visual::{CompositeFrame, TargetRect};
use tracing::error;

fn display_err(e: io::Error) -> ClockError {
    ClockError::DisplayFailed(e.to_string())
}

/// Alternate-screen surface; restores the terminal on drop
pub struct TerminalSurface {
    out: Stdout,
    last_target: Option<TargetRect>,
}

impl TerminalSurface {
    pub fn enter() -> ClockResult<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode().map_err(display_err)?;
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All)).map_err(display_err)?;
        Ok(TerminalSurface {
            out,
            last_target: None,
        })
    }

    fn draw(&mut self, frame: &CompositeFrame, target: TargetRect) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let scale = target.scale_for(frame.width() as u32).max(1);

        if self.last_target != Some(target) {
            queue!(self.out, ResetColor, Clear(ClearType::All))?;
            self.last_target = Some(target);
        }

        // Pixel rows map onto half cells; an odd target.y starts mid-cell
        let first_cell = target.y / 2;
        let last_cell = (target.y + target.height).saturating_sub(1) / 2;

        for cell in first_cell..=last_cell {
            if cell >= rows as u32 {
                break;
            }
            queue!(self.out, MoveTo(target.x as u16, cell as u16))?;

            let top = frame_row(cell * 2, target, scale, frame.height());
            let bottom = frame_row(cell * 2 + 1, target, scale, frame.height());
            for cx in 0..target.width as usize {
                if target.x as usize + cx >= cols as usize {
                    break;
                }
                let fx = cx / scale as usize;
                let (glyph, fg, bg) = half_block(
                    top.map(|fy| frame.pixel(fx, fy)),
                    bottom.map(|fy| frame.pixel(fx, fy)),
                );
                queue!(
                    self.out,
                    SetForegroundColor(fg),
                    SetBackgroundColor(bg),
                    Print(glyph)
                )?;
            }
        }

        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}

/// Frame row shown at output pixel row `area_row`, if inside the target
fn frame_row(area_row: u32, target: TargetRect, scale: u32, frame_h: usize) -> Option<usize> {
    if area_row < target.y || area_row >= target.y + target.height {
        return None;
    }
    let row = ((area_row - target.y) / scale) as usize;
    (row < frame_h).then_some(row)
}

/// Glyph and colors for one cell; uncovered halves keep the terminal default
fn half_block(top: Option<[u8; 3]>, bottom: Option<[u8; 3]>) -> (char, Color, Color) {
    match (top, bottom) {
        (Some(t), Some(b)) => ('▀', rgb(t), rgb(b)),
        (Some(t), None) => ('▀', rgb(t), Color::Reset),
        (None, Some(b)) => ('▄', rgb(b), Color::Reset),
        (None, None) => (' ', Color::Reset, Color::Reset),
    }
}

fn rgb(px: [u8; 3]) -> Color {
    Color::Rgb {
        r: px[0],
        g: px[1],
        b: px[2],
    }
}

impl DisplaySurface for TerminalSurface {
    fn output_size(&mut self) -> ClockResult<(u32, u32)> {
        let (cols, rows) = terminal::size().map_err(display_err)?;
        Ok((cols as u32, rows as u32 * 2))
    }

    fn present(&mut self, frame: &CompositeFrame, target: TargetRect) -> ClockResult<()> {
        self.draw(frame, target).map_err(display_err)
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Shutdown on `q`, `Esc` or `Ctrl-C`
///
/// Drains pending terminal events without blocking each time it is polled.
/// Losing terminal input also stops the loop; the cause is kept for
/// [`KeyboardShutdown::input_error`].
#[derive(Default)]
pub struct KeyboardShutdown {
    requested: AtomicBool,
    failure: OnceLock<String>,
}

impl KeyboardShutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input failure that ended the loop, if any
    pub fn input_error(&self) -> Option<ClockError> {
        self.failure
            .get()
            .map(|e| ClockError::DisplayFailed(format!("terminal input: {}", e)))
    }

    fn observe(&self, polled: io::Result<()>) -> bool {
        if let Err(e) = polled {
            error!(error = %e, "terminal input lost, stopping");
            let _ = self.failure.set(e.to_string());
            self.requested.store(true, Ordering::SeqCst);
        }
        self.requested.load(Ordering::SeqCst)
    }

    fn drain_events(&self) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if is_quit(&key) {
                    self.requested.store(true, Ordering::SeqCst);
                }
            }
        }
        Ok(())
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

impl ShutdownSignal for KeyboardShutdown {
    fn is_requested(&self) -> bool {
        self.observe(self.drain_events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        let press = |code, modifiers| KeyEvent::new(code, modifiers);

        assert!(is_quit(&press(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit(&press(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&press(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit(&press(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[test]
    fn test_input_failure_stops_and_is_reported() {
        let shutdown = KeyboardShutdown::new();
        assert!(!shutdown.observe(Ok(())));
        assert!(shutdown.input_error().is_none());

        let lost = io::Error::new(io::ErrorKind::BrokenPipe, "tty gone");
        assert!(shutdown.observe(Err(lost)));
        assert!(shutdown.observe(Ok(())));
        assert!(matches!(
            shutdown.input_error(),
            Some(ClockError::DisplayFailed(msg)) if msg.contains("tty gone")
        ));
    }

    fn target(y: u32, height: u32) -> TargetRect {
        TargetRect {
            x: 0,
            y,
            width: 168,
            height,
        }
    }

    #[test]
    fn test_even_offset_fills_whole_cells() {
        let t = target(4, 28);
        assert_eq!(frame_row(3, t, 1, 28), None);
        assert_eq!(frame_row(4, t, 1, 28), Some(0));
        assert_eq!(frame_row(5, t, 1, 28), Some(1));
        assert_eq!(frame_row(31, t, 1, 28), Some(27));
        assert_eq!(frame_row(32, t, 1, 28), None);
    }

    #[test]
    fn test_odd_offset_starts_in_bottom_half() {
        // 15 rows of 2 px = 30 px area, 28 px strip: centered at y = 1
        let t = target(1, 28);
        let first_cell = t.y / 2;
        assert_eq!(frame_row(first_cell * 2, t, 1, 28), None);
        assert_eq!(frame_row(first_cell * 2 + 1, t, 1, 28), Some(0));

        let last_cell = (t.y + t.height - 1) / 2;
        assert_eq!(frame_row(last_cell * 2, t, 1, 28), Some(27));
        assert_eq!(frame_row(last_cell * 2 + 1, t, 1, 28), None);
    }

    #[test]
    fn test_scaled_rows_repeat() {
        let t = target(0, 56);
        assert_eq!(frame_row(0, t, 2, 28), Some(0));
        assert_eq!(frame_row(1, t, 2, 28), Some(0));
        assert_eq!(frame_row(2, t, 2, 28), Some(1));
        assert_eq!(frame_row(55, t, 2, 28), Some(27));
    }

    #[test]
    fn test_half_block_glyphs() {
        let red = [255, 0, 0];
        let blue = [0, 0, 255];

        assert_eq!(half_block(Some(red), Some(blue)), ('▀', rgb(red), rgb(blue)));
        assert_eq!(half_block(None, Some(blue)), ('▄', rgb(blue), Color::Reset));
        assert_eq!(half_block(Some(red), None), ('▀', rgb(red), Color::Reset));
        assert_eq!(half_block(None, None), (' ', Color::Reset, Color::Reset));
    }
}
