// src/platform/console.rs

//! A `Driver` implementation that paints onto a Unix console with ANSI
//! escape codes. This is the bundled backend: it lets the loop run in any
//! terminal without a graphical display server.
//!
//! The console has no real pixels, so the driver maps the canvas onto
//! character cells through a nominal pixel size per cell. With the default
//! geometry (7-pixel cells on an 8-pixel pitch) each automaton cell lands on
//! exactly one character cell.

use crate::color::Color;
use crate::geometry::ViewportSize;
use crate::platform::{BackendEvent, Driver, PixelRect, PlatformState};

use anyhow::{Context, Result};
use libc::{winsize, STDIN_FILENO, TIOCGWINSZ};
use std::io::{self, stdin, stdout, Read, Write};
use std::mem;
use std::time::Duration;
use termios::{tcsetattr, Termios, ECHO, ICANON, ISIG, TCSANOW, VMIN, VTIME};

use log::{debug, error, info, trace, warn};

// --- ANSI Escape Code Constants ---
const CURSOR_HIDE: &str = "\x1b[?25l";
const CURSOR_SHOW: &str = "\x1b[?25h";
const SGR_RESET: &str = "\x1b[0m";
const CLEAR_SCREEN_AND_HOME: &str = "\x1b[2J\x1b[H";

/// Nominal pixel footprint of one character cell. Both axes use 8 so that a
/// cell painted on the default 8-pixel canvas pitch occupies one character.
const NOMINAL_CELL_WIDTH_PX: u32 = 8;
const NOMINAL_CELL_HEIGHT_PX: u32 = 8;

// Fallback terminal size when the ioctl reports zero (some contexts do).
const DEFAULT_WIDTH_CELLS: u16 = 80;
const DEFAULT_HEIGHT_CELLS: u16 = 24;

/// A `Driver` backed by a raw-mode Unix console.
///
/// Resize detection polls `TIOCGWINSZ` on every `process_events` call and
/// reports changes as pixel-space resize events through the nominal cell
/// size. Drawing is buffered per frame and flushed to stdout on `present`.
/// `q`, Escape, and Ctrl-C all request shutdown.
pub struct ConsoleDriver {
    /// Original terminal attributes, restored on cleanup.
    original_termios: Option<Termios>,
    last_known_width_cells: u16,
    last_known_height_cells: u16,
    /// Canvas size last requested by the resize coordinator.
    canvas_width_px: u32,
    canvas_height_px: u32,
    /// Pending frame output, flushed on `present`.
    frame_buffer: String,
    input_buffer: [u8; 128],
    frame_interval: Duration,
}

impl ConsoleDriver {
    /// Puts the terminal into raw mode, hides the cursor, and reads the
    /// initial size. Failing to enter raw mode is degraded but not fatal.
    pub fn new(frame_interval: Duration) -> Result<Self> {
        info!("ConsoleDriver: initializing");
        let original_termios = match Termios::from_fd(STDIN_FILENO) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!(
                    "ConsoleDriver: failed to get initial termios: {}. Proceeding without raw mode.",
                    e
                );
                None
            }
        };

        if let Some(ref ots) = original_termios {
            let mut raw = *ots;
            // Disable echo, canonical mode, and signal generation; reads
            // return immediately with whatever is available.
            raw.c_lflag &= !(ECHO | ICANON | ISIG);
            raw.c_cc[VMIN] = 0;
            raw.c_cc[VTIME] = 0;
            if let Err(e) = tcsetattr(STDIN_FILENO, TCSANOW, &raw) {
                warn!(
                    "ConsoleDriver: failed to set raw terminal attributes: {}. Input may misbehave.",
                    e
                );
            } else {
                debug!("ConsoleDriver: terminal set to raw mode");
            }
        }

        print!("{}{}", CURSOR_HIDE, CLEAR_SCREEN_AND_HOME);
        stdout()
            .flush()
            .context("ConsoleDriver: failed to flush initial setup codes")?;

        let (width_cells, height_cells) = terminal_size_cells(STDIN_FILENO)
            .context("ConsoleDriver: failed to get initial terminal size")?;
        info!(
            "ConsoleDriver: initial terminal size {}x{} cells",
            width_cells, height_cells
        );

        Ok(ConsoleDriver {
            original_termios,
            last_known_width_cells: width_cells,
            last_known_height_cells: height_cells,
            canvas_width_px: 0,
            canvas_height_px: 0,
            frame_buffer: String::new(),
            input_buffer: [0u8; 128],
            frame_interval,
        })
    }

    fn viewport_for_cells(width_cells: u16, height_cells: u16) -> ViewportSize {
        ViewportSize {
            width_px: width_cells as u32 * NOMINAL_CELL_WIDTH_PX,
            height_px: height_cells as u32 * NOMINAL_CELL_HEIGHT_PX,
        }
    }
}

impl Driver for ConsoleDriver {
    fn process_events(&mut self) -> Result<Vec<BackendEvent>> {
        let mut events = Vec::new();

        // Poll for a terminal resize.
        match terminal_size_cells(STDIN_FILENO) {
            Ok((width_cells, height_cells)) => {
                if width_cells != self.last_known_width_cells
                    || height_cells != self.last_known_height_cells
                {
                    info!(
                        "ConsoleDriver: terminal resized {}x{} -> {}x{} cells",
                        self.last_known_width_cells,
                        self.last_known_height_cells,
                        width_cells,
                        height_cells
                    );
                    self.last_known_width_cells = width_cells;
                    self.last_known_height_cells = height_cells;
                    let viewport = Self::viewport_for_cells(width_cells, height_cells);
                    events.push(BackendEvent::Resize {
                        width_px: viewport.width_px,
                        height_px: viewport.height_px,
                    });
                }
            }
            Err(e) => {
                warn!(
                    "ConsoleDriver: failed to get terminal size: {}. Using last known.",
                    e
                );
            }
        }

        // Raw mode with VMIN=0/VTIME=0 makes this read non-blocking.
        match stdin().read(&mut self.input_buffer) {
            Ok(0) => {
                info!("ConsoleDriver: EOF on stdin, requesting close");
                events.push(BackendEvent::CloseRequested);
            }
            Ok(bytes_read) => {
                for &byte in &self.input_buffer[..bytes_read] {
                    match byte {
                        b'q' | b'Q' | 0x03 | 0x1b => {
                            info!("ConsoleDriver: quit key received");
                            events.push(BackendEvent::CloseRequested);
                        }
                        other => {
                            trace!("ConsoleDriver: ignoring input byte 0x{:02x}", other);
                        }
                    }
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                return Err(e).context("ConsoleDriver: error reading from stdin");
            }
        }

        Ok(events)
    }

    fn platform_state(&self) -> PlatformState {
        PlatformState {
            viewport: Self::viewport_for_cells(
                self.last_known_width_cells,
                self.last_known_height_cells,
            ),
        }
    }

    fn set_canvas_size(&mut self, width_px: u32, height_px: u32) -> Result<()> {
        debug!(
            "ConsoleDriver: canvas resized to {}x{} px",
            width_px, height_px
        );
        self.canvas_width_px = width_px;
        self.canvas_height_px = height_px;
        // Shrinking can leave stale cells outside the new canvas.
        self.frame_buffer.push_str(CLEAR_SCREEN_AND_HOME);
        Ok(())
    }

    fn begin_frame(&mut self) -> Result<()> {
        Ok(())
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) -> Result<()> {
        if rect.width == 0 || rect.height == 0 {
            return Ok(());
        }
        let col_start = rect.x / NOMINAL_CELL_WIDTH_PX;
        let col_end = (rect.x + rect.width - 1) / NOMINAL_CELL_WIDTH_PX;
        let row_start = rect.y / NOMINAL_CELL_HEIGHT_PX;
        let row_end = (rect.y + rect.height - 1) / NOMINAL_CELL_HEIGHT_PX;

        // Keep within the terminal; the canvas can exceed it.
        let max_col = self.last_known_width_cells.saturating_sub(1) as u32;
        let max_row = self.last_known_height_cells.saturating_sub(1) as u32;
        if col_start > max_col || row_start > max_row {
            return Ok(());
        }
        let col_end = col_end.min(max_col);
        let row_end = row_end.min(max_row);

        self.frame_buffer.push_str(&format!(
            "\x1b[48;2;{};{};{}m",
            color.r, color.g, color.b
        ));
        let run: String = " ".repeat((col_end - col_start + 1) as usize);
        for row in row_start..=row_end {
            // CUP is 1-based.
            self.frame_buffer
                .push_str(&format!("\x1b[{};{}H", row + 1, col_start + 1));
            self.frame_buffer.push_str(&run);
        }
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        self.frame_buffer.push_str(SGR_RESET);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        if !self.frame_buffer.is_empty() {
            let mut out = stdout();
            out.write_all(self.frame_buffer.as_bytes())
                .context("ConsoleDriver: failed to write frame to stdout")?;
            out.flush()
                .context("ConsoleDriver: failed to flush stdout during present")?;
            self.frame_buffer.clear();
        }
        Ok(())
    }

    fn await_next_frame(&mut self) -> Result<()> {
        // A console has no vsync to follow; pace the loop from config.
        std::thread::sleep(self.frame_interval);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        info!("ConsoleDriver: cleaning up");
        print!("{}{}{}", SGR_RESET, CLEAR_SCREEN_AND_HOME, CURSOR_SHOW);
        stdout()
            .flush()
            .context("ConsoleDriver: failed to flush cleanup codes")?;
        if let Some(original) = self.original_termios.take() {
            debug!("ConsoleDriver: restoring original terminal attributes");
            tcsetattr(STDIN_FILENO, TCSANOW, &original)
                .context("ConsoleDriver: failed to restore terminal attributes")?;
        }
        Ok(())
    }
}

/// Terminal size in character cells via `ioctl(TIOCGWINSZ)`.
fn terminal_size_cells(fd: libc::c_int) -> Result<(u16, u16)> {
    // SAFETY: ioctl is an FFI call; winsz is a zeroed out-parameter.
    unsafe {
        let mut winsz: winsize = mem::zeroed();
        if libc::ioctl(fd, TIOCGWINSZ, &mut winsz) == -1 {
            return Err(anyhow::Error::from(io::Error::last_os_error())
                .context("ioctl(TIOCGWINSZ) failed"));
        }
        let cols = if winsz.ws_col == 0 {
            DEFAULT_WIDTH_CELLS
        } else {
            winsz.ws_col
        };
        let rows = if winsz.ws_row == 0 {
            DEFAULT_HEIGHT_CELLS
        } else {
            winsz.ws_row
        };
        Ok((cols, rows))
    }
}

impl Drop for ConsoleDriver {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            error!("ConsoleDriver: error during cleanup in drop: {}", e);
        }
    }
}
