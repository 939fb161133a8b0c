// src/platform/mod.rs

//! Defines the `Driver` trait for host backends and the common types the
//! orchestrator and renderer exchange with them: `BackendEvent`,
//! `PlatformState`, and `PixelRect`.
//!
//! The renderer never touches a concrete surface; it issues fill commands
//! through the trait, and the orchestrator consumes the driver's event
//! stream. The console backend is the bundled implementation; a mock
//! recording driver backs the tests.

use crate::color::Color;
use crate::geometry::ViewportSize;

use anyhow::Result;

pub mod console;
#[cfg(test)]
pub mod mock;

/// Events originating from the host environment. The orchestrator drains
/// these between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    /// The viewport was resized by the host. Dimensions are in pixels.
    Resize { width_px: u32, height_px: u32 },
    /// The host asked the application to close (window close button,
    /// interrupt key, and so on).
    CloseRequested,
}

/// Current host state as reported by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformState {
    /// Viewport dimensions in pixels.
    pub viewport: ViewportSize,
}

/// A pixel-space rectangle for fill commands. `x`/`y` are the top-left
/// corner; `width`/`height` are in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Interface between the render loop and a concrete host surface.
///
/// A driver owns the drawing surface and the event source. The loop's
/// per-frame contract is: `await_next_frame`, drain `process_events`, then
/// a paint bracketed by `begin_frame`/`end_frame` and flushed by `present`.
/// `set_canvas_size` is called by the resize coordinator whenever the grid
/// geometry changes, before the next paint.
pub trait Driver {
    /// Translates pending native events into `BackendEvent`s. Non-blocking;
    /// returns an empty vector when nothing happened.
    fn process_events(&mut self) -> Result<Vec<BackendEvent>>;

    /// The host state, including the current viewport size in pixels.
    fn platform_state(&self) -> PlatformState;

    /// Resizes the drawing surface. Kept in lockstep with the grid by the
    /// resize coordinator.
    fn set_canvas_size(&mut self, width_px: u32, height_px: u32) -> Result<()>;

    /// Marks the start of a frame's drawing commands.
    fn begin_frame(&mut self) -> Result<()>;

    /// Fills a pixel rectangle with a solid color.
    fn fill_rect(&mut self, rect: PixelRect, color: Color) -> Result<()>;

    /// Marks the end of a frame's drawing commands.
    fn end_frame(&mut self) -> Result<()>;

    /// Flushes the composed frame to the display.
    fn present(&mut self) -> Result<()>;

    /// Blocks until the host's next frame slot. This is the scheduling
    /// primitive the animation loop yields to between iterations.
    fn await_next_frame(&mut self) -> Result<()>;

    /// Releases platform resources (restores terminal modes, etc.).
    /// Idempotent.
    fn cleanup(&mut self) -> Result<()>;
}
