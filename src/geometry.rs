// src/geometry.rs

//! Pure viewport-to-grid geometry.
//!
//! The three coupled quantities this crate must keep consistent (canvas
//! pixel size, simulation grid size, and cell buffer length) are all derived
//! here from the viewport size and the configured pitch constants. The
//! computation is total and deterministic; the orchestrator tags each result
//! with a monotonically increasing version so that a cell buffer view
//! acquired under one geometry can never be painted under another.

use crate::config::GeometryConfig;

/// Viewport dimensions in pixels, as reported by the host driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width_px: u32,
    pub height_px: u32,
}

/// Grid dimensions in cells. Both components are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub columns: u32,
    pub rows: u32,
}

impl GridSize {
    /// Number of cells in the packed buffer for this size.
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// Canvas dimensions in pixels, kept in lockstep with the grid:
/// `width_px == (cell_size_px + 1) * columns`, and analogously for height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width_px: u32,
    pub height_px: u32,
}

/// A grid/canvas pairing tagged with the version it was computed under.
///
/// The version starts at 0 and is bumped by the orchestrator on every
/// resize. Views of the engine's cell buffer carry the version they were
/// acquired under, and the renderer refuses a stale pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub grid: GridSize,
    pub canvas: CanvasSize,
    pub version: u64,
}

/// Computes the grid and canvas sizes for a viewport.
///
/// Columns divide the viewport width by the horizontal pitch; rows divide
/// the height by the vertical pitch and then add the configured row margin
/// (rows the engine simulates but the renderer never paints). Both counts
/// are clamped to a minimum of 1 so a collapsed viewport still yields a
/// valid grid.
pub fn compute_geometry(viewport: ViewportSize, config: &GeometryConfig, version: u64) -> Geometry {
    let columns = (viewport.width_px / config.horizontal_pitch_px.max(1)).max(1);
    let rows = (viewport.height_px / config.vertical_pitch_px.max(1) + config.row_margin).max(1);
    let grid = GridSize { columns, rows };
    Geometry {
        grid,
        canvas: canvas_for_grid(grid, config),
        version,
    }
}

/// Canvas pixel size for a grid: one `cell_size_px + 1` pitch per cell.
pub fn canvas_for_grid(grid: GridSize, config: &GeometryConfig) -> CanvasSize {
    let pitch = config.cell_size_px + 1;
    CanvasSize {
        width_px: pitch * grid.columns,
        height_px: pitch * grid.rows,
    }
}
