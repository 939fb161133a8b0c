// src/view.rs

//! A checked, borrowed view over the engine's packed cell buffer.
//!
//! The engine owns the buffer and may reallocate it on resize (and is
//! treated as free to do so on step as well), so the view is never cached:
//! the orchestrator re-acquires it every frame, and acquisition binds the
//! view to the geometry version in force at that moment. A view whose
//! version no longer matches the current geometry is refused at paint time,
//! which turns the stale-read hazard into a checked precondition.

use crate::geometry::GridSize;

use anyhow::{bail, Result};

/// Immutable, row-major view of the cell buffer for one grid size.
#[derive(Debug, Clone, Copy)]
pub struct CellBufferView<'a> {
    cells: &'a [u8],
    grid: GridSize,
    version: u64,
}

impl<'a> CellBufferView<'a> {
    /// Binds `cells` to `grid` under geometry `version`.
    ///
    /// A length mismatch between the buffer and the grid is a fatal
    /// configuration error: it means the engine and the geometry have gone
    /// out of sync, and painting from the buffer would tear.
    pub fn acquire(cells: &'a [u8], grid: GridSize, version: u64) -> Result<Self> {
        if cells.len() != grid.cell_count() {
            bail!(
                "cell buffer length {} does not match grid {}x{} ({} cells)",
                cells.len(),
                grid.columns,
                grid.rows,
                grid.cell_count()
            );
        }
        Ok(CellBufferView {
            cells,
            grid,
            version,
        })
    }

    /// The byte for the cell at `(row, column)`.
    pub fn cell(&self, row: u32, col: u32) -> u8 {
        debug_assert!(row < self.grid.rows && col < self.grid.columns);
        self.cells[(row * self.grid.columns + col) as usize]
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
