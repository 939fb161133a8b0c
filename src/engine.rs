// src/engine.rs

//! The simulation engine seam and the bundled `Universe` implementation.
//!
//! The render loop is written entirely against the [`SimulationEngine`]
//! trait: it steps the engine, resizes it, and reads its packed cell buffer,
//! but owns none of the transition rule. `Universe` is the bundled engine,
//! a Conway automaton with per-tick random reseeding along its right edge,
//! so the binary has something to drive out of the box.

use crate::geometry::GridSize;

use anyhow::{bail, Result};
use rand::Rng;
use std::fmt;

/// Largest cell count the bundled engine will allocate.
const MAX_CELLS: u64 = 1 << 24;

/// State of a single cell as encoded in the packed buffer, one byte per cell.
///
/// Any byte matching neither variant is not an error: the renderer skips it
/// in both paint passes, leaving room for engines with richer state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Dead = 0,
    Alive = 1,
}

impl CellState {
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Decodes a buffer byte, returning `None` for unrecognized values.
    pub fn from_byte(byte: u8) -> Option<CellState> {
        match byte {
            0 => Some(CellState::Dead),
            1 => Some(CellState::Alive),
            _ => None,
        }
    }
}

/// Contract between the render loop and a cell automaton.
///
/// `cells` exposes the engine's packed, row-major cell buffer
/// (`index = row * columns + column`). The buffer may be reallocated by
/// `resize`, and callers must treat it as volatile across `step` as well:
/// a slice taken before either call must not be reused after it. The loop
/// re-acquires its view every frame for exactly that reason.
pub trait SimulationEngine {
    /// The grid size the engine currently holds.
    fn grid(&self) -> GridSize;

    /// Advances the automaton by exactly one generation. Synchronous and
    /// bounded; failures are not part of the contract.
    fn step(&mut self);

    /// Reallocates internal storage for a new grid size, resetting cell
    /// contents per the engine's own policy. Invalidates any previously
    /// obtained cell buffer.
    fn resize(&mut self, grid: GridSize) -> Result<()>;

    /// Read-only access to the packed cell buffer for the current grid.
    /// Length equals `grid().cell_count()`.
    fn cells(&self) -> &[u8];
}

/// The bundled automaton: Conway's rule on a bounded grid, with the left
/// column cleared after every generation and a random trickle of live cells
/// fed in along the right edge each tick so the display never settles.
pub struct Universe {
    grid: GridSize,
    cells: Vec<u8>,
}

impl Universe {
    /// Allocates a dead grid of the given size.
    pub fn new(grid: GridSize) -> Result<Self> {
        Self::check_capacity(grid)?;
        Ok(Universe {
            grid,
            cells: vec![CellState::Dead.as_byte(); grid.cell_count()],
        })
    }

    fn check_capacity(grid: GridSize) -> Result<()> {
        let requested = grid.columns as u64 * grid.rows as u64;
        if requested > MAX_CELLS {
            bail!(
                "grid {}x{} ({} cells) exceeds engine capacity of {} cells",
                grid.columns,
                grid.rows,
                requested,
                MAX_CELLS
            );
        }
        Ok(())
    }

    /// Marks the given `(row, column)` cells alive. Intended for seeding
    /// patterns; out-of-range coordinates are ignored.
    pub fn set_cells(&mut self, cells: &[(u32, u32)]) {
        for &(row, col) in cells {
            if row < self.grid.rows && col < self.grid.columns {
                let idx = (row * self.grid.columns + col) as usize;
                self.cells[idx] = CellState::Alive.as_byte();
            }
        }
    }

    fn live_neighbor_count(&self, row: u32, col: u32) -> u8 {
        let mut count = 0;
        let row_lo = row.saturating_sub(1);
        let row_hi = (row + 1).min(self.grid.rows - 1);
        let col_lo = col.saturating_sub(1);
        let col_hi = (col + 1).min(self.grid.columns - 1);
        for r in row_lo..=row_hi {
            for c in col_lo..=col_hi {
                if r == row && c == col {
                    continue;
                }
                let idx = (r * self.grid.columns + c) as usize;
                if self.cells[idx] == CellState::Alive.as_byte() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Feeds random live cells into the last three columns of each interior
    /// row and clears the first column, keeping a stream of new material
    /// drifting in from the right edge.
    fn reseed_edges(&mut self) {
        if self.grid.columns < 3 || self.grid.rows < 3 {
            return;
        }
        let columns = self.grid.columns as usize;
        let mut rng = rand::thread_rng();
        for row in 1..(self.grid.rows as usize - 1) {
            self.cells[(row - 1) * columns] = CellState::Dead.as_byte();
            self.cells[row * columns - 1] = random_cell(&mut rng).as_byte();
            if rng.gen::<bool>() {
                self.cells[row * columns - 2] = random_cell(&mut rng).as_byte();
            }
            if rng.gen::<bool>() && rng.gen::<bool>() {
                self.cells[row * columns - 3] = random_cell(&mut rng).as_byte();
            }
        }
    }
}

fn random_cell(rng: &mut impl Rng) -> CellState {
    if rng.gen::<bool>() {
        CellState::Alive
    } else {
        CellState::Dead
    }
}

impl SimulationEngine for Universe {
    fn grid(&self) -> GridSize {
        self.grid
    }

    fn step(&mut self) {
        self.reseed_edges();
        let columns = self.grid.columns;
        let next: Vec<u8> = (0..self.grid.rows)
            .flat_map(|row| (0..columns).map(move |col| (row, col)))
            .map(|(row, col)| {
                let idx = (row * columns + col) as usize;
                let alive = self.cells[idx] == CellState::Alive.as_byte();
                match (alive, self.live_neighbor_count(row, col)) {
                    (true, 2) | (true, 3) | (false, 3) => CellState::Alive.as_byte(),
                    _ => CellState::Dead.as_byte(),
                }
            })
            .collect();
        self.cells = next;
        // Keep the left column clear so material drifting off the grid
        // does not pile up against the edge.
        for row in 0..self.grid.rows.saturating_sub(1) {
            self.cells[(row * columns) as usize] = CellState::Dead.as_byte();
        }
    }

    fn resize(&mut self, grid: GridSize) -> Result<()> {
        Self::check_capacity(grid)?;
        log::debug!(
            "Universe: resizing {}x{} -> {}x{}",
            self.grid.columns,
            self.grid.rows,
            grid.columns,
            grid.rows
        );
        self.grid = grid;
        self.cells = vec![CellState::Dead.as_byte(); grid.cell_count()];
        Ok(())
    }

    fn cells(&self) -> &[u8] {
        &self.cells
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.cells.chunks(self.grid.columns as usize) {
            for &byte in line {
                let symbol = if byte == CellState::Alive.as_byte() {
                    '◼'
                } else {
                    '◻'
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(columns: u32, rows: u32) -> GridSize {
        GridSize { columns, rows }
    }

    fn cell(universe: &Universe, row: u32, col: u32) -> u8 {
        universe.cells()[(row * universe.grid().columns + col) as usize]
    }

    #[test]
    fn new_allocates_dead_cells_of_the_right_length() {
        let universe = Universe::new(grid(10, 4)).unwrap();
        assert_eq!(universe.cells().len(), 40);
        assert!(universe
            .cells()
            .iter()
            .all(|&b| b == CellState::Dead.as_byte()));
    }

    #[test]
    fn new_rejects_grids_over_capacity() {
        assert!(Universe::new(grid(1 << 13, 1 << 13)).is_err());
    }

    #[test]
    fn resize_resets_contents_and_length() {
        let mut universe = Universe::new(grid(10, 10)).unwrap();
        universe.set_cells(&[(2, 2), (3, 3)]);
        universe.resize(grid(20, 20)).unwrap();
        assert_eq!(universe.grid(), grid(20, 20));
        assert_eq!(universe.cells().len(), 400);
        assert!(universe
            .cells()
            .iter()
            .all(|&b| b == CellState::Dead.as_byte()));
    }

    #[test]
    fn resize_rejects_grids_over_capacity() {
        let mut universe = Universe::new(grid(4, 4)).unwrap();
        assert!(universe.resize(grid(1 << 13, 1 << 13)).is_err());
        // A failed resize leaves the previous grid intact.
        assert_eq!(universe.grid(), grid(4, 4));
    }

    #[test]
    fn blinker_oscillates_in_the_interior() {
        // Wide enough that the right-edge reseeding (last three columns)
        // cannot reach the blinker within a single step.
        let mut universe = Universe::new(grid(12, 7)).unwrap();
        universe.set_cells(&[(2, 4), (3, 4), (4, 4)]);
        universe.step();
        assert_eq!(cell(&universe, 3, 3), CellState::Alive.as_byte());
        assert_eq!(cell(&universe, 3, 4), CellState::Alive.as_byte());
        assert_eq!(cell(&universe, 3, 5), CellState::Alive.as_byte());
        assert_eq!(cell(&universe, 2, 4), CellState::Dead.as_byte());
        assert_eq!(cell(&universe, 4, 4), CellState::Dead.as_byte());
    }

    #[test]
    fn step_keeps_left_column_clear() {
        let mut universe = Universe::new(grid(8, 8)).unwrap();
        universe.set_cells(&[(1, 0), (2, 0), (3, 0), (1, 1), (2, 1), (3, 1)]);
        universe.step();
        for row in 0..7 {
            assert_eq!(
                cell(&universe, row, 0),
                CellState::Dead.as_byte(),
                "left column not cleared at row {}",
                row
            );
        }
    }

    #[test]
    fn cell_state_decodes_known_bytes_only() {
        assert_eq!(CellState::from_byte(0), Some(CellState::Dead));
        assert_eq!(CellState::from_byte(1), Some(CellState::Alive));
        assert_eq!(CellState::from_byte(2), None);
        assert_eq!(CellState::from_byte(255), None);
    }

    #[test]
    fn set_cells_ignores_out_of_range_coordinates() {
        let mut universe = Universe::new(grid(4, 4)).unwrap();
        universe.set_cells(&[(1, 1), (9, 9)]);
        assert_eq!(cell(&universe, 1, 1), CellState::Alive.as_byte());
        assert_eq!(
            universe
                .cells()
                .iter()
                .filter(|&&b| b == CellState::Alive.as_byte())
                .count(),
            1
        );
    }
}
