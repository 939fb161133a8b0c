// src/renderer.rs

//! This module defines the `Renderer`.
//!
//! The `Renderer` translates a cell buffer view into fill commands for a
//! `Driver`. It is backend-agnostic: no ANSI sequences, no window-system
//! calls, just `fill_rect`s in canvas pixel space. Fills are batched into
//! two passes, all alive cells under one color and then all dead cells
//! under the other, so a driver never alternates fill styles per cell.

use crate::config::{GeometryConfig, ThemeConfig};
use crate::engine::CellState;
use crate::geometry::Geometry;
use crate::platform::{Driver, PixelRect};
use crate::view::CellBufferView;

use anyhow::{bail, Result};
use log::trace;

/// Paints cell buffers through a `Driver`, two color passes per frame.
///
/// The renderer is stateless beyond its configured constants; everything it
/// needs per frame arrives as arguments to [`Renderer::draw`].
pub struct Renderer {
    geometry: GeometryConfig,
    theme: ThemeConfig,
}

impl Renderer {
    pub fn new(geometry: GeometryConfig, theme: ThemeConfig) -> Self {
        Renderer { geometry, theme }
    }

    /// Draws one frame of the automaton.
    ///
    /// The view must have been acquired under the geometry passed here: a
    /// version mismatch means a resize slipped in between acquisition and
    /// paint, and drawing would read a buffer sized for a different grid.
    /// That is a fatal coordination bug, not a recoverable condition.
    ///
    /// Only rows `[0, rows - row_margin)` are painted; the margin rows are
    /// simulated off-screen slack. Bytes matching neither cell state are
    /// skipped by both passes.
    pub fn draw(
        &self,
        view: &CellBufferView,
        geometry: &Geometry,
        driver: &mut dyn Driver,
    ) -> Result<()> {
        if view.version() != geometry.version {
            bail!(
                "stale cell buffer view: acquired under geometry version {}, current is {}",
                view.version(),
                geometry.version
            );
        }

        let draw_limit_rows = geometry.grid.rows.saturating_sub(self.geometry.row_margin);
        trace!(
            "Renderer: drawing {}x{} grid, {} visible rows",
            geometry.grid.columns,
            geometry.grid.rows,
            draw_limit_rows
        );

        driver.begin_frame()?;
        self.draw_pass(view, draw_limit_rows, CellState::Alive, driver)?;
        self.draw_pass(view, draw_limit_rows, CellState::Dead, driver)?;
        driver.end_frame()?;
        driver.present()
    }

    /// One full pass over the visible sub-rectangle, filling every cell
    /// whose byte matches `state`.
    fn draw_pass(
        &self,
        view: &CellBufferView,
        draw_limit_rows: u32,
        state: CellState,
        driver: &mut dyn Driver,
    ) -> Result<()> {
        let color = match state {
            CellState::Alive => self.theme.alive,
            CellState::Dead => self.theme.dead,
        };
        let cell = self.geometry.cell_size_px;
        let pitch = cell + 1;
        for row in 0..draw_limit_rows {
            for col in 0..view.grid().columns {
                if view.cell(row, col) != state.as_byte() {
                    continue;
                }
                driver.fill_rect(
                    PixelRect {
                        x: col * pitch + 1,
                        y: row * pitch + 1,
                        width: cell,
                        height: cell,
                    },
                    color,
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::{GridSize, ViewportSize};
    use crate::platform::mock::{MockDriver, MockDriverCall};
    use test_log::test;

    const ALIVE: u8 = 1;
    const DEAD: u8 = 0;

    fn geometry(columns: u32, rows: u32, version: u64) -> Geometry {
        let grid = GridSize { columns, rows };
        Geometry {
            grid,
            canvas: crate::geometry::canvas_for_grid(grid, &GeometryConfig::default()),
            version,
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(GeometryConfig::default(), ThemeConfig::default())
    }

    fn mock() -> MockDriver {
        MockDriver::new(ViewportSize {
            width_px: 0,
            height_px: 0,
        })
    }

    fn rect_at(row: u32, col: u32) -> PixelRect {
        PixelRect {
            x: col * 8 + 1,
            y: row * 8 + 1,
            width: 7,
            height: 7,
        }
    }

    #[test]
    fn paints_only_rows_below_the_margin() {
        // 3x3 grid with the default 2-row margin: only row 0 is painted.
        let cells = [DEAD, ALIVE, DEAD, ALIVE, ALIVE, DEAD, DEAD, DEAD, ALIVE];
        let geometry = geometry(3, 3, 0);
        let view = CellBufferView::acquire(&cells, geometry.grid, 0).unwrap();
        let mut driver = mock();

        renderer().draw(&view, &geometry, &mut driver).unwrap();

        let theme = ThemeConfig::default();
        let fills = driver.fill_rects();
        assert_eq!(
            fills,
            vec![
                (rect_at(0, 1), theme.alive),
                (rect_at(0, 0), theme.dead),
                (rect_at(0, 2), theme.dead),
            ]
        );
    }

    #[test]
    fn alive_pass_precedes_dead_pass() {
        let cells = [ALIVE, DEAD, DEAD, ALIVE, DEAD, ALIVE];
        let geometry = geometry(2, 3, 0);
        let view = CellBufferView::acquire(&cells, geometry.grid, 0).unwrap();
        let mut driver = mock();

        renderer().draw(&view, &geometry, &mut driver).unwrap();

        let theme = ThemeConfig::default();
        let colors: Vec<Color> = driver.fill_rects().iter().map(|(_, c)| *c).collect();
        let first_dead = colors.iter().position(|&c| c == theme.dead);
        let last_alive = colors.iter().rposition(|&c| c == theme.alive);
        match (last_alive, first_dead) {
            (Some(alive), Some(dead)) => assert!(alive < dead),
            _ => panic!("expected fills from both passes, got {:?}", colors),
        }
    }

    #[test]
    fn visits_every_visible_cell_once_per_pass() {
        // All-alive 4x4 grid, 2 visible rows: 8 alive fills, 0 dead fills.
        let cells = [ALIVE; 16];
        let geometry = geometry(4, 4, 0);
        let view = CellBufferView::acquire(&cells, geometry.grid, 0).unwrap();
        let mut driver = mock();

        renderer().draw(&view, &geometry, &mut driver).unwrap();

        assert_eq!(driver.fill_rects().len(), 8);
    }

    #[test]
    fn unrecognized_bytes_are_painted_zero_times() {
        // Visible row 0 holds only unknown bytes; rows 1-2 are margin.
        let cells = [2u8, 255, 7, ALIVE, DEAD, 3, DEAD, DEAD, DEAD];
        let geometry = geometry(3, 3, 0);
        let view = CellBufferView::acquire(&cells, geometry.grid, 0).unwrap();
        let mut driver = mock();

        renderer().draw(&view, &geometry, &mut driver).unwrap();

        assert!(driver.fill_rects().is_empty());
    }

    #[test]
    fn frame_is_bracketed_and_presented() {
        let cells = [ALIVE, DEAD, ALIVE];
        let geometry = geometry(1, 3, 0);
        let view = CellBufferView::acquire(&cells, geometry.grid, 0).unwrap();
        let mut driver = mock();

        renderer().draw(&view, &geometry, &mut driver).unwrap();

        assert_eq!(driver.calls.first(), Some(&MockDriverCall::BeginFrame));
        assert_eq!(
            &driver.calls[driver.calls.len() - 2..],
            &[MockDriverCall::EndFrame, MockDriverCall::Present]
        );
    }

    #[test]
    fn refuses_a_stale_view() {
        let cells = [DEAD; 9];
        let current = geometry(3, 3, 5);
        let stale_view = CellBufferView::acquire(&cells, current.grid, 4).unwrap();
        let mut driver = mock();

        let result = renderer().draw(&stale_view, &current, &mut driver);

        assert!(result.is_err());
        assert!(driver.fill_rects().is_empty());
    }

    #[test]
    fn margin_larger_than_grid_paints_nothing() {
        let cells = [ALIVE, ALIVE];
        let geometry = geometry(2, 1, 0);
        let view = CellBufferView::acquire(&cells, geometry.grid, 0).unwrap();
        let mut driver = mock();

        renderer().draw(&view, &geometry, &mut driver).unwrap();

        assert!(driver.fill_rects().is_empty());
    }
}
