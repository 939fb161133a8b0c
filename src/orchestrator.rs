// src/orchestrator.rs

//! Orchestrates the render loop, coordinating between the simulation
//! engine, renderer, and backend driver. This module owns the coupled
//! grid size, canvas size, and cell buffer view, and is the only place
//! they change, which keeps geometry and memory in lockstep across
//! resizes without hidden shared state.

use crate::config::Config;
use crate::engine::SimulationEngine;
use crate::geometry::{compute_geometry, Geometry, ViewportSize};
use crate::platform::{BackendEvent, Driver};
use crate::renderer::Renderer;
use crate::view::CellBufferView;

use anyhow::{Context, Result};
use std::time::{Duration, Instant};

/// Represents the status of the orchestrator after one frame cycle.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OrchestratorStatus {
    /// The cycle completed and the loop should continue.
    Running,
    /// A shutdown signal was received (close request from the driver).
    Shutdown,
}

/// A viewport change waiting out its trailing-edge debounce delay.
#[derive(Debug, Clone, Copy)]
struct PendingResize {
    viewport: ViewportSize,
    due: Instant,
}

/// Encapsulates the animation loop and resize coordination.
///
/// Trait objects for the engine and driver keep the loop testable against
/// mocks and agnostic of the concrete automaton and host surface. Each
/// frame runs strictly sequentially on one thread: drain events, apply due
/// resizes, step the engine, reacquire the cell buffer view, paint. A
/// resize arriving mid-frame therefore never tears a paint in flight; it
/// takes effect at the top of the next cycle.
pub struct AppOrchestrator<'a> {
    engine: &'a mut dyn SimulationEngine,
    driver: &'a mut dyn Driver,
    renderer: Renderer,
    config: Config,
    geometry: Geometry,
    pending_resize: Option<PendingResize>,
    cancelled: bool,
}

impl<'a> AppOrchestrator<'a> {
    /// Creates a new orchestrator around an engine already sized for
    /// `geometry`, and brings the driver's canvas into lockstep.
    pub fn new(
        engine: &'a mut dyn SimulationEngine,
        driver: &'a mut dyn Driver,
        renderer: Renderer,
        config: Config,
        geometry: Geometry,
    ) -> Result<Self> {
        driver
            .set_canvas_size(geometry.canvas.width_px, geometry.canvas.height_px)
            .context("failed to set initial canvas size")?;
        Ok(AppOrchestrator {
            engine,
            driver,
            renderer,
            config,
            geometry,
            pending_resize: None,
            cancelled: false,
        })
    }

    /// The geometry currently in force.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Requests that the loop stop before its next re-schedule.
    pub fn cancel(&mut self) {
        log::info!("Orchestrator: cancellation requested");
        self.cancelled = true;
    }

    /// Paints the engine's current state without stepping it. Used once at
    /// startup so the initial configuration is visible before the first
    /// generation is applied.
    pub fn paint_current_state(&mut self) -> Result<()> {
        let view = CellBufferView::acquire(
            self.engine.cells(),
            self.geometry.grid,
            self.geometry.version,
        )
        .context("failed to acquire cell buffer view")?;
        self.renderer.draw(&view, &self.geometry, self.driver)
    }

    /// Runs the loop until shutdown is requested or an error surfaces.
    ///
    /// Transitions Idle -> Running exactly once: the pre-step state is
    /// painted first, then each iteration yields to the driver's frame
    /// scheduling, drains events, and advances/paints one generation. The
    /// cancellation flag is checked before every re-schedule.
    pub fn run(&mut self) -> Result<()> {
        log::info!(
            "Orchestrator: starting loop at {}x{} cells",
            self.geometry.grid.columns,
            self.geometry.grid.rows
        );
        self.paint_current_state()
            .context("failed to paint initial state")?;
        loop {
            if self.cancelled {
                log::info!("Orchestrator: cancelled, leaving loop");
                return Ok(());
            }
            self.driver
                .await_next_frame()
                .context("frame scheduling failed")?;
            match self.process_frame_cycle()? {
                OrchestratorStatus::Running => {}
                OrchestratorStatus::Shutdown => {
                    log::info!("Orchestrator: shutdown requested, leaving loop");
                    return Ok(());
                }
            }
        }
    }

    /// One loop iteration: events, due resizes, step, reacquire, paint.
    pub fn process_frame_cycle(&mut self) -> Result<OrchestratorStatus> {
        let now = Instant::now();
        for event in self
            .driver
            .process_events()
            .context("driver event processing failed")?
        {
            log::debug!("Orchestrator: handling {:?}", event);
            match event {
                BackendEvent::CloseRequested => return Ok(OrchestratorStatus::Shutdown),
                BackendEvent::Resize {
                    width_px,
                    height_px,
                } => self.handle_viewport_resize(
                    ViewportSize {
                        width_px,
                        height_px,
                    },
                    now,
                )?,
            }
        }
        self.apply_pending_resize_if_due(now)?;

        self.engine.step();
        // The engine may have moved its buffer during step; the view is
        // re-acquired every frame rather than cached.
        let view = CellBufferView::acquire(
            self.engine.cells(),
            self.geometry.grid,
            self.geometry.version,
        )
        .context("failed to acquire cell buffer view after step")?;
        self.renderer
            .draw(&view, &self.geometry, self.driver)
            .context("frame paint failed")?;
        Ok(OrchestratorStatus::Running)
    }

    /// Reacts to a viewport resize notification, either directly or after
    /// the configured trailing-edge delay (the latest viewport wins).
    fn handle_viewport_resize(&mut self, viewport: ViewportSize, now: Instant) -> Result<()> {
        let debounce = Duration::from_millis(self.config.behavior.resize_debounce_ms);
        if debounce.is_zero() {
            return self.apply_resize(viewport);
        }
        log::debug!(
            "Orchestrator: deferring resize to {:?} for {:?}",
            viewport,
            debounce
        );
        self.pending_resize = Some(PendingResize {
            viewport,
            due: now + debounce,
        });
        Ok(())
    }

    fn apply_pending_resize_if_due(&mut self, now: Instant) -> Result<()> {
        if let Some(pending) = self.pending_resize {
            if now >= pending.due {
                self.pending_resize = None;
                self.apply_resize(pending.viewport)?;
            }
        }
        Ok(())
    }

    /// Recomputes geometry for a new viewport and propagates it: engine grid
    /// first, then canvas size, then the stored geometry (whose bumped
    /// version invalidates every previously acquired view). An engine
    /// failure here propagates out; there is no fallback grid size.
    fn apply_resize(&mut self, viewport: ViewportSize) -> Result<()> {
        let next = compute_geometry(viewport, &self.config.geometry, self.geometry.version + 1);
        if next.grid == self.geometry.grid {
            log::trace!("Orchestrator: resize to {:?} leaves grid unchanged", viewport);
            return Ok(());
        }
        log::info!(
            "Orchestrator: resizing to {}x{} cells (viewport {}x{} px, canvas {}x{} px)",
            next.grid.columns,
            next.grid.rows,
            viewport.width_px,
            viewport.height_px,
            next.canvas.width_px,
            next.canvas.height_px
        );
        self.engine
            .resize(next.grid)
            .context("engine resize failed")?;
        self.driver
            .set_canvas_size(next.canvas.width_px, next.canvas.height_px)
            .context("canvas resize failed")?;
        self.geometry = next;
        Ok(())
    }
}
