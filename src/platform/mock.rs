// src/platform/mock.rs

//! Call-recording `Driver` used by the renderer and orchestrator tests.

use crate::color::Color;
use crate::geometry::ViewportSize;
use crate::platform::{BackendEvent, Driver, PixelRect, PlatformState};

use anyhow::Result;
use std::collections::VecDeque;

/// Every driver call the mock records, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockDriverCall {
    SetCanvasSize { width_px: u32, height_px: u32 },
    BeginFrame,
    FillRect { rect: PixelRect, color: Color },
    EndFrame,
    Present,
    AwaitNextFrame,
    Cleanup,
}

pub struct MockDriver {
    pub calls: Vec<MockDriverCall>,
    events: VecDeque<Vec<BackendEvent>>,
    viewport: ViewportSize,
}

impl MockDriver {
    pub fn new(viewport: ViewportSize) -> Self {
        MockDriver {
            calls: Vec::new(),
            events: VecDeque::new(),
            viewport,
        }
    }

    /// Queues one batch of events; each `process_events` call drains one
    /// batch, so tests can script event arrival per frame.
    pub fn queue_events(&mut self, events: Vec<BackendEvent>) {
        self.events.push_back(events);
    }

    pub fn fill_rects(&self) -> Vec<(PixelRect, Color)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MockDriverCall::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn last_canvas_size(&self) -> Option<(u32, u32)> {
        self.calls.iter().rev().find_map(|call| match call {
            MockDriverCall::SetCanvasSize {
                width_px,
                height_px,
            } => Some((*width_px, *height_px)),
            _ => None,
        })
    }
}

impl Driver for MockDriver {
    fn process_events(&mut self) -> Result<Vec<BackendEvent>> {
        Ok(self.events.pop_front().unwrap_or_default())
    }

    fn platform_state(&self) -> PlatformState {
        PlatformState {
            viewport: self.viewport,
        }
    }

    fn set_canvas_size(&mut self, width_px: u32, height_px: u32) -> Result<()> {
        self.calls.push(MockDriverCall::SetCanvasSize {
            width_px,
            height_px,
        });
        Ok(())
    }

    fn begin_frame(&mut self) -> Result<()> {
        self.calls.push(MockDriverCall::BeginFrame);
        Ok(())
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) -> Result<()> {
        self.calls.push(MockDriverCall::FillRect { rect, color });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        self.calls.push(MockDriverCall::EndFrame);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.calls.push(MockDriverCall::Present);
        Ok(())
    }

    fn await_next_frame(&mut self) -> Result<()> {
        self.calls.push(MockDriverCall::AwaitNextFrame);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.calls.push(MockDriverCall::Cleanup);
        Ok(())
    }
}
