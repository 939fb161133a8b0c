// src/config.rs

//! Defines the configuration structures for the renderer.
//!
//! This module provides a set of structs that can be deserialized from a
//! configuration file (JSON) to customize the geometry constants, the theme,
//! and the loop's behavior. The geometry divisors are plain configuration,
//! not values derived from the cell size.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::color::Color;

use anyhow::{Context, Result};

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for the renderer.
///
/// This struct is the root of the configuration and is intended to be
/// deserialized from a configuration file. It groups settings into logical
/// categories: geometry, theme, and behavior.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)] // Apply default values for the entire struct if a field is missing.
pub struct Config {
    /// Cell geometry constants.
    pub geometry: GeometryConfig,
    /// Colors used by the two paint passes.
    pub theme: ThemeConfig,
    /// Loop and resize behavior.
    pub behavior: BehaviorConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

// --- Geometry Configuration ---

/// Constants mapping viewport pixels to grid cells and grid cells to canvas
/// pixels.
///
/// `horizontal_pitch_px` and `vertical_pitch_px` are the divisors applied to
/// the viewport dimensions when sizing the grid, and `row_margin` is the
/// number of extra rows simulated past the bottom of the painted area. Their
/// relationship to `cell_size_px` is intentional slack, not a derivable
/// ratio, so all four stay independently configurable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Painted size of a cell in pixels. Cells are laid out on a
    /// `cell_size_px + 1` pitch, leaving a one-pixel gutter.
    pub cell_size_px: u32,
    /// Viewport width divisor used to compute the column count.
    pub horizontal_pitch_px: u32,
    /// Viewport height divisor used to compute the row count.
    pub vertical_pitch_px: u32,
    /// Rows simulated beyond the painted area (added to the row count,
    /// subtracted back out when painting).
    pub row_margin: u32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        GeometryConfig {
            cell_size_px: 7,
            horizontal_pitch_px: 16,
            vertical_pitch_px: 8,
            row_margin: 2,
        }
    }
}

// --- Theme Configuration ---

/// Colors for the two paint passes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Fill color for cells whose byte reads `Alive`.
    pub alive: Color,
    /// Fill color for cells whose byte reads `Dead`.
    pub dead: Color,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            alive: Color::rgb(0xd3, 0x36, 0x82),
            dead: Color::rgb(0x07, 0x36, 0x42),
        }
    }
}

// --- Behavior Configuration ---

/// Defines settings related to the operational behavior of the loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Trailing-edge delay, in milliseconds, applied to viewport resize
    /// events before the grid is recomputed. Zero means resizes are applied
    /// directly as they arrive.
    pub resize_debounce_ms: u64,
    /// Nominal frame interval, in milliseconds, used by drivers that pace
    /// the loop themselves rather than following a display's vertical sync.
    pub frame_interval_ms: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            resize_debounce_ms: 0,
            frame_interval_ms: 33,
        }
    }
}
