//! Persisted main-window geometry.

use serde::{Deserialize, Serialize};

/// Default window width for a first launch.
pub const DEFAULT_WINDOW_WIDTH: u32 = 1366;
/// Default window height for a first launch.
pub const DEFAULT_WINDOW_HEIGHT: u32 = 768;
/// Smallest width the host window may be restored to.
pub const MIN_WINDOW_WIDTH: u32 = 1024;
/// Smallest height the host window may be restored to.
pub const MIN_WINDOW_HEIGHT: u32 = 768;

/// Window size and position as stored under `windowBounds`.
///
/// Position is optional: an unset `x`/`y` lets the window manager place the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

impl Default for WindowBounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            x: None,
            y: None,
        }
    }
}

impl WindowBounds {
    /// Returns these bounds with width and height raised to the minimum size.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(MIN_WINDOW_WIDTH),
            height: self.height.max(MIN_WINDOW_HEIGHT),
            ..self
        }
    }
}
