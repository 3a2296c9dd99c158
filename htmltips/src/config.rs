//! Tooltip Configuration
//!
//! Defaults for delays, sizes, colors and the default font. All values
//! can be changed at runtime through the setters on
//! [`Tooltips`](crate::Tooltips).

use crate::layout::TipStyle;
use crate::types::{ColorRef, Size};

// ============================================================================
// Defaults
// ============================================================================

/// Dwell time before a tip appears (ms)
pub const DEFAULT_SHOW_TIME: u32 = 500;

/// Grace period after the pointer leaves a tip (ms)
pub const DEFAULT_HIDE_TIME: u32 = 250;

/// Window after a hide in which another tool shows without dwell (ms)
pub const DEFAULT_HIDE_TIME_INT: u32 = 500;

/// Maximum content extent before the tip scrolls
pub const DEFAULT_MAX_SIZE: Size = Size::new(400, 300);

/// Corner radius for rounded and balloon tips
pub const DEFAULT_RADIUS: i32 = 8;

pub const DEFAULT_FONT_NAME: &str = "Segoe UI";
pub const DEFAULT_FONT_SIZE: i32 = 12;

// ============================================================================
// Delay Times
// ============================================================================

/// Timer durations in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipTimes {
    /// Dwell before showing
    pub show: u32,
    /// Delay before hiding once the pointer is gone
    pub hide: u32,
    /// Inter-tip window after a hide
    pub hide_interval: u32,
}

impl TipTimes {
    pub const fn new(show: u32, hide: u32, hide_interval: u32) -> Self {
        Self { show, hide, hide_interval }
    }

    /// Derive all delays from the dwell time (TTDT_AUTOMATIC)
    pub const fn automatic(show: u32) -> Self {
        Self {
            show,
            hide: show / 2,
            hide_interval: show,
        }
    }
}

impl Default for TipTimes {
    fn default() -> Self {
        Self::new(DEFAULT_SHOW_TIME, DEFAULT_HIDE_TIME, DEFAULT_HIDE_TIME_INT)
    }
}

// ============================================================================
// Colors
// ============================================================================

/// Chrome colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipColors {
    pub fill: ColorRef,
    pub border: ColorRef,
}

impl Default for TipColors {
    fn default() -> Self {
        Self {
            fill: ColorRef::INFO_BACKGROUND,
            border: ColorRef::INFO_BORDER,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Per-instance tooltip settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipConfig {
    pub max_size: Size,
    pub times: TipTimes,
    pub style: TipStyle,
    pub radius: i32,
    /// Chrome opacity (0-255)
    pub alpha: u8,
    pub colors: TipColors,
}

impl TipConfig {
    pub fn new(radius: i32) -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            times: TipTimes::default(),
            style: TipStyle::Square,
            radius: radius.max(0),
            alpha: 255,
            colors: TipColors::default(),
        }
    }
}

impl Default for TipConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS)
    }
}
