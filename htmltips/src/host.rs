//! Windowing Host Interface
//!
//! Everything the tooltip needs from the windowing system: a layered
//! popup window, owner window subclassing, window timers, message
//! posting, coordinate mapping, monitor work areas and the cursor.
//!
//! Timers fire by delivering `WM_TIMER` with the [`TimerId`] in `wparam`
//! to [`Tooltips::process_message`](crate::Tooltips::process_message).
//! Messages of subclassed owners are forwarded to
//! [`Tooltips::process_owner_message`](crate::Tooltips::process_owner_message)
//! before the owner's own procedure sees them.

use crate::gdi::Dib;
use crate::types::{Point, Rect, HWND};

// ============================================================================
// Timer IDs
// ============================================================================

/// Tooltip timer identifiers (SetTimer nIDEvent)
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    /// Dwell before a tip is shown
    Show = 1,
    /// Pointer left the tip; hide when it fires
    Hide = 2,
    /// Inter-tip window after a hide
    HideInterval = 3,
}

impl TimerId {
    pub const fn from_raw(raw: usize) -> Option<Self> {
        match raw {
            1 => Some(TimerId::Show),
            2 => Some(TimerId::Hide),
            3 => Some(TimerId::HideInterval),
            _ => None,
        }
    }
}

// ============================================================================
// Cursors
// ============================================================================

/// Cursor shapes the tip can request (IDC_*)
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Arrow = 0,
    IBeam = 1,
    Wait = 2,
    Cross = 3,
    SizeAll = 9,
    No = 10,
    Hand = 11,
    AppStarting = 12,
    Help = 13,
}

impl CursorShape {
    /// Map a CSS `cursor` keyword; unknown keywords give the arrow
    pub fn from_css(cursor: &str) -> Self {
        match cursor {
            "pointer" => CursorShape::Hand,
            "text" => CursorShape::IBeam,
            "wait" => CursorShape::Wait,
            "progress" => CursorShape::AppStarting,
            "crosshair" => CursorShape::Cross,
            "move" => CursorShape::SizeAll,
            "not-allowed" | "no-drop" => CursorShape::No,
            "help" => CursorShape::Help,
            _ => CursorShape::Arrow,
        }
    }
}

// ============================================================================
// Host Trait
// ============================================================================

/// Windowing operations used by [`Tooltips`](crate::Tooltips)
pub trait WindowHost {
    /// Create the hidden, non-activating, topmost popup owned by `parent`
    fn create_popup(&mut self, parent: HWND) -> Option<HWND>;
    fn destroy_popup(&mut self, hwnd: HWND);

    /// Start forwarding `owner` messages to the tooltip
    fn subclass_owner(&mut self, owner: HWND);
    fn unsubclass_owner(&mut self, owner: HWND);

    /// Show the popup at `rect` (screen) with a per-pixel alpha image
    fn present_popup(&mut self, hwnd: HWND, rect: &Rect, image: &Dib);
    fn hide_popup(&mut self, hwnd: HWND);

    /// Arm or re-arm a one-shot timer
    fn set_timer(&mut self, hwnd: HWND, id: TimerId, elapse_ms: u32);
    fn kill_timer(&mut self, hwnd: HWND, id: TimerId);

    /// Queue a message for the popup window
    fn post_message(&mut self, hwnd: HWND, msg: u32, wparam: usize, lparam: isize);

    /// Map a client point of `hwnd` to screen coordinates
    fn client_to_screen(&self, hwnd: HWND, pt: Point) -> Point;

    /// Work area of the monitor nearest `pt`, relative to `hwnd`'s monitor
    fn desktop_rect(&self, hwnd: HWND, pt: Point) -> Option<Rect>;
    /// Work area of the primary monitor
    fn primary_desktop_rect(&self) -> Rect;

    fn set_cursor(&mut self, cursor: CursorShape);

    /// Request (or cancel) a WM_MOUSELEAVE for `hwnd`
    fn track_mouse_leave(&mut self, hwnd: HWND, track: bool);
}
