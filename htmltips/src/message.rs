//! Window Messages
//!
//! Message numbers delivered to the popup window procedure and to the
//! subclassed owner windows, plus the private messages the tooltip posts
//! to itself.
//!
//! Mouse coordinates travel in `lparam` as two signed 16-bit words,
//! wheel deltas in the high word of `wparam`.

// ============================================================================
// Window Messages
// ============================================================================

pub const WM_DESTROY: u32 = 0x0002;
pub const WM_SETCURSOR: u32 = 0x0020;

// Keyboard messages
pub const WM_KEYDOWN: u32 = 0x0100;

// Timer
pub const WM_TIMER: u32 = 0x0113;

// Mouse messages
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MOUSEWHEEL: u32 = 0x020A;
pub const WM_MOUSEHWHEEL: u32 = 0x020E;
pub const WM_MOUSELEAVE: u32 = 0x02A3;

// User-defined messages
pub const WM_USER: u32 = 0x0400;

/// Repaint the visible tip (posted once per batch of image completions)
pub const WM_REDRAW_TIP: u32 = WM_USER + 1000;

/// Refresh a tool: wparam = tool id, lparam = `UPDATE_*` flags
pub const WM_UPDATE_TIP: u32 = WM_USER + 1001;

/// `WM_UPDATE_TIP` flag: rebuild the document from the tool text
pub const UPDATE_RE_RENDER: isize = 0x0001;

/// `WM_UPDATE_TIP` flag: repaint without recomputing the layout
pub const UPDATE_REDRAW_ONLY: isize = 0x0002;

/// One wheel notch
pub const WHEEL_DELTA: i32 = 120;

// ============================================================================
// Parameter Packing
// ============================================================================

/// Pack client coordinates into an lparam (MAKELPARAM)
pub const fn make_lparam(x: i32, y: i32) -> isize {
    (((y as u16 as u32) << 16) | (x as u16 as u32)) as isize
}

/// Signed x coordinate from an lparam (GET_X_LPARAM)
pub const fn get_x_lparam(lparam: isize) -> i32 {
    (lparam as u32 & 0xFFFF) as i16 as i32
}

/// Signed y coordinate from an lparam (GET_Y_LPARAM)
pub const fn get_y_lparam(lparam: isize) -> i32 {
    ((lparam as u32 >> 16) & 0xFFFF) as i16 as i32
}

/// Pack a wheel delta into the high word of a wparam
pub const fn make_wheel_wparam(delta: i32) -> usize {
    ((delta as i16 as u16 as u32) << 16) as usize
}

/// Signed wheel delta from a wparam (GET_WHEEL_DELTA_WPARAM)
pub const fn get_wheel_delta_wparam(wparam: usize) -> i32 {
    ((wparam as u32 >> 16) & 0xFFFF) as i16 as i32
}
