//! Handle and Geometry Types
//!
//! Window handles, points, sizes, rectangles and colors shared by the
//! tooltip subsystem. Layouts are plain `i32` pixel geometry in the
//! host's screen or client coordinate space.

// ============================================================================
// Handle Types
// ============================================================================

/// USER handle (HWND)
///
/// Opaque to the tooltip code; the host assigns the values.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UserHandle(u32);

impl UserHandle {
    pub const NULL: UserHandle = UserHandle(0);

    /// Wrap a raw handle value
    pub const fn from_raw(raw: u32) -> Self {
        UserHandle(raw)
    }

    /// Check if handle is valid
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Get raw handle value
    pub const fn raw(self) -> u32 {
        self.0
    }
}

pub type HWND = UserHandle;

// ============================================================================
// Common Structures
// ============================================================================

/// Point structure
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Point { x: self.x + dx, y: self.y + dy }
    }
}

/// Size structure
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub cx: i32,
    pub cy: i32,
}

impl Size {
    pub const fn new(cx: i32, cy: i32) -> Self {
        Size { cx, cy }
    }
}

/// Rectangle structure
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect { left, top, right, bottom }
    }

    /// Rectangle from origin and extent
    pub const fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { left: x, top: y, right: x + width, bottom: y + height }
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub const fn center_x(&self) -> i32 {
        self.left + self.width() / 2
    }

    pub const fn center_y(&self) -> i32 {
        self.top + self.height() / 2
    }

    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn contains_point(&self, pt: Point) -> bool {
        pt.x >= self.left && pt.x < self.right &&
        pt.y >= self.top && pt.y < self.bottom
    }

    /// True if `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left && other.right <= self.right &&
        other.top >= self.top && other.bottom <= self.bottom
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let result = Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };

        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }
}

/// RGB color (COLORREF layout: 0x00BBGGRR)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorRef(pub u32);

impl ColorRef {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        ColorRef((r as u32) | ((g as u32) << 8) | ((b as u32) << 16))
    }

    pub const fn red(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub const fn blue(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }
}

// Tooltip colors
impl ColorRef {
    pub const BLACK: ColorRef = ColorRef::rgb(0, 0, 0);
    pub const WHITE: ColorRef = ColorRef::rgb(255, 255, 255);
    /// COLOR_INFOBK
    pub const INFO_BACKGROUND: ColorRef = ColorRef::rgb(255, 255, 225);
    /// Tooltip frame
    pub const INFO_BORDER: ColorRef = ColorRef::rgb(118, 118, 118);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_geometry() {
        let rc = Rect::from_origin(10, 20, 100, 50);
        assert_eq!(rc, Rect::new(10, 20, 110, 70));
        assert_eq!(rc.center_x(), 60);
        assert_eq!(rc.center_y(), 45);
        assert!(rc.contains_point(Point::new(10, 20)));
        assert!(!rc.contains_point(Point::new(110, 20)));
        assert!(rc.contains_rect(&Rect::new(10, 20, 110, 70)));
        assert!(!rc.contains_rect(&Rect::new(9, 20, 110, 70)));
    }

    #[test]
    fn test_color_components() {
        let clr = ColorRef::INFO_BACKGROUND;
        assert_eq!(clr.0, 0xE1FFFF);
        assert_eq!((clr.red(), clr.green(), clr.blue()), (255, 255, 225));
    }
}
