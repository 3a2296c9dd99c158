//! Tip Geometry
//!
//! Pure layout functions: popup size from the content size and chrome,
//! placement against the anchor rectangle and the desktop, and the
//! balloon leg anchor point.
//!
//! # Placement
//!
//! The popup edge facing the anchor touches the anchor rectangle and is
//! centered on it. When the popup would leave the desktop along the
//! placement axis, the mirrored side is tried once. If that side has no
//! room either, the requested side is kept and the popup is clamped into
//! the desktop, shrinking to the desktop size if needed. A shrunk popup
//! keeps its chrome and loses content viewport, which then scrolls.

use crate::tools::TipAlign;
use crate::types::{Point, Rect, Size};

// ============================================================================
// Chrome Metrics
// ============================================================================

/// Frame line width
pub const BORDER_WIDTH: i32 = 1;

/// Minimum gap between frame and content
pub const TIP_PADDING: i32 = 4;

/// Balloon leg length (distance from body edge to apex)
pub const ANCHOR_LEG: i32 = 10;

/// Half of the balloon leg base
pub const LEG_HALF_WIDTH: i32 = 8;

// ============================================================================
// Tip Style
// ============================================================================

/// Chrome shape (tips_style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TipStyle {
    #[default]
    Square,
    Rounded,
    Baloon,
}

impl TipStyle {
    /// Leg length added on the anchor side
    pub const fn leg(self) -> i32 {
        match self {
            TipStyle::Baloon => ANCHOR_LEG,
            _ => 0,
        }
    }

    /// Effective corner radius for this style
    pub const fn corner_radius(self, radius: i32) -> i32 {
        match self {
            TipStyle::Square => 0,
            _ => radius,
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Geometry of one tip presentation (tip_layout)
///
/// `x`/`y` are screen coordinates; content and anchor coordinates are
/// relative to the popup origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TipLayout {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub content_x: i32,
    pub content_y: i32,
    pub content_width: i32,
    pub content_height: i32,
    /// Balloon leg apex
    pub anchor_x: i32,
    pub anchor_y: i32,
    pub align: TipAlign,
    pub style: TipStyle,
    pub radius: i32,
}

impl TipLayout {
    /// Popup rectangle in screen coordinates
    pub fn outer_rect(&self) -> Rect {
        Rect::from_origin(self.x, self.y, self.width, self.height)
    }

    /// Content viewport relative to the popup
    pub fn content_rect(&self) -> Rect {
        Rect::from_origin(self.content_x, self.content_y, self.content_width, self.content_height)
    }

    /// Popup area without the balloon leg, relative to the popup
    pub fn body_rect(&self) -> Rect {
        let leg = self.style.leg().min(match self.align {
            TipAlign::Top | TipAlign::Bottom => self.height,
            TipAlign::Left | TipAlign::Right => self.width,
        });

        match self.align {
            TipAlign::Top => Rect::new(0, 0, self.width, self.height - leg),
            TipAlign::Bottom => Rect::new(0, leg, self.width, self.height),
            TipAlign::Left => Rect::new(0, 0, self.width - leg, self.height),
            TipAlign::Right => Rect::new(leg, 0, self.width, self.height),
        }
    }
}

/// Frame plus padding on each side of the content
fn margin(style: TipStyle, radius: i32) -> i32 {
    BORDER_WIDTH + TIP_PADDING.max(style.corner_radius(radius) / 2)
}

/// Popup width for a content width
pub fn tip_width(content_width: i32, style: TipStyle, radius: i32, align: TipAlign) -> i32 {
    let leg = if align.is_vertical() { 0 } else { style.leg() };
    content_width.max(0) + 2 * margin(style, radius) + leg
}

/// Popup height for a content height
pub fn tip_height(content_height: i32, style: TipStyle, radius: i32, align: TipAlign) -> i32 {
    let leg = if align.is_vertical() { style.leg() } else { 0 };
    content_height.max(0) + 2 * margin(style, radius) + leg
}

/// Size a layout for the natural content size, clamped to `max_size`
///
/// The result sits at the origin; [`calc_position`] places it.
pub fn calc_layout(content: Size, max_size: Size, style: TipStyle, radius: i32, align: TipAlign) -> TipLayout {
    let mut layout = TipLayout {
        content_width: content.cx.clamp(0, max_size.cx.max(0)),
        content_height: content.cy.clamp(0, max_size.cy.max(0)),
        style,
        radius: style.corner_radius(radius.max(0)),
        ..TipLayout::default()
    };
    apply_align(&mut layout, align);
    layout
}

/// Recompute size and content offset for an alignment
fn apply_align(layout: &mut TipLayout, align: TipAlign) {
    let margin = margin(layout.style, layout.radius);
    let leg = layout.style.leg();

    layout.align = align;
    layout.width = tip_width(layout.content_width, layout.style, layout.radius, align);
    layout.height = tip_height(layout.content_height, layout.style, layout.radius, align);
    layout.content_x = margin + if align == TipAlign::Right { leg } else { 0 };
    layout.content_y = margin + if align == TipAlign::Bottom { leg } else { 0 };
}

/// Place the popup next to the anchor; returns the anchor point (screen)
fn place(align: TipAlign, rc_tool: &Rect, layout: &mut TipLayout) -> Point {
    apply_align(layout, align);

    let (w, h) = (layout.width, layout.height);
    let (x, y, anchor) = match align {
        TipAlign::Top => (
            rc_tool.center_x() - w / 2,
            rc_tool.top - h,
            Point::new(rc_tool.center_x(), rc_tool.top),
        ),
        TipAlign::Bottom => (
            rc_tool.center_x() - w / 2,
            rc_tool.bottom,
            Point::new(rc_tool.center_x(), rc_tool.bottom),
        ),
        TipAlign::Left => (
            rc_tool.left - w,
            rc_tool.center_y() - h / 2,
            Point::new(rc_tool.left, rc_tool.center_y()),
        ),
        TipAlign::Right => (
            rc_tool.right,
            rc_tool.center_y() - h / 2,
            Point::new(rc_tool.right, rc_tool.center_y()),
        ),
    };

    layout.x = x;
    layout.y = y;
    anchor
}

/// Does the popup leave the desktop on its placement side?
fn overflows(align: TipAlign, layout: &TipLayout, desktop: &Rect) -> bool {
    match align {
        TipAlign::Top => layout.y < desktop.top,
        TipAlign::Bottom => layout.y + layout.height > desktop.bottom,
        TipAlign::Left => layout.x < desktop.left,
        TipAlign::Right => layout.x + layout.width > desktop.right,
    }
}

/// `v` clamped to `[lo, hi]`; `lo` wins when the range is inverted
fn clamp_span(v: i32, lo: i32, hi: i32) -> i32 {
    if hi < lo {
        lo
    } else {
        v.clamp(lo, hi)
    }
}

/// Leg position clamped to the straight part of an edge; an edge too
/// short for the leg puts it in the middle
pub(crate) fn clamp_leg(v: i32, lo: i32, hi: i32) -> i32 {
    if hi < lo {
        (lo + hi) / 2
    } else {
        v.clamp(lo, hi)
    }
}

/// Shrink to the desktop and move inside it
fn clamp_to_desktop(layout: &mut TipLayout, desktop: &Rect) {
    let dsk_width = desktop.width().max(0);
    let dsk_height = desktop.height().max(0);

    if layout.width > dsk_width {
        let excess = layout.width - dsk_width;
        layout.width = dsk_width;
        layout.content_width = (layout.content_width - excess).max(0);
    }
    if layout.height > dsk_height {
        let excess = layout.height - dsk_height;
        layout.height = dsk_height;
        layout.content_height = (layout.content_height - excess).max(0);
    }

    layout.content_x = layout.content_x.min(layout.width);
    layout.content_y = layout.content_y.min(layout.height);
    layout.content_width = layout.content_width.min(layout.width - layout.content_x);
    layout.content_height = layout.content_height.min(layout.height - layout.content_y);

    layout.x = clamp_span(layout.x, desktop.left, desktop.right - layout.width);
    layout.y = clamp_span(layout.y, desktop.top, desktop.bottom - layout.height);
}

/// Store the leg apex relative to the popup
fn set_anchor(layout: &mut TipLayout, anchor: Point) {
    let edge = layout.radius + LEG_HALF_WIDTH;
    let local_x = anchor.x - layout.x;
    let local_y = anchor.y - layout.y;

    let (ax, ay) = match layout.align {
        TipAlign::Top => (clamp_leg(local_x, edge, layout.width - edge), layout.height),
        TipAlign::Bottom => (clamp_leg(local_x, edge, layout.width - edge), 0),
        TipAlign::Left => (layout.width, clamp_leg(local_y, edge, layout.height - edge)),
        TipAlign::Right => (0, clamp_leg(local_y, edge, layout.height - edge)),
    };

    layout.anchor_x = ax;
    layout.anchor_y = ay;
}

/// Position a sized layout against the anchor rectangle (screen coordinates)
///
/// `second` marks the mirrored retry, which never mirrors again.
pub fn calc_position(align: TipAlign, rc_tool: &Rect, layout: &mut TipLayout, desktop: &Rect, second: bool) {
    let anchor = place(align, rc_tool, layout);

    if !second && overflows(align, layout, desktop) {
        let mut mirrored = *layout;
        place(align.mirror(), rc_tool, &mut mirrored);
        if !overflows(align.mirror(), &mirrored, desktop) {
            calc_position(align.mirror(), rc_tool, layout, desktop, true);
            return;
        }
    }

    clamp_to_desktop(layout, desktop);
    set_anchor(layout, anchor);
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: Rect = Rect::new(0, 0, 1024, 768);
    const ALIGNS: [TipAlign; 4] = [TipAlign::Top, TipAlign::Bottom, TipAlign::Left, TipAlign::Right];
    const STYLES: [TipStyle; 3] = [TipStyle::Square, TipStyle::Rounded, TipStyle::Baloon];

    fn layout_for(content: Size, style: TipStyle, align: TipAlign, rc: &Rect, desktop: &Rect) -> TipLayout {
        let mut layout = calc_layout(content, Size::new(400, 300), style, 8, align);
        calc_position(align, rc, &mut layout, desktop, false);
        layout
    }

    #[test]
    fn test_tip_size_includes_chrome() {
        let layout = calc_layout(Size::new(100, 20), Size::new(400, 300), TipStyle::Square, 8, TipAlign::Top);
        assert_eq!(layout.width, 100 + 2 * (BORDER_WIDTH + TIP_PADDING));
        assert_eq!(layout.height, 20 + 2 * (BORDER_WIDTH + TIP_PADDING));
        assert_eq!(layout.radius, 0);

        let layout = calc_layout(Size::new(100, 20), Size::new(400, 300), TipStyle::Baloon, 8, TipAlign::Bottom);
        assert_eq!(layout.height, 20 + 2 * (BORDER_WIDTH + TIP_PADDING) + ANCHOR_LEG);
        assert_eq!(layout.content_y, BORDER_WIDTH + TIP_PADDING + ANCHOR_LEG);
    }

    #[test]
    fn test_content_clamped_to_max_size() {
        let layout = calc_layout(Size::new(900, 2000), Size::new(400, 300), TipStyle::Rounded, 8, TipAlign::Top);
        assert_eq!(layout.content_width, 400);
        assert_eq!(layout.content_height, 300);
    }

    #[test]
    fn test_bottom_placement_touches_anchor() {
        let rc = Rect::new(100, 100, 200, 120);
        let layout = layout_for(Size::new(100, 20), TipStyle::Square, TipAlign::Bottom, &rc, &DESKTOP);
        assert_eq!(layout.y, rc.bottom);
        assert_eq!(layout.x + layout.width / 2, rc.center_x());
        assert_eq!(layout.align, TipAlign::Bottom);
    }

    #[test]
    fn test_mirrors_when_no_room() {
        // Anchor near the bottom edge: bottom placement flips to top
        let rc = Rect::new(100, 740, 200, 760);
        let layout = layout_for(Size::new(100, 40), TipStyle::Baloon, TipAlign::Bottom, &rc, &DESKTOP);
        assert_eq!(layout.align, TipAlign::Top);
        assert_eq!(layout.y + layout.height, rc.top);
        assert_eq!(layout.anchor_y, layout.height);

        // Anchor near the left edge: left placement flips to right
        let rc = Rect::new(5, 300, 25, 320);
        let layout = layout_for(Size::new(100, 40), TipStyle::Square, TipAlign::Left, &rc, &DESKTOP);
        assert_eq!(layout.align, TipAlign::Right);
        assert_eq!(layout.x, rc.right);
    }

    #[test]
    fn test_both_sides_overflow_clamps_requested_side() {
        let desktop = Rect::new(0, 0, 800, 100);
        let rc = Rect::new(300, 40, 400, 60);
        let layout = layout_for(Size::new(100, 60), TipStyle::Square, TipAlign::Bottom, &rc, &desktop);
        assert_eq!(layout.align, TipAlign::Bottom);
        assert!(desktop.contains_rect(&layout.outer_rect()));
    }

    #[test]
    fn test_larger_than_desktop_shrinks_viewport() {
        let desktop = Rect::new(0, 0, 200, 150);
        let rc = Rect::new(50, 50, 100, 70);
        let layout = layout_for(Size::new(400, 300), TipStyle::Rounded, TipAlign::Bottom, &rc, &desktop);
        assert_eq!(layout.outer_rect(), desktop);
        assert!(layout.content_width < 400);
        assert!(layout.content_height < 300);
        assert!(Rect::new(0, 0, layout.width, layout.height).contains_rect(&layout.content_rect()));
    }

    #[test]
    fn test_outer_rect_stays_on_desktop() {
        let anchors = [
            Rect::new(0, 0, 30, 20),
            Rect::new(994, 0, 1024, 20),
            Rect::new(0, 748, 30, 768),
            Rect::new(994, 748, 1024, 768),
            Rect::new(500, 380, 540, 400),
            Rect::new(0, 0, 1024, 768),
            Rect::new(200, 200, 200, 200),
        ];
        let contents = [Size::new(0, 0), Size::new(80, 16), Size::new(380, 290), Size::new(2000, 2000)];

        for rc in &anchors {
            for align in ALIGNS {
                for style in STYLES {
                    for content in contents {
                        let layout = layout_for(content, style, align, rc, &DESKTOP);
                        assert!(
                            DESKTOP.contains_rect(&layout.outer_rect()),
                            "{:?} {:?} {:?} {:?} -> {:?}", rc, align, style, content, layout
                        );
                        let local = Rect::new(0, 0, layout.width, layout.height);
                        assert!(local.contains_rect(&layout.content_rect()));
                    }
                }
            }
        }
    }

    #[test]
    fn test_balloon_apex_centered_on_anchor() {
        let rc = Rect::new(100, 100, 200, 120);
        let layout = layout_for(Size::new(100, 20), TipStyle::Baloon, TipAlign::Bottom, &rc, &DESKTOP);

        // Apex on the popup's top edge, which is the anchor's bottom edge
        assert_eq!(layout.anchor_y, 0);
        assert_eq!(layout.y + layout.anchor_y, rc.bottom);
        assert_eq!(layout.x + layout.anchor_x, rc.center_x());
    }

    #[test]
    fn test_balloon_apex_clamped_to_straight_edge() {
        // Anchor in the desktop corner: the popup is pushed right, the apex
        // cannot reach the anchor center and stops at the corner arc
        let rc = Rect::new(0, 0, 10, 10);
        let layout = layout_for(Size::new(100, 20), TipStyle::Baloon, TipAlign::Bottom, &rc, &DESKTOP);
        assert_eq!(layout.x, 0);
        assert_eq!(layout.anchor_x, layout.radius + LEG_HALF_WIDTH);
    }

    #[test]
    fn test_degenerate_inputs() {
        let layout = layout_for(Size::new(50, 50), TipStyle::Baloon, TipAlign::Right, &Rect::default(), &Rect::default());
        assert_eq!(layout.width, 0);
        assert_eq!(layout.height, 0);
        assert_eq!(layout.content_width, 0);

        let layout = calc_layout(Size::new(50, 50), Size::new(0, 0), TipStyle::Rounded, 8, TipAlign::Top);
        assert_eq!(layout.content_width, 0);
        assert_eq!(layout.content_height, 0);
        assert!(layout.width > 0);
    }
}
