//! Tip Background Cache
//!
//! Renders the tip chrome (frame, fill, balloon leg) into an offscreen
//! DIB and keeps it until the geometry or the border color changes. The
//! content layer is drawn over a copy of this image, so repeated redraws
//! of the same tip only repaint the HTML.
//!
//! # Chrome Rendering
//!
//! 1. The DIB is filled with the border color at zero alpha
//! 2. The outer outline is filled with the border color
//! 3. The outline inset by the frame width is filled with the fill color
//! 4. Rounded and balloon shapes get a one pixel alpha blur
//! 5. The chrome opacity is applied to the whole image

use crate::config::TipColors;
use crate::gdi::{fast_blur_alpha, Dib, Path, RgbQuad};
use crate::layout::{clamp_leg, TipLayout, TipStyle, BORDER_WIDTH, LEG_HALF_WIDTH};
use crate::tools::TipAlign;
use crate::types::{ColorRef, Point};
use log::{debug, trace};

/// Alpha blur radius applied to curved outlines
const BLUR_RADIUS: i32 = 1;

/// Bezier control distance for a quarter circle (x10000)
const KAPPA: i32 = 5523;
const KAPPA_SCALE: i32 = 10000;

// ============================================================================
// Outline Construction
// ============================================================================

/// Quarter-circle corner from `from` to `to` bending toward `corner`
fn corner_to(path: &mut Path, from: Point, corner: Point, to: Point) {
    if from == to {
        return;
    }

    let c1x = from.x + (corner.x - from.x) * KAPPA / KAPPA_SCALE;
    let c1y = from.y + (corner.y - from.y) * KAPPA / KAPPA_SCALE;
    let c2x = to.x + (corner.x - to.x) * KAPPA / KAPPA_SCALE;
    let c2y = to.y + (corner.y - to.y) * KAPPA / KAPPA_SCALE;

    path.bezier_to(c1x, c1y, c2x, c2y, to.x, to.y);
}

/// Rectangle with rounded corners, inset by `line_width` on every side
///
/// A radius of zero produces a plain rectangle.
pub fn rounded_rect(path: &mut Path, x: i32, y: i32, width: i32, height: i32, radius: i32, line_width: i32) {
    let x = x + line_width;
    let y = y + line_width;
    let w = (width - 2 * line_width).max(0);
    let h = (height - 2 * line_width).max(0);
    if w == 0 || h == 0 {
        return;
    }

    let r = (radius - line_width).max(0).min(w / 2).min(h / 2);

    path.move_to(x + r, y);
    path.line_to(x + w - r, y);
    corner_to(path, Point::new(x + w - r, y), Point::new(x + w, y), Point::new(x + w, y + r));
    path.line_to(x + w, y + h - r);
    corner_to(path, Point::new(x + w, y + h - r), Point::new(x + w, y + h), Point::new(x + w - r, y + h));
    path.line_to(x + r, y + h);
    corner_to(path, Point::new(x + r, y + h), Point::new(x, y + h), Point::new(x, y + h - r));
    path.line_to(x, y + r);
    corner_to(path, Point::new(x, y + r), Point::new(x, y), Point::new(x + r, y));
    path.close_figure();
}

/// Rounded body with a triangular leg pointing at (`ax`, `ay`)
///
/// `x`/`y`/`width`/`height` describe the body without the leg. The leg
/// sits on the body edge facing the apex: a tip below its anchor has the
/// leg on the top edge, a tip left of its anchor on the right edge, and
/// so on. The leg base is centered on the apex and kept on the straight
/// part of the edge. The outline runs clockwise from the top-left corner.
pub fn baloon(
    path: &mut Path,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    ax: i32,
    ay: i32,
    align: TipAlign,
    radius: i32,
    line_width: i32,
) {
    let x = x + line_width;
    let y = y + line_width;
    let w = (width - 2 * line_width).max(0);
    let h = (height - 2 * line_width).max(0);
    if w == 0 || h == 0 {
        return;
    }

    let r = (radius - line_width).max(0).min(w / 2).min(h / 2);
    let half = (LEG_HALF_WIDTH - line_width).max(1);
    // Inner outlines pull the apex back so the frame keeps its width along the leg
    let shift = 2 * line_width;

    path.move_to(x + r, y);
    if align == TipAlign::Bottom {
        let cx = clamp_leg(ax, x + r + half, x + w - r - half);
        path.line_to(cx - half, y);
        path.line_to(ax, ay + shift);
        path.line_to(cx + half, y);
    }
    path.line_to(x + w - r, y);
    corner_to(path, Point::new(x + w - r, y), Point::new(x + w, y), Point::new(x + w, y + r));

    if align == TipAlign::Left {
        let cy = clamp_leg(ay, y + r + half, y + h - r - half);
        path.line_to(x + w, cy - half);
        path.line_to(ax - shift, ay);
        path.line_to(x + w, cy + half);
    }
    path.line_to(x + w, y + h - r);
    corner_to(path, Point::new(x + w, y + h - r), Point::new(x + w, y + h), Point::new(x + w - r, y + h));

    if align == TipAlign::Top {
        let cx = clamp_leg(ax, x + r + half, x + w - r - half);
        path.line_to(cx + half, y + h);
        path.line_to(ax, ay - shift);
        path.line_to(cx - half, y + h);
    }
    path.line_to(x + r, y + h);
    corner_to(path, Point::new(x + r, y + h), Point::new(x, y + h), Point::new(x, y + h - r));

    if align == TipAlign::Right {
        let cy = clamp_leg(ay, y + r + half, y + h - r - half);
        path.line_to(x, cy + half);
        path.line_to(ax + shift, ay);
        path.line_to(x, cy - half);
    }
    path.line_to(x, y + r);
    corner_to(path, Point::new(x, y + r), Point::new(x, y), Point::new(x + r, y));
    path.close_figure();
}

/// Outline of a tip, inset by `line_width`, in popup coordinates
pub fn create_tip_path(layout: &TipLayout, line_width: i32) -> Path {
    let mut path = Path::new();

    match layout.style {
        TipStyle::Square | TipStyle::Rounded => {
            rounded_rect(&mut path, 0, 0, layout.width, layout.height, layout.radius, line_width);
        }
        TipStyle::Baloon => {
            let body = layout.body_rect();
            baloon(
                &mut path,
                body.left,
                body.top,
                body.width(),
                body.height(),
                layout.anchor_x,
                layout.anchor_y,
                layout.align,
                layout.radius,
                line_width,
            );
        }
    }

    path
}

// ============================================================================
// Cache
// ============================================================================

/// Rendered chrome keyed by layout and border color
#[derive(Debug, Clone, Default)]
pub struct BgCache {
    dib: Option<Dib>,
    layout: TipLayout,
    clr_border: ColorRef,
}

impl BgCache {
    pub const fn new() -> Self {
        Self {
            dib: None,
            layout: TipLayout {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
                content_x: 0,
                content_y: 0,
                content_width: 0,
                content_height: 0,
                anchor_x: 0,
                anchor_y: 0,
                align: TipAlign::Top,
                style: TipStyle::Square,
                radius: 0,
            },
            clr_border: ColorRef::BLACK,
        }
    }

    /// True if the cached image does not match this layout and border
    pub fn need_redraw(&self, layout: &TipLayout, clr_border: ColorRef) -> bool {
        self.dib.is_none() || self.layout != *layout || self.clr_border != clr_border
    }

    /// Render the chrome for `layout`, replacing any cached image
    pub fn draw(&mut self, layout: &TipLayout, colors: &TipColors, alpha: u8) -> &Dib {
        self.clear();

        let mut dib = Dib::new(layout.width, layout.height);
        dib.fill(RgbQuad::from_color_ref(colors.border, 0));

        create_tip_path(layout, 0).fill(&mut dib, RgbQuad::from_color_ref(colors.border, 255));
        create_tip_path(layout, BORDER_WIDTH).fill(&mut dib, RgbQuad::from_color_ref(colors.fill, 255));

        if layout.style != TipStyle::Square {
            fast_blur_alpha(&mut dib, BLUR_RADIUS);
        }
        dib.scale_alpha(alpha);

        debug!(
            "[TOOLTIP/Cache] Chrome {}x{} style={:?} align={:?}",
            layout.width, layout.height, layout.style, layout.align
        );

        self.layout = *layout;
        self.clr_border = colors.border;
        self.dib.insert(dib)
    }

    /// Cached image, if any
    pub fn dib(&self) -> Option<&Dib> {
        self.dib.as_ref()
    }

    /// Layout the cached image was drawn for
    pub fn layout(&self) -> &TipLayout {
        &self.layout
    }

    /// Drop the cached image
    pub fn clear(&mut self) {
        if self.dib.take().is_some() {
            trace!("[TOOLTIP/Cache] Cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{calc_layout, calc_position};
    use crate::types::{Rect, Size};

    const DESKTOP: Rect = Rect::new(0, 0, 1024, 768);

    fn balloon_layout(align: TipAlign) -> TipLayout {
        let mut layout = calc_layout(Size::new(120, 40), Size::new(400, 300), TipStyle::Baloon, 8, align);
        calc_position(align, &Rect::new(400, 300, 500, 340), &mut layout, &DESKTOP, false);
        layout
    }

    fn square_layout() -> TipLayout {
        let mut layout = calc_layout(Size::new(60, 20), Size::new(400, 300), TipStyle::Square, 0, TipAlign::Bottom);
        calc_position(TipAlign::Bottom, &Rect::new(100, 100, 200, 120), &mut layout, &DESKTOP, false);
        layout
    }

    #[test]
    fn test_need_redraw_tracks_every_layout_field() {
        let colors = TipColors::default();
        let base = balloon_layout(TipAlign::Bottom);
        let mut cache = BgCache::new();

        assert!(cache.need_redraw(&base, colors.border));
        cache.draw(&base, &colors, 255);
        assert!(!cache.need_redraw(&base, colors.border));

        let mutations: [fn(&mut TipLayout); 13] = [
            |l| l.x += 1,
            |l| l.y += 1,
            |l| l.width += 1,
            |l| l.height += 1,
            |l| l.content_x += 1,
            |l| l.content_y += 1,
            |l| l.content_width += 1,
            |l| l.content_height += 1,
            |l| l.anchor_x += 1,
            |l| l.anchor_y += 1,
            |l| l.align = TipAlign::Left,
            |l| l.style = TipStyle::Rounded,
            |l| l.radius += 1,
        ];
        for mutate in mutations {
            let mut changed = base;
            mutate(&mut changed);
            assert!(cache.need_redraw(&changed, colors.border));
        }

        assert!(cache.need_redraw(&base, ColorRef::rgb(1, 2, 3)));
    }

    #[test]
    fn test_draw_is_deterministic() {
        let colors = TipColors::default();
        let layout = balloon_layout(TipAlign::Right);
        let mut cache = BgCache::new();

        let first = cache.draw(&layout, &colors, 200).clone();
        let second = cache.draw(&layout, &colors, 200).clone();
        assert_eq!(first, second);
        assert_eq!(first.width(), layout.width);
        assert_eq!(first.height(), layout.height);
    }

    #[test]
    fn test_clear_forces_redraw() {
        let colors = TipColors::default();
        let layout = square_layout();
        let mut cache = BgCache::new();

        cache.draw(&layout, &colors, 255);
        cache.clear();
        cache.clear();
        assert!(cache.dib().is_none());
        assert!(cache.need_redraw(&layout, colors.border));
    }

    #[test]
    fn test_square_frame_and_fill() {
        let colors = TipColors::default();
        let layout = square_layout();
        let mut cache = BgCache::new();
        let dib = cache.draw(&layout, &colors, 255);

        let frame = dib.pixel(0, 0).unwrap();
        assert_eq!(frame.alpha, 255);
        assert_eq!(frame.to_color_ref(), colors.border);

        let inside = dib.pixel(layout.width / 2, layout.height / 2).unwrap();
        assert_eq!(inside.alpha, 255);
        assert_eq!(inside.to_color_ref(), colors.fill);
    }

    #[test]
    fn test_rounded_corner_transparent() {
        let colors = TipColors::default();
        let mut layout = calc_layout(Size::new(100, 40), Size::new(400, 300), TipStyle::Rounded, 8, TipAlign::Top);
        calc_position(TipAlign::Top, &Rect::new(400, 300, 500, 340), &mut layout, &DESKTOP, false);

        let mut cache = BgCache::new();
        let dib = cache.draw(&layout, &colors, 255);

        assert_eq!(dib.pixel(0, 0).unwrap().alpha, 0);
        let edge = dib.pixel(layout.width / 2, 0).unwrap();
        assert!(edge.alpha > 0);
        assert_eq!(edge.to_color_ref(), colors.border);
    }

    #[test]
    fn test_balloon_leg_drawn_toward_anchor() {
        let colors = TipColors::default();
        let layout = balloon_layout(TipAlign::Bottom);
        let mut cache = BgCache::new();
        let dib = cache.draw(&layout, &colors, 255);

        // Leg band above the body: covered under the apex, empty at the side
        assert!(dib.pixel(layout.anchor_x, 4).unwrap().alpha > 0);
        assert_eq!(dib.pixel(2, 2).unwrap().alpha, 0);
    }

    #[test]
    fn test_alpha_scales_chrome() {
        let colors = TipColors::default();
        let layout = square_layout();
        let mut cache = BgCache::new();
        let dib = cache.draw(&layout, &colors, 128);
        assert_eq!(dib.pixel(layout.width / 2, layout.height / 2).unwrap().alpha, 128);
    }
}
