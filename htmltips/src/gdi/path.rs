//! Path Objects
//!
//! Outline paths built from lines and cubic Bezier curves, flattened to
//! polygons and filled into a DIB with an even-odd scanline filler.
//! The tooltip chrome (rounded rectangles, balloon legs) is described
//! with these paths.
//!
//! # Path Elements
//!
//! - **MoveTo**: Start new figure at point
//! - **LineTo**: Add line segment
//! - **BezierTo**: Add cubic Bezier curve
//! - **CloseFigure**: Close current sub-path
//!
//! Filling samples pixel centers, so the result depends only on the
//! integer path coordinates and is reproducible bit for bit.

extern crate alloc;

use super::dib::{Dib, RgbQuad};
use crate::types::Point;
use alloc::vec::Vec;

// ============================================================================
// Constants
// ============================================================================

/// Maximum points in a single path
const MAX_PATH_POINTS: usize = 65536;

/// Bezier curve flattening tolerance (in pixels)
pub const BEZIER_TOLERANCE: f32 = 0.25;

/// Subdivision limit for a single curve
const MAX_BEZIER_DEPTH: u32 = 12;

// ============================================================================
// Path Point Types
// ============================================================================

bitflags::bitflags! {
    /// Point type flags (PT_* constants)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PointType: u8 {
        /// Close figure flag
        const CLOSEFIGURE = 0x01;
        /// Line to point
        const LINETO = 0x02;
        /// Bezier control point
        const BEZIERTO = 0x04;
        /// Move to point (start new figure)
        const MOVETO = 0x06;
    }
}

// ============================================================================
// Path Element
// ============================================================================

/// A single element in a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathElement {
    /// Point coordinates
    pub point: Point,
    /// MoveTo, LineTo or BezierTo, possibly with CLOSEFIGURE
    pub point_type: PointType,
}

impl PathElement {
    /// Create a path element
    pub fn new(point: Point, point_type: PointType) -> Self {
        Self { point, point_type }
    }

    /// Create a MoveTo element
    pub fn move_to(x: i32, y: i32) -> Self {
        Self::new(Point::new(x, y), PointType::MOVETO)
    }

    /// Create a LineTo element
    pub fn line_to(x: i32, y: i32) -> Self {
        Self::new(Point::new(x, y), PointType::LINETO)
    }

    /// Create a BezierTo element
    pub fn bezier_to(x: i32, y: i32) -> Self {
        Self::new(Point::new(x, y), PointType::BEZIERTO)
    }
}

// ============================================================================
// Path Object
// ============================================================================

/// Recorded path elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// Path elements (points and types)
    elements: Vec<PathElement>,
    /// Whether the current figure is closed
    figure_closed: bool,
}

impl Default for Path {
    fn default() -> Self {
        Self::new()
    }
}

impl Path {
    /// Create an empty path
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            figure_closed: true,
        }
    }

    /// Remove all elements
    pub fn clear(&mut self) {
        self.elements.clear();
        self.figure_closed = true;
    }

    /// Number of recorded elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Add a MoveTo element (starts new figure)
    pub fn move_to(&mut self, x: i32, y: i32) -> bool {
        if self.elements.len() >= MAX_PATH_POINTS {
            return false;
        }

        self.figure_closed = false;
        self.elements.push(PathElement::move_to(x, y));
        true
    }

    /// Add a LineTo element
    pub fn line_to(&mut self, x: i32, y: i32) -> bool {
        if self.elements.len() >= MAX_PATH_POINTS {
            return false;
        }

        // If no figure started, implicitly start at origin
        if self.figure_closed && self.elements.is_empty() {
            self.move_to(0, 0);
        }

        self.elements.push(PathElement::line_to(x, y));
        true
    }

    /// Add a cubic Bezier curve (2 control points + end point)
    pub fn bezier_to(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) -> bool {
        if self.elements.len() + 3 > MAX_PATH_POINTS {
            return false;
        }

        self.elements.push(PathElement::bezier_to(x1, y1));
        self.elements.push(PathElement::bezier_to(x2, y2));
        self.elements.push(PathElement::bezier_to(x3, y3));
        true
    }

    /// Close the current figure with a line back to figure start
    pub fn close_figure(&mut self) -> bool {
        if self.figure_closed || self.elements.is_empty() {
            return false;
        }

        if let Some(last) = self.elements.last_mut() {
            last.point_type |= PointType::CLOSEFIGURE;
        }

        self.figure_closed = true;
        true
    }

    /// Last point of the path
    pub fn current_point(&self) -> Option<Point> {
        self.elements.last().map(|e| e.point)
    }

    /// Flatten the path (convert curves to line segments)
    pub fn flatten(&self, tolerance: f32) -> Path {
        let mut result = Path::new();

        let mut i = 0;
        while i < self.elements.len() {
            let elem = &self.elements[i];

            match elem.point_type & !PointType::CLOSEFIGURE {
                PointType::MOVETO => {
                    result.move_to(elem.point.x, elem.point.y);
                    i += 1;
                }
                PointType::LINETO => {
                    result.line_to(elem.point.x, elem.point.y);
                    if elem.point_type.contains(PointType::CLOSEFIGURE) {
                        result.close_figure();
                    }
                    i += 1;
                }
                PointType::BEZIERTO => {
                    if i + 2 < self.elements.len() {
                        let p0 = result.current_point().unwrap_or(Point::new(0, 0));
                        let p1 = self.elements[i].point;
                        let p2 = self.elements[i + 1].point;
                        let p3 = self.elements[i + 2].point;

                        flatten_cubic_bezier(&mut result, p0, p1, p2, p3, tolerance, 0);

                        if self.elements[i + 2].point_type.contains(PointType::CLOSEFIGURE) {
                            result.close_figure();
                        }

                        i += 3;
                    } else {
                        i += 1;
                    }
                }
                _ => {
                    i += 1;
                }
            }
        }

        result
    }

    /// Polygon edges of the flattened path; every figure is implicitly closed
    fn edges(&self) -> Vec<(Point, Point)> {
        let flat = self.flatten(BEZIER_TOLERANCE);
        let mut edges = Vec::new();
        let mut start: Option<Point> = None;
        let mut prev = Point::new(0, 0);

        for elem in flat.elements() {
            if elem.point_type & !PointType::CLOSEFIGURE == PointType::MOVETO {
                if let Some(s) = start {
                    edges.push((prev, s));
                }
                start = Some(elem.point);
            } else {
                edges.push((prev, elem.point));
            }
            prev = elem.point;
        }

        if let Some(s) = start {
            edges.push((prev, s));
        }

        edges.retain(|(a, b)| a.y != b.y);
        edges
    }

    /// Fill the path interior (even-odd rule) into `dib`
    pub fn fill(&self, dib: &mut Dib, color: RgbQuad) {
        let edges = self.edges();
        if edges.is_empty() || dib.is_empty() {
            return;
        }

        let min_y = edges.iter().map(|(a, b)| a.y.min(b.y)).min().unwrap_or(0).max(0);
        let max_y = edges.iter().map(|(a, b)| a.y.max(b.y)).max().unwrap_or(0).min(dib.height());

        let mut crossings: Vec<i64> = Vec::new();
        for y in min_y..max_y {
            // Doubled coordinates: the pixel center sits at 2y+1
            let sy = 2 * y as i64 + 1;
            crossings.clear();

            for (a, b) in &edges {
                let (ay, by) = (2 * a.y as i64, 2 * b.y as i64);
                let (top, bottom) = if ay < by { (ay, by) } else { (by, ay) };
                if sy < top || sy >= bottom {
                    continue;
                }
                let (ax, bx) = (2 * a.x as i64, 2 * b.x as i64);
                crossings.push(ax + (sy - ay) * (bx - ax) / (by - ay));
            }

            crossings.sort_unstable();
            for pair in crossings.chunks_exact(2) {
                // Pixel x is inside when pair[0] <= 2x+1 < pair[1]
                let x0 = ceil_half(pair[0] - 1).max(0);
                let x1 = ceil_half(pair[1] - 1).min(dib.width() as i64);
                for x in x0..x1 {
                    dib.set_pixel(x as i32, y, color);
                }
            }
        }
    }
}

/// ceil(v / 2) for signed values
fn ceil_half(v: i64) -> i64 {
    (v + 1).div_euclid(2)
}

// ============================================================================
// Bezier Flattening
// ============================================================================

/// Recursively flatten a cubic Bezier curve to line segments
fn flatten_cubic_bezier(path: &mut Path, p0: Point, p1: Point, p2: Point, p3: Point, tolerance: f32, depth: u32) {
    let dx = p3.x - p0.x;
    let dy = p3.y - p0.y;
    let len_sq = (dx * dx + dy * dy) as f32;

    if len_sq < 1.0 {
        path.line_to(p3.x, p3.y);
        return;
    }

    // Perpendicular distance of control points from line p0-p3
    let d1 = ((p1.x - p0.x) * dy - (p1.y - p0.y) * dx).abs() as f32;
    let d2 = ((p2.x - p0.x) * dy - (p2.y - p0.y) * dx).abs() as f32;
    let max_dist = (d1.max(d2)) / sqrt_approx(len_sq);

    if max_dist <= tolerance || len_sq < 4.0 || depth >= MAX_BEZIER_DEPTH {
        path.line_to(p3.x, p3.y);
    } else {
        // Subdivide using de Casteljau's algorithm
        let p01 = midpoint(p0, p1);
        let p12 = midpoint(p1, p2);
        let p23 = midpoint(p2, p3);
        let p012 = midpoint(p01, p12);
        let p123 = midpoint(p12, p23);
        let p0123 = midpoint(p012, p123);

        flatten_cubic_bezier(path, p0, p01, p012, p0123, tolerance, depth + 1);
        flatten_cubic_bezier(path, p0123, p123, p23, p3, tolerance, depth + 1);
    }
}

/// Approximate square root using Newton-Raphson iteration
fn sqrt_approx(x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }

    // Initial guess from the fast inverse sqrt trick
    let mut i = x.to_bits();
    i = 0x5f3759df - (i >> 1);
    let inv_sqrt = f32::from_bits(i);
    let mut guess = 1.0 / inv_sqrt;

    guess = 0.5 * (guess + x / guess);
    guess = 0.5 * (guess + x / guess);

    guess
}

/// Integer midpoint of two points
fn midpoint(p1: Point, p2: Point) -> Point {
    Point::new((p1.x + p2.x) / 2, (p1.y + p2.y) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(path: &mut Path, x: i32, y: i32, size: i32) {
        path.move_to(x, y);
        path.line_to(x + size, y);
        path.line_to(x + size, y + size);
        path.line_to(x, y + size);
        path.close_figure();
    }

    #[test]
    fn test_close_figure_marks_last_element() {
        let mut path = Path::new();
        square(&mut path, 0, 0, 4);
        let last = path.elements().last().unwrap();
        assert!(last.point_type.contains(PointType::CLOSEFIGURE));
        assert!(!path.close_figure());
    }

    #[test]
    fn test_fill_square_exact_coverage() {
        let mut path = Path::new();
        square(&mut path, 1, 1, 3);

        let mut dib = Dib::new(6, 6);
        let ink = RgbQuad::new(0, 0, 0, 255);
        path.fill(&mut dib, ink);

        let covered: usize = dib.bits().iter().filter(|px| px.alpha == 255).count();
        assert_eq!(covered, 9);
        assert_eq!(dib.pixel(1, 1), Some(ink));
        assert_eq!(dib.pixel(3, 3), Some(ink));
        assert_eq!(dib.pixel(4, 4), Some(RgbQuad::TRANSPARENT));
    }

    #[test]
    fn test_fill_even_odd_hole() {
        let mut path = Path::new();
        square(&mut path, 0, 0, 6);
        square(&mut path, 2, 2, 2);

        let mut dib = Dib::new(6, 6);
        path.fill(&mut dib, RgbQuad::new(0, 0, 0, 255));
        assert_eq!(dib.pixel(0, 0).unwrap().alpha, 255);
        assert_eq!(dib.pixel(2, 2).unwrap().alpha, 0);
        assert_eq!(dib.pixel(3, 3).unwrap().alpha, 0);
    }

    #[test]
    fn test_flatten_bezier_ends_on_curve_end() {
        let mut path = Path::new();
        path.move_to(0, 0);
        path.bezier_to(0, 20, 20, 40, 40, 40);
        let flat = path.flatten(BEZIER_TOLERANCE);

        assert!(flat.len() > 2);
        assert_eq!(flat.current_point(), Some(Point::new(40, 40)));
        assert!(flat.elements()[1..]
            .iter()
            .all(|e| e.point_type == PointType::LINETO));
    }

    #[test]
    fn test_sqrt_approx() {
        let root = sqrt_approx(144.0);
        assert!((root - 12.0).abs() < 0.01);
    }
}
