//! Device Independent Bitmaps (DIB)
//!
//! 32-bit top-down DIB used as the drawing surface for the tooltip chrome
//! and the composited popup image. Pixels are BGRA with straight
//! (non-premultiplied) alpha; the host converts when presenting.
//!
//! # Operations
//!
//! - **fill_rect**: Solid fill of a clipped rectangle
//! - **bit_blt**: SRCCOPY of another DIB
//! - **fast_blur_alpha**: Box blur of the alpha channel

extern crate alloc;

use crate::types::{ColorRef, Rect};
use alloc::vec;
use alloc::vec::Vec;

// ============================================================================
// Pixel Format
// ============================================================================

/// One BGRA pixel (RGBQUAD with the reserved byte used as alpha)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct RgbQuad {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub alpha: u8,
}

impl RgbQuad {
    pub const TRANSPARENT: RgbQuad = RgbQuad::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { blue: b, green: g, red: r, alpha: a }
    }

    pub const fn from_color_ref(color: ColorRef, alpha: u8) -> Self {
        Self::new(color.red(), color.green(), color.blue(), alpha)
    }

    pub const fn to_color_ref(&self) -> ColorRef {
        ColorRef::rgb(self.red, self.green, self.blue)
    }
}

// ============================================================================
// DIB Section
// ============================================================================

/// Top-down 32bpp bitmap with direct pixel access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dib {
    width: i32,
    height: i32,
    bits: Vec<RgbQuad>,
}

impl Dib {
    /// Create a transparent DIB; negative extents are treated as zero
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);

        Self {
            width,
            height,
            bits: vec![RgbQuad::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bounds as a rectangle at the origin
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn bits(&self) -> &[RgbQuad] {
        &self.bits
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Get pixel at (x, y)
    pub fn pixel(&self, x: i32, y: i32) -> Option<RgbQuad> {
        self.offset(x, y).map(|i| self.bits[i])
    }

    /// Set pixel at (x, y); out of bounds writes are dropped
    pub fn set_pixel(&mut self, x: i32, y: i32, color: RgbQuad) {
        if let Some(i) = self.offset(x, y) {
            self.bits[i] = color;
        }
    }

    /// Fill every pixel with one value
    pub fn fill(&mut self, color: RgbQuad) {
        self.bits.fill(color);
    }

    /// Reset to fully transparent
    pub fn clear(&mut self) {
        self.fill(RgbQuad::TRANSPARENT);
    }

    /// Fill a rectangle, clipped to the bitmap
    pub fn fill_rect(&mut self, rect: &Rect, color: RgbQuad) {
        let Some(clip) = rect.intersect(&self.rect()) else {
            return;
        };

        let stride = self.width as usize;
        for y in clip.top..clip.bottom {
            let row = y as usize * stride;
            self.bits[row + clip.left as usize..row + clip.right as usize].fill(color);
        }
    }

    /// Copy `src` to (x, y) (SRCCOPY), clipped to this bitmap
    pub fn bit_blt(&mut self, x: i32, y: i32, src: &Dib) {
        let dst_rect = Rect::from_origin(x, y, src.width, src.height);
        let Some(clip) = dst_rect.intersect(&self.rect()) else {
            return;
        };

        let span = clip.width() as usize;
        for dy in clip.top..clip.bottom {
            let sy = dy - y;
            let sx = clip.left - x;
            let src_start = sy as usize * src.width as usize + sx as usize;
            let dst_start = dy as usize * self.width as usize + clip.left as usize;
            self.bits[dst_start..dst_start + span]
                .copy_from_slice(&src.bits[src_start..src_start + span]);
        }
    }

    /// Multiply every alpha value by `alpha / 255`
    pub fn scale_alpha(&mut self, alpha: u8) {
        if alpha == 255 {
            return;
        }
        for px in self.bits.iter_mut() {
            px.alpha = ((px.alpha as u32 * alpha as u32 + 127) / 255) as u8;
        }
    }
}

// ============================================================================
// Blur
// ============================================================================

/// Box blur of the alpha channel, horizontal then vertical pass
///
/// Samples outside the bitmap count as transparent. Color channels are
/// left untouched, so soft edges keep the color of the pixels beneath.
pub fn fast_blur_alpha(dib: &mut Dib, radius: i32) {
    if radius < 1 || dib.is_empty() {
        return;
    }

    let width = dib.width as usize;
    let height = dib.height as usize;
    let r = radius as usize;
    let div = (2 * r + 1) as u32;

    let mut tmp = vec![0u8; width * height];

    for y in 0..height {
        let row = y * width;
        for x in 0..width {
            let lo = x.saturating_sub(r);
            let hi = (x + r).min(width - 1);
            let sum: u32 = dib.bits[row + lo..=row + hi]
                .iter()
                .map(|px| px.alpha as u32)
                .sum();
            tmp[row + x] = (sum / div) as u8;
        }
    }

    for x in 0..width {
        for y in 0..height {
            let lo = y.saturating_sub(r);
            let hi = (y + r).min(height - 1);
            let sum: u32 = (lo..=hi).map(|yy| tmp[yy * width + x] as u32).sum();
            dib.bits[y * width + x].alpha = (sum / div) as u8;
        }
    }
}
