//! Image buffer for storing render output.

use std::ops::{Index, IndexMut};

use lumen_core::Color;
use lumen_math::Interval;

use crate::dispatch::RowDispatcher;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let channel = |c: f32| (255.0 * Interval::UNIT.clamp(linear_to_gamma(c))) as u8;
    [channel(color.x), channel(color.y), channel(color.z), 255]
}

/// A width x height grid of linear colors, row-major, indexed by
/// `(column, row)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Get the pixel at (column, row).
    pub fn get(&self, column: u32, row: u32) -> Color {
        self[(column, row)]
    }

    /// Set the pixel at (column, row).
    pub fn set(&mut self, column: u32, row: u32, color: Color) {
        self[(column, row)] = color;
    }

    /// Hand the rows of this image out one at a time, for a single render
    /// pass. The dispatcher borrows the image mutably, so a new pass always
    /// starts from a fresh counter.
    pub fn dispatcher(&mut self) -> RowDispatcher<'_, Color> {
        RowDispatcher::new(&mut self.pixels, self.width as usize)
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|color| color_to_rgba(*color)).collect()
    }

    fn offset(&self, column: u32, row: u32) -> usize {
        assert!(
            column < self.width && row < self.height,
            "pixel ({column}, {row}) is outside a {}x{} image",
            self.width,
            self.height
        );
        row as usize * self.width as usize + column as usize
    }
}

impl Index<(u32, u32)> for ImageBuffer {
    type Output = Color;

    fn index(&self, (column, row): (u32, u32)) -> &Color {
        &self.pixels[self.offset(column, row)]
    }
}

impl IndexMut<(u32, u32)> for ImageBuffer {
    fn index_mut(&mut self, (column, row): (u32, u32)) -> &mut Color {
        let offset = self.offset(column, row);
        &mut self.pixels[offset]
    }
}
