//! Binary morphology on coverage masks.
//!
//! Used to post-process a thresholded render: `dilate` grows the set region
//! by one element step, `erode` shrinks it. Neighbours that fall outside the
//! mask are ignored rather than treated as set or unset.

use lumen_core::Color;
use lumen_math::Vec3;
use rayon::prelude::*;

use crate::buffer::ImageBuffer;

/// Rec. 709 luma weights.
const LUMINANCE: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Neighbourhood shape for dilate and erode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructuringElement {
    /// The pixel and its four edge neighbours.
    #[default]
    Cross,
    /// The pixel and all eight neighbours.
    Square,
}

impl StructuringElement {
    /// (dx, dy) offsets covered by this element, including the centre.
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            StructuringElement::Cross => &[(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)],
            StructuringElement::Square => &[
                (-1, -1),
                (0, -1),
                (1, -1),
                (-1, 0),
                (0, 0),
                (1, 0),
                (-1, 1),
                (0, 1),
                (1, 1),
            ],
        }
    }
}

/// A width x height grid of booleans, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Create an empty (all unset) mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Build a mask by evaluating `f(column, row)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for row in 0..height {
            for column in 0..width {
                mask.set(column, row, f(column, row));
            }
        }
        mask
    }

    /// Set every pixel whose luminance is above `threshold`.
    pub fn from_image(image: &ImageBuffer, threshold: f32) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            bits: image
                .pixels()
                .iter()
                .map(|color| luminance(*color) > threshold)
                .collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, column: u32, row: u32) -> bool {
        self.bits[self.offset(column, row)]
    }

    pub fn set(&mut self, column: u32, row: u32, value: bool) {
        let offset = self.offset(column, row);
        self.bits[offset] = value;
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    /// White for set pixels, black otherwise.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.bits
            .iter()
            .flat_map(|&bit| if bit { [255, 255, 255, 255] } else { [0, 0, 0, 255] })
            .collect()
    }

    fn offset(&self, column: u32, row: u32) -> usize {
        assert!(
            column < self.width && row < self.height,
            "pixel ({column}, {row}) is outside a {}x{} mask",
            self.width,
            self.height
        );
        row as usize * self.width as usize + column as usize
    }

    /// In-bounds values under `element` centred on (column, row).
    fn neighbourhood(
        &self,
        column: u32,
        row: u32,
        element: StructuringElement,
    ) -> impl Iterator<Item = bool> + '_ {
        element.offsets().iter().filter_map(move |&(dx, dy)| {
            let x = column.checked_add_signed(dx)?;
            let y = row.checked_add_signed(dy)?;
            (x < self.width && y < self.height).then(|| self.get(x, y))
        })
    }

    /// Produce a new mask where each pixel is `rule(self, column, row)`.
    /// Rows are processed in parallel.
    fn map_pixels<F>(&self, rule: F) -> Mask
    where
        F: Fn(&Mask, u32, u32) -> bool + Sync,
    {
        let mut result = Mask::new(self.width, self.height);
        if self.width == 0 {
            return result;
        }

        result
            .bits
            .par_chunks_mut(self.width as usize)
            .enumerate()
            .for_each(|(row, out)| {
                for (column, bit) in out.iter_mut().enumerate() {
                    *bit = rule(self, column as u32, row as u32);
                }
            });

        result
    }
}

fn luminance(color: Color) -> f32 {
    color.dot(LUMINANCE)
}

/// Set every pixel that has at least one set neighbour under `element`.
pub fn dilate(mask: &Mask, element: StructuringElement) -> Mask {
    mask.map_pixels(|m, column, row| m.neighbourhood(column, row, element).any(|bit| bit))
}

/// Keep only pixels whose in-bounds neighbours under `element` are all set.
pub fn erode(mask: &Mask, element: StructuringElement) -> Mask {
    mask.map_pixels(|m, column, row| m.neighbourhood(column, row, element).all(|bit| bit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_pixel(width: u32, height: u32, column: u32, row: u32) -> Mask {
        Mask::from_fn(width, height, |x, y| x == column && y == row)
    }

    #[test]
    fn test_dilate_cross() {
        let dilated = dilate(&single_pixel(5, 5, 2, 2), StructuringElement::Cross);

        assert_eq!(dilated.count(), 5);
        assert!(dilated.get(2, 2));
        assert!(dilated.get(2, 1) && dilated.get(1, 2) && dilated.get(3, 2) && dilated.get(2, 3));
        assert!(!dilated.get(1, 1));
    }

    #[test]
    fn test_dilate_square() {
        let dilated = dilate(&single_pixel(5, 5, 2, 2), StructuringElement::Square);

        assert_eq!(dilated.count(), 9);
        assert!(dilated.get(1, 1) && dilated.get(3, 3));
        assert!(!dilated.get(0, 0));
    }

    #[test]
    fn test_dilate_at_corner_stays_in_bounds() {
        let dilated = dilate(&single_pixel(3, 3, 0, 0), StructuringElement::Square);

        assert_eq!(dilated.count(), 4);
    }

    #[test]
    fn test_erode_removes_isolated_pixel() {
        let eroded = erode(&single_pixel(5, 5, 2, 2), StructuringElement::Cross);

        assert_eq!(eroded.count(), 0);
    }

    #[test]
    fn test_erode_shrinks_block() {
        // 3x3 block in the middle of a 7x7 mask.
        let block = Mask::from_fn(7, 7, |x, y| (2..=4).contains(&x) && (2..=4).contains(&y));

        let square = erode(&block, StructuringElement::Square);
        assert_eq!(square.count(), 1);
        assert!(square.get(3, 3));

        let cross = erode(&block, StructuringElement::Cross);
        assert_eq!(cross.count(), 1);
    }

    #[test]
    fn test_full_mask_survives_erosion() {
        // Out-of-bounds neighbours are ignored, so borders are kept.
        let full = Mask::from_fn(4, 3, |_, _| true);

        assert_eq!(erode(&full, StructuringElement::Square), full);
        assert_eq!(dilate(&full, StructuringElement::Cross), full);
    }

    #[test]
    fn test_dilate_then_erode_restores_block() {
        let block = Mask::from_fn(9, 9, |x, y| (3..=5).contains(&x) && (3..=5).contains(&y));

        let closed = erode(&dilate(&block, StructuringElement::Square), StructuringElement::Square);
        assert_eq!(closed, block);
    }

    #[test]
    fn test_from_image_thresholds_luminance() {
        let mut image = ImageBuffer::new(3, 1);
        image.set(0, 0, Color::ONE);
        image.set(1, 0, Color::new(0.0, 0.0, 1.0));

        let mask = Mask::from_image(&image, 0.5);
        assert_eq!((mask.width(), mask.height()), (3, 1));
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(!mask.get(2, 0));
        assert_eq!(mask.to_rgba()[..4], [255, 255, 255, 255]);
        assert_eq!(mask.to_rgba()[4..8], [0, 0, 0, 255]);
    }
}
