//! Per-thread render loop.

use lumen_core::{Color, SceneEvaluator};
use lumen_math::Vec2;

use crate::dispatch::{RowClaim, RowDispatcher};
use crate::sampling::render_pixel;

/// Claim rows until the dispatcher runs dry, rendering each one in place.
///
/// Returns the number of rows this worker rendered.
pub fn render_rows<S>(
    scene: &S,
    dispatcher: &RowDispatcher<'_, Color>,
    columns: u32,
    rows: u32,
    offsets: &[Vec2],
) -> u32
where
    S: SceneEvaluator + ?Sized,
{
    let mut rendered = 0;

    loop {
        let (row, pixels) = match dispatcher.claim() {
            RowClaim::Row { index, pixels } => (index, pixels),
            RowClaim::Exhausted => return rendered,
        };

        for (column, pixel) in (0..columns).zip(pixels.iter_mut()) {
            *pixel = render_pixel(scene, column, row, columns, rows, offsets);
        }
        rendered += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ImageBuffer;
    use crate::sampling::SAMPLE_OFFSETS;
    use lumen_math::Vec3;

    #[test]
    fn test_single_worker_renders_every_row() {
        let mut image = ImageBuffer::new(5, 3);
        let scene = |_: Vec3| Color::ONE;

        let rendered = {
            let dispatcher = image.dispatcher();
            render_rows(&scene, &dispatcher, 5, 3, &SAMPLE_OFFSETS)
        };

        assert_eq!(rendered, 3);
        assert!(image.pixels().iter().all(|p| *p == Color::ONE));
    }

    #[test]
    fn test_worker_on_exhausted_dispatcher_does_nothing() {
        let mut image = ImageBuffer::new(2, 2);
        let scene = |_: Vec3| Color::ONE;
        let dispatcher = image.dispatcher();
        while let RowClaim::Row { .. } = dispatcher.claim() {}

        assert_eq!(render_rows(&scene, &dispatcher, 2, 2, &SAMPLE_OFFSETS), 0);
    }

    #[test]
    fn test_pixels_land_at_their_coordinates() {
        let (columns, rows) = (4, 3);
        let mut image = ImageBuffer::new(columns, rows);
        // Single centred sample maps back to (column, row) exactly.
        let offsets = [Vec2::new(-1.0, -1.0)];
        let scene = move |p: Vec3| {
            let column = (p.x * rows as f32 + columns as f32 - 1.0) / 2.0;
            let row = (p.y * rows as f32 + rows as f32 - 1.0) / 2.0;
            Color::new(column, row, 0.0)
        };

        {
            let dispatcher = image.dispatcher();
            render_rows(&scene, &dispatcher, columns, rows, &offsets);
        }

        for row in 0..rows {
            for column in 0..columns {
                let pixel = image.get(column, row);
                assert!((pixel.x - column as f32).abs() < 1e-5);
                assert!((pixel.y - row as f32).abs() < 1e-5);
            }
        }
    }
}
