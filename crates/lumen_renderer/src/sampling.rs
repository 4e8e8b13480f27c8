//! Sub-pixel sampling and the screen mapping.

use lumen_core::{Color, SceneEvaluator};
use lumen_math::{Vec2, Vec3};

/// Default 2x2 supersampling pattern.
///
/// Offsets are in the same units as `2 * column`, so a pixel spans two units
/// and these land on the quarter points of each pixel.
pub const SAMPLE_OFFSETS: [Vec2; 4] = [
    Vec2::new(-0.5, -0.5),
    Vec2::new(-1.5, -0.5),
    Vec2::new(-0.5, -1.5),
    Vec2::new(-1.5, -1.5),
];

/// Map a pixel plus sub-pixel offset onto the screen plane at `z = -1`.
///
/// Both axes are divided by `rows`, so x spans `columns / rows` units on
/// non-square images. Output depends on this exact mapping.
#[inline]
pub fn screen_point(column: u32, row: u32, columns: u32, rows: u32, offset: Vec2) -> Vec3 {
    let rows_f = rows as f32;
    Vec3::new(
        (2.0 * column as f32 - (columns as f32 + offset.x)) / rows_f,
        (2.0 * row as f32 - (rows_f + offset.y)) / rows_f,
        -1.0,
    )
}

/// Average the scene over every offset of one pixel.
///
/// `offsets` must not be empty.
pub fn render_pixel<S>(
    scene: &S,
    column: u32,
    row: u32,
    columns: u32,
    rows: u32,
    offsets: &[Vec2],
) -> Color
where
    S: SceneEvaluator + ?Sized,
{
    let mut pixel_color = Color::ZERO;

    for &offset in offsets {
        pixel_color += scene.evaluate(screen_point(column, row, columns, rows, offset));
    }

    pixel_color / offsets.len() as f32
}
