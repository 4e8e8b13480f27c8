//! Lumen Renderer - row-dispatched parallel CPU rendering.
//!
//! A render pass fans out one worker per hardware thread. Workers claim
//! whole image rows from a shared [`RowDispatcher`], supersample every pixel
//! in the row through a [`SceneEvaluator`](lumen_core::SceneEvaluator), and
//! write straight into the image. Rows are handed out as exclusive slices, so
//! pixel writes need no locking.

mod buffer;
mod dispatch;
mod morphology;
mod renderer;
mod sampling;
mod worker;

pub use buffer::{color_to_rgba, linear_to_gamma, ImageBuffer};
pub use dispatch::{RowClaim, RowDispatcher};
pub use morphology::{dilate, erode, Mask, StructuringElement};
pub use renderer::{hardware_concurrency, render, RenderConfig, RenderError, Renderer};
pub use sampling::{render_pixel, screen_point, SAMPLE_OFFSETS};
pub use worker::render_rows;

/// Re-export the shading types the renderer works with
pub use lumen_core::{Color, SceneEvaluator};
pub use lumen_math::{Vec2, Vec3};
