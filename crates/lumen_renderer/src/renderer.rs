//! Render pass orchestration.
//!
//! One call to [`render`] is one pass: allocate the image, build a thread
//! pool sized to the machine, start one worker per thread against a fresh
//! [`RowDispatcher`](crate::RowDispatcher), wait for all of them, and hand
//! the finished image back.

use std::time::Instant;

use lumen_core::SceneEvaluator;
use lumen_math::Vec2;
use thiserror::Error;

use crate::buffer::ImageBuffer;
use crate::sampling::SAMPLE_OFFSETS;
use crate::worker::render_rows;

/// Errors that can occur while setting up a render pass.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image must be at least 1x1, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("Thread count must be at least 1")]
    NoThreads,

    #[error("At least one sample offset is required")]
    NoSampleOffsets,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Worker count; `None` uses the hardware concurrency
    pub threads: Option<usize>,
    /// Sub-pixel offsets averaged into every pixel
    pub sample_offsets: Vec<Vec2>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: None,
            sample_offsets: SAMPLE_OFFSETS.to_vec(),
        }
    }
}

impl RenderConfig {
    /// Force a specific worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Replace the supersampling pattern.
    pub fn with_sample_offsets(mut self, offsets: impl Into<Vec<Vec2>>) -> Self {
        self.sample_offsets = offsets.into();
        self
    }

    /// Number of workers a pass with this config will start.
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(hardware_concurrency)
    }
}

/// Number of hardware threads, or 1 when it cannot be determined.
pub fn hardware_concurrency() -> usize {
    match std::thread::available_parallelism() {
        Ok(count) => count.get(),
        Err(err) => {
            log::warn!("Could not query hardware concurrency ({}), using 1 thread", err);
            1
        }
    }
}

/// Render the scene into a new `width` x `height` image.
///
/// Blocks until every row has been rendered. There is no way to cancel a
/// pass once it has started.
pub fn render<S>(
    scene: &S,
    width: u32,
    height: u32,
    config: &RenderConfig,
) -> Result<ImageBuffer, RenderError>
where
    S: SceneEvaluator + ?Sized,
{
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }
    if config.sample_offsets.is_empty() {
        return Err(RenderError::NoSampleOffsets);
    }
    let thread_count = config.thread_count();
    if thread_count == 0 {
        return Err(RenderError::NoThreads);
    }

    let start = Instant::now();
    let mut image = ImageBuffer::new(width, height);

    // Built per pass and dropped at the end of it.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .thread_name(|i| format!("lumen-worker-{}", i))
        .build()?;

    log::info!("Dispatching {} threads...", thread_count);

    {
        let dispatcher = image.dispatcher();
        let dispatcher = &dispatcher;
        let offsets = config.sample_offsets.as_slice();

        pool.scope(|s| {
            for worker in 0..thread_count {
                s.spawn(move |_| {
                    let rows = render_rows(scene, dispatcher, width, height, offsets);
                    log::debug!("Worker {} rendered {} rows", worker, rows);
                });
            }
        });
    }

    log::info!(
        "The image took {:.3}s to compute.",
        start.elapsed().as_secs_f32()
    );

    Ok(image)
}

/// A scene paired with the settings used to render it.
pub struct Renderer<S> {
    scene: S,
    config: RenderConfig,
}

impl<S: SceneEvaluator> Renderer<S> {
    /// Create a renderer with the default configuration.
    pub fn new(scene: S) -> Self {
        Self {
            scene,
            config: RenderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Run one full render pass.
    pub fn run(&self, width: u32, height: u32) -> Result<ImageBuffer, RenderError> {
        render(&self.scene, width, height, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Color, DirectionalLight, Plane, Scene, SceneDescription};
    use lumen_math::Vec3;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn facing_wall(light_color: Color) -> Scene {
        let mut scene = Scene::new(Vec3::ZERO);
        scene.add_surface(Plane::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z).unwrap());
        scene.add_light(DirectionalLight::new(light_color, Vec3::Z).unwrap());
        scene
    }

    #[test]
    fn test_two_by_two_directional_light_on_wall() {
        init_logger();
        let light_color = Color::new(0.75, 0.5, 0.25);
        let scene = facing_wall(light_color);

        let image = render(&scene, 2, 2, &RenderConfig::default()).unwrap();

        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        for row in 0..2 {
            for column in 0..2 {
                assert_eq!(image[(column, row)], light_color * 1.0);
            }
        }
    }

    #[test]
    fn test_single_thread_is_deterministic() {
        let scene = SceneDescription::demo().build().unwrap();
        let config = RenderConfig::default().with_threads(1);

        let first = render(&scene, 48, 32, &config).unwrap();
        let second = render(&scene, 48, 32, &config).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.to_rgba(), second.to_rgba());
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        init_logger();
        let scene = SceneDescription::demo().build().unwrap();

        let single = render(&scene, 40, 24, &RenderConfig::default().with_threads(1)).unwrap();
        for threads in [2, 3, 8] {
            let multi = render(&scene, 40, 24, &RenderConfig::default().with_threads(threads)).unwrap();
            assert_eq!(single, multi, "{threads} threads changed the image");
        }
    }

    #[test]
    fn test_every_pixel_evaluated_once_per_sample() {
        let calls = AtomicUsize::new(0);
        let scene = |_: Vec3| {
            calls.fetch_add(1, Ordering::Relaxed);
            Color::ONE
        };

        let image = render(&scene, 7, 13, &RenderConfig::default().with_threads(4)).unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 7 * 13 * SAMPLE_OFFSETS.len());
        assert!(image.pixels().iter().all(|p| *p == Color::ONE));
    }

    #[test]
    fn test_more_threads_than_rows() {
        let scene = |_: Vec3| Color::splat(0.5);
        let image = render(&scene, 3, 2, &RenderConfig::default().with_threads(16)).unwrap();

        assert!(image.pixels().iter().all(|p| *p == Color::splat(0.5)));
    }

    #[test]
    fn test_rejects_empty_image() {
        let scene = |_: Vec3| Color::ONE;

        assert!(matches!(
            render(&scene, 0, 4, &RenderConfig::default()),
            Err(RenderError::EmptyImage { width: 0, height: 4 })
        ));
        assert!(matches!(
            render(&scene, 4, 0, &RenderConfig::default()),
            Err(RenderError::EmptyImage { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_threads() {
        let scene = |_: Vec3| Color::ONE;
        let config = RenderConfig::default().with_threads(0);

        assert!(matches!(render(&scene, 2, 2, &config), Err(RenderError::NoThreads)));
    }

    #[test]
    fn test_rejects_empty_offsets() {
        let scene = |_: Vec3| Color::ONE;
        let config = RenderConfig::default().with_sample_offsets(Vec::new());

        assert!(matches!(render(&scene, 2, 2, &config), Err(RenderError::NoSampleOffsets)));
    }

    #[test]
    fn test_default_config_uses_hardware_threads() {
        let config = RenderConfig::default();

        assert_eq!(config.sample_offsets, SAMPLE_OFFSETS.to_vec());
        assert_eq!(config.thread_count(), hardware_concurrency());
        assert!(config.thread_count() >= 1);
    }

    #[test]
    fn test_renderer_run() {
        let light_color = Color::new(1.0, 0.5, 0.25);
        let renderer = Renderer::new(facing_wall(light_color))
            .with_config(RenderConfig::default().with_threads(2));

        let image = renderer.run(4, 4).unwrap();
        assert!(image.pixels().iter().all(|p| *p == light_color));
        assert_eq!(renderer.config().threads, Some(2));
        assert_eq!(renderer.scene().lights().len(), 1);
    }
}
