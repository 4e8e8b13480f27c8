use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lumen_core::{Scene, SceneDescription};
use lumen_renderer::{dilate, erode, ImageBuffer, Mask, RenderConfig, Renderer, StructuringElement};

/// Render a scene with one worker per hardware thread.
#[derive(Parser, Debug)]
#[command(name = "lumen", version, about)]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Worker threads (defaults to hardware concurrency)
    #[arg(long)]
    threads: Option<usize>,

    /// JSON scene description (defaults to the built-in demo scene)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Also write a coverage mask PNG to this path
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Luminance above which a pixel is set in the mask
    #[arg(long, default_value_t = 0.1)]
    threshold: f32,

    /// Dilation passes applied to the mask
    #[arg(long, default_value_t = 0)]
    dilate: u32,

    /// Erosion passes applied to the mask (after dilation)
    #[arg(long, default_value_t = 0)]
    erode: u32,

    /// Structuring element used for mask passes
    #[arg(long, value_enum, default_value_t = Element::Cross)]
    element: Element,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Element {
    Cross,
    Square,
}

impl From<Element> for StructuringElement {
    fn from(element: Element) -> Self {
        match element {
            Element::Cross => StructuringElement::Cross,
            Element::Square => StructuringElement::Square,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let scene = load_scene(args.scene.as_deref())?;
    log::info!(
        "Scene has {} surfaces and {} lights",
        scene.surface_count(),
        scene.lights().len()
    );

    let mut config = RenderConfig::default();
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }

    let renderer = Renderer::new(scene).with_config(config);
    let image = renderer
        .run(args.width, args.height)
        .context("Render failed")?;

    save_rgba(&args.output, image.width(), image.height(), image.to_rgba())?;
    log::info!("Saved to {}", args.output.display());

    if let Some(path) = &args.mask {
        let mask = post_process(&image, &args);
        save_rgba(path, mask.width(), mask.height(), mask.to_rgba())?;
        log::info!("Saved mask ({} pixels set) to {}", mask.count(), path.display());
    }

    Ok(())
}

fn load_scene(path: Option<&Path>) -> Result<Scene> {
    match path {
        Some(path) => SceneDescription::load_scene(path)
            .with_context(|| format!("Failed to load scene {}", path.display())),
        None => {
            log::info!("No scene given, using the demo scene");
            SceneDescription::demo()
                .build()
                .context("Demo scene is invalid")
        }
    }
}

fn post_process(image: &ImageBuffer, args: &Args) -> Mask {
    let element = StructuringElement::from(args.element);
    let mut mask = Mask::from_image(image, args.threshold);

    for _ in 0..args.dilate {
        mask = dilate(&mask, element);
    }
    for _ in 0..args.erode {
        mask = erode(&mask, element);
    }

    mask
}

fn save_rgba(path: &Path, width: u32, height: u32, bytes: Vec<u8>) -> Result<()> {
    let buffer = image::RgbaImage::from_raw(width, height, bytes)
        .context("Pixel data does not match image size")?;
    buffer
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}
