use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use pinhole_renderer::{render, ImageBuffer, RenderConfig, SceneDescription};

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Render one frame of a scene with a recursive pinhole ray tracer
#[derive(Debug, Parser)]
#[command(name = "pinhole", version)]
struct Args {
    /// JSON scene description (renders the built-in demo scene when omitted)
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Override image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Override image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Override rays per pixel and secondary rays per hit
    #[arg(short, long)]
    rays: Option<usize>,

    /// Override spawn depth (bounce levels)
    #[arg(short, long, allow_negative_numbers = true)]
    depth: Option<i64>,

    /// Override sampling seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write the resolved scene description as JSON and exit
    #[arg(long)]
    dump_scene: bool,

    /// Logging level (RUST_LOG filters still apply)
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let mut description = match &args.scene {
        Some(path) => SceneDescription::from_path(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene given, using the built-in demo scene");
            SceneDescription::demo()
        }
    };
    apply_overrides(&mut description, &args)?;

    if args.dump_scene {
        println!("{}", description.to_json()?);
        return Ok(());
    }

    let (camera, scene) = description.build().context("Failed to build scene")?;
    log::debug!("{}", camera);

    let mut image = ImageBuffer::new(description.width, description.height)?;
    let start = Instant::now();
    render(&mut image, &scene, &camera, &description.render).context("Render failed")?;
    log::info!("Rendered in {:?}", start.elapsed());

    image
        .save_png(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}

fn apply_overrides(description: &mut SceneDescription, args: &Args) -> Result<()> {
    if let Some(width) = args.width {
        description.width = width;
    }
    if let Some(height) = args.height {
        description.height = height;
    }
    if let Some(rays) = args.rays {
        description.render.rays_spawned = rays;
    }
    if let Some(depth) = args.depth {
        description.render.spawn_depth = RenderConfig::depth_from_signed(depth)?;
    }
    if let Some(seed) = args.seed {
        description.render.seed = seed;
    }
    Ok(())
}
