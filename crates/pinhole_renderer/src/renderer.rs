//! Render loop, configuration and image output.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rays::make_primary_rays;
use crate::tracer::BACKGROUND;
use crate::{
    Camera, Color, JitteredPixelSampler, MaterialSampler, PixelSampler, RenderError,
    RenderResult, Scene, SecondaryRaySampler, Tracer,
};

/// Largest accepted spawn depth.
///
/// Work per pixel grows as `rays_spawned^spawn_depth`, and recursion depth
/// equals `spawn_depth`, so this also bounds the call stack.
pub const MAX_SPAWN_DEPTH: u32 = 8;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Rays per pixel, and secondary rays per hit at every bounce
    pub rays_spawned: usize,
    /// Number of bounce levels traced before returning black
    pub spawn_depth: u32,
    /// Color of rays that leave the scene
    pub background: Color,
    /// Seed for pixel jitter and bounce sampling
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rays_spawned: 4,
            spawn_depth: 3,
            background: BACKGROUND,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Check the configuration before rendering.
    pub fn validate(&self) -> RenderResult<()> {
        if self.rays_spawned == 0 {
            return Err(RenderError::EmptyRayBatch);
        }
        if self.spawn_depth > MAX_SPAWN_DEPTH {
            return Err(RenderError::InvalidDepth {
                depth: self.spawn_depth as i64,
                max: MAX_SPAWN_DEPTH,
            });
        }
        Ok(())
    }

    /// Convert a signed depth (e.g. from the command line) to a spawn depth.
    pub fn depth_from_signed(depth: i64) -> RenderResult<u32> {
        u32::try_from(depth)
            .ok()
            .filter(|d| *d <= MAX_SPAWN_DEPTH)
            .ok_or(RenderError::InvalidDepth {
                depth,
                max: MAX_SPAWN_DEPTH,
            })
    }

    /// Upper bound on rays cast for one pixel.
    ///
    /// Every level multiplies the ray count by `rays_spawned`, giving
    /// `b + b^2 + ... + b^depth` for `b = rays_spawned`. Misses stop a branch
    /// early, so real renders usually cast fewer.
    pub fn estimated_rays_per_pixel(&self) -> u64 {
        let branch = self.rays_spawned as u64;
        let mut level = 1u64;
        let mut total = 0u64;
        for _ in 0..self.spawn_depth {
            level = level.saturating_mul(branch);
            total = total.saturating_add(level);
        }
        total
    }
}

/// Destination for rendered pixels.
pub trait ImageSink {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_pixel(&mut self, col: u32, row: u32, color: Color);
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    ///
    /// Fails with [`RenderError::ImageTooLarge`] when the RGBA byte count
    /// does not fit in `usize`.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|len| len.checked_mul(4).is_some())
            .ok_or(RenderError::ImageTooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            pixels: vec![Color::ZERO; len],
        })
    }

    fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    /// Get the pixel at (col, row).
    pub fn get(&self, col: u32, row: u32) -> Color {
        self.pixels[self.index(col, row)]
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Write the image as an 8-bit PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

impl ImageSink for ImageBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, col: u32, row: u32, color: Color) {
        let index = self.index(col, row);
        self.pixels[index] = color;
    }
}

/// Convert a tone-mapped color to 8-bit RGBA.
///
/// The tracer already applies the square-root tone map, so channels are only
/// clamped to [0, 1] and scaled.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let c = color.clamp(Color::ZERO, Color::ONE) * 255.0;
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

/// Trace one pixel: build its primary rays and trace them at full depth.
///
/// The config is validated first, so an out-of-range depth or an empty ray
/// count fails here as it does for a full render.
pub fn render_pixel(
    col: u32,
    row: u32,
    camera: &Camera,
    tracer: &Tracer<'_>,
    config: &RenderConfig,
    pixel_sampler: &dyn PixelSampler,
) -> RenderResult<Color> {
    config.validate()?;
    let rays = make_primary_rays(col, row, camera, config.rays_spawned, pixel_sampler);
    tracer.trace(&rays, config.spawn_depth)
}

/// Render the scene into `image` with the default sampling policies.
///
/// Pixels are jittered with [`JitteredPixelSampler`] and bounces follow the
/// hit material through [`MaterialSampler`], both seeded from `config.seed`.
pub fn render(
    image: &mut dyn ImageSink,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> RenderResult<()> {
    let pixel_sampler = JitteredPixelSampler::new(config.seed);
    let bounce_sampler = MaterialSampler::new(config.seed);
    render_with(image, scene, camera, config, &pixel_sampler, &bounce_sampler)
}

/// Render the scene into `image` with explicit sampling policies.
///
/// Single-threaded. Every pixel is written exactly once and depends only on
/// the read-only scene and camera. The first error aborts the render.
pub fn render_with(
    image: &mut dyn ImageSink,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    pixel_sampler: &dyn PixelSampler,
    bounce_sampler: &dyn SecondaryRaySampler,
) -> RenderResult<()> {
    config.validate()?;

    let (width, height) = (image.width(), image.height());
    let res = camera.image_res();
    if res.x != width || res.y != height {
        log::warn!(
            "Image is {}x{} but camera resolution is {}x{}",
            width,
            height,
            res.x,
            res.y
        );
    }

    log::info!(
        "Rendering {}x{}: {} objects, {} rays/pixel, depth {} (up to {} rays per pixel)",
        width,
        height,
        scene.len(),
        config.rays_spawned,
        config.spawn_depth,
        config.estimated_rays_per_pixel()
    );

    let tracer = Tracer::new(scene, bounce_sampler, config.rays_spawned)
        .with_background(config.background);
    let step = (width / 10).max(1);

    for col in 0..width {
        for row in 0..height {
            let color = render_pixel(col, row, camera, &tracer, config, pixel_sampler)?;
            image.set_pixel(col, row, color);
        }
        if (col + 1) % step == 0 || col + 1 == width {
            log::debug!("Rendered {}/{} columns", col + 1, width);
        }
    }

    Ok(())
}
