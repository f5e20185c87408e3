use std::sync::Arc;

use pinhole_renderer::{
    render, render_with, tone_map, Camera, CenterPixelSampler, Color, DVec2, DVec3, Hittable,
    ImageBuffer, ImageSink, Lambertian, MaterialSampler, RenderConfig, RenderError, Scene,
    SceneDescription, Sphere, UVec2, BACKGROUND,
};

/// Records the order pixels are written in.
struct RecordingSink {
    width: u32,
    height: u32,
    writes: Vec<(u32, u32)>,
}

impl ImageSink for RecordingSink {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, col: u32, row: u32, _color: Color) {
        self.writes.push((col, row));
    }
}

fn small_demo() -> SceneDescription {
    let mut description = SceneDescription::demo();
    description.width = 12;
    description.height = 8;
    description.render = RenderConfig {
        rays_spawned: 2,
        spawn_depth: 3,
        seed: 42,
        ..Default::default()
    };
    description
}

#[test]
fn demo_scene_renders_finite_colors() {
    let description = small_demo();
    let (camera, scene) = description.build().unwrap();
    let mut image = ImageBuffer::new(description.width, description.height).unwrap();

    render(&mut image, &scene, &camera, &description.render).unwrap();

    for pixel in &image.pixels {
        assert!(pixel.is_finite());
        assert!(pixel.cmpge(Color::ZERO).all());
        assert!(pixel.cmple(Color::ONE).all(), "{pixel:?}");
    }

    // The centre of the frame looks at the red sphere, which is darker than
    // the sky in the blue channel.
    let centre = image.get(6, 4);
    assert!(centre.z < tone_map(BACKGROUND).z);
}

#[test]
fn rendering_twice_is_bit_identical() {
    let description = small_demo();
    let (camera, scene) = description.build().unwrap();

    let mut first = ImageBuffer::new(description.width, description.height).unwrap();
    let mut second = ImageBuffer::new(description.width, description.height).unwrap();
    render(&mut first, &scene, &camera, &description.render).unwrap();
    render(&mut second, &scene, &camera, &description.render).unwrap();

    let bits = |image: &ImageBuffer| -> Vec<[u64; 3]> {
        image
            .pixels
            .iter()
            .map(|p| p.to_array().map(f64::to_bits))
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn every_pixel_is_written_once() {
    let camera =
        Camera::with_identity_pose(50.0, DVec2::new(36.0, 24.0), UVec2::new(5, 3)).unwrap();
    let mut sink = RecordingSink {
        width: 5,
        height: 3,
        writes: Vec::new(),
    };
    let config = RenderConfig {
        rays_spawned: 1,
        spawn_depth: 1,
        ..Default::default()
    };

    render_with(
        &mut sink,
        &Scene::new(),
        &camera,
        &config,
        &CenterPixelSampler,
        &MaterialSampler::default(),
    )
    .unwrap();

    let mut writes = sink.writes.clone();
    assert_eq!(writes.len(), 15);
    writes.sort_unstable();
    writes.dedup();
    assert_eq!(writes.len(), 15);
    assert_eq!(sink.writes[0], (0, 0));
    assert_eq!(sink.writes[1], (0, 1));
}

#[test]
fn sphere_in_view_is_shaded_by_its_albedo() {
    let camera =
        Camera::with_identity_pose(50.0, DVec2::new(36.0, 24.0), UVec2::new(9, 9)).unwrap();
    let mut scene = Scene::new();
    scene.add(Arc::new(Sphere::new(
        DVec3::new(0.0, 0.0, 10.0),
        2.0,
        Lambertian::new(Color::new(1.0, 0.0, 0.0)),
    )) as Arc<dyn Hittable>);
    let config = RenderConfig {
        rays_spawned: 3,
        spawn_depth: 2,
        ..Default::default()
    };
    let mut image = ImageBuffer::new(9, 9).unwrap();

    render_with(
        &mut image,
        &scene,
        &camera,
        &config,
        &CenterPixelSampler,
        &MaterialSampler::new(1),
    )
    .unwrap();

    // Red albedo zeroes the green and blue bounce light.
    let centre = image.get(4, 4);
    assert!(centre.x > 0.0);
    assert_eq!(centre.y, 0.0);
    assert_eq!(centre.z, 0.0);

    // Corners see the sky.
    assert!((image.get(0, 0) - tone_map(BACKGROUND)).length() < 1e-12);
}

#[test]
fn invalid_depth_aborts_render() {
    let description = small_demo();
    let (camera, scene) = description.build().unwrap();
    let mut image = ImageBuffer::new(description.width, description.height).unwrap();
    let config = RenderConfig {
        spawn_depth: 20,
        ..description.render.clone()
    };

    assert!(matches!(
        render(&mut image, &scene, &camera, &config),
        Err(RenderError::InvalidDepth { depth: 20, .. })
    ));
}
