//! Simple ray tracer example.
//!
//! Builds a small scene in code, aims a 35mm-style camera at it and saves a PNG.

use std::sync::Arc;

use pinhole_renderer::{
    render, Camera, Color, DVec2, DVec3, Hittable, ImageBuffer, Lambertian, Metal, Plane,
    RenderConfig, RenderResult, Scene, Sphere, UVec2,
};

fn main() -> RenderResult<()> {
    env_logger::init();

    let start = std::time::Instant::now();
    let (scene, target) = build_scene();
    println!("Scene built in {:?}", start.elapsed());

    let mut camera =
        Camera::with_identity_pose(28.0, DVec2::new(36.0, 24.0), UVec2::new(480, 320))?;
    camera.translate(DVec3::new(3.0, 2.0, -7.0));
    camera.look_at(target.as_ref());
    println!("{camera}");

    let config = RenderConfig {
        rays_spawned: 4,
        spawn_depth: 3,
        ..Default::default()
    };
    println!(
        "Rendering {}x{} @ {} rays, depth {} (<= {} rays per pixel)...",
        camera.image_res().x,
        camera.image_res().y,
        config.rays_spawned,
        config.spawn_depth,
        config.estimated_rays_per_pixel()
    );

    let res = camera.image_res();
    let mut image = ImageBuffer::new(res.x, res.y)?;
    let start = std::time::Instant::now();
    render(&mut image, &scene, &camera, &config)?;
    println!("Rendered in {:?}", start.elapsed());

    image.save_png("output.png")?;
    println!("Saved to output.png");
    Ok(())
}

fn build_scene() -> (Scene, Arc<dyn Hittable>) {
    let mut scene = Scene::new();

    scene.add(Arc::new(Plane::new(
        DVec3::ZERO,
        DVec3::Y,
        Lambertian::new(Color::new(0.5, 0.5, 0.5)),
    )));

    let centre: Arc<dyn Hittable> = Arc::new(Sphere::new(
        DVec3::new(0.0, 1.0, 0.0),
        1.0,
        Lambertian::new(Color::new(0.4, 0.2, 0.1)),
    ));
    scene.add(centre.clone());

    scene.add(Arc::new(Sphere::new(
        DVec3::new(-2.5, 1.0, 0.5),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    )));

    for i in 0..5 {
        let x = -2.0 + i as f64;
        scene.add(Arc::new(Sphere::new(
            DVec3::new(x, 0.25, -1.8),
            0.25,
            Lambertian::new(Color::new(0.2 * i as f64, 0.5, 1.0 - 0.2 * i as f64)),
        )));
    }

    println!("Created {} objects", scene.len());
    (scene, centre)
}
