//! Primary and secondary ray generation.

use crate::{Camera, HitRecord, PixelSampler, Ray, SecondaryRaySampler};
use pinhole_math::DVec2;

/// Build `count` world-space rays through pixel `(col, row)`.
///
/// All rays start at the camera centre; only their directions differ, by the
/// sub-pixel offsets the sampler picks.
pub fn make_primary_rays(
    col: u32,
    row: u32,
    camera: &Camera,
    count: usize,
    sampler: &dyn PixelSampler,
) -> Vec<Ray> {
    let corner = DVec2::new(col as f64, row as f64);
    let offsets = sampler.offsets(col, row, count);
    debug_assert_eq!(offsets.len(), count);

    offsets
        .into_iter()
        .map(|offset| camera.pixel_to_world_ray(corner + offset))
        .collect()
}

/// Build `count` bounce rays for `incoming` at `hit`.
pub fn make_secondary_rays(
    incoming: &Ray,
    hit: &HitRecord,
    count: usize,
    sampler: &dyn SecondaryRaySampler,
) -> Vec<Ray> {
    let rays = sampler.generate(incoming, hit, count);
    debug_assert_eq!(rays.len(), count);
    rays
}
