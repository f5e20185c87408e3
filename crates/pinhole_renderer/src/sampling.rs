//! Sampling policies for primary and secondary rays.
//!
//! Both policies are deterministic functions of their inputs and a seed, so
//! tracing the same rays twice yields bit-identical colors.

use crate::{HitRecord, Ray, SURFACE_OFFSET};
use pinhole_math::{DVec2, DVec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses where inside a pixel each primary sample lands.
pub trait PixelSampler: Send + Sync {
    /// Return exactly `count` offsets in `[0, 1)²` for pixel `(col, row)`.
    fn offsets(&self, col: u32, row: u32, count: usize) -> Vec<DVec2>;
}

/// Every sample goes through the pixel centre.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterPixelSampler;

impl PixelSampler for CenterPixelSampler {
    fn offsets(&self, _col: u32, _row: u32, count: usize) -> Vec<DVec2> {
        vec![DVec2::splat(0.5); count]
    }
}

/// Uniform random jitter, reproducible per pixel for a given seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct JitteredPixelSampler {
    seed: u64,
}

impl JitteredPixelSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl PixelSampler for JitteredPixelSampler {
    fn offsets(&self, col: u32, row: u32, count: usize) -> Vec<DVec2> {
        let mut rng = StdRng::seed_from_u64(mix_seed(self.seed, &[col as u64, row as u64]));
        (0..count)
            .map(|_| DVec2::new(rng.gen::<f64>(), rng.gen::<f64>()))
            .collect()
    }
}

/// Generates bounce rays from a surface hit.
pub trait SecondaryRaySampler: Send + Sync {
    /// Return exactly `count` rays starting at (or very near) `hit.p`.
    fn generate(&self, incoming: &Ray, hit: &HitRecord, count: usize) -> Vec<Ray>;
}

/// Delegates bounce directions to the material that was hit.
///
/// Origins are pushed off the surface by [`SURFACE_OFFSET`] along the normal
/// so the bounce does not immediately re-hit the same surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialSampler {
    seed: u64,
}

impl MaterialSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl SecondaryRaySampler for MaterialSampler {
    fn generate(&self, incoming: &Ray, hit: &HitRecord, count: usize) -> Vec<Ray> {
        let mut rng = StdRng::seed_from_u64(mix_seed(
            self.seed,
            &[
                hash_vec3(hit.p),
                hash_vec3(incoming.origin()),
                hash_vec3(incoming.direction()),
            ],
        ));
        let origin = hit.p + hit.normal * SURFACE_OFFSET;

        (0..count)
            .map(|_| {
                let direction = hit.material.scatter_direction(incoming, hit, &mut rng);
                Ray::new(origin, direction)
            })
            .collect()
    }
}

fn hash_vec3(v: DVec3) -> u64 {
    mix_seed(v.x.to_bits(), &[v.y.to_bits(), v.z.to_bits()])
}

/// Fold `words` into `seed` with the splitmix64 finalizer.
fn mix_seed(seed: u64, words: &[u64]) -> u64 {
    let mut h = seed;
    for &word in words {
        h ^= word;
        h = h.wrapping_add(0x9e37_79b9_7f4a_7c15);
        h = (h ^ (h >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        h = (h ^ (h >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        h ^= h >> 31;
    }
    h
}
