//! Pinhole camera model.
//!
//! Maps pixel coordinates to rays using physical intrinsics (focal length and
//! sensor size in millimetres, resolution and principal point in pixels) and
//! an extrinsic pose (rotation `R`, translation `T`).
//!
//! Conventions:
//! - The calibrated (camera-local) frame has +x right, +y up and +z along the
//!   optical axis. Image rows grow downward, so the vertical axis is flipped
//!   when going from pixels to calibrated coordinates.
//! - `R` maps camera-local directions to world directions and `T` is the
//!   camera centre in world space, so `world = R * local + T`.

use std::fmt;

use crate::{Hittable, Ray, RenderError, RenderResult};
use pinhole_math::{DMat3, DVec2, DVec3, UVec2};

/// Pinhole camera with intrinsic and extrinsic parameters.
///
/// No `Default`: every camera needs a focal length,
/// sensor size and resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    f: f64,          // physical focal length in mm
    ccd_size: DVec2, // physical sensor size in mm
    ccd_res: UVec2,  // sensor resolution in pixels
    pp: DVec2,       // principal point in pixels
    r: DMat3,        // rotation, camera to world
    t: DVec3,        // translation, camera centre in world space
}

impl Camera {
    /// Create a camera from the full set of intrinsics and extrinsics.
    pub fn new(
        f: f64,
        ccd_size: DVec2,
        ccd_res: UVec2,
        pp: DVec2,
        r: DMat3,
        t: DVec3,
    ) -> RenderResult<Self> {
        validate_intrinsics(f, ccd_size, ccd_res)?;
        if !pp.is_finite() {
            return Err(RenderError::camera(format!(
                "principal point must be finite, got {pp}"
            )));
        }

        Ok(Self {
            f,
            ccd_size,
            ccd_res,
            pp,
            r,
            t,
        })
    }

    /// Create a camera with the principal point at the image centre.
    ///
    /// The centre is `resolution / 2` in floating point, so odd resolutions
    /// land on a pixel centre (361 wide gives `cx = 180.5`) rather than being
    /// floored to a pixel corner.
    pub fn centered(
        f: f64,
        ccd_size: DVec2,
        ccd_res: UVec2,
        r: DMat3,
        t: DVec3,
    ) -> RenderResult<Self> {
        Self::new(f, ccd_size, ccd_res, ccd_res.as_dvec2() / 2.0, r, t)
    }

    /// Create a camera at the world origin looking down +z, with the
    /// principal point at the image centre (see [`Camera::centered`]).
    pub fn with_identity_pose(f: f64, ccd_size: DVec2, ccd_res: UVec2) -> RenderResult<Self> {
        Self::centered(f, ccd_size, ccd_res, DMat3::IDENTITY, DVec3::ZERO)
    }

    /// Focal length in mm.
    pub fn f(&self) -> f64 {
        self.f
    }

    /// Horizontal focal length in pixels.
    pub fn fx(&self) -> f64 {
        self.ccd_res.x as f64 * self.f / self.ccd_size.x
    }

    /// Vertical focal length in pixels.
    pub fn fy(&self) -> f64 {
        self.ccd_res.y as f64 * self.f / self.ccd_size.y
    }

    pub fn ccd_diagonal(&self) -> f64 {
        self.ccd_size.length()
    }

    /// Physical width of one pixel in mm.
    pub fn pixel_hsize(&self) -> f64 {
        self.ccd_size.x / self.ccd_res.x as f64
    }

    /// Physical height of one pixel in mm.
    pub fn pixel_vsize(&self) -> f64 {
        self.ccd_size.y / self.ccd_res.y as f64
    }

    /// Diagonal field of view in radians.
    pub fn fov(&self) -> f64 {
        2.0 * (0.5 * self.ccd_diagonal() / self.f).atan()
    }

    /// Horizontal field of view in radians.
    pub fn hfov(&self) -> f64 {
        2.0 * (0.5 * self.ccd_size.x / self.f).atan()
    }

    /// Vertical field of view in radians.
    pub fn vfov(&self) -> f64 {
        2.0 * (0.5 * self.ccd_size.y / self.f).atan()
    }

    pub fn image_res(&self) -> UVec2 {
        self.ccd_res
    }

    pub fn ccd_size(&self) -> DVec2 {
        self.ccd_size
    }

    pub fn cx(&self) -> f64 {
        self.pp.x
    }

    pub fn cy(&self) -> f64 {
        self.pp.y
    }

    pub fn r(&self) -> DMat3 {
        self.r
    }

    pub fn t(&self) -> DVec3 {
        self.t
    }

    /// Replace both rotation and translation.
    pub fn set_rt(&mut self, r: DMat3, t: DVec3) {
        self.set_r(r);
        self.set_t(t);
    }

    pub fn set_r(&mut self, r: DMat3) {
        self.r = r;
    }

    pub fn set_t(&mut self, t: DVec3) {
        self.t = t;
    }

    /// Compose the current rotation with `r` on the right (`R = R * r`).
    ///
    /// The caller must pass an orthonormal matrix to keep `R` orthonormal.
    pub fn rotate(&mut self, r: DMat3) -> &mut Self {
        self.r *= r;
        self
    }

    /// Move the camera centre by `t`.
    pub fn translate(&mut self, t: DVec3) -> &mut Self {
        self.t += t;
        self
    }

    /// Convert a (sub-)pixel coordinate into a direction in the camera frame.
    ///
    /// Pixel offsets from the principal point are scaled to millimetres and
    /// the z component is the focal length:
    /// `((x - cx) * pixel_hsize, (cy - y) * pixel_vsize, f)`.
    pub fn pixel_to_calibrated_ray_direction(&self, pixel: DVec2) -> DVec3 {
        DVec3::new(
            (pixel.x - self.pp.x) * self.pixel_hsize(),
            (self.pp.y - pixel.y) * self.pixel_vsize(),
            self.f,
        )
    }

    /// World-space ray from the camera centre through a (sub-)pixel.
    pub fn pixel_to_world_ray(&self, pixel: DVec2) -> Ray {
        let local = self.pixel_to_calibrated_ray_direction(pixel);
        Ray::new(self.t, self.r * local)
    }

    /// Transform a world-space point into the camera frame.
    pub fn world_to_camera(&self, point: DVec3) -> DVec3 {
        self.r.transpose() * (point - self.t)
    }

    /// Rotate the camera in place so the optical axis points at `object`.
    ///
    /// The translation is kept. World +Y is used as the up hint so image rows
    /// stay level; +Z takes over when looking straight up or down.
    pub fn look_at(&mut self, object: &dyn Hittable) {
        let target = object.position();
        let forward = (target - self.t).normalize_or_zero();
        if forward == DVec3::ZERO {
            log::warn!(
                "look_at target {} coincides with camera centre, keeping pose",
                target
            );
            return;
        }

        let mut right = DVec3::Y.cross(forward);
        if right.length_squared() < 1e-12 {
            right = DVec3::Z.cross(forward);
        }
        let right = right.normalize();
        let up = forward.cross(right);

        self.r = DMat3::from_cols(right, up, forward);
    }
}

fn validate_intrinsics(f: f64, ccd_size: DVec2, ccd_res: UVec2) -> RenderResult<()> {
    if !(f.is_finite() && f > 0.0) {
        return Err(RenderError::camera(format!(
            "focal length must be positive, got {f}"
        )));
    }
    if !(ccd_size.is_finite() && ccd_size.x > 0.0 && ccd_size.y > 0.0) {
        return Err(RenderError::camera(format!(
            "sensor size must be positive, got {ccd_size}"
        )));
    }
    if ccd_res.x == 0 || ccd_res.y == 0 {
        return Err(RenderError::camera(format!(
            "resolution must be non-zero, got {ccd_res}"
        )));
    }
    Ok(())
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Camera:")?;
        writeln!(f, "  focal length: {} mm", self.f)?;
        writeln!(
            f,
            "  sensor: {} x {} mm, {} x {} px",
            self.ccd_size.x, self.ccd_size.y, self.ccd_res.x, self.ccd_res.y
        )?;
        writeln!(f, "  principal point: ({}, {})", self.pp.x, self.pp.y)?;
        writeln!(
            f,
            "  fov: {:.2} deg (h {:.2}, v {:.2})",
            self.fov().to_degrees(),
            self.hfov().to_degrees(),
            self.vfov().to_degrees()
        )?;
        writeln!(f, "  R: {}", self.r)?;
        write!(f, "  T: {}", self.t)
    }
}
