use glam::{Vec2, Vec3};
use voxcast_common::{Basis, Camera, EngineConfig, camera_basis};

use crate::raycast::Ray;

/// Maps pixel coordinates to world-space ray directions.
///
/// Pixels are sampled at their centers. The vertical extent of the image plane
/// is `tan(fov / 2)` at unit distance; the horizontal extent is that times
/// the aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    width: u32,
    height: u32,
    scale: f32,
    aspect: f32,
}

impl Projector {
    pub fn new(width: u32, height: u32, fov_radians: f32) -> Self {
        Self {
            width,
            height,
            scale: (fov_radians * 0.5).tan(),
            aspect: width as f32 / height as f32,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.width, config.height, config.fov_radians())
    }

    /// Override the aspect ratio, for output whose pixels are not square.
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Image-plane coordinates of the center of pixel `(x, y)`; +y is up.
    #[inline]
    pub fn ndc(&self, x: u32, y: u32) -> Vec2 {
        let nx = 2.0 * (x as f32 + 0.5) / self.width as f32 - 1.0;
        let ny = 1.0 - 2.0 * (y as f32 + 0.5) / self.height as f32;
        Vec2::new(nx * self.scale * self.aspect, ny * self.scale)
    }

    /// Unit direction through pixel `(x, y)` for a camera with frame `basis`.
    #[inline]
    pub fn direction(&self, basis: &Basis, x: u32, y: u32) -> Vec3 {
        let ndc = self.ndc(x, y);
        (basis.forward + basis.right * ndc.x + basis.up * ndc.y).normalize()
    }

    /// Primary ray through pixel `(x, y)`.
    pub fn ray(&self, camera: &Camera, x: u32, y: u32) -> Ray {
        let basis = camera_basis(camera.rotation);
        Ray::new(camera.position, self.direction(&basis, x, y))
    }
}
