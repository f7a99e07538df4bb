use glam::Vec3;
use voxcast_common::{EngineConfig, Rgba};
use voxcast_kernel::VoxelGrid;

use crate::raycast::{Ray, RayHit, cast};

/// Directional light with an ambient floor and hard shadows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shader {
    /// Unit vector pointing towards the light.
    pub light_direction: Vec3,
    pub ambient: f32,
    /// How far along the light direction shadow rays start from the surface.
    pub shadow_bias: f32,
    /// Limit for both primary and shadow rays.
    pub render_distance: f32,
    /// Color of pixels whose primary ray hits nothing.
    pub background: Rgba,
}

impl Default for Shader {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Shader {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            light_direction: config.light_direction,
            ambient: config.ambient,
            shadow_bias: config.shadow_bias,
            render_distance: config.render_distance,
            background: Rgba::BLACK,
        }
    }

    /// Whether anything solid lies between `point` and the light.
    pub fn in_shadow(&self, grid: &VoxelGrid, point: Vec3) -> bool {
        let origin = point + self.light_direction * self.shadow_bias;
        cast(grid, Ray::new(origin, self.light_direction), self.render_distance).is_some()
    }

    /// Light reaching the surface `hit` by `ray`, in `ambient..=1`.
    pub fn brightness(&self, grid: &VoxelGrid, ray: &Ray, hit: &RayHit) -> f32 {
        if self.in_shadow(grid, ray.at(hit.distance)) {
            return self.ambient;
        }
        let lambert = hit.normal.dot(self.light_direction).max(0.0);
        self.ambient + (1.0 - self.ambient) * lambert
    }

    /// Final color for a primary ray and its hit, if any.
    pub fn shade(&self, grid: &VoxelGrid, ray: &Ray, hit: Option<RayHit>) -> Rgba {
        match hit {
            None => self.background,
            Some(hit) => {
                let brightness = self.brightness(grid, ray, &hit);
                grid.at(hit.cell).color.scaled(brightness)
            }
        }
    }

    /// Cast `ray` and shade the result.
    #[inline]
    pub fn trace(&self, grid: &VoxelGrid, ray: &Ray) -> Rgba {
        let hit = cast(grid, *ray, self.render_distance);
        self.shade(grid, ray, hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use voxcast_kernel::Voxel;

    /// A single floor cell at (8, 0, 8) and a ray straight down onto its top face.
    fn floor_cell(color: Rgba) -> (VoxelGrid, Ray) {
        let mut grid = VoxelGrid::new(16);
        grid.set(IVec3::new(8, 0, 8), Voxel::solid(color)).unwrap();
        (grid, Ray::new(Vec3::new(8.5, 10.0, 8.5), Vec3::NEG_Y))
    }

    fn shader_with_light(light: Vec3) -> Shader {
        Shader {
            light_direction: light.normalize(),
            ..Shader::default()
        }
    }

    #[test]
    fn miss_is_background() {
        let grid = VoxelGrid::new(16);
        let shader = Shader::default();
        let ray = Ray::new(Vec3::splat(8.0), Vec3::Y);
        assert_eq!(shader.trace(&grid, &ray), Rgba::BLACK);
        assert_eq!(shader.trace(&grid, &ray).pack(), 0x0000_00FF);
    }

    #[test]
    fn unobstructed_hit_is_lambertian() {
        let (grid, ray) = floor_cell(Rgba::WHITE);
        for light in [
            Vec3::Y,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-0.3, 0.2, 0.9),
            Vec3::new(0.0, -1.0, 0.0),
        ] {
            let shader = shader_with_light(light);
            let hit = cast(&grid, ray, shader.render_distance).unwrap();
            assert_eq!(hit.normal, Vec3::Y);

            let cos_theta = Vec3::Y.dot(light.normalize()).max(0.0);
            let expected = shader.ambient + (1.0 - shader.ambient) * cos_theta;
            let got = shader.brightness(&grid, &ray, &hit);
            assert!((got - expected).abs() < 1e-6, "{light}: {got} vs {expected}");
        }
    }

    #[test]
    fn obstructed_hit_is_ambient_exactly() {
        let (mut grid, ray) = floor_cell(Rgba::WHITE);
        // A wall beside the column the primary ray travels down, in the light's path.
        for x in 9..16 {
            for y in 2..16 {
                grid.set(IVec3::new(x, y, 8), Voxel::solid(Rgba::WHITE)).unwrap();
            }
        }
        let shader = shader_with_light(Vec3::new(1.0, 1.0, 0.0));
        let hit = cast(&grid, ray, shader.render_distance).unwrap();
        assert_eq!(hit.cell, IVec3::new(8, 0, 8));

        assert!(shader.in_shadow(&grid, ray.at(hit.distance)));
        assert_eq!(shader.brightness(&grid, &ray, &hit), shader.ambient);
    }

    #[test]
    fn color_is_scaled_and_alpha_kept() {
        let (grid, ray) = floor_cell(Rgba::new(200, 100, 50, 77));
        let shader = shader_with_light(Vec3::NEG_Y);
        // Light from below: the shadow ray starts inside the cell itself.
        assert_eq!(shader.trace(&grid, &ray), Rgba::new(100, 50, 25, 77));
    }

    #[test]
    fn full_light_saturates() {
        let (grid, ray) = floor_cell(Rgba::WHITE);
        let shader = Shader {
            ambient: 1.0,
            ..shader_with_light(Vec3::Y)
        };
        assert_eq!(shader.trace(&grid, &ray), Rgba::WHITE);
    }

    #[test]
    fn default_light_matches_config() {
        let shader = Shader::default();
        assert!((shader.light_direction.length() - 1.0).abs() < 1e-5);
        assert_eq!(shader.ambient, 0.5);
        assert_eq!(shader.shadow_bias, 0.001);
    }
}
