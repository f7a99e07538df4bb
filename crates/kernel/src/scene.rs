use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use voxcast_common::{Camera, EngineConfig};

use crate::grid::VoxelGrid;

/// Everything a frame is rendered from: one grid and one camera.
///
/// Exactly one `Scene` exists per session. The grid is fixed after
/// construction; the camera is moved by the input controller between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    grid: VoxelGrid,
}

impl Scene {
    pub fn new(grid: VoxelGrid, camera: Camera) -> Self {
        Self { camera, grid }
    }

    /// Seeded random scene with a solid floor, camera at its spawn point.
    pub fn generate(config: &EngineConfig) -> Self {
        let _span = tracing::info_span!("generate_scene", seed = config.seed).entered();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        let mut grid = VoxelGrid::new(config.grid_side);
        grid.generate(&mut rng, config.solid_one_in);
        grid.add_floor();

        tracing::debug!(
            side = grid.side(),
            solid = grid.solid_count(),
            "scene generated"
        );

        Self::new(grid, Camera::spawn_for(config.grid_side))
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }
}
