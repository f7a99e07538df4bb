//! Scene kernel: the voxel grid and the camera that looks at it.
//!
//! # Invariants
//! - Grid queries are total. Coordinates outside the cube read as empty air.
//! - Voxels are not modified once a scene has been generated.
//! - All per-session state lives in one [`Scene`] value that callers pass around.

pub mod grid;
pub mod scene;

pub use grid::{GridError, Voxel, VoxelGrid};
pub use scene::Scene;
