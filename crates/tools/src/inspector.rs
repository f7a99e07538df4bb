use serde::Serialize;
use voxcast_kernel::Scene;

/// Read-only queries against a scene for debugging and the stats overlay.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene.
    pub fn summary(scene: &Scene) -> SceneSummary {
        let grid = scene.grid();
        let camera = &scene.camera;
        SceneSummary {
            side: grid.side(),
            volume: grid.volume(),
            solid_voxels: grid.solid_count(),
            camera_position: camera.position.to_array(),
            yaw: camera.rotation.yaw(),
            pitch: camera.rotation.pitch(),
        }
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub side: usize,
    pub volume: usize,
    pub solid_voxels: usize,
    pub camera_position: [f32; 3],
    /// Radians.
    pub yaw: f32,
    /// Radians.
    pub pitch: f32,
}

impl SceneSummary {
    /// Fraction of cells that are solid.
    pub fn fill_ratio(&self) -> f32 {
        if self.volume == 0 {
            0.0
        } else {
            self.solid_voxels as f32 / self.volume as f32
        }
    }
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.camera_position;
        write!(
            f,
            "Scene: side={} solid={}/{} camera=({x:.2}, {y:.2}, {z:.2}) yaw={:.3} pitch={:.3}",
            self.side, self.solid_voxels, self.volume, self.yaw, self.pitch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use voxcast_common::{Camera, EngineConfig, Rotation};
    use voxcast_kernel::VoxelGrid;

    #[test]
    fn summary_empty_grid() {
        let scene = Scene::new(VoxelGrid::new(4), Camera::default());
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.side, 4);
        assert_eq!(summary.volume, 64);
        assert_eq!(summary.solid_voxels, 0);
        assert_eq!(summary.fill_ratio(), 0.0);
    }

    #[test]
    fn summary_generated_scene() {
        let scene = Scene::generate(&EngineConfig::default());
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.volume, 4096);
        assert!(summary.solid_voxels >= 256);
        assert_eq!(summary.camera_position, [8.0, 16.0, 8.0]);
    }

    #[test]
    fn summary_display() {
        let mut grid = VoxelGrid::new(2);
        grid.add_floor();
        let camera = Camera::new(Vec3::new(1.0, 2.5, -3.0), Rotation::new(0.5, -0.25));
        let summary = SceneInspector::summary(&Scene::new(grid, camera));

        let s = format!("{summary}");
        assert!(s.contains("side=2"));
        assert!(s.contains("solid=4/8"));
        assert!(s.contains("camera=(1.00, 2.50, -3.00)"));
        assert!(s.contains("yaw=0.500 pitch=-0.250"));
    }

    #[test]
    fn summary_serializes_to_json() {
        let scene = Scene::new(VoxelGrid::new(2), Camera::default());
        let json = serde_json::to_value(SceneInspector::summary(&scene)).unwrap();
        assert_eq!(json["side"], 2);
        assert_eq!(json["solid_voxels"], 0);
        assert_eq!(json["camera_position"][1], 16.0);
    }
}
