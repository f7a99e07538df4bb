use voxcast_common::{Camera, EngineConfig, WORLD_UP, camera_basis};

use crate::action::Intent;
use crate::state::InputState;

/// Applies intents to the camera at a fixed per-tick speed.
///
/// Movement directions are recomputed from the camera's current orientation
/// for every intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    pub move_speed: f32,
    pub fast_multiplier: f32,
    pub sensitivity: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl CameraController {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            fast_multiplier: config.fast_multiplier,
            sensitivity: config.sensitivity,
        }
    }

    /// Apply one intent at normal speed.
    pub fn apply(&self, camera: &mut Camera, intent: Intent) {
        self.apply_at(camera, intent, self.move_speed);
    }

    /// Apply everything in `input` for one tick.
    pub fn apply_input(&self, camera: &mut Camera, input: &InputState) {
        let speed = if input.fast {
            self.move_speed * self.fast_multiplier
        } else {
            self.move_speed
        };
        for intent in input.intents() {
            self.apply_at(camera, intent, speed);
        }
        tracing::trace!(
            position = ?camera.position,
            yaw = camera.rotation.yaw(),
            pitch = camera.rotation.pitch(),
            "camera updated"
        );
    }

    fn apply_at(&self, camera: &mut Camera, intent: Intent, speed: f32) {
        let basis = camera_basis(camera.rotation);
        match intent {
            Intent::MoveForward => camera.position += basis.forward * speed,
            Intent::MoveBack => camera.position -= basis.forward * speed,
            Intent::StrafeLeft => camera.position -= basis.right * speed,
            Intent::StrafeRight => camera.position += basis.right * speed,
            Intent::MoveUp => camera.position += WORLD_UP * speed,
            Intent::MoveDown => camera.position -= WORLD_UP * speed,
            Intent::LookDeltaX(dx) => camera.rotation.turn(dx * self.sensitivity),
            Intent::LookDeltaY(dy) => camera.rotation.tilt(-dy * self.sensitivity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use voxcast_common::{PITCH_LIMIT, Rotation};

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn forward_and_back_follow_view_direction() {
        let controller = CameraController::default();
        let mut cam = Camera::new(Vec3::ZERO, Rotation::new(0.0, 0.0));

        controller.apply(&mut cam, Intent::MoveForward);
        assert!(close(cam.position, Vec3::new(0.2, 0.0, 0.0)));

        controller.apply(&mut cam, Intent::MoveBack);
        controller.apply(&mut cam, Intent::MoveBack);
        assert!(close(cam.position, Vec3::new(-0.2, 0.0, 0.0)));
    }

    #[test]
    fn forward_includes_pitch() {
        let controller = CameraController::default();
        let mut cam = Camera::new(Vec3::ZERO, Rotation::new(0.0, 1.0));
        controller.apply(&mut cam, Intent::MoveForward);
        assert!(cam.position.y > 0.0);
        assert!((cam.position.length() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn strafe_stays_horizontal() {
        let controller = CameraController::default();
        let mut cam = Camera::new(Vec3::ZERO, Rotation::new(0.4, -0.9));
        controller.apply(&mut cam, Intent::StrafeRight);
        assert!(cam.position.y.abs() < 1e-6);
        assert!((cam.position.length() - 0.2).abs() < 1e-5);

        controller.apply(&mut cam, Intent::StrafeLeft);
        assert!(close(cam.position, Vec3::ZERO));
    }

    #[test]
    fn vertical_moves_ignore_orientation() {
        let controller = CameraController::default();
        let mut cam = Camera::new(Vec3::ZERO, Rotation::new(2.0, 0.8));
        controller.apply(&mut cam, Intent::MoveUp);
        assert!(close(cam.position, Vec3::new(0.0, 0.2, 0.0)));
        controller.apply(&mut cam, Intent::MoveDown);
        controller.apply(&mut cam, Intent::MoveDown);
        assert!(close(cam.position, Vec3::new(0.0, -0.2, 0.0)));
    }

    #[test]
    fn look_x_turns_yaw_unclamped() {
        let controller = CameraController::default();
        let mut cam = Camera::default();
        for _ in 0..10 {
            controller.apply(&mut cam, Intent::LookDeltaX(10_000.0));
        }
        assert!((cam.rotation.yaw() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn look_y_saturates_pitch() {
        let controller = CameraController::default();
        let mut cam = Camera::default();

        // Pointer moving up (negative dy) looks up.
        for _ in 0..20 {
            controller.apply(&mut cam, Intent::LookDeltaY(-1_000_000.0));
            assert!(cam.rotation.pitch() <= PITCH_LIMIT);
        }
        assert_eq!(cam.rotation.pitch(), PITCH_LIMIT);

        for _ in 0..20 {
            controller.apply(&mut cam, Intent::LookDeltaY(1_000_000.0));
            assert!(cam.rotation.pitch() >= -PITCH_LIMIT);
        }
        assert_eq!(cam.rotation.pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn fast_modifier_scales_movement() {
        let controller = CameraController::default();
        let mut cam = Camera::new(Vec3::ZERO, Rotation::default());
        let input = InputState {
            forward: true,
            fast: true,
            ..InputState::default()
        };
        controller.apply_input(&mut cam, &input);
        assert!(close(cam.position, Vec3::new(0.6, 0.0, 0.0)));
    }

    #[test]
    fn apply_input_moves_then_looks() {
        let controller = CameraController::default();
        let mut cam = Camera::new(Vec3::ZERO, Rotation::default());
        let mut input = InputState {
            forward: true,
            ..InputState::default()
        };
        input.add_pointer_motion(1000.0, 0.0);
        controller.apply_input(&mut cam, &input);

        // The move used the pre-look orientation.
        assert!(close(cam.position, Vec3::new(0.2, 0.0, 0.0)));
        assert!((cam.rotation.yaw() - 1.0).abs() < 1e-6);
    }
}
