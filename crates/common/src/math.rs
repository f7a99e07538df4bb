use glam::Vec3;

use crate::types::Rotation;

/// World up axis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Below this length `cross(forward, WORLD_UP)` is treated as degenerate.
const DEGENERATE_CROSS: f32 = 1e-6;

/// Unit vector for the given yaw and pitch, in radians.
///
/// Yaw 0 / pitch 0 looks along +X; positive yaw turns towards +Z and positive
/// pitch looks up.
#[inline]
pub fn direction(yaw: f32, pitch: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw)
}

/// Orthonormal camera frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

/// Build the camera frame for `rotation`.
///
/// When `forward` is (anti)parallel to [`WORLD_UP`] the cross product vanishes;
/// `right` then falls back to the horizontal vector implied by yaw alone, which
/// is the limit of the regular formula as pitch approaches ±90°.
pub fn camera_basis(rotation: Rotation) -> Basis {
    basis_from(direction(rotation.yaw(), rotation.pitch()), rotation.yaw())
}

fn basis_from(forward: Vec3, yaw: f32) -> Basis {
    let cross = forward.cross(WORLD_UP);
    let right = if cross.length() < DEGENERATE_CROSS {
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        Vec3::new(-sin_yaw, 0.0, cos_yaw)
    } else {
        cross.normalize()
    };
    let up = right.cross(forward).normalize();
    Basis { forward, right, up }
}
