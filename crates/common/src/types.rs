use glam::Vec3;
use serde::Serialize;

use crate::math;

/// Pitch is kept within this many radians of the horizon so the camera basis
/// never flips over.
pub const PITCH_LIMIT: f32 = 1.5;

/// Camera orientation as yaw and pitch, in radians.
///
/// Yaw is unconstrained (it only ever passes through trig functions). Pitch is
/// clamped to `[-PITCH_LIMIT, PITCH_LIMIT]` by every constructor and mutator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rotation {
    yaw: f32,
    pitch: f32,
}

impl Rotation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Add `delta` to yaw.
    pub fn turn(&mut self, delta: f32) {
        self.yaw += delta;
    }

    /// Add `delta` to pitch, saturating at the pitch limit.
    pub fn tilt(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

/// Free-flying camera: a position and an orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Rotation,
}

impl Default for Camera {
    fn default() -> Self {
        Self::spawn_for(16)
    }
}

impl Camera {
    pub fn new(position: Vec3, rotation: Rotation) -> Self {
        Self { position, rotation }
    }

    /// Starting pose for a grid of the given side: centered over the grid at
    /// its top face, looking along +X.
    pub fn spawn_for(side: usize) -> Self {
        let half = side as f32 * 0.5;
        Self {
            position: Vec3::new(half, side as f32, half),
            rotation: Rotation::default(),
        }
    }

    /// Camera at `position` oriented towards `target`.
    ///
    /// Pitch is subject to the usual clamp, so a target straight above or
    /// below is only approximated.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let dir = (target - position).normalize_or_zero();
        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        let yaw = dir.z.atan2(dir.x);
        Self {
            position,
            rotation: Rotation::new(yaw, pitch),
        }
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        math::direction(self.rotation.yaw(), self.rotation.pitch())
    }
}

/// An 8-bit-per-channel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as `R<<24 | G<<16 | B<<8 | A`.
    pub const fn pack(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }

    pub const fn unpack(packed: u32) -> Self {
        Self {
            r: (packed >> 24) as u8,
            g: (packed >> 16) as u8,
            b: (packed >> 8) as u8,
            a: packed as u8,
        }
    }

    /// Multiply the color channels by `factor`, saturating each to `0..=255`.
    /// Alpha is left unchanged.
    pub fn scaled(self, factor: f32) -> Self {
        let channel = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    /// Rec. 601 luma in `0.0..=1.0`.
    pub fn luma(self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }
}
