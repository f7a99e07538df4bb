//! Shared types and utilities for the voxcast engine.
//!
//! Everything here is a plain value type. The camera is mutated only by the
//! input controller and read by the renderer; nothing in this crate holds
//! session state.

pub mod config;
pub mod math;
pub mod types;

pub use config::{ConfigError, EngineConfig, MAX_RENDER_DISTANCE};
pub use math::{Basis, WORLD_UP, camera_basis, direction};
pub use types::{Camera, PITCH_LIMIT, Rgba, Rotation};
