//! Input: a folded per-tick input record and the camera controller it drives.
//!
//! # Invariants
//! - The controller only ever sees intents, never raw window events.
//! - All input for a tick is applied before that tick's frame is rendered.

pub mod action;
pub mod controller;
pub mod state;

pub use action::Intent;
pub use controller::CameraController;
pub use state::InputState;
