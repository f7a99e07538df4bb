//! wgpu presentation for the CPU ray-marcher.
//!
//! The renderer produces a fixed-size frame on the CPU. This crate uploads it
//! to a texture every tick and draws it over the whole window, scaled with
//! nearest filtering and letterboxed to keep the frame's aspect ratio.
//!
//! # Invariants
//! - Presentation never alters pixel values, only their on-screen size.

mod presenter;
mod shaders;

pub use presenter::{FramePresenter, PresentError, letterbox_scale};
