//! Developer tooling: scene inspector and frame timing.
//!
//! # Invariants
//! - Tools only read the scene; nothing here mutates it.

mod inspector;
mod timer;

pub use inspector::{SceneInspector, SceneSummary};
pub use timer::FrameTimer;
