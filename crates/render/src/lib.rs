//! CPU voxel ray-marcher.
//!
//! Every frame, each pixel gets a primary ray from the [`Projector`], which is
//! walked through the grid cell by cell ([`raycast`]) until it enters a solid
//! voxel or runs past the render distance. The [`Shader`] lights the hit with
//! a directional light, casting one shadow ray, and the [`FrameRenderer`]
//! writes the packed color into a [`FrameBuffer`].
//!
//! # Invariants
//! - Renderers never mutate the scene. The camera is read once per frame.
//! - Every pixel of the frame is written on every render.
//! - Parallel and serial rendering produce identical frames.

mod engine;
mod frame;
mod projector;
pub mod raycast;
mod renderer;
mod shade;

pub use engine::Engine;
pub use frame::{FrameBuffer, FrameError};
pub use projector::Projector;
pub use raycast::{Ray, RayHit, Raycaster, cast};
pub use renderer::{FrameRenderer, Renderer, TextRenderer};
pub use shade::Shader;
