use std::time::Duration;

use voxcast_common::EngineConfig;
use voxcast_input::{CameraController, InputState};
use voxcast_kernel::Scene;

use crate::frame::FrameBuffer;
use crate::renderer::FrameRenderer;

/// One session: the scene, the controller that moves its camera, and the
/// frame the renderer overwrites every tick.
///
/// A tick applies all pending input to the camera and then renders the whole
/// frame from the updated camera. Presenting the frame and waiting
/// [`Engine::frame_delay`] between ticks is left to the caller.
#[derive(Debug, Clone)]
pub struct Engine {
    scene: Scene,
    controller: CameraController,
    renderer: FrameRenderer,
    frame: FrameBuffer,
    frame_delay: Duration,
    ticks: u64,
}

impl Engine {
    /// A session over a freshly generated scene.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_scene(config, Scene::generate(config))
    }

    pub fn with_scene(config: &EngineConfig, scene: Scene) -> Self {
        Self {
            scene,
            controller: CameraController::from_config(config),
            renderer: FrameRenderer::from_config(config),
            frame: FrameBuffer::new(config.width, config.height),
            frame_delay: Duration::from_millis(config.frame_delay_ms),
            ticks: 0,
        }
    }

    /// Apply `input` to the camera, then render the frame.
    pub fn tick(&mut self, input: &InputState) -> &FrameBuffer {
        self.controller.apply_input(&mut self.scene.camera, input);
        self.renderer.fill(&self.scene, self.frame.pixels_mut());
        self.ticks += 1;
        tracing::trace!(tick = self.ticks, "tick complete");
        &self.frame
    }

    /// Render the current camera without applying any input.
    pub fn redraw(&mut self) -> &FrameBuffer {
        self.renderer.fill(&self.scene, self.frame.pixels_mut());
        &self.frame
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Pause between ticks.
    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }
}
