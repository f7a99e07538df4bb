use voxcast_common::{Basis, Camera, EngineConfig, Rgba, camera_basis};
use voxcast_kernel::{Scene, VoxelGrid};

use crate::frame::{FrameBuffer, FrameError};
use crate::projector::Projector;
use crate::raycast::Ray;
use crate::shade::Shader;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and produces output. It never mutates the
/// scene; the camera is borrowed for the whole frame.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene`.
    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Ray-marches every pixel of a frame through the voxel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRenderer {
    projector: Projector,
    shader: Shader,
}

impl FrameRenderer {
    pub fn new(projector: Projector, shader: Shader) -> Self {
        Self { projector, shader }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(Projector::from_config(config), Shader::from_config(config))
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn shader(&self) -> &Shader {
        &self.shader
    }

    /// Color of the single pixel `(x, y)`.
    #[inline]
    pub fn trace_pixel(
        &self,
        basis: &Basis,
        camera: &Camera,
        grid: &VoxelGrid,
        x: u32,
        y: u32,
    ) -> Rgba {
        let ray = Ray::new(camera.position, self.projector.direction(basis, x, y));
        self.shader.trace(grid, &ray)
    }

    /// Overwrite every pixel of `frame`, which must match the projector's size.
    pub fn render_into(&self, scene: &Scene, frame: &mut FrameBuffer) -> Result<(), FrameError> {
        frame.check_size(self.projector.width(), self.projector.height())?;
        self.fill(scene, frame.pixels_mut());
        Ok(())
    }

    /// Like [`FrameRenderer::render_into`] but always on the calling thread.
    pub fn render_serial(&self, scene: &Scene, frame: &mut FrameBuffer) -> Result<(), FrameError> {
        frame.check_size(self.projector.width(), self.projector.height())?;
        self.fill_serial(scene, frame.pixels_mut());
        Ok(())
    }

    /// Trace every pixel of `pixels`, a buffer of the projector's size.
    pub(crate) fn fill(&self, scene: &Scene, pixels: &mut [u32]) {
        let _span = tracing::info_span!(
            "render_frame",
            width = self.projector.width(),
            height = self.projector.height()
        )
        .entered();
        self.fill_rows(scene, pixels);
    }

    #[cfg(feature = "auto-threads")]
    fn fill_rows(&self, scene: &Scene, pixels: &mut [u32]) {
        use rayon::iter::{IndexedParallelIterator as _, ParallelIterator as _};
        use rayon::slice::ParallelSliceMut as _;

        let basis = camera_basis(scene.camera.rotation);
        let width = self.projector.width();
        pixels
            .par_chunks_mut(width.max(1) as usize)
            .enumerate()
            .for_each(|(y, row)| self.fill_row(&basis, scene, y as u32, row));
    }

    #[cfg(not(feature = "auto-threads"))]
    fn fill_rows(&self, scene: &Scene, pixels: &mut [u32]) {
        self.fill_serial(scene, pixels);
    }

    fn fill_serial(&self, scene: &Scene, pixels: &mut [u32]) {
        let basis = camera_basis(scene.camera.rotation);
        let width = self.projector.width();
        for (y, row) in pixels.chunks_mut(width.max(1) as usize).enumerate() {
            self.fill_row(&basis, scene, y as u32, row);
        }
    }

    fn fill_row(&self, basis: &Basis, scene: &Scene, y: u32, row: &mut [u32]) {
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = self
                .trace_pixel(basis, &scene.camera, scene.grid(), x as u32, y)
                .pack();
        }
    }
}

impl Renderer for FrameRenderer {
    type Output = FrameBuffer;

    fn render(&self, scene: &Scene) -> FrameBuffer {
        let mut frame = FrameBuffer::new(self.projector.width(), self.projector.height());
        self.fill(scene, frame.pixels_mut());
        frame
    }
}

/// Characters from darkest to brightest.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Renders the scene as ASCII art, one character per traced sample.
///
/// Terminal cells are roughly twice as tall as they are wide, so the image
/// plane is squashed vertically to keep voxels looking like cubes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRenderer {
    projector: Projector,
    shader: Shader,
}

impl TextRenderer {
    pub fn new(columns: u32, rows: u32, fov_radians: f32, shader: Shader) -> Self {
        let aspect = columns as f32 / (rows.max(1) as f32 * 2.0);
        Self {
            projector: Projector::new(columns, rows, fov_radians).with_aspect(aspect),
            shader,
        }
    }

    pub fn from_config(config: &EngineConfig, columns: u32, rows: u32) -> Self {
        Self::new(columns, rows, config.fov_radians(), Shader::from_config(config))
    }

    fn glyph(color: Rgba) -> char {
        let last = RAMP.len() - 1;
        let index = (color.luma() * last as f32).round() as usize;
        RAMP[index.min(last)] as char
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let basis = camera_basis(scene.camera.rotation);
        let (columns, rows) = (self.projector.width(), self.projector.height());
        let mut out = String::with_capacity((columns as usize + 1) * rows as usize);
        for y in 0..rows {
            for x in 0..columns {
                let ray = Ray::new(scene.camera.position, self.projector.direction(&basis, x, y));
                out.push(Self::glyph(self.shader.trace(scene.grid(), &ray)));
            }
            out.push('\n');
        }
        out
    }
}
