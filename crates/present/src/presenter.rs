use bytemuck::{Pod, Zeroable};
use voxcast_render::FrameBuffer;
use wgpu::util::DeviceExt;

use crate::shaders;

/// Errors from uploading a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresentError {
    #[error("frame is {width}x{height}, presenter texture is {expected_width}x{expected_height}")]
    FrameSize {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    scale: [f32; 2],
    _pad: [f32; 2],
}

/// Clip-space scale that fits a `frame` rectangle inside a `surface`
/// rectangle without distorting it. One component is always 1.
pub fn letterbox_scale(frame: (u32, u32), surface: (u32, u32)) -> [f32; 2] {
    let frame_aspect = frame.0.max(1) as f32 / frame.1.max(1) as f32;
    let surface_aspect = surface.0.max(1) as f32 / surface.1.max(1) as f32;
    if surface_aspect > frame_aspect {
        // Surface is wider: bars left and right.
        [frame_aspect / surface_aspect, 1.0]
    } else {
        [1.0, surface_aspect / frame_aspect]
    }
}

/// Uploads CPU frames to a texture and draws them onto a surface.
pub struct FramePresenter {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    texture: wgpu::Texture,
    frame_size: (u32, u32),
}

impl FramePresenter {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        frame_width: u32,
        frame_height: u32,
        surface_width: u32,
        surface_height: u32,
    ) -> Self {
        let frame_size = (frame_width.max(1), frame_height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("frame_texture"),
            size: wgpu::Extent3d {
                width: frame_size.0,
                height: frame_size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("frame_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blit_uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                scale: letterbox_scale(frame_size, (surface_width, surface_height)),
                _pad: [0.0; 2],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blit_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blit_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::BLIT_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blit_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_blit"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_blit"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            texture,
            frame_size,
        }
    }

    /// Recompute the letterbox for a new surface size.
    pub fn resize(&self, queue: &wgpu::Queue, surface_width: u32, surface_height: u32) {
        let scale = letterbox_scale(self.frame_size, (surface_width, surface_height));
        tracing::debug!(?scale, surface_width, surface_height, "letterbox updated");
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                scale,
                _pad: [0.0; 2],
            }),
        );
    }

    /// Copy `frame` into the texture. Its size must match the presenter's.
    pub fn upload(&self, queue: &wgpu::Queue, frame: &FrameBuffer) -> Result<(), PresentError> {
        let (width, height) = self.frame_size;
        if (frame.width(), frame.height()) != self.frame_size {
            return Err(PresentError::FrameSize {
                expected_width: width,
                expected_height: height,
                width: frame.width(),
                height: frame.height(),
            });
        }
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &frame.to_rgba8(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    /// Draw the last uploaded frame into `view`, clearing the bars to black.
    pub fn render(&self, device: &wgpu::Device, queue: &wgpu::Queue, view: &wgpu::TextureView) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("blit_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blit_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_aspect_fills_surface() {
        assert_eq!(letterbox_scale((320, 180), (1280, 720)), [1.0, 1.0]);
    }

    #[test]
    fn wider_surface_gets_side_bars() {
        let [sx, sy] = letterbox_scale((320, 180), (2560, 720));
        assert_eq!(sy, 1.0);
        assert!((sx - 0.5).abs() < 1e-6);
    }

    #[test]
    fn taller_surface_gets_top_and_bottom_bars() {
        let [sx, sy] = letterbox_scale((320, 180), (1280, 1440));
        assert_eq!(sx, 1.0);
        assert!((sy - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_surface_is_finite() {
        let [sx, sy] = letterbox_scale((320, 180), (0, 0));
        assert!(sx.is_finite() && sy.is_finite());
        assert!(sx > 0.0 && sy > 0.0);
    }
}
