/// WGSL shader that draws the frame texture as one fullscreen triangle.
///
/// `scale` shrinks the quad on one axis for letterboxing; fragments outside
/// the frame's texture coordinates are painted black.
pub const BLIT_SHADER: &str = r#"
struct Uniforms {
    scale: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var frame_texture: texture_2d<f32>;
@group(0) @binding(1)
var frame_sampler: sampler;
@group(0) @binding(2)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_blit(@builtin(vertex_index) index: u32) -> VertexOutput {
    let corner = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    let position = corner * 2.0 - 1.0;

    var out: VertexOutput;
    out.clip_position = vec4<f32>(position * uniforms.scale, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return out;
}

@fragment
fn fs_blit(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(frame_texture, frame_sampler, in.uv);
    if (any(in.uv < vec2<f32>(0.0)) || any(in.uv > vec2<f32>(1.0))) {
        return vec4<f32>(0.0, 0.0, 0.0, 1.0);
    }
    return color;
}
"#;
