/// WGSL shader for instanced, unlit textured tile quads.
pub const TILE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var tile_texture: texture_2d<f32>;
@group(1) @binding(1)
var tile_sampler: sampler;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
};

struct InstanceInput {
    @location(2) offset: vec3<f32>,
    @location(3) size: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_tile(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let world_pos = vec3<f32>(vertex.position * instance.size, 0.0) + instance.offset;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world_pos, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_tile(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(tile_texture, tile_sampler, in.uv);
}
"#;
