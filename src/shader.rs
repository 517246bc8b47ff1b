//! Embedded WGSL for the instanced sprite pipeline.
//!
//! One program draws every field: a 6-vertex quad expanded per instance in
//! the vertex stage (billboarded by offsetting clip-space x/y), displaced
//! vertically by a wave that responds to the shared time uniform and the
//! pointer's world-space point, then textured and tinted in the fragment
//! stage. The uniform struct layout must stay in sync with
//! `gpu::FieldUniforms`.

/// WGSL source for the sprite render pipeline.
pub const SPRITE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    pointer: vec3<f32>,
    time: f32,
    color: vec3<f32>,
    amplitude: f32,
    resolution: vec4<f32>,
    sprite_size: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(0) @binding(1)
var sprite_tex: texture_2d<f32>;

@group(0) @binding(2)
var sprite_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) pos: vec3<f32>,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];

    // Vertical lift: a travelling wave radiating from the pointer point,
    // fading out with distance to it.
    let dist = distance(pos.xz, uniforms.pointer.xz);
    let wave = sin(uniforms.time + dist * 4.0) * 0.5 + 0.5;
    let influence = smoothstep(0.9, 0.0, dist);
    let lifted = pos + vec3<f32>(0.0, uniforms.amplitude * 0.12 * wave * influence, 0.0);

    var clip_pos = uniforms.view_proj * vec4<f32>(lifted, 1.0);

    let size = 0.015 * uniforms.sprite_size;
    let aspect = uniforms.resolution.x / max(uniforms.resolution.y, 1.0);
    clip_pos.x += quad_pos.x * size * clip_pos.w / aspect;
    clip_pos.y += quad_pos.y * size * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.uv = quad_pos * 0.5 + 0.5;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let tex = textureSample(sprite_tex, sprite_sampler, in.uv);
    if tex.a < 0.004 {
        discard;
    }
    return vec4<f32>(uniforms.color * tex.rgb, tex.a);
}
"#;
