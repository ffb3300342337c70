/// WGSL shader for every object kind.
///
/// Group 0 is bound once per frame (camera uniforms, per-instance model
/// matrices); group 1 is the material of the batch being drawn.
pub const SCENE_SHADER: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    light_position: vec4<f32>,
};

struct ObjectData {
    model: array<mat4x4<f32>>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(0) @binding(1)
var<storage, read> objects: ObjectData;

@group(1) @binding(0)
var material_texture: texture_2d<f32>;

@group(1) @binding(1)
var material_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) world_position: vec3<f32>,
};

@vertex
fn vs_main(@builtin(instance_index) instance: u32, vertex: VertexInput) -> VertexOutput {
    let world = objects.model[instance] * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = camera.projection * camera.view * world;
    out.uv = vertex.uv;
    out.world_position = world.xyz;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(material_texture, material_sampler, in.uv);
    let distance = length(camera.light_position.xyz - in.world_position);
    let ambient = 0.45;
    let falloff = 12.0 / (1.0 + distance * distance);
    let lighting = clamp(ambient + falloff, 0.0, 1.0);
    return vec4<f32>(base.rgb * lighting, base.a);
}
"#;
