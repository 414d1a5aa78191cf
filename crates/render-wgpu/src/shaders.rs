/// WGSL shader for the lit main pass: ambient + diffuse + Blinn-Phong
/// specular, shadowed by a comparison sample against the directional light's
/// depth map. Unlit instances bypass lighting entirely.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    // xyz: normalized direction toward the light; w unused
    light_dir: vec4<f32>,
    // rgb: light color * intensity; w: 1 when the light casts shadows
    light_color: vec4<f32>,
    // rgb: ambient color * intensity
    ambient_color: vec4<f32>,
    // xyz: camera eye position
    camera_pos: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;
@group(0) @binding(1)
var shadow_map: texture_depth_2d;
@group(0) @binding(2)
var shadow_sampler: sampler_comparison;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    // x: 1 for unlit, y: 1 when receiving shadows, z: shininess
    @location(7) params: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) params: vec4<f32>,
    @location(4) shadow_pos: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = world_normal;
    out.color = instance.color;
    out.params = instance.params;
    out.shadow_pos = uniforms.light_view_proj * world_pos;
    return out;
}

// Sampled in uniform control flow; callers select the result away when the
// fragment is outside the light frustum or not receiving.
fn shadow_factor(shadow_pos: vec4<f32>) -> f32 {
    let ndc = shadow_pos.xyz / shadow_pos.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, ndc.y * -0.5 + 0.5);
    let sampled = textureSampleCompare(shadow_map, shadow_sampler, uv, clamp(ndc.z, 0.0, 1.0));
    let inside = abs(ndc.x) <= 1.0 && abs(ndc.y) <= 1.0 && ndc.z >= 0.0 && ndc.z <= 1.0;
    return select(1.0, sampled, inside);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let occlusion = shadow_factor(in.shadow_pos);

    // Flip the normal toward the viewer so double-sided faces light evenly.
    var normal = normalize(in.world_normal);
    let to_eye = normalize(uniforms.camera_pos.xyz - in.world_pos);
    if (dot(normal, to_eye) < 0.0) {
        normal = -normal;
    }

    let shadowed = uniforms.light_color.w > 0.5 && in.params.y > 0.5;
    let shadow = select(1.0, occlusion, shadowed);

    let light_dir = normalize(uniforms.light_dir.xyz);
    let diffuse = max(dot(normal, light_dir), 0.0);

    let half_dir = normalize(light_dir + to_eye);
    let spec_power = max(in.params.z, 1.0);
    let specular = select(
        0.0,
        pow(max(dot(normal, half_dir), 0.0), spec_power),
        diffuse > 0.0,
    );

    let direct = uniforms.light_color.rgb * (diffuse + specular * 0.25) * shadow;
    let lit = in.color.rgb * (uniforms.ambient_color.rgb + direct);
    let shaded = vec4<f32>(lit, in.color.a);
    return select(shaded, in.color, in.params.x > 0.5);
}
"#;

/// WGSL shader for the depth-only shadow pass.
pub const SHADOW_SHADER: &str = r#"
struct ShadowUniforms {
    light_view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: ShadowUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) params: vec4<f32>,
};

@vertex
fn vs_shadow(vertex: VertexInput, instance: InstanceInput) -> @builtin(position) vec4<f32> {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    return uniforms.light_view_proj * model * vec4<f32>(vertex.position, 1.0);
}
"#;
