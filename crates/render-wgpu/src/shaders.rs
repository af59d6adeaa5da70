/// WGSL shader for instanced boxes sharing one physically based material.
///
/// Lighting: ambient light, optional rect light (treated as a one-sided
/// emitter at its center), and image-based reflections from an
/// equirectangular environment map whose mip level follows roughness.
pub const BOX_SHADER: &str = r#"
const PI: f32 = 3.14159265;

struct Frame {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    // rgb premultiplied by intensity
    ambient: vec4<f32>,
    // xyz position, w = 1 when visible
    rect_pos: vec4<f32>,
    // xyz facing direction, w = area
    rect_dir: vec4<f32>,
    // rgb premultiplied by intensity
    rect_color: vec4<f32>,
};

struct Material {
    color: vec4<f32>,
    // roughness, metalness, env intensity, has env map
    params: vec4<f32>,
    // x = highest environment mip level
    env: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

@group(0) @binding(1)
var<uniform> material: Material;

@group(1) @binding(0)
var env_texture: texture_2d<f32>;

@group(1) @binding(1)
var env_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
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
    out.clip_position = frame.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize(world_normal);
    return out;
}

fn equirect_uv(dir: vec3<f32>) -> vec2<f32> {
    let d = normalize(dir);
    let u = atan2(d.z, d.x) / (2.0 * PI) + 0.5;
    let v = acos(clamp(d.y, -1.0, 1.0)) / PI;
    return vec2<f32>(u, v);
}

fn sample_env(dir: vec3<f32>, roughness: f32) -> vec3<f32> {
    let level = roughness * material.env.x;
    return textureSampleLevel(env_texture, env_sampler, equirect_uv(dir), level).rgb;
}

fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let d = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    return a2 / (PI * d * d);
}

fn visibility_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let gv = n_dot_l * sqrt(n_dot_v * n_dot_v * (1.0 - a * a) + a * a);
    let gl = n_dot_v * sqrt(n_dot_l * n_dot_l * (1.0 - a * a) + a * a);
    return 0.5 / max(gv + gl, 1e-5);
}

fn fresnel_schlick(f0: vec3<f32>, v_dot_h: f32) -> vec3<f32> {
    return f0 + (vec3<f32>(1.0) - f0) * pow(1.0 - v_dot_h, 5.0);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let v = normalize(frame.camera_pos.xyz - in.world_pos);
    let base = material.color.rgb;
    let roughness = clamp(material.params.x, 0.04, 1.0);
    let metalness = clamp(material.params.y, 0.0, 1.0);
    let env_intensity = material.params.z;
    let n_dot_v = max(dot(n, v), 1e-4);

    let diffuse_color = base * (1.0 - metalness);
    let f0 = mix(vec3<f32>(0.04), base, metalness);

    var color = diffuse_color * frame.ambient.rgb / PI;

    if (frame.rect_pos.w > 0.5) {
        let to_light = frame.rect_pos.xyz - in.world_pos;
        let l = normalize(to_light);
        let facing = max(dot(-l, frame.rect_dir.xyz), 0.0);
        let n_dot_l = max(dot(n, l), 0.0);
        let h = normalize(l + v);
        let n_dot_h = max(dot(n, h), 0.0);
        let v_dot_h = max(dot(v, h), 0.0);
        let specular = fresnel_schlick(f0, v_dot_h)
            * distribution_ggx(n_dot_h, roughness)
            * visibility_smith(n_dot_v, n_dot_l, roughness);
        let falloff = frame.rect_dir.w / max(dot(to_light, to_light), 1.0);
        color += (diffuse_color / PI + specular) * frame.rect_color.rgb * n_dot_l * facing * falloff;
    }

    if (material.params.w > 0.5) {
        let r = reflect(-v, n);
        let prefiltered = sample_env(r, roughness);
        let f90 = max(vec3<f32>(1.0 - roughness), f0);
        let fresnel = f0 + (f90 - f0) * pow(1.0 - n_dot_v, 5.0);
        let irradiance = sample_env(n, 1.0);
        color += (prefiltered * fresnel + diffuse_color * irradiance) * env_intensity;
    }

    return vec4<f32>(color, 1.0);
}
"#;
