use crate::camera::OrbitCamera;
use crate::shaders;
use crate::shadow::ShadowMap;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use shadowbox_scene::{Geometry, Mesh, Scene, Shading, Side};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
    ambient_color: [f32; 4],
    camera_pos: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ShadowUniforms {
    light_view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    params: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, mesh: &Mesh) -> Self {
        let cols = model.to_cols_array_2d();
        let unlit = match mesh.material.shading {
            Shading::Lit => 0.0,
            Shading::Unlit => 1.0,
        };
        let [r, g, b] = mesh.material.color.to_array();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: [r, g, b, 1.0],
            params: [
                unlit,
                if mesh.receive_shadow { 1.0 } else { 0.0 },
                mesh.material.shininess,
                0.0,
            ],
        }
    }
}

/// Geometry identity for batching: variant tag plus parameter bit patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct GeometryKey {
    tag: u8,
    bits: [u32; 3],
    double_sided: bool,
}

fn batch_key(mesh: &Mesh) -> GeometryKey {
    let double_sided = mesh.material.side == Side::Double;
    match mesh.geometry {
        Geometry::Box {
            width,
            height,
            depth,
        } => GeometryKey {
            tag: 0,
            bits: [width.to_bits(), height.to_bits(), depth.to_bits()],
            double_sided,
        },
        Geometry::Plane { width, height } => GeometryKey {
            tag: 1,
            bits: [width.to_bits(), height.to_bits(), 0],
            double_sided,
        },
        Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        } => GeometryKey {
            tag: 2,
            bits: [radius.to_bits(), width_segments, height_segments],
            double_sided,
        },
    }
}

/// One draw batch: a unique geometry/side combination and the instance
/// buffer for every mesh node using it.
struct MeshBatch {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    capacity: u32,
    double_sided: bool,
}

/// wgpu renderer for a shadowbox scene.
///
/// Batches are built once from the scene handed to `new`; per-frame work is
/// writing uniforms and instance transforms, a depth-only shadow pass over
/// the casters, and a lit main pass over everything.
pub struct SceneRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    mesh_pipeline_double: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    shadow_uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    shadow_bind_group: wgpu::BindGroup,
    shadow_map: ShadowMap,
    batches: BTreeMap<GeometryKey, MeshBatch>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: &Scene,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let shadow_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shadow_uniform_buffer"),
            contents: bytemuck::bytes_of(&ShadowUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Shadow map sized by the scene's directional light, if it has one.
        let (map_width, map_height) = scene
            .directional_light()
            .map(|(_, light)| (light.shadow.map_width, light.shadow.map_height))
            .unwrap_or((512, 512));
        let shadow_map = ShadowMap::new(device, map_width, map_height);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
                },
            ],
        });

        let shadow_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("shadow_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_bind_group"),
            layout: &shadow_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: shadow_uniform_buffer.as_entire_binding(),
            }],
        });

        let vertex_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x3,
                ],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceData>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![
                    2 => Float32x4,
                    3 => Float32x4,
                    4 => Float32x4,
                    5 => Float32x4,
                    6 => Float32x4,
                    7 => Float32x4,
                ],
            },
        ];

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let mesh_pipeline_for = |cull_mode: Option<wgpu::Face>, label: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &scene_shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &vertex_layouts,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &scene_shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };
        let mesh_pipeline = mesh_pipeline_for(Some(wgpu::Face::Back), "mesh_pipeline");
        let mesh_pipeline_double = mesh_pipeline_for(None, "mesh_pipeline_double");

        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SHADOW_SHADER.into()),
        });
        let shadow_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("shadow_pipeline_layout"),
                bind_group_layouts: &[&shadow_bind_group_layout],
                push_constant_ranges: &[],
            });
        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow_pipeline"),
            layout: Some(&shadow_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: Some("vs_shadow"),
                compilation_options: Default::default(),
                buffers: &vertex_layouts,
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: ShadowMap::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                // Nudge depths to keep self-shadowing acne off flat faces.
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let batches = Self::build_batches(device, scene);
        let depth_texture = create_depth_texture(device, width, height);

        tracing::info!(
            batches = batches.len(),
            shadow_map = format!("{map_width}x{map_height}"),
            "scene renderer ready"
        );

        Self {
            mesh_pipeline,
            mesh_pipeline_double,
            shadow_pipeline,
            uniform_buffer,
            shadow_uniform_buffer,
            uniform_bind_group,
            shadow_bind_group,
            shadow_map,
            batches,
            depth_texture,
            surface_format,
        }
    }

    fn build_batches(device: &wgpu::Device, scene: &Scene) -> BTreeMap<GeometryKey, MeshBatch> {
        let mut counts: BTreeMap<GeometryKey, u32> = BTreeMap::new();
        for (_, mesh) in scene.meshes() {
            *counts.entry(batch_key(mesh)).or_default() += 1;
        }

        let mut batches = BTreeMap::new();
        for (_, mesh) in scene.meshes() {
            let key = batch_key(mesh);
            if batches.contains_key(&key) {
                continue;
            }
            let data = mesh.geometry.tessellate();
            let vertices: Vec<Vertex> = data
                .positions
                .iter()
                .zip(&data.normals)
                .map(|(position, normal)| Vertex {
                    position: *position,
                    normal: *normal,
                })
                .collect();
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("batch_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("batch_index_buffer"),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            let capacity = counts[&key];
            let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("batch_instance_buffer"),
                size: capacity as u64 * std::mem::size_of::<InstanceData>() as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            batches.insert(
                key,
                MeshBatch {
                    vertex_buffer,
                    index_buffer,
                    index_count: data.indices.len() as u32,
                    instance_buffer,
                    capacity,
                    double_sided: key.double_sided,
                },
            );
        }
        batches
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: shadow pass over the casters, then the lit pass.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
        scene: &Scene,
    ) {
        // Lighting rig: first ambient and first directional light win.
        let ambient = scene
            .ambient_light()
            .map(|(_, light)| light.color.scaled(light.intensity).to_array())
            .unwrap_or([0.0; 3]);

        let sun = scene.directional_light();
        let sun_world = sun.and_then(|(id, _)| {
            scene
                .world_transform(id)
                .map(|m| m.transform_point3(Vec3::ZERO))
        });
        let (light_view_proj, light_dir, light_color) = match (sun, sun_world) {
            (Some((_, light)), Some(position)) => {
                let view_proj =
                    light.projection_matrix() * light.view_matrix(position, Vec3::ZERO);
                let dir = position.normalize_or_zero();
                let color = light.color.scaled(light.intensity).to_array();
                let casts = if light.cast_shadow { 1.0 } else { 0.0 };
                (
                    view_proj,
                    [dir.x, dir.y, dir.z, 0.0],
                    [color[0], color[1], color[2], casts],
                )
            }
            // Keep the direction normalized even without a sun so the
            // shader's normalize never sees a zero vector.
            _ => (Mat4::IDENTITY, [0.0, 1.0, 0.0, 0.0], [0.0; 4]),
        };

        let eye = camera.eye();
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
                light_view_proj: light_view_proj.to_cols_array_2d(),
                light_dir,
                light_color,
                ambient_color: [ambient[0], ambient[1], ambient[2], 0.0],
                camera_pos: [eye.x, eye.y, eye.z, 0.0],
            }),
        );
        queue.write_buffer(
            &self.shadow_uniform_buffer,
            0,
            bytemuck::bytes_of(&ShadowUniforms {
                light_view_proj: light_view_proj.to_cols_array_2d(),
            }),
        );

        // Per-batch instances, casters first so the shadow pass can draw a
        // prefix of the same buffer.
        let mut instances: BTreeMap<GeometryKey, (Vec<InstanceData>, Vec<InstanceData>)> =
            BTreeMap::new();
        for (id, mesh) in scene.meshes() {
            let Some(world) = scene.world_transform(id) else {
                continue;
            };
            let (casters, others) = instances.entry(batch_key(mesh)).or_default();
            let data = InstanceData::new(world, mesh);
            if mesh.cast_shadow {
                casters.push(data);
            } else {
                others.push(data);
            }
        }

        let mut caster_counts: BTreeMap<GeometryKey, u32> = BTreeMap::new();
        let mut totals: BTreeMap<GeometryKey, u32> = BTreeMap::new();
        for (key, (casters, others)) in &instances {
            let Some(batch) = self.batches.get(key) else {
                tracing::warn!("mesh geometry not uploaded at renderer creation; skipping");
                continue;
            };
            let mut all: Vec<InstanceData> = Vec::with_capacity(casters.len() + others.len());
            all.extend_from_slice(casters);
            all.extend_from_slice(others);
            let count = (all.len() as u32).min(batch.capacity);
            if count > 0 {
                queue.write_buffer(
                    &batch.instance_buffer,
                    0,
                    bytemuck::cast_slice(&all[..count as usize]),
                );
            }
            caster_counts.insert(*key, (casters.len() as u32).min(count));
            totals.insert(*key, count);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        let shadows_on = light_color[3] > 0.5;
        if shadows_on {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&self.shadow_pipeline);
            pass.set_bind_group(0, &self.shadow_bind_group, &[]);
            for (key, batch) in &self.batches {
                let casters = caster_counts.get(key).copied().unwrap_or(0);
                if casters == 0 {
                    continue;
                }
                pass.set_vertex_buffer(0, batch.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, batch.instance_buffer.slice(..));
                pass.set_index_buffer(batch.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..batch.index_count, 0, 0..casters);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.06,
                            b: 0.09,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            for (key, batch) in &self.batches {
                let total = totals.get(key).copied().unwrap_or(0);
                if total == 0 {
                    continue;
                }
                pass.set_pipeline(if batch.double_sided {
                    &self.mesh_pipeline_double
                } else {
                    &self.mesh_pipeline
                });
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(0, batch.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, batch.instance_buffer.slice(..));
                pass.set_index_buffer(batch.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..batch.index_count, 0, 0..total);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadowbox_scene::{Material, MaterialConfig};

    fn lit_box(width: f32) -> Mesh {
        Mesh::new(
            Geometry::Box {
                width,
                height: 1.0,
                depth: 1.0,
            },
            Material::lit(MaterialConfig::default()),
        )
    }

    #[test]
    fn identical_geometry_shares_a_key() {
        assert_eq!(batch_key(&lit_box(1.0)), batch_key(&lit_box(1.0)));
    }

    #[test]
    fn different_dimensions_split_batches() {
        assert_ne!(batch_key(&lit_box(1.0)), batch_key(&lit_box(2.0)));
    }

    #[test]
    fn side_splits_batches() {
        let mut double = lit_box(1.0);
        double.material.side = Side::Double;
        assert_ne!(batch_key(&lit_box(1.0)), batch_key(&double));
    }

    #[test]
    fn instance_data_encodes_material_flags() {
        let mut mesh = lit_box(1.0);
        mesh.receive_shadow = true;
        let data = InstanceData::new(Mat4::IDENTITY, &mesh);
        assert_eq!(data.params[0], 0.0);
        assert_eq!(data.params[1], 1.0);
        assert_eq!(data.params[2], 30.0);

        let unlit = Mesh::new(mesh.geometry, Material::unlit(MaterialConfig::default()));
        assert_eq!(InstanceData::new(Mat4::IDENTITY, &unlit).params[0], 1.0);
    }
}
