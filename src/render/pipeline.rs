use super::camera::Camera;
use super::context::DEPTH_FORMAT;
use super::mesh::Vertex;
use crate::scene::{Environment, Light, Material};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

pub const MAX_POINT_LIGHTS: usize = 16;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

/// Per-frame camera, lighting and fog block (group 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    pub sun_dir: [f32; 4],
    pub sun_color: [f32; 4],
    pub fog_color: [f32; 4],
    /// near, far, enabled, point light count
    pub fog: [f32; 4],
    pub points: [PointLightUniform; MAX_POINT_LIGHTS],
}

impl SceneUniforms {
    /// Folds the environment's lights into the fixed shader layout: ambient
    /// terms add up, the first directional light wins, point lights beyond
    /// [`MAX_POINT_LIGHTS`] are dropped.
    pub fn new(camera: &Camera, environment: &Environment) -> Self {
        let mut uniforms = Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            ambient: [0.0; 4],
            sun_dir: [0.0, 1.0, 0.0, 0.0],
            sun_color: [0.0; 4],
            fog_color: [0.0; 4],
            fog: [0.0; 4],
            points: [PointLightUniform::default(); MAX_POINT_LIGHTS],
        };

        let mut sun_set = false;
        let mut point_count = 0;
        for light in &environment.lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    let c = scaled(color, intensity);
                    for i in 0..3 {
                        uniforms.ambient[i] += c[i];
                    }
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                    ..
                } if !sun_set => {
                    uniforms.sun_dir = position.normalize_or(Vec3::Y).extend(0.0).to_array();
                    uniforms.sun_color = with_w(scaled(color, intensity), 0.0);
                    sun_set = true;
                }
                Light::Point {
                    color,
                    intensity,
                    position,
                    distance,
                } if point_count < MAX_POINT_LIGHTS => {
                    uniforms.points[point_count] = PointLightUniform {
                        position: position.extend(distance).to_array(),
                        color: with_w(scaled(color, intensity), 0.0),
                    };
                    point_count += 1;
                }
                _ => {}
            }
        }

        if let Some(fog) = environment.fog {
            uniforms.fog_color = with_w(linear(fog.color), 1.0);
            uniforms.fog = [fog.near, fog.far, 1.0, 0.0];
        }
        uniforms.fog[3] = point_count as f32;
        uniforms
    }
}

/// Per-draw block (group 1), addressed with a dynamic offset.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub emissive: [f32; 4],
}

impl InstanceUniforms {
    pub fn new(model: Mat4, material: &Material) -> Self {
        let normal_matrix = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            model
        };
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color: with_w(linear(material.color), material.opacity),
            emissive: with_w(
                scaled(material.emissive, material.emissive_intensity),
                if material.unlit { 1.0 } else { 0.0 },
            ),
        }
    }
}

/// sRGB colour to linear, for sRGB render targets.
pub fn linear(color: [f32; 3]) -> [f32; 3] {
    color.map(|c| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    })
}

fn scaled(color: [f32; 3], intensity: f32) -> [f32; 3] {
    linear(color).map(|c| c * intensity)
}

fn with_w(c: [f32; 3], w: f32) -> [f32; 4] {
    [c[0], c[1], c[2], w]
}

/// The two mesh pipelines and their bind group layouts.
pub struct RenderPipelines {
    pub opaque: wgpu::RenderPipeline,
    pub translucent: wgpu::RenderPipeline,
    pub scene_layout: wgpu::BindGroupLayout,
    pub instance_layout: wgpu::BindGroupLayout,
}

impl RenderPipelines {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!("shader.wgsl"));

        let scene_layout = uniform_layout(
            device,
            "Scene Bind Group Layout",
            std::mem::size_of::<SceneUniforms>(),
            false,
        );
        let instance_layout = uniform_layout(
            device,
            "Instance Bind Group Layout",
            std::mem::size_of::<InstanceUniforms>(),
            true,
        );

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &instance_layout],
            push_constant_ranges: &[],
        });

        let opaque = mesh_pipeline(
            device,
            &layout,
            &shader,
            color_format,
            "Opaque Pipeline",
            wgpu::BlendState::REPLACE,
            true,
        );
        let translucent = mesh_pipeline(
            device,
            &layout,
            &shader,
            color_format,
            "Translucent Pipeline",
            wgpu::BlendState::ALPHA_BLENDING,
            false,
        );

        Self {
            opaque,
            translucent,
            scene_layout,
            instance_layout,
        }
    }

    pub fn create_scene_bind_group(&self, device: &wgpu::Device, buffer: &wgpu::Buffer) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &self.scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }

    pub fn create_instance_bind_group(&self, device: &wgpu::Device, buffer: &wgpu::Buffer) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Instance Bind Group"),
            layout: &self.instance_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<InstanceUniforms>() as u64),
                }),
            }],
        })
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str, size: usize, dynamic: bool) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: wgpu::BufferSize::new(size as u64),
            },
            count: None,
        }],
    })
}

fn mesh_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    label: &str,
    blend: wgpu::BlendState,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::LAYOUT],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Planes and open shells are seen from both sides.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{RoomLighting, RoomScene};

    #[test]
    fn uniform_blocks_match_shader_layout() {
        assert_eq!(std::mem::size_of::<InstanceUniforms>(), 160);
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 160 + 32 * MAX_POINT_LIGHTS);
    }

    #[test]
    fn scene_uniforms_fold_lights() {
        let mut env = Environment::new(0xffffff).with_fog(0xffffff, 20.0, 50.0);
        env.add_light(Light::ambient(0xffffff, 0.6));
        env.add_light(Light::directional(0xffffff, 0.8, Vec3::new(10.0, 20.0, 10.0)));
        for i in 0..20 {
            env.add_light(Light::point(0xffffff, 0.3, Vec3::new(i as f32, 10.0, 0.0), 30.0));
        }
        let uniforms = SceneUniforms::new(&Camera::new(), &env);
        assert!((uniforms.ambient[0] - 0.6).abs() < 1e-6);
        assert_eq!(uniforms.fog, [20.0, 50.0, 1.0, MAX_POINT_LIGHTS as f32]);
        let dir = Vec3::from_slice(&uniforms.sun_dir[..3]);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn bright_room_uploads_every_point_light() {
        let room = RoomScene::build(RoomLighting::Bright);
        let uniforms = SceneUniforms::new(&Camera::new(), &room.environment);
        let lamps = room.environment.point_lights().count();
        assert!(lamps > 0);
        assert_eq!(uniforms.fog[3], lamps as f32);
    }

    #[test]
    fn unlit_flag_rides_in_emissive_w() {
        let lit = InstanceUniforms::new(Mat4::IDENTITY, &Material::standard(0xff0000));
        let unlit = InstanceUniforms::new(Mat4::IDENTITY, &Material::basic(0xff0000));
        assert_eq!(lit.emissive[3], 0.0);
        assert_eq!(unlit.emissive[3], 1.0);
        assert_eq!(lit.color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn srgb_endpoints_are_fixed() {
        assert_eq!(linear([0.0, 1.0, 0.0]), [0.0, 1.0, 0.0]);
    }
}
