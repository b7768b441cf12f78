use super::context::GpuContext;
use super::mesh::Mesh;
use super::pipeline::{linear, InstanceUniforms, RenderPipelines, SceneUniforms};
use crate::scene::{Geometry, GeometryKey, Material};
use crate::view::SceneFrame;
use glam::{Mat4, Vec3};
use log::debug;
use std::collections::HashMap;

const INITIAL_INSTANCES: usize = 512;

/// One mesh draw, resolved to world space.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem {
    pub geometry: Geometry,
    pub uniforms: InstanceUniforms,
    /// Distance from the camera to the draw's origin.
    pub depth: f32,
    pub translucent: bool,
}

impl DrawItem {
    fn new(geometry: Geometry, material: &Material, model: Mat4, eye: Vec3) -> Self {
        Self {
            geometry,
            uniforms: InstanceUniforms::new(model, material),
            depth: model.w_axis.truncate().distance(eye),
            translucent: material.is_transparent(),
        }
    }
}

/// Flattens the scene graph and props into draw order: opaque draws in
/// traversal order, then translucent draws from far to near.
pub fn collect_draws(frame: &SceneFrame<'_>) -> Vec<DrawItem> {
    let eye = frame.camera.position;
    let mut opaque = Vec::new();
    let mut translucent = Vec::new();

    let mut push = |item: DrawItem| {
        if item.translucent {
            translucent.push(item);
        } else {
            opaque.push(item);
        }
    };

    frame.graph.visit(|_, node, world| {
        if let Some(part) = &node.mesh {
            push(DrawItem::new(part.geometry, &part.material, world, eye));
        }
    });
    for prop in frame.props {
        push(DrawItem::new(
            prop.mesh.geometry,
            &prop.mesh.material,
            prop.world_matrix(),
            eye,
        ));
    }

    translucent.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    opaque.extend(translucent);
    opaque
}

/// Draws a [`SceneFrame`] with lazily uploaded meshes and one dynamic
/// uniform slot per draw.
pub struct SceneRenderer {
    pipelines: RenderPipelines,
    meshes: HashMap<GeometryKey, Mesh>,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_bind_group: wgpu::BindGroup,
    instance_capacity: usize,
    uniform_alignment: u32,
}

impl SceneRenderer {
    pub fn new(context: &GpuContext) -> Self {
        let pipelines = RenderPipelines::new(&context.device, context.config.format);
        let uniform_alignment = context.device.limits().min_uniform_buffer_offset_alignment;

        let scene_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group = pipelines.create_scene_bind_group(&context.device, &scene_buffer);

        let instance_buffer = Self::create_instance_buffer(&context.device, INITIAL_INSTANCES, uniform_alignment);
        let instance_bind_group = pipelines.create_instance_bind_group(&context.device, &instance_buffer);

        Self {
            pipelines,
            meshes: HashMap::new(),
            scene_buffer,
            scene_bind_group,
            instance_buffer,
            instance_bind_group,
            instance_capacity: INITIAL_INSTANCES,
            uniform_alignment,
        }
    }

    fn align_to(size: u32, alignment: u32) -> u32 {
        (size + alignment - 1) & !(alignment - 1)
    }

    fn aligned_instance_size(alignment: u32) -> u32 {
        Self::align_to(std::mem::size_of::<InstanceUniforms>() as u32, alignment)
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize, alignment: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Dynamic Instance Buffer"),
            size: (Self::aligned_instance_size(alignment) as usize * capacity) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn reserve(&mut self, device: &wgpu::Device, count: usize) {
        if count <= self.instance_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        debug!("growing instance buffer to {} slots", capacity);
        self.instance_buffer = Self::create_instance_buffer(device, capacity, self.uniform_alignment);
        self.instance_bind_group = self.pipelines.create_instance_bind_group(device, &self.instance_buffer);
        self.instance_capacity = capacity;
    }

    /// Number of distinct primitives uploaded so far.
    pub fn cached_meshes(&self) -> usize {
        self.meshes.len()
    }

    pub fn render(&mut self, context: &GpuContext, view: &wgpu::TextureView, frame: &SceneFrame<'_>) {
        let draws = collect_draws(frame);
        self.reserve(&context.device, draws.len());

        for draw in &draws {
            self.meshes
                .entry(draw.geometry.key())
                .or_insert_with(|| Mesh::from_geometry(&context.device, &draw.geometry));
        }

        let scene = SceneUniforms::new(frame.camera, frame.environment);
        context.queue.write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));

        let aligned_size = Self::aligned_instance_size(self.uniform_alignment) as usize;
        let mut uniform_data = vec![0u8; aligned_size * draws.len().max(1)];
        for (i, draw) in draws.iter().enumerate() {
            let offset = i * aligned_size;
            let bytes = bytemuck::bytes_of(&draw.uniforms);
            uniform_data[offset..offset + bytes.len()].copy_from_slice(bytes);
        }
        context.queue.write_buffer(&self.instance_buffer, 0, &uniform_data);

        let [r, g, b] = linear(frame.environment.background);
        let mut encoder = context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
            let mut translucent = false;
            render_pass.set_pipeline(&self.pipelines.opaque);

            for (i, draw) in draws.iter().enumerate() {
                if draw.translucent && !translucent {
                    render_pass.set_pipeline(&self.pipelines.translucent);
                    translucent = true;
                }
                let Some(mesh) = self.meshes.get(&draw.geometry.key()) else {
                    continue;
                };
                render_pass.set_bind_group(1, &self.instance_bind_group, &[(i * aligned_size) as u32]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        context.queue.submit(std::iter::once(encoder.finish()));
    }
}
