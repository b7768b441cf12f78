use crate::scene::Geometry;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::PI;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// CPU-side triangle list for one procedural primitive.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn from_geometry(geometry: &Geometry) -> Self {
        match *geometry {
            Geometry::Box {
                width,
                height,
                depth,
            } => Self::cuboid(Vec3::new(width, height, depth) / 2.0),
            Geometry::Sphere {
                radius,
                segments,
                rings,
                coverage,
            } => Self::sphere(radius, segments, rings, coverage),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => Self::cylinder(radius_top, radius_bottom, height, segments),
            Geometry::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => Self::torus(radius, tube, radial_segments, tubular_segments),
            Geometry::Plane { width, height } => Self::plane(width, height),
            Geometry::ArcSegment {
                radius,
                start_angle,
                end_angle,
                depth,
                segments,
            } => Self::arc_segment(radius, start_angle, end_angle, depth, segments),
        }
    }

    fn base(&self) -> u32 {
        self.vertices.len() as u32
    }

    fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }

    pub fn cuboid(half: Vec3) -> Self {
        let mut mesh = Self::default();
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::NEG_Z, Vec3::X),
            (Vec3::Z, Vec3::Y, Vec3::NEG_X),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];
        for (normal, up, side) in faces {
            let base = mesh.base();
            let center = normal * half;
            let u = up * half;
            let v = side * half;
            for corner in [center - u - v, center - u + v, center + u + v, center + u - v] {
                mesh.vertices.push(Vertex::new(corner, normal));
            }
            mesh.quad(base, base + 1, base + 2, base + 3);
        }
        mesh
    }

    /// Sphere swept from the top pole down `coverage` of the way to the
    /// bottom pole.
    pub fn sphere(radius: f32, segments: u32, rings: u32, coverage: f32) -> Self {
        let mut mesh = Self::default();
        let sweep = PI * coverage.clamp(0.0, 1.0);

        for ring in 0..=rings {
            let phi = sweep * ring as f32 / rings as f32;
            for seg in 0..=segments {
                let theta = 2.0 * PI * seg as f32 / segments as f32;
                let dir = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                mesh.vertices.push(Vertex::new(dir * radius, dir));
            }
        }

        for ring in 0..rings {
            for seg in 0..segments {
                let curr = ring * (segments + 1) + seg;
                let next = (ring + 1) * (segments + 1) + seg;
                mesh.quad(curr, next, next + 1, curr + 1);
            }
        }
        mesh
    }

    /// Capped frustum along Y, centred on the origin. A zero top radius
    /// collapses into a cone without a top cap.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        let mut mesh = Self::default();
        let half = height / 2.0;
        let slope = if height > 0.0 {
            (radius_bottom - radius_top) / height
        } else {
            0.0
        };

        for i in 0..=segments {
            let theta = 2.0 * PI * i as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            let normal = Vec3::new(cos, slope, sin).normalize();
            mesh.vertices.push(Vertex::new(Vec3::new(cos * radius_bottom, -half, sin * radius_bottom), normal));
            mesh.vertices.push(Vertex::new(Vec3::new(cos * radius_top, half, sin * radius_top), normal));
        }
        for i in 0..segments {
            let b = i * 2;
            mesh.quad(b, b + 1, b + 3, b + 2);
        }

        if radius_bottom > 0.0 {
            mesh.cap(radius_bottom, -half, Vec3::NEG_Y, segments);
        }
        if radius_top > 0.0 {
            mesh.cap(radius_top, half, Vec3::Y, segments);
        }
        mesh
    }

    fn cap(&mut self, radius: f32, y: f32, normal: Vec3, segments: u32) {
        let center = self.base();
        self.vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), normal));
        for i in 0..=segments {
            let theta = 2.0 * PI * i as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            self.vertices.push(Vertex::new(Vec3::new(cos * radius, y, sin * radius), normal));
        }
        for i in 0..segments {
            self.indices.extend_from_slice(&[center, center + 1 + i, center + 2 + i]);
        }
    }

    /// Ring lying in the XY plane around the Z axis.
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let mut mesh = Self::default();
        for j in 0..=radial_segments {
            let v = 2.0 * PI * j as f32 / radial_segments as f32;
            for i in 0..=tubular_segments {
                let u = 2.0 * PI * i as f32 / tubular_segments as f32;
                let ring_center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
                let position = Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                mesh.vertices.push(Vertex::new(position, (position - ring_center).normalize()));
            }
        }
        let stride = tubular_segments + 1;
        for j in 0..radial_segments {
            for i in 0..tubular_segments {
                let a = j * stride + i;
                let b = (j + 1) * stride + i;
                mesh.quad(a, b, b + 1, a + 1);
            }
        }
        mesh
    }

    /// Rectangle in the XY plane facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let mut mesh = Self::default();
        for (x, y) in [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)] {
            mesh.vertices.push(Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z));
        }
        mesh.quad(0, 1, 2, 3);
        mesh
    }

    /// Circular segment between two angles in the XY plane, extruded from
    /// z = 0 to z = `depth`.
    pub fn arc_segment(radius: f32, start: f32, end: f32, depth: f32, segments: u32) -> Self {
        let mut mesh = Self::default();
        let outline: Vec<Vec3> = (0..=segments)
            .map(|i| {
                let angle = start + (end - start) * i as f32 / segments as f32;
                Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0)
            })
            .collect();
        let chord_mid = (outline[0] + outline[outline.len() - 1]) / 2.0;

        for (z, normal) in [(0.0, Vec3::NEG_Z), (depth, Vec3::Z)] {
            let center = mesh.base();
            mesh.vertices.push(Vertex::new(chord_mid + Vec3::Z * z, normal));
            for point in &outline {
                mesh.vertices.push(Vertex::new(*point + Vec3::Z * z, normal));
            }
            for i in 0..segments {
                mesh.indices.extend_from_slice(&[center, center + 1 + i, center + 2 + i]);
            }
        }

        for pair in outline.windows(2) {
            let normal = ((pair[0] + pair[1]) / 2.0).normalize_or_zero();
            let base = mesh.base();
            for corner in [pair[0], pair[1], pair[1] + Vec3::Z * depth, pair[0] + Vec3::Z * depth] {
                mesh.vertices.push(Vertex::new(corner, normal));
            }
            mesh.quad(base, base + 1, base + 2, base + 3);
        }

        let first = outline[0];
        let last = outline[outline.len() - 1];
        let mid = (start + end) / 2.0;
        let chord_normal = -Vec3::new(mid.cos(), mid.sin(), 0.0);
        let base = mesh.base();
        for corner in [last, first, first + Vec3::Z * depth, last + Vec3::Z * depth] {
            mesh.vertices.push(Vertex::new(corner, chord_normal));
        }
        mesh.quad(base, base + 1, base + 2, base + 3);
        mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Vertex and index buffers for one uploaded primitive.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl Mesh {
    pub fn from_data(device: &wgpu::Device, data: &MeshData) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }

    pub fn from_geometry(device: &wgpu::Device, geometry: &Geometry) -> Self {
        Self::from_data(device, &MeshData::from_geometry(geometry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(mesh: &MeshData) {
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4, "normal {n:?} not unit length");
        }
    }

    #[test]
    fn every_primitive_is_well_formed() {
        let shapes = [
            Geometry::cuboid(1.0, 2.0, 3.0),
            Geometry::sphere(0.5, 16, 12),
            Geometry::dome(0.3, 16, 8, 0.55),
            Geometry::cylinder(0.4, 0.35, 0.9, 16),
            Geometry::cone(0.3, 0.6, 8),
            Geometry::torus(0.5, 0.05, 8, 24),
            Geometry::plane(50.0, 15.0),
            Geometry::arc_segment(0.05, PI, 2.0 * PI, 0.01),
        ];
        for shape in &shapes {
            assert_well_formed(&MeshData::from_geometry(shape));
        }
    }

    #[test]
    fn cuboid_spans_its_dimensions() {
        let mesh = MeshData::from_geometry(&Geometry::cuboid(8.0, 0.2, 4.0));
        assert_eq!(mesh.vertices.len(), 24);
        let max_x = mesh.vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let max_y = mesh.vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((max_x - 4.0).abs() < 1e-6);
        assert!((max_y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn dome_stops_at_its_coverage() {
        let coverage = 0.5;
        let mesh = MeshData::sphere(1.0, 12, 6, coverage);
        let min_y = mesh.vertices.iter().map(|v| v.position[1]).fold(f32::MAX, f32::min);
        assert!(min_y > -1e-4);
    }

    #[test]
    fn cone_has_no_top_cap() {
        let cone = MeshData::cylinder(0.0, 0.3, 0.6, 8);
        let frustum = MeshData::cylinder(0.1, 0.3, 0.6, 8);
        assert!(cone.triangle_count() < frustum.triangle_count());
    }
}
