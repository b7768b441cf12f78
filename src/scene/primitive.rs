use crate::math::rgb;
use std::f32::consts::PI;

/// Procedural geometry description. Dimensions are in world units and are
/// baked into the generated mesh, so nodes carrying them keep a unit scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    /// Sphere centred on the origin. `coverage` is the fraction of the polar
    /// sweep generated from the top pole, `1.0` is a full sphere.
    Sphere {
        radius: f32,
        segments: u32,
        rings: u32,
        coverage: f32,
    },
    /// Capped cylinder along +Y. A zero top radius gives a cone.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    /// Ring in the XY plane.
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    /// Flat rectangle in the XY plane facing +Z.
    Plane { width: f32, height: f32 },
    /// Circular segment between two angles, extruded along +Z.
    ArcSegment {
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        depth: f32,
        segments: u32,
    },
}

/// Hashable identity of a [`Geometry`], used to share uploaded meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryKey(u8, [u32; 5]);

impl Geometry {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Geometry::Box {
            width,
            height,
            depth,
        }
    }

    pub fn sphere(radius: f32, segments: u32, rings: u32) -> Self {
        Geometry::Sphere {
            radius,
            segments,
            rings,
            coverage: 1.0,
        }
    }

    pub fn dome(radius: f32, segments: u32, rings: u32, coverage: f32) -> Self {
        Geometry::Sphere {
            radius,
            segments,
            rings,
            coverage,
        }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
            segments,
        }
    }

    pub fn cone(radius: f32, height: f32, segments: u32) -> Self {
        Self::cylinder(0.0, radius, height, segments)
    }

    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        Geometry::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Geometry::Plane { width, height }
    }

    pub fn arc_segment(radius: f32, start_angle: f32, end_angle: f32, depth: f32) -> Self {
        Geometry::ArcSegment {
            radius,
            start_angle,
            end_angle,
            depth,
            segments: 12,
        }
    }

    pub fn is_cone(&self) -> bool {
        matches!(self, Geometry::Cylinder { radius_top, .. } if *radius_top == 0.0)
    }

    pub fn key(&self) -> GeometryKey {
        match *self {
            Geometry::Box {
                width,
                height,
                depth,
            } => GeometryKey(0, [width.to_bits(), height.to_bits(), depth.to_bits(), 0, 0]),
            Geometry::Sphere {
                radius,
                segments,
                rings,
                coverage,
            } => GeometryKey(1, [radius.to_bits(), segments, rings, coverage.to_bits(), 0]),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => GeometryKey(
                2,
                [
                    radius_top.to_bits(),
                    radius_bottom.to_bits(),
                    height.to_bits(),
                    segments,
                    0,
                ],
            ),
            Geometry::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => GeometryKey(
                3,
                [radius.to_bits(), tube.to_bits(), radial_segments, tubular_segments, 0],
            ),
            Geometry::Plane { width, height } => {
                GeometryKey(4, [width.to_bits(), height.to_bits(), 0, 0, 0])
            }
            Geometry::ArcSegment {
                radius,
                start_angle,
                end_angle,
                depth,
                segments,
            } => GeometryKey(
                5,
                [
                    radius.to_bits(),
                    start_angle.to_bits(),
                    end_angle.to_bits(),
                    depth.to_bits(),
                    segments,
                ],
            ),
        }
    }
}

/// Surface parameters for a mesh part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    /// Ignores scene lighting entirely.
    pub unlit: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(0xffffff)
    }
}

impl Material {
    pub fn standard(color: u32) -> Self {
        Self {
            color: rgb(color),
            opacity: 1.0,
            emissive: [0.0; 3],
            emissive_intensity: 0.0,
            roughness: 1.0,
            metalness: 0.0,
            unlit: false,
        }
    }

    pub fn basic(color: u32) -> Self {
        Self {
            unlit: true,
            ..Self::standard(color)
        }
    }

    pub fn roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    pub fn translucent(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn emissive(mut self, color: u32, intensity: f32) -> Self {
        self.emissive = rgb(color);
        self.emissive_intensity = intensity;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Renderable payload attached to a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshPart {
    pub geometry: Geometry,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshPart {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn casting(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    pub fn receiving(mut self) -> Self {
        self.receive_shadow = true;
        self
    }
}

/// Quarter turn, the rotation most primitives need to lie flat.
pub const QUARTER_TURN: f32 = PI / 2.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_geometry_shares_key() {
        let a = Geometry::cylinder(0.4, 0.35, 0.9, 16);
        let b = Geometry::cylinder(0.4, 0.35, 0.9, 16);
        let c = Geometry::cylinder(0.4, 0.35, 0.9, 8);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn cone_is_a_pointed_cylinder() {
        assert!(Geometry::cone(0.3, 0.6, 8).is_cone());
        assert!(!Geometry::cylinder(0.3, 0.3, 0.6, 8).is_cone());
    }
}
