use glam::{EulerRot, Mat4, Quat, Vec3};

/// Local transform of a scene node.
///
/// Rotation is stored as XYZ Euler angles in radians so animation code can
/// drive a single axis (`rotation.y += step`) without re-deriving quaternions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_position(Vec3::new(x, y, z))
    }

    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vec3::new(x, y, z);
        self
    }

    pub fn quaternion(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quaternion(), self.position)
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.quaternion() * (point * self.scale) + self.position
    }

    /// Planar facing for a yaw angle about +Y: `(sin(yaw), 0, cos(yaw))`.
    pub fn yaw_forward(yaw: f32) -> Vec3 {
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Planar right vector for a yaw angle about +Y: `(cos(yaw), 0, -sin(yaw))`.
    pub fn yaw_right(yaw: f32) -> Vec3 {
        Vec3::new(yaw.cos(), 0.0, -yaw.sin())
    }
}
