//! Math utilities module
//!
//! Provides convenient re-exports from glam and the node transform type.

mod transform;

pub use transform::Transform;

// Re-export commonly used glam types
pub use glam::{Mat4, Quat, Vec3};

/// Splits a `0xRRGGBB` colour into sRGB channels scaled to `0.0..=1.0`.
///
/// No transfer function is applied; uniforms go through `render::pipeline::linear`.
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
