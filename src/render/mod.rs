//! wgpu backend for scene graphs
//!
//! Geometry descriptions are tessellated on first use and cached per shape.
//! Each frame uploads one uniform block for the camera and lights plus one
//! dynamically offset block per draw.

pub mod camera;
pub mod context;
pub mod mesh;
pub mod pipeline;
pub mod renderer;
pub mod viewport;

pub use camera::Camera;
pub use context::GpuContext;
pub use mesh::{Mesh, MeshData, Vertex};
pub use pipeline::RenderPipelines;
pub use renderer::SceneRenderer;
pub use viewport::{GpuSurface, GpuViewport};
