//! Retained scene description
//!
//! A scene is an arena-backed tree of transform nodes, each optionally
//! carrying one procedural mesh, plus an [`Environment`] holding lights and
//! fog. Nothing here touches the GPU.

mod environment;
mod graph;
mod primitive;

pub use environment::{Environment, Fog, Light};
pub use graph::{IdMap, Node, NodeId, SceneGraph};
pub use primitive::{Geometry, GeometryKey, Material, MeshPart, QUARTER_TURN};
