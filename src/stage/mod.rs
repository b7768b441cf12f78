//! Scene assembly
//!
//! Two static environments share a furniture builder: the free-roam
//! [`RoomScene`] and the close-up [`TableScene`]. Each holds exactly one
//! student rig and is built once per mounted view.

mod room;
mod table;

pub use room::{RoomLighting, RoomScene, ROOM_FLOOR_SIZE};
pub use table::TableScene;

use crate::math::{Transform, Vec3};
use crate::scene::{Geometry, Material, MeshPart, NodeId, SceneGraph};

/// Dimensions of a four-legged table, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSpec {
    pub top: Vec3,
    pub top_height: f32,
    pub leg_radius: f32,
    /// Leg offset from the centre along X and Z.
    pub leg_inset: (f32, f32),
}

impl TableSpec {
    pub const ROOM: Self = Self {
        top: Vec3::new(8.0, 0.2, 4.0),
        top_height: 1.5,
        leg_radius: 0.1,
        leg_inset: (3.5, 1.5),
    };

    pub const CLOSE_UP: Self = Self {
        top: Vec3::new(6.0, 0.15, 3.0),
        top_height: 1.5,
        leg_radius: 0.08,
        leg_inset: (2.8, 1.3),
    };
}

/// Adds a table group (top plus four legs) and returns the group node.
pub fn build_table(graph: &mut SceneGraph, spec: TableSpec, position: Vec3) -> NodeId {
    let table = graph.add_group(None, "table", Transform::from_position(position));

    graph.add_mesh(
        Some(table),
        MeshPart::new(
            Geometry::cuboid(spec.top.x, spec.top.y, spec.top.z),
            Material::standard(0x8b4513),
        )
        .casting()
        .receiving(),
        Transform::from_xyz(0.0, spec.top_height, 0.0),
    );

    let leg_height = spec.top_height;
    let leg = MeshPart::new(
        Geometry::cylinder(spec.leg_radius, spec.leg_radius, leg_height, 8),
        Material::standard(0x654321),
    )
    .casting();
    let (x, z) = spec.leg_inset;
    for (sx, sz) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
        graph.add_mesh(
            Some(table),
            leg,
            Transform::from_xyz(sx * x, leg_height / 2.0, sz * z),
        );
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_top_and_four_legs() {
        let mut graph = SceneGraph::new();
        let table = build_table(&mut graph, TableSpec::ROOM, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(graph.node(table).children().len(), 5);
        assert_eq!(graph.mesh_count(), 5);
        let top = graph.node(table).children()[0];
        let y = graph.world_matrix(top).transform_point3(Vec3::ZERO).y;
        assert!((y - 1.5).abs() < 1e-6);
    }
}
