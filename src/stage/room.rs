use super::{build_table, TableSpec};
use crate::math::{Transform, Vec3};
use crate::render::Camera;
use crate::rig::{CharacterRig, PlacedRig};
use crate::scene::{Environment, Geometry, Light, Material, MeshPart, NodeId, SceneGraph, QUARTER_TURN};
use log::debug;
use serde::Deserialize;

/// Side length of the square room floor.
pub const ROOM_FLOOR_SIZE: f32 = 50.0;

const WALL_HEIGHT: f32 = 15.0;

/// Lighting rig for the room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomLighting {
    /// Ambient fill plus one shadow-casting sun.
    #[default]
    Standard,
    /// Adds a ceiling grid of point lights, each marked by a glowing panel.
    Bright,
}

/// The free-roam classroom: floor, three walls, a furnished table and the
/// student standing away from it.
#[derive(Debug, Clone)]
pub struct RoomScene {
    pub graph: SceneGraph,
    pub environment: Environment,
    pub camera: Camera,
    pub character: PlacedRig,
    pub table: NodeId,
}

impl RoomScene {
    pub const TABLE_POSITION: Vec3 = Vec3::new(0.0, 0.0, -5.0);
    pub const CHARACTER_START: Vec3 = Vec3::new(0.0, 0.0, 10.0);

    pub fn build(lighting: RoomLighting) -> Self {
        let mut graph = SceneGraph::new();
        let mut environment = Environment::new(0xb8e6f5).with_fog(0xb8e6f5, 20.0, 50.0);

        environment.add_light(Light::ambient(0xffffff, 0.6));
        environment.add_light(Light::directional(0xffffff, 0.8, Vec3::new(10.0, 20.0, 10.0)));

        build_shell(&mut graph);
        if lighting == RoomLighting::Bright {
            build_ceiling_lights(&mut graph, &mut environment);
        }

        let table = build_table(&mut graph, TableSpec::ROOM, Self::TABLE_POSITION);
        build_table_props(&mut graph);

        let character = CharacterRig::build().place(
            &mut graph,
            None,
            Transform::from_position(Self::CHARACTER_START),
        );

        let camera = Camera::perspective(75.0, 0.1, 1000.0)
            .at(Vec3::new(0.0, 5.0, 15.0))
            .looking_at(Vec3::ZERO);

        debug!(
            "room assembled: {} nodes, {} meshes, {:?} lighting",
            graph.len(),
            graph.mesh_count(),
            lighting
        );

        Self {
            graph,
            environment,
            camera,
            character,
            table,
        }
    }

    pub fn table_position(&self) -> Vec3 {
        self.graph.transform(self.table).position
    }

    pub fn character_position(&self) -> Vec3 {
        self.graph.transform(self.character.root).position
    }
}

fn build_shell(graph: &mut SceneGraph) {
    graph.add_mesh(
        None,
        MeshPart::new(
            Geometry::plane(ROOM_FLOOR_SIZE, ROOM_FLOOR_SIZE),
            Material::standard(0xc4e6c4).roughness(0.7).metalness(0.1),
        )
        .receiving(),
        Transform::IDENTITY.with_rotation(-QUARTER_TURN, 0.0, 0.0),
    );

    let wall = MeshPart::new(
        Geometry::plane(ROOM_FLOOR_SIZE, WALL_HEIGHT),
        Material::standard(0xfff8dc).roughness(0.9),
    )
    .receiving();
    let half = ROOM_FLOOR_SIZE / 2.0;
    let y = WALL_HEIGHT / 2.0;

    graph.add_mesh(None, wall, Transform::from_xyz(0.0, y, -half));
    graph.add_mesh(
        None,
        wall,
        Transform::from_xyz(-half, y, 0.0).with_rotation(0.0, QUARTER_TURN, 0.0),
    );
    graph.add_mesh(
        None,
        wall,
        Transform::from_xyz(half, y, 0.0).with_rotation(0.0, -QUARTER_TURN, 0.0),
    );
}

/// Book, beaker and flask resting on the room table.
fn build_table_props(graph: &mut SceneGraph) {
    graph.add_mesh(
        None,
        MeshPart::new(Geometry::cuboid(2.0, 0.3, 1.5), Material::standard(0xff6b6b)).casting(),
        Transform::from_xyz(0.0, 1.75, -5.0),
    );
    graph.add_mesh(
        None,
        MeshPart::new(
            Geometry::cylinder(0.3, 0.3, 0.8, 16),
            Material::standard(0x88ccff).translucent(0.6),
        )
        .casting(),
        Transform::from_xyz(-2.0, 2.0, -5.0),
    );
    graph.add_mesh(
        None,
        MeshPart::new(
            Geometry::sphere(0.4, 16, 16),
            Material::standard(0xff88cc).translucent(0.6),
        )
        .casting(),
        Transform::from_xyz(2.0, 1.9, -5.0),
    );
}

/// 3x3 grid of ceiling lights. The panels only mark where the lights hang.
fn build_ceiling_lights(graph: &mut SceneGraph, environment: &mut Environment) {
    const HEIGHT: f32 = 13.5;
    const SPACING: f32 = 15.0;

    let panel = MeshPart::new(
        Geometry::cuboid(3.0, 0.1, 3.0),
        Material::standard(0xffffff).emissive(0xffffee, 1.0),
    );
    let lights = graph.add_group(None, "ceiling-lights", Transform::IDENTITY);

    for row in -1..=1 {
        for col in -1..=1 {
            let position = Vec3::new(col as f32 * SPACING, HEIGHT, row as f32 * SPACING);
            environment.add_light(Light::point(0xfff5e6, 0.35, position, 30.0));
            graph.add_mesh(
                Some(lights),
                panel,
                Transform::from_position(position + Vec3::Y * 0.5),
            );
        }
    }
}
