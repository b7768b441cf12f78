use super::{build_table, TableSpec};
use crate::math::{Transform, Vec3};
use crate::render::Camera;
use crate::rig::{CharacterRig, PlacedRig};
use crate::scene::{Environment, Geometry, Light, Material, MeshPart, NodeId, SceneGraph, QUARTER_TURN};
use log::debug;

/// Close-up bench where the current step is acted out.
#[derive(Debug, Clone)]
pub struct TableScene {
    pub graph: SceneGraph,
    pub environment: Environment,
    pub camera: Camera,
    pub character: PlacedRig,
    pub table: NodeId,
}

impl TableScene {
    pub const CHARACTER_POSITION: Vec3 = Vec3::new(-3.0, 0.0, 2.0);

    pub fn build() -> Self {
        let mut graph = SceneGraph::new();
        let mut environment = Environment::new(0xf0f0f0);
        environment.add_light(Light::ambient(0xffffff, 0.7));
        environment.add_light(Light::directional(0xffffff, 0.8, Vec3::new(5.0, 10.0, 5.0)));

        graph.add_mesh(
            None,
            MeshPart::new(Geometry::plane(20.0, 20.0), Material::standard(0xe4e4e4)).receiving(),
            Transform::IDENTITY.with_rotation(-QUARTER_TURN, 0.0, 0.0),
        );

        let table = build_table(&mut graph, TableSpec::CLOSE_UP, Vec3::ZERO);

        let character = CharacterRig::build().place(
            &mut graph,
            None,
            Transform::from_position(Self::CHARACTER_POSITION),
        );

        let camera = Camera::perspective(60.0, 0.1, 100.0)
            .at(Vec3::new(0.0, 4.0, 8.0))
            .looking_at(Vec3::new(0.0, 1.0, 0.0));

        debug!("table assembled: {} nodes", graph.len());

        Self {
            graph,
            environment,
            camera,
            character,
            table,
        }
    }

    /// The hand that bobs while an action is in progress.
    pub fn tracked_hand(&self) -> NodeId {
        self.character.parts.right_hand
    }
}
