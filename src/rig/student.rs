use crate::math::Transform;
use crate::scene::{Geometry, IdMap, Material, MeshPart, NodeId, SceneGraph, QUARTER_TURN};
use std::f32::consts::PI;

/// Handles to the articulated groups of a student rig.
///
/// Shoulders (`left_arm`/`right_arm`) and elbows (`left_forearm`/
/// `right_forearm`) are rotation pivots: rotating one carries everything
/// below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterParts {
    pub head: NodeId,
    pub body: NodeId,
    pub left_arm: NodeId,
    pub right_arm: NodeId,
    pub left_leg: NodeId,
    pub right_leg: NodeId,
    pub left_forearm: NodeId,
    pub right_forearm: NodeId,
    pub left_hand: NodeId,
    pub right_hand: NodeId,
}

impl CharacterParts {
    pub fn map(&self, ids: &IdMap) -> Self {
        Self {
            head: ids.map(self.head),
            body: ids.map(self.body),
            left_arm: ids.map(self.left_arm),
            right_arm: ids.map(self.right_arm),
            left_leg: ids.map(self.left_leg),
            right_leg: ids.map(self.right_leg),
            left_forearm: ids.map(self.left_forearm),
            right_forearm: ids.map(self.right_forearm),
            left_hand: ids.map(self.left_hand),
            right_hand: ids.map(self.right_hand),
        }
    }

    pub fn all(&self) -> [NodeId; 10] {
        [
            self.head,
            self.body,
            self.left_arm,
            self.right_arm,
            self.left_leg,
            self.right_leg,
            self.left_forearm,
            self.right_forearm,
            self.left_hand,
            self.right_hand,
        ]
    }
}

/// A freshly built student figure, still in its own graph.
#[derive(Debug, Clone)]
pub struct CharacterRig {
    pub graph: SceneGraph,
    pub root: NodeId,
    pub parts: CharacterParts,
}

/// A rig after it has been grafted into a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedRig {
    pub root: NodeId,
    pub parts: CharacterParts,
}

impl CharacterRig {
    /// Builds the student figure. Feet rest on y = 0, facing +Z.
    pub fn build() -> Self {
        let palette = Palette::new();
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, "student", Transform::IDENTITY);

        let head = build_head(&mut graph, root, &palette);

        graph.add_mesh(
            Some(root),
            solid(Geometry::cylinder(0.09, 0.1, 0.18, 16), palette.skin),
            Transform::from_xyz(0.0, 1.51, 0.0),
        );

        let body = build_torso(&mut graph, root, &palette);
        let (left_arm, left_forearm, left_hand) = build_arm(&mut graph, root, &palette, Side::Left);
        let (right_arm, right_forearm, right_hand) =
            build_arm(&mut graph, root, &palette, Side::Right);
        build_backpack(&mut graph, root, &palette);
        let left_leg = build_leg(&mut graph, root, &palette, Side::Left);
        let right_leg = build_leg(&mut graph, root, &palette, Side::Right);

        Self {
            graph,
            root,
            parts: CharacterParts {
                head,
                body,
                left_arm,
                right_arm,
                left_leg,
                right_leg,
                left_forearm,
                right_forearm,
                left_hand,
                right_hand,
            },
        }
    }

    /// Moves the rig into `scene` under `parent` and returns its handles
    /// re-issued by that scene.
    pub fn place(self, scene: &mut SceneGraph, parent: Option<NodeId>, transform: Transform) -> PlacedRig {
        let ids = scene.graft(parent, self.graph);
        let root = ids.map(self.root);
        *scene.transform_mut(root) = transform;
        PlacedRig {
            root,
            parts: self.parts.map(&ids),
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

struct Palette {
    skin: Material,
    hair: Material,
    shirt: Material,
    pants: Material,
    shoe: Material,
    backpack: Material,
}

impl Palette {
    fn new() -> Self {
        Self {
            skin: Material::standard(0xffdbac).roughness(0.8).metalness(0.1),
            hair: Material::standard(0x3d2817).roughness(0.9).metalness(0.05),
            shirt: Material::standard(0x4a90e2).roughness(0.7).metalness(0.1),
            pants: Material::standard(0x34495e).roughness(0.8).metalness(0.05),
            shoe: Material::standard(0x1a1a1a).roughness(0.3).metalness(0.6),
            backpack: Material::standard(0xe74c3c).roughness(0.7).metalness(0.1),
        }
    }
}

fn solid(geometry: Geometry, material: Material) -> MeshPart {
    MeshPart::new(geometry, material).casting()
}

fn mirrored(graph: &mut SceneGraph, parent: NodeId, part: MeshPart, x: f32, y: f32, z: f32, scale: [f32; 3]) {
    for sign in [-1.0, 1.0] {
        graph.add_mesh(
            Some(parent),
            part,
            Transform::from_xyz(sign * x, y, z).with_scale(scale[0], scale[1], scale[2]),
        );
    }
}

fn build_head(graph: &mut SceneGraph, root: NodeId, palette: &Palette) -> NodeId {
    let head = graph.add_group(Some(root), "head", Transform::from_xyz(0.0, 1.7, 0.0));

    graph.add_mesh(
        Some(head),
        solid(Geometry::sphere(0.28, 32, 32), palette.skin),
        Transform::IDENTITY.with_scale(0.95, 1.0, 0.85),
    );
    graph.add_mesh(
        Some(head),
        solid(Geometry::dome(0.3, 32, 32, 0.55), palette.hair),
        Transform::from_xyz(0.0, 0.08, 0.0).with_scale(0.95, 1.0, 0.85),
    );
    graph.add_mesh(
        Some(head),
        solid(Geometry::cuboid(0.38, 0.12, 0.18), palette.hair),
        Transform::from_xyz(0.0, 0.16, 0.22).with_rotation(-0.1, 0.0, 0.0),
    );

    let eye_white = solid(
        Geometry::sphere(0.05, 20, 20),
        Material::standard(0xffffff).roughness(0.3),
    );
    mirrored(graph, head, eye_white, 0.09, 0.06, 0.22, [1.1, 1.0, 0.5]);

    let iris = solid(
        Geometry::sphere(0.025, 20, 20),
        Material::standard(0x2e7d32).roughness(0.4),
    );
    mirrored(graph, head, iris, 0.09, 0.06, 0.24, [1.0; 3]);

    let pupil = solid(
        Geometry::sphere(0.015, 16, 16),
        Material::standard(0x000000).roughness(0.2),
    );
    mirrored(graph, head, pupil, 0.09, 0.06, 0.25, [1.0; 3]);

    // glasses
    let frame_material = Material::standard(0x2c2c2c).metalness(0.8).roughness(0.2);
    let frame_thickness = 0.012;
    for sign in [-1.0, 1.0] {
        graph.add_mesh(
            Some(head),
            solid(Geometry::torus(0.07, frame_thickness, 16, 32), frame_material),
            Transform::from_xyz(sign * 0.09, 0.06, 0.23).with_rotation(0.0, QUARTER_TURN, 0.0),
        );
    }
    graph.add_mesh(
        Some(head),
        solid(
            Geometry::cylinder(frame_thickness, frame_thickness, 0.12, 8),
            frame_material,
        ),
        Transform::from_xyz(0.0, 0.06, 0.23).with_rotation(0.0, 0.0, QUARTER_TURN),
    );

    graph.add_mesh(
        Some(head),
        solid(Geometry::cone(0.035, 0.08, 8), palette.skin),
        Transform::from_xyz(0.0, 0.01, 0.26).with_rotation(QUARTER_TURN, 0.0, 0.0),
    );

    graph.add_mesh(
        Some(head),
        solid(
            Geometry::arc_segment(0.09, PI * 1.2, PI * 1.8, 0.01),
            Material::standard(0xcc5555),
        ),
        Transform::from_xyz(0.0, -0.09, 0.24).with_rotation(PI, 0.0, 0.0),
    );

    let ear = solid(Geometry::sphere(0.05, 16, 16), palette.skin);
    mirrored(graph, head, ear, 0.27, 0.02, 0.0, [0.6, 1.0, 0.8]);

    head
}

fn build_torso(graph: &mut SceneGraph, root: NodeId, palette: &Palette) -> NodeId {
    let body = graph.add_group(Some(root), "body", Transform::from_xyz(0.0, 1.05, 0.0));

    graph.add_mesh(
        Some(body),
        solid(Geometry::cuboid(0.55, 0.7, 0.28), palette.shirt),
        Transform::IDENTITY,
    );
    graph.add_mesh(
        Some(body),
        solid(Geometry::cuboid(0.57, 0.1, 0.29), Material::standard(0x3a7bc8)),
        Transform::from_xyz(0.0, 0.3, 0.0),
    );

    let tie = Material::standard(0xc0392b);
    graph.add_mesh(
        Some(body),
        solid(Geometry::cuboid(0.06, 0.06, 0.04), tie),
        Transform::from_xyz(0.0, 0.24, 0.16),
    );
    graph.add_mesh(
        Some(body),
        solid(Geometry::cuboid(0.1, 0.35, 0.02), tie),
        Transform::from_xyz(0.0, 0.03, 0.155),
    );

    let button = solid(
        Geometry::cylinder(0.02, 0.02, 0.01, 16),
        Material::standard(0xf8f8f8).metalness(0.3).roughness(0.4),
    );
    for i in 0..4 {
        graph.add_mesh(
            Some(body),
            button,
            Transform::from_xyz(0.0, 0.2 - i as f32 * 0.13, 0.155).with_rotation(QUARTER_TURN, 0.0, 0.0),
        );
    }

    body
}

/// Returns `(shoulder, elbow, hand)` groups.
fn build_arm(graph: &mut SceneGraph, root: NodeId, palette: &Palette, side: Side) -> (NodeId, NodeId, NodeId) {
    let (arm_name, forearm_name, hand_name) = match side {
        Side::Left => ("left_arm", "left_forearm", "left_hand"),
        Side::Right => ("right_arm", "right_forearm", "right_hand"),
    };

    let arm = graph.add_group(
        Some(root),
        arm_name,
        Transform::from_xyz(side.sign() * 0.35, 1.38, 0.0).with_rotation(0.0, 0.0, -side.sign() * 0.15),
    );
    graph.add_mesh(
        Some(arm),
        solid(Geometry::sphere(0.08, 16, 16), palette.shirt),
        Transform::IDENTITY,
    );
    graph.add_mesh(
        Some(arm),
        solid(Geometry::cylinder(0.07, 0.065, 0.38, 16), palette.shirt),
        Transform::from_xyz(0.0, -0.19, 0.0),
    );

    let forearm = graph.add_group(Some(arm), forearm_name, Transform::from_xyz(0.0, -0.38, 0.0));
    graph.add_mesh(
        Some(forearm),
        solid(Geometry::sphere(0.065, 16, 16), palette.shirt),
        Transform::IDENTITY,
    );
    graph.add_mesh(
        Some(forearm),
        solid(Geometry::cylinder(0.06, 0.055, 0.32, 16), palette.skin),
        Transform::from_xyz(0.0, -0.16, 0.0),
    );

    let hand = graph.add_group(Some(forearm), hand_name, Transform::from_xyz(0.0, -0.38, 0.0));
    graph.add_mesh(
        Some(hand),
        solid(Geometry::cuboid(0.08, 0.12, 0.05), palette.skin),
        Transform::IDENTITY,
    );
    let finger = solid(Geometry::cuboid(0.015, 0.06, 0.015), palette.skin);
    for i in 0..4 {
        graph.add_mesh(
            Some(hand),
            finger,
            Transform::from_xyz(-0.025 + i as f32 * 0.018, -0.09, 0.0),
        );
    }

    (arm, forearm, hand)
}

fn build_backpack(graph: &mut SceneGraph, root: NodeId, palette: &Palette) -> NodeId {
    let backpack = graph.add_group(Some(root), "backpack", Transform::from_xyz(0.0, 1.05, -0.25));

    graph.add_mesh(
        Some(backpack),
        solid(Geometry::cuboid(0.4, 0.5, 0.18), palette.backpack),
        Transform::IDENTITY,
    );
    graph.add_mesh(
        Some(backpack),
        solid(Geometry::cuboid(0.32, 0.2, 0.08), Material::standard(0xc0392b)),
        Transform::from_xyz(0.0, 0.05, 0.13),
    );

    let strap = solid(Geometry::cuboid(0.06, 0.55, 0.03), Material::standard(0xa93226));
    for sign in [-1.0, 1.0] {
        graph.add_mesh(
            Some(backpack),
            strap,
            Transform::from_xyz(sign * 0.12, 0.02, -0.095).with_rotation(0.15, 0.0, 0.0),
        );
    }

    backpack
}

fn build_leg(graph: &mut SceneGraph, root: NodeId, palette: &Palette, side: Side) -> NodeId {
    let name = match side {
        Side::Left => "left_leg",
        Side::Right => "right_leg",
    };
    let leg = graph.add_group(Some(root), name, Transform::from_xyz(side.sign() * 0.14, 0.8, 0.0));

    graph.add_mesh(
        Some(leg),
        solid(Geometry::sphere(0.09, 16, 16), palette.pants),
        Transform::IDENTITY,
    );
    graph.add_mesh(
        Some(leg),
        solid(Geometry::cylinder(0.09, 0.08, 0.5, 16), palette.pants),
        Transform::from_xyz(0.0, -0.25, 0.0),
    );
    graph.add_mesh(
        Some(leg),
        solid(Geometry::cylinder(0.075, 0.07, 0.48, 16), palette.pants),
        Transform::from_xyz(0.0, -0.74, 0.0),
    );
    graph.add_mesh(
        Some(leg),
        solid(Geometry::cuboid(0.16, 0.1, 0.28), palette.shoe),
        Transform::from_xyz(0.0, -1.03, 0.06),
    );

    leg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn build_is_deterministic() {
        let a = CharacterRig::build();
        let b = CharacterRig::build();
        assert_eq!(a.graph.len(), b.graph.len());
        assert_eq!(a.parts, b.parts);
        for i in 0..a.graph.len() {
            let id = NodeId(i);
            assert_eq!(a.graph.node(id).transform, b.graph.node(id).transform);
            assert_eq!(a.graph.node(id).mesh, b.graph.node(id).mesh);
        }
    }

    #[test]
    fn parts_are_distinct_groups_under_the_root() {
        let rig = CharacterRig::build();
        let parts = rig.parts.all();
        for (i, a) in parts.iter().enumerate() {
            assert!(rig.graph.node(*a).mesh.is_none());
            for b in &parts[i + 1..] {
                assert_ne!(a, b);
            }
        }
        let under_root = rig.graph.descendants(rig.root);
        assert!(parts.iter().all(|p| under_root.contains(p)));
        assert_eq!(rig.graph.roots(), &[rig.root]);
    }

    #[test]
    fn hand_hangs_from_elbow_which_hangs_from_shoulder() {
        let rig = CharacterRig::build();
        let p = rig.parts;
        assert_eq!(rig.graph.node(p.right_hand).parent(), Some(p.right_forearm));
        assert_eq!(rig.graph.node(p.right_forearm).parent(), Some(p.right_arm));
        assert_eq!(rig.graph.node(p.left_hand).parent(), Some(p.left_forearm));
        assert_eq!(rig.graph.node(p.left_forearm).parent(), Some(p.left_arm));
    }

    #[test]
    fn rotating_the_shoulder_carries_the_hand() {
        let mut rig = CharacterRig::build();
        let hand = rig.parts.right_hand;
        let before = rig.graph.world_matrix(hand).transform_point3(Vec3::ZERO);
        rig.graph.transform_mut(rig.parts.right_arm).rotation.x = -1.2;
        let after = rig.graph.world_matrix(hand).transform_point3(Vec3::ZERO);
        assert!((before - after).length() > 0.3);
        let shoulder = rig.graph.world_matrix(rig.parts.right_arm).transform_point3(Vec3::ZERO);
        assert!(((before - shoulder).length() - (after - shoulder).length()).abs() < 1e-4);
    }

    #[test]
    fn every_mesh_casts_shadows() {
        let rig = CharacterRig::build();
        let meshes: Vec<_> = (0..rig.graph.len())
            .filter_map(|i| rig.graph.node(NodeId(i)).mesh)
            .collect();
        assert!(meshes.len() > 40);
        assert!(meshes.iter().all(|m| m.cast_shadow));
    }

    #[test]
    fn placing_rebases_handles() {
        let mut scene = SceneGraph::new();
        let floor = scene.add_group(None, "floor", Transform::IDENTITY);
        let placed = CharacterRig::build().place(&mut scene, None, Transform::from_xyz(0.0, 0.0, 10.0));
        assert_ne!(placed.root, floor);
        assert_eq!(scene.node(placed.parts.head).name, Some("head"));
        assert_eq!(scene.node(placed.parts.right_hand).name, Some("right_hand"));
        assert_eq!(scene.transform(placed.root).position, Vec3::new(0.0, 0.0, 10.0));
    }
}
