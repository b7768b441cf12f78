use super::{SceneFrame, View};
use crate::catalog::ExperimentStep;
use crate::input::InputState;
use crate::math::Vec3;
use crate::props::{animate_props, apply_key, hand_bob, PropKey, PropRegistry};
use crate::render::Camera;
use crate::scene::NodeId;
use crate::stage::TableScene;

/// Close-up bench that acts out the current step.
pub struct TableView {
    scene: TableScene,
    props: PropRegistry,
    key: Option<PropKey>,
    hand: NodeId,
    hand_rest: Vec3,
}

impl Default for TableView {
    fn default() -> Self {
        Self::new()
    }
}

impl TableView {
    pub fn new() -> Self {
        let scene = TableScene::build();
        let hand = scene.tracked_hand();
        let hand_rest = scene.graph.transform(hand).position;
        Self {
            scene,
            props: PropRegistry::new(),
            key: None,
            hand,
            hand_rest,
        }
    }

    pub fn scene(&self) -> &TableScene {
        &self.scene
    }

    pub fn props(&self) -> &PropRegistry {
        &self.props
    }

    pub fn key(&self) -> Option<PropKey> {
        self.key
    }

    /// Shows `step` in the given action state.
    pub fn show(&mut self, step: &ExperimentStep, animating: bool, show_visual: bool) -> bool {
        self.sync(PropKey::new(step.action_kind(), animating, show_visual))
    }

    /// Rebuilds the props when `key` differs from what is on screen.
    /// Returns whether a rebuild happened.
    pub fn sync(&mut self, key: PropKey) -> bool {
        if self.key == Some(key) {
            return false;
        }
        apply_key(key, &mut self.props);
        self.key = Some(key);
        if !key.animating {
            self.scene.graph.transform_mut(self.hand).position = self.hand_rest;
        }
        true
    }

    pub fn hand_position(&self) -> Vec3 {
        self.scene.graph.transform(self.hand).position
    }

    pub fn hand_rest(&self) -> Vec3 {
        self.hand_rest
    }
}

impl View for TableView {
    fn name(&self) -> &'static str {
        "table"
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.scene.camera
    }

    fn update(&mut self, time: f32, _input: &mut InputState) {
        let Some(key) = self.key else {
            return;
        };
        animate_props(&mut self.props, key, time);
        if key.animating {
            let hand = self.scene.graph.transform_mut(self.hand);
            hand.position.y = self.hand_rest.y + hand_bob(time);
        }
    }

    fn frame(&self) -> SceneFrame<'_> {
        SceneFrame {
            graph: &self.scene.graph,
            props: &self.props,
            camera: &self.scene.camera,
            environment: &self.scene.environment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ActionKind;

    #[test]
    fn same_key_does_not_rebuild() {
        let mut view = TableView::new();
        let key = PropKey::new(Some(ActionKind::Heat), true, false);
        assert!(view.sync(key));
        assert!(!view.sync(key));
        assert_eq!(view.props().len(), 2);
        assert!(view.sync(PropKey::new(Some(ActionKind::Heat), false, true)));
        assert_eq!(view.props().len(), 2);
    }

    #[test]
    fn hand_bobs_only_while_animating() {
        let mut view = TableView::new();
        let mut input = InputState::new();
        view.sync(PropKey::new(Some(ActionKind::Mix), true, false));
        view.update(0.5, &mut input);
        let bobbed = view.hand_position().y - view.hand_rest().y;
        assert!((bobbed - hand_bob(0.5)).abs() < 1e-6);

        view.sync(PropKey::new(Some(ActionKind::Mix), false, true));
        view.update(0.6, &mut input);
        assert_eq!(view.hand_position(), view.hand_rest());
    }
}
