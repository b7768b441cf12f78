use super::{SceneFrame, View};
use crate::catalog::Experiment;
use crate::control::{CharacterController, ControlScheme, FollowCamera, InteractionZone, MovementSettings, Selector};
use crate::input::InputState;
use crate::math::Vec3;
use crate::props::PropRegistry;
use crate::render::Camera;
use crate::stage::{RoomLighting, RoomScene};
use log::{debug, info};

/// Tunables for the free-roam room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomOptions {
    pub scheme: ControlScheme,
    pub lighting: RoomLighting,
    pub movement: MovementSettings,
    pub interaction_radius: f32,
}

impl Default for RoomOptions {
    fn default() -> Self {
        Self {
            scheme: ControlScheme::default(),
            lighting: RoomLighting::default(),
            movement: MovementSettings::default(),
            interaction_radius: 8.0,
        }
    }
}

type SelectCallback = Box<dyn FnMut(&Experiment)>;

/// The walkable classroom. `e` near the table picks the highlighted
/// experiment, `q` and `r` move the highlight.
pub struct RoomView {
    scene: RoomScene,
    controller: CharacterController,
    follow: FollowCamera,
    zone: InteractionZone,
    experiments: Vec<Experiment>,
    selector: Selector,
    on_select: SelectCallback,
    props: PropRegistry,
}

impl RoomView {
    pub const INTERACT_KEY: &'static str = "e";
    pub const PREV_KEY: &'static str = "q";
    pub const NEXT_KEY: &'static str = "r";

    /// `experiments` must be non-empty.
    pub fn new(
        experiments: Vec<Experiment>,
        options: RoomOptions,
        on_select: impl FnMut(&Experiment) + 'static,
    ) -> Self {
        let scene = RoomScene::build(options.lighting);
        let zone = InteractionZone::new(scene.table_position(), options.interaction_radius);
        let selector = Selector::new(experiments.len());
        Self {
            scene,
            controller: CharacterController::new(options.scheme, options.movement),
            follow: FollowCamera::default(),
            zone,
            experiments,
            selector,
            on_select: Box::new(on_select),
            props: PropRegistry::new(),
        }
    }

    pub fn scene(&self) -> &RoomScene {
        &self.scene
    }

    pub fn character_position(&self) -> Vec3 {
        self.scene.character_position()
    }

    /// Teleports the character, e.g. to restore a saved spot.
    pub fn place_character(&mut self, position: Vec3) {
        self.scene.graph.transform_mut(self.scene.character.root).position = position;
    }

    pub fn experiments(&self) -> &[Experiment] {
        &self.experiments
    }

    pub fn selected_index(&self) -> usize {
        self.selector.index()
    }

    pub fn selected(&self) -> &Experiment {
        &self.experiments[self.selector.index()]
    }

    pub fn select_next(&mut self) {
        self.selector.next();
        debug!("highlighted {:?}", self.selected().id);
    }

    pub fn select_prev(&mut self) {
        self.selector.prev();
        debug!("highlighted {:?}", self.selected().id);
    }

    pub fn in_reach(&self) -> bool {
        self.zone.contains(self.character_position())
    }

    /// Fires the selection callback if the character stands close enough to
    /// the table. Returns whether it fired.
    pub fn interact(&mut self) -> bool {
        if !self.in_reach() {
            debug!("interact ignored: character out of reach of the table");
            return false;
        }
        let experiment = &self.experiments[self.selector.index()];
        info!("selected experiment {:?} from the room", experiment.id);
        (self.on_select)(experiment);
        true
    }
}

impl View for RoomView {
    fn name(&self) -> &'static str {
        "room"
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.scene.camera
    }

    fn on_key_down(&mut self, key: &str) {
        match key {
            Self::INTERACT_KEY => {
                self.interact();
            }
            Self::PREV_KEY => self.select_prev(),
            Self::NEXT_KEY => self.select_next(),
            _ => {}
        }
    }

    fn update(&mut self, _time: f32, input: &mut InputState) {
        let root = self.scene.character.root;
        self.controller
            .update(input, self.scene.graph.transform_mut(root));
        let position = self.scene.graph.transform(root).position;
        self.follow.frame(&mut self.scene.camera, position);
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
