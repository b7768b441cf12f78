//! Character control and camera framing for the room
//!
//! Two control schemes are supported. [`ControlScheme::AxisLocked`] moves
//! along world axes. [`ControlScheme::OrientationRelative`] turns the
//! character with a horizontal drag and walks along its facing.
//!
//! In both schemes W walks into the screen, away from the trailing camera.
//! At yaw 0 that is -Z while the rig's modelled front faces +Z, toward the
//! camera, so the player watches the student's face and W backs it toward
//! the table. S and D move along `yaw_forward` and `yaw_right`.

mod selection;

pub use selection::Selector;

use crate::input::InputState;
use crate::math::{Transform, Vec3};
use crate::render::Camera;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ControlScheme {
    AxisLocked,
    #[default]
    OrientationRelative,
}

/// Movement tuning, in world units per frame tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementSettings {
    pub speed: f32,
    /// Half side of the square the character is clamped to.
    pub bound: f32,
    /// Radians of yaw per pixel of horizontal drag.
    pub drag_sensitivity: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            speed: 0.15,
            bound: 20.0,
            drag_sensitivity: 0.01,
        }
    }
}

/// Walks the character from latched input, once per frame.
#[derive(Debug, Clone)]
pub struct CharacterController {
    pub scheme: ControlScheme,
    pub settings: MovementSettings,
    yaw: f32,
}

impl CharacterController {
    pub fn new(scheme: ControlScheme, settings: MovementSettings) -> Self {
        Self {
            scheme,
            settings,
            yaw: 0.0,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Planar displacement for the currently pressed keys, before clamping.
    ///
    /// W is `-forward`: into the screen, opposite the rig's modelled front.
    pub fn movement(&self, input: &InputState) -> Vec3 {
        let (forward, right) = match self.scheme {
            ControlScheme::AxisLocked => (Vec3::Z, Vec3::X),
            ControlScheme::OrientationRelative => {
                (Transform::yaw_forward(self.yaw), Transform::yaw_right(self.yaw))
            }
        };

        let mut delta = Vec3::ZERO;
        if input.is_pressed("w") {
            delta -= forward;
        }
        if input.is_pressed("s") {
            delta += forward;
        }
        if input.is_pressed("a") {
            delta -= right;
        }
        if input.is_pressed("d") {
            delta += right;
        }
        delta * self.settings.speed
    }

    /// Applies one tick of turning and walking to `transform`.
    pub fn update(&mut self, input: &mut InputState, transform: &mut Transform) {
        let (dx, _) = input.take_drag_delta();
        if self.scheme == ControlScheme::OrientationRelative {
            self.yaw += dx * self.settings.drag_sensitivity;
            transform.rotation.y = self.yaw;
        }

        let bound = self.settings.bound;
        let next = transform.position + self.movement(input);
        transform.position.x = next.x.clamp(-bound, bound);
        transform.position.z = next.z.clamp(-bound, bound);
    }
}

/// Camera that trails the character at a fixed world-space offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub offset: Vec3,
    /// Height above the character's feet the camera looks at.
    pub look_height: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 5.0, 15.0),
            look_height: 2.0,
        }
    }
}

impl FollowCamera {
    pub fn frame(&self, camera: &mut Camera, subject: Vec3) {
        camera.position = subject + self.offset;
        camera.target = subject + Vec3::Y * self.look_height;
    }
}

/// Distance between two points ignoring height.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Circle on the floor inside which the interact key works.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionZone {
    pub center: Vec3,
    pub radius: f32,
}

impl InteractionZone {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        planar_distance(point, self.center) < self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressing(keys: &[&str]) -> InputState {
        let mut input = InputState::new();
        for key in keys {
            input.key_down(key);
        }
        input
    }

    #[test]
    fn axis_locked_moves_along_world_axes() {
        let mut controller = CharacterController::new(ControlScheme::AxisLocked, MovementSettings::default());
        let mut transform = Transform::IDENTITY;
        controller.update(&mut pressing(&["w", "d"]), &mut transform);
        assert!((transform.position.z + 0.15).abs() < 1e-6);
        assert!((transform.position.x - 0.15).abs() < 1e-6);
    }

    #[test]
    fn axis_locked_ignores_drag() {
        let mut controller = CharacterController::new(ControlScheme::AxisLocked, MovementSettings::default());
        let mut input = InputState::new();
        input.pointer_down(0.0, 0.0);
        input.pointer_move(300.0, 0.0);
        let mut transform = Transform::IDENTITY;
        controller.update(&mut input, &mut transform);
        assert_eq!(transform.rotation.y, 0.0);
        assert_eq!(controller.yaw(), 0.0);
    }

    #[test]
    fn drag_turns_and_walk_follows_facing() {
        let mut controller =
            CharacterController::new(ControlScheme::OrientationRelative, MovementSettings::default());
        let mut input = InputState::new();
        input.pointer_down(0.0, 0.0);
        input.pointer_move(std::f32::consts::FRAC_PI_2 / 0.01, 0.0);
        input.pointer_up();
        let mut transform = Transform::IDENTITY;
        controller.update(&mut input, &mut transform);
        assert!((transform.rotation.y - std::f32::consts::FRAC_PI_2).abs() < 1e-4);

        input.key_down("s");
        controller.update(&mut input, &mut transform);
        // Facing +X after a quarter turn.
        assert!((transform.position.x - 0.15).abs() < 1e-4);
        assert!(transform.position.z.abs() < 1e-4);
    }

    #[test]
    fn w_walks_away_from_the_camera_in_both_schemes() {
        let follow = FollowCamera::default();
        for scheme in [ControlScheme::AxisLocked, ControlScheme::OrientationRelative] {
            let controller = CharacterController::new(scheme, MovementSettings::default());
            let step = controller.movement(&pressing(&["w"]));
            assert!(step.z < 0.0, "{scheme:?}");
            assert_eq!(step.x, 0.0);
            assert!(step.dot(follow.offset) < 0.0);
            assert!(step.dot(Transform::yaw_forward(controller.yaw())) < 0.0);
        }
    }

    #[test]
    fn position_is_clamped_to_floor() {
        let mut controller = CharacterController::new(ControlScheme::AxisLocked, MovementSettings::default());
        let mut transform = Transform::from_xyz(19.95, 0.0, -19.95);
        let mut input = pressing(&["d", "w"]);
        for _ in 0..10 {
            controller.update(&mut input, &mut transform);
        }
        assert_eq!(transform.position.x, 20.0);
        assert_eq!(transform.position.z, -20.0);
    }

    #[test]
    fn follow_camera_trails_in_world_space() {
        let mut camera = Camera::new();
        FollowCamera::default().frame(&mut camera, Vec3::new(3.0, 0.0, -2.0));
        assert_eq!(camera.position, Vec3::new(3.0, 5.0, 13.0));
        assert_eq!(camera.target, Vec3::new(3.0, 2.0, -2.0));
    }

    #[test]
    fn interaction_zone_is_strict_and_planar() {
        let zone = InteractionZone::new(Vec3::new(0.0, 0.0, -5.0), 8.0);
        assert!(zone.contains(Vec3::new(0.0, 0.0, -5.0)));
        assert!(zone.contains(Vec3::new(0.0, 30.0, 2.9)));
        assert!(!zone.contains(Vec3::new(0.0, 0.0, 3.0)));
    }
}
