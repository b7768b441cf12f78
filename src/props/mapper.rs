use super::registry::{Prop, PropKind, PropRegistry};
use crate::catalog::ActionKind;
use crate::math::Transform;
use crate::scene::{Geometry, Material, MeshPart, QUARTER_TURN};
use log::debug;

/// The inputs the prop set depends on. Two equal keys always produce the
/// same registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropKey {
    pub action: Option<ActionKind>,
    pub animating: bool,
    pub show_visual: bool,
}

impl PropKey {
    pub fn new(action: Option<ActionKind>, animating: bool, show_visual: bool) -> Self {
        Self {
            action,
            animating,
            show_visual,
        }
    }
}

const VESSEL_IDLE: u32 = 0x88ccff;
const VESSEL_ACTIVE: u32 = 0xff6b6b;

/// Clears `registry` and fills it with the props matching the action state.
///
/// Each rule adds independently, so one call can produce several props
/// (heating while animating yields both a vessel and a flame).
pub fn apply_action(
    action: Option<ActionKind>,
    animating: bool,
    show_visual: bool,
    registry: &mut PropRegistry,
) {
    registry.clear();

    if matches!(
        action,
        Some(ActionKind::Mix | ActionKind::Measure | ActionKind::Heat)
    ) {
        let tint = if animating { VESSEL_ACTIVE } else { VESSEL_IDLE };
        registry.push(Prop::new(
            PropKind::Vessel,
            MeshPart::new(
                Geometry::cylinder(0.4, 0.35, 0.9, 16),
                Material::standard(tint).translucent(0.7),
            )
            .casting(),
            Transform::from_xyz(0.0, 2.0, 0.0),
        ));

        if action == Some(ActionKind::Heat) && animating {
            registry.push(Prop::new(
                PropKind::Flame,
                MeshPart::new(Geometry::cone(0.3, 0.6, 8), Material::basic(0xff4500)),
                Transform::from_xyz(0.0, 1.2, 0.0),
            ));
        }
    }

    if matches!(action, Some(ActionKind::Shake | ActionKind::Observe)) {
        registry.push(Prop::new(
            PropKind::Sphere,
            MeshPart::new(
                Geometry::sphere(0.35, 16, 16),
                Material::standard(0xffcc00).translucent(0.8),
            )
            .casting(),
            Transform::from_xyz(1.0, 2.0, 0.0),
        ));
    }

    if action == Some(ActionKind::Wait) {
        registry.push(Prop::new(
            PropKind::Clock,
            MeshPart::new(
                Geometry::cylinder(0.3, 0.3, 0.1, 32),
                Material::standard(0xffffff),
            )
            .casting(),
            Transform::from_xyz(-1.5, 1.65, 0.0).with_rotation(QUARTER_TURN, 0.0, 0.0),
        ));
    }

    if show_visual {
        registry.push(Prop::new(
            PropKind::ResultGlow,
            MeshPart::new(
                Geometry::sphere(0.5, 16, 16),
                Material::standard(0x00ff00).emissive(0x00ff00, 0.3),
            )
            .casting(),
            Transform::from_xyz(0.0, 2.5, 0.0),
        ));
    }

    debug!(
        "props rebuilt for {:?} (animating: {}, visual: {}): {} props",
        action,
        animating,
        show_visual,
        registry.len()
    );
}

/// [`apply_action`] driven by a [`PropKey`].
pub fn apply_key(key: PropKey, registry: &mut PropRegistry) {
    apply_action(key.action, key.animating, key.show_visual, registry);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(action: Option<ActionKind>, animating: bool, show_visual: bool) -> Vec<PropKind> {
        let mut registry = PropRegistry::new();
        apply_action(action, animating, show_visual, &mut registry);
        registry.kinds()
    }

    #[test]
    fn heat_while_animating_adds_flame() {
        assert_eq!(
            kinds(Some(ActionKind::Heat), true, false),
            [PropKind::Vessel, PropKind::Flame]
        );
        assert_eq!(kinds(Some(ActionKind::Heat), false, false), [PropKind::Vessel]);
    }

    #[test]
    fn vessel_tint_tracks_animation() {
        let mut registry = PropRegistry::new();
        apply_action(Some(ActionKind::Mix), true, false, &mut registry);
        let active = registry.find(PropKind::Vessel).unwrap().mesh.material.color;
        apply_action(Some(ActionKind::Mix), false, false, &mut registry);
        let idle = registry.find(PropKind::Vessel).unwrap().mesh.material.color;
        assert_ne!(active, idle);
        assert!(registry.find(PropKind::Vessel).unwrap().mesh.material.is_transparent());
    }

    #[test]
    fn shake_and_observe_share_the_sphere() {
        assert_eq!(kinds(Some(ActionKind::Shake), true, false), [PropKind::Sphere]);
        assert_eq!(kinds(Some(ActionKind::Observe), false, false), [PropKind::Sphere]);
    }

    #[test]
    fn wait_shows_a_clock() {
        assert_eq!(kinds(Some(ActionKind::Wait), false, false), [PropKind::Clock]);
    }

    #[test]
    fn cool_and_no_action_create_nothing_until_resolved() {
        assert!(kinds(Some(ActionKind::Cool), true, false).is_empty());
        assert!(kinds(None, false, false).is_empty());
        assert_eq!(kinds(None, false, true), [PropKind::ResultGlow]);
    }

    #[test]
    fn result_glow_sits_above_the_vessel() {
        let mut registry = PropRegistry::new();
        apply_action(Some(ActionKind::Measure), false, true, &mut registry);
        let vessel = registry.find(PropKind::Vessel).unwrap().transform.position;
        let glow = registry.find(PropKind::ResultGlow).unwrap().transform.position;
        assert!(glow.y > vessel.y);
        assert_eq!((glow.x, glow.z), (vessel.x, vessel.z));
    }

    #[test]
    fn rebuilding_same_key_is_deterministic() {
        for action in ActionKind::ALL.iter().copied().map(Some).chain([None]) {
            for (animating, show_visual) in [(false, false), (true, false), (false, true)] {
                let mut registry = PropRegistry::new();
                apply_action(action, animating, show_visual, &mut registry);
                let first: Vec<_> = registry.iter().copied().collect();
                apply_action(action, animating, show_visual, &mut registry);
                let second: Vec<_> = registry.iter().copied().collect();
                assert_eq!(first, second);
            }
        }
    }
}
