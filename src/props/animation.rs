use super::mapper::PropKey;
use super::registry::{PropKind, PropRegistry};
use crate::catalog::ActionKind;

/// Seconds added to the animation clock on every frame tick.
pub const FRAME_STEP: f32 = 0.016;

/// Advances every prop by one frame of its action's motion.
///
/// While animating, shaking props wobble sideways, mixed props spin and a
/// heating flame pulses in height. Once the result is showing every prop
/// idles with a slow spin and bob.
pub fn animate_props(registry: &mut PropRegistry, key: PropKey, time: f32) {
    if key.animating {
        for prop in registry.iter_mut() {
            let transform = &mut prop.transform;
            match key.action {
                Some(ActionKind::Shake) => {
                    let phase = (time * 10.0).sin();
                    transform.position.x += phase * 0.1;
                    transform.rotation.z = phase * 0.2;
                }
                Some(ActionKind::Mix) => transform.rotation.y += 0.05,
                Some(ActionKind::Heat) if prop.kind == PropKind::Flame => {
                    transform.scale.y = 1.0 + (time * 5.0).sin() * 0.2;
                }
                _ => {}
            }
        }
    }

    if key.show_visual {
        for prop in registry.iter_mut() {
            prop.transform.rotation.y += 0.02;
            prop.transform.position.y += (time * 2.0).sin() * 0.005;
        }
    }
}

/// Vertical offset of the working hand at `time` while an action runs.
pub fn hand_bob(time: f32) -> f32 {
    (time * 3.0).sin() * 0.1
}
