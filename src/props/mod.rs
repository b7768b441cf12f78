//! Action-driven lab equipment
//!
//! Maps the current step's action state onto a small set of transient prop
//! meshes and animates them frame by frame.

mod animation;
mod mapper;
mod registry;

pub use animation::{animate_props, hand_bob, FRAME_STEP};
pub use mapper::{apply_action, apply_key, PropKey};
pub use registry::{Prop, PropKind, PropRegistry};
