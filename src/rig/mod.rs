//! Character rig module
//!
//! Builds the stylised student figure as a tree of nested transform groups
//! and hands back named handles to its articulated parts.

mod student;

pub use student::{CharacterParts, CharacterRig, PlacedRig};
