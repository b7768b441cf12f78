//! # virtual-lab
//!
//! Guided science experiments in a small procedural 3D lab.
//!
//! ## Features
//! - Procedural student rig and classroom / lab-table scenes built from primitives
//! - Step-by-step experiment sessions with timed actions and completion tracking
//! - Action-driven equipment props with per-frame animation
//! - Free-roam room with two control schemes and a proximity-gated table
//! - wgpu rendering with an egui overlay
//!
//! ## Example
//! ```rust,ignore
//! use virtual_lab::catalog::Catalog;
//! use virtual_lab::progression::Session;
//! use std::time::Duration;
//!
//! let catalog = Catalog::builtin()?;
//! let mut session = Session::new(catalog.experiments()[0].clone());
//!
//! session.perform_action();
//! session.advance(Duration::from_secs(3));
//! println!("{:?} done: {:?}", session.current_step().id, session.progress());
//! ```

pub mod catalog;
pub mod config;
pub mod control;
pub mod hud;
pub mod input;
pub mod math;
pub mod progression;
pub mod props;
pub mod render;
pub mod rig;
pub mod scene;
pub mod stage;
pub mod view;

pub use catalog::{ActionKind, Catalog, CatalogError, CatalogFilter, Difficulty, Experiment, ExperimentStep};
pub use config::{Cli, ConfigError, LabConfig};
pub use control::{CharacterController, ControlScheme, FollowCamera, InteractionZone, Selector};
pub use input::InputState;
pub use math::Transform;
pub use progression::{Phase, Session};
pub use props::{apply_action, PropKey, PropKind, PropRegistry};
pub use rig::{CharacterParts, CharacterRig};
pub use scene::{Environment, Geometry, Material, MeshPart, SceneGraph};
pub use stage::{RoomLighting, RoomScene, TableScene};
pub use view::{FrameLoop, RoomOptions, RoomView, SceneFrame, TableView, View, Viewport};
