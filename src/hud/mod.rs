//! egui overlays for the three screens
//!
//! Each panel only reads lab state and reports what the user clicked as a
//! [`HudAction`]; the host applies it after the egui pass.

mod catalog;
mod experiment;
mod game;

pub use catalog::CatalogBrowser;
pub use experiment::experiment_panel;
pub use game::{game_hud, Banner};

/// User intent collected from one egui pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HudAction {
    /// Open the experiment with this id on the lab table.
    Open(String),
    EnterGame,
    ExitGame,
    /// Highlight the previous experiment in the room.
    SelectPrev,
    SelectNext,
    PerformAction,
    NextStep,
    PrevStep,
    TryAgain,
    Back,
}
