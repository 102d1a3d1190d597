//! UI module - HUD text and gizmo overlays for the windowed game

mod gizmos;
mod hud;

pub use gizmos::*;
pub use hud::*;
