//! Ball module - components, physics, and hoop collision

mod collision;
mod components;
mod physics;

pub use collision::*;
pub use components::*;
pub use physics::*;
