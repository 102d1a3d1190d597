//! Shooting module - aim control, launch and reset

mod aim;
mod throw;

pub use aim::*;
pub use throw::*;
