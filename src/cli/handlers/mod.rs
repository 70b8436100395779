//! Command handlers for CLI operations
//!
//! This module contains handlers for different CLI commands,
//! separating command execution logic from parsing and validation.

pub mod check;
mod events;
pub mod render;
pub mod send;

pub use check::CheckCommandHandler;
pub use events::read_events;
pub use render::RenderCommandHandler;
pub use send::SendCommandHandler;
