//! Core runtime utilities: the tick clock and timed tasks.

pub mod task;
pub mod time;

pub use task::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Vec2, Vec3, Vec4};
