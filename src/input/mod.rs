//! Input handling and interaction state machine.
//!
//! This module translates host pointer events into document mutations. The
//! active [`ToolMode`] decides what a gesture means; the coordinate transform
//! maps device pixels into the normalized percent space before any mode logic
//! runs. See [`InputState::handle_pointer`].

pub mod events;
pub mod mode;
pub mod state;

// Re-export commonly used types at module level
pub use events::PointerEvent;
pub use mode::ToolMode;
pub use state::{DragPart, GestureSession, InputState};
