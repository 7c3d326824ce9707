//! Pointer event definitions.

/// A pointer event in device pixels, as delivered by the interactive host.
///
/// Events arrive on a single control thread in the order the device produced
/// them. `Cancel` stands for the pointer leaving the window or the host
/// tearing the gesture down; it must be routed from a scope broader than the
/// content element so an active session can never get stuck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed at a device position.
    Down { x: f64, y: f64 },
    /// Pointer moved while tracked.
    Move { x: f64, y: f64 },
    /// Pointer released at a device position.
    Up { x: f64, y: f64 },
    /// Gesture aborted (pointer left the window, focus lost).
    Cancel,
}
