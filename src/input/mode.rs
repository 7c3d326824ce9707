//! Interaction modes.

use std::fmt;
use std::str::FromStr;

/// Operator-selected interaction mode.
///
/// Exactly one mode is active at a time and it persists across gestures,
/// except [`Reposition`](ToolMode::Reposition) which is transient: it reverts
/// to [`Pan`](ToolMode::Pan) after one completed down→up gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    /// Scroll the view by dragging; never mutates the document.
    #[default]
    Pan,
    /// Create points (click, or drag to offset the badge from its target).
    Add,
    /// Drag existing badges and target dots independently.
    Move,
    /// Draw colored line segments.
    Line,
    /// Relocate the pre-selected point with one add-style gesture.
    Reposition,
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolMode::Pan => "pan",
            ToolMode::Add => "add",
            ToolMode::Move => "move",
            ToolMode::Line => "line",
            ToolMode::Reposition => "reposition",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ToolMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pan" => Ok(ToolMode::Pan),
            "add" => Ok(ToolMode::Add),
            "move" => Ok(ToolMode::Move),
            "line" => Ok(ToolMode::Line),
            "reposition" => Ok(ToolMode::Reposition),
            other => Err(format!("unknown interaction mode: {other}")),
        }
    }
}
