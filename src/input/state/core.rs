//! Input state and non-gesture mutations.

use crate::input::mode::ToolMode;
use crate::model::{Document, LineColor, PhotoPayload};
use uuid::Uuid;

/// Which anchor of a point a move-drag is bound to.
///
/// Badge and target are independently draggable: moving one never moves the
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPart {
    Badge,
    Target,
}

/// An in-progress gesture.
///
/// At most one session exists at a time; it is opened by a pointer-down in
/// the active mode and closed by the matching up (or a cancel). The anchor
/// recorded at open time is what makes a later pointer-up meaningful; an up
/// with no session is a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureSession {
    /// Pan: device-pixel start position and the scroll offset at that moment.
    Pan {
        start_x: f64,
        start_y: f64,
        scroll_left: f64,
        scroll_top: f64,
    },
    /// Point creation (add mode): anchor and live preview, percent coords.
    Creation {
        anchor: (f64, f64),
        preview: (f64, f64),
    },
    /// Line drawing: anchor and live preview, percent coords.
    LineDraw {
        anchor: (f64, f64),
        preview: (f64, f64),
    },
    /// Dragging one anchor of an existing point.
    Drag { point: Uuid, part: DragPart },
    /// Relocating a pre-selected point (transient reposition mode).
    Relocate {
        point: Uuid,
        anchor: (f64, f64),
        preview: (f64, f64),
    },
}

/// The interaction state machine.
///
/// Owns the [`Document`] exclusively for the duration of the editing session
/// (single writer); exports clone the document as a read-only snapshot. All
/// event processing happens on one control thread, so gestures are applied
/// strictly in arrival order.
#[derive(Debug)]
pub struct InputState {
    /// The annotation document being edited.
    pub document: Document,
    /// Currently active interaction mode.
    mode: ToolMode,
    /// Palette color applied to newly drawn lines.
    pub active_line_color: LineColor,
    /// Selected point, if any. Mutually exclusive with `selected_line`.
    selected_point: Option<Uuid>,
    /// Selected line, if any. Mutually exclusive with `selected_point`.
    selected_line: Option<Uuid>,
    /// The in-progress gesture, if any.
    session: Option<GestureSession>,
    /// Point armed for the transient reposition gesture.
    reposition_target: Option<Uuid>,
    /// Outstanding asynchronous decode operations. While nonzero, new
    /// creation/drag sessions are rejected; viewing and field edits are not.
    pending_decodes: usize,
    /// Current scroll offset of the host container, updated by pan gestures.
    pub scroll_left: f64,
    /// See `scroll_left`.
    pub scroll_top: f64,
    /// Whether the display needs to be redrawn.
    pub needs_redraw: bool,
}

impl InputState {
    /// Creates the state machine around a document, starting in pan mode.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            mode: ToolMode::Pan,
            active_line_color: LineColor::default(),
            selected_point: None,
            selected_line: None,
            session: None,
            reposition_target: None,
            pending_decodes: 0,
            scroll_left: 0.0,
            scroll_top: 0.0,
            needs_redraw: true,
        }
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Switches the interaction mode.
    ///
    /// Any in-progress session is discarded so a gesture can never span two
    /// modes; leaving reposition disarms its target.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if self.mode == mode {
            return;
        }
        self.session = None;
        if self.mode == ToolMode::Reposition {
            self.reposition_target = None;
        }
        self.mode = mode;
        self.needs_redraw = true;
        log::debug!("Interaction mode set to {mode}");
    }

    /// Arms the transient reposition gesture for the selected point.
    ///
    /// Returns `false` when no point is selected.
    pub fn begin_reposition(&mut self) -> bool {
        let Some(id) = self.selected_point else {
            return false;
        };
        self.session = None;
        self.reposition_target = Some(id);
        self.mode = ToolMode::Reposition;
        self.needs_redraw = true;
        true
    }

    pub(super) fn reposition_target(&self) -> Option<Uuid> {
        self.reposition_target
    }

    /// Ends the transient reposition mode, reverting to pan.
    pub(super) fn finish_reposition(&mut self) {
        self.reposition_target = None;
        self.mode = ToolMode::Pan;
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub(super) fn set_session(&mut self, session: Option<GestureSession>) {
        self.session = session;
    }

    pub(super) fn take_session(&mut self) -> Option<GestureSession> {
        self.session.take()
    }

    pub fn selected_point(&self) -> Option<Uuid> {
        self.selected_point
    }

    pub fn selected_line(&self) -> Option<Uuid> {
        self.selected_line
    }

    /// Selects a point, clearing any line selection.
    pub fn select_point(&mut self, id: Uuid) {
        self.selected_point = Some(id);
        self.selected_line = None;
        self.needs_redraw = true;
    }

    /// Selects a line, clearing any point selection.
    pub fn select_line(&mut self, id: Uuid) {
        self.selected_line = Some(id);
        self.selected_point = None;
        self.needs_redraw = true;
    }

    pub(super) fn clear_line_selection(&mut self) {
        if self.selected_line.take().is_some() {
            self.needs_redraw = true;
        }
    }

    /// Marks the start of an asynchronous decode (photo or base image).
    ///
    /// While any decode is outstanding the machine rejects new creation and
    /// drag sessions; already-loaded data stays viewable and editable.
    pub fn begin_decode(&mut self) {
        self.pending_decodes += 1;
    }

    /// Marks one asynchronous decode as finished.
    pub fn finish_decode(&mut self) {
        self.pending_decodes = self.pending_decodes.saturating_sub(1);
    }

    pub fn decode_pending(&self) -> bool {
        self.pending_decodes > 0
    }

    /// Syncs the host container's scroll offset into the state so the next
    /// pan session starts from the real value.
    pub fn set_scroll_offset(&mut self, left: f64, top: f64) {
        self.scroll_left = left;
        self.scroll_top = top;
    }

    // ---- direct field edits (never blocked by pending decodes) ----

    pub fn set_typology(&mut self, id: Uuid, typology: impl Into<String>) {
        if let Some(point) = self.document.point_mut(id) {
            point.typology = typology.into();
            self.needs_redraw = true;
        }
    }

    pub fn set_description(&mut self, id: Uuid, description: impl Into<String>) {
        if let Some(point) = self.document.point_mut(id) {
            point.description = description.into();
        }
    }

    pub fn attach_photo(&mut self, id: Uuid, photo: PhotoPayload) {
        if let Some(point) = self.document.point_mut(id) {
            point.images.push(photo);
        }
    }

    pub fn remove_photo(&mut self, id: Uuid, index: usize) {
        if let Some(point) = self.document.point_mut(id) {
            if index < point.images.len() {
                point.images.remove(index);
            }
        }
    }

    /// Deletes a point, renumbering the rest and dropping stale selection.
    pub fn delete_point(&mut self, id: Uuid) -> bool {
        let removed = self.document.remove_point(id);
        if removed {
            if self.selected_point == Some(id) {
                self.selected_point = None;
            }
            if self.reposition_target == Some(id) {
                self.finish_reposition();
            }
            self.needs_redraw = true;
        }
        removed
    }

    /// Deletes the selected line, if any.
    pub fn delete_selected_line(&mut self) -> bool {
        let Some(id) = self.selected_line.take() else {
            return false;
        };
        let removed = self.document.remove_line(id);
        if removed {
            self.needs_redraw = true;
        }
        removed
    }
}
