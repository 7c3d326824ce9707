//! Pointer gesture processing.

use super::{DragPart, GestureSession, InputState};
use crate::draw::MarkerMetrics;
use crate::input::events::PointerEvent;
use crate::input::mode::ToolMode;
use crate::transform::{Viewport, clamp_to_bounds, in_bounds};
use crate::util::{distance, distance_to_segment};
use log::debug;
use uuid::Uuid;

/// Drag distance (percent units) beyond which an add/reposition gesture
/// offsets the badge from its target, producing a leader line.
const OFFSET_DRAG_THRESHOLD: f64 = 1.0;

/// Per-axis displacement (percent units) below which a line gesture is
/// considered degenerate and discarded.
const LINE_AXIS_THRESHOLD: f64 = 0.5;

/// What a pointer-down landed on, topmost element first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HitTarget {
    Badge(Uuid),
    TargetDot(Uuid),
    Line(Uuid),
}

impl InputState {
    /// Processes one pointer event against the current viewport geometry.
    ///
    /// Device coordinates are mapped through the viewport before any mode
    /// logic runs. Events are meaningful only relative to the session anchor
    /// recorded at pointer-down: an up or move without a session is a no-op.
    pub fn handle_pointer(&mut self, event: PointerEvent, viewport: &Viewport) {
        match event {
            PointerEvent::Down { x, y } => self.on_pointer_down(x, y, viewport),
            PointerEvent::Move { x, y } => self.on_pointer_move(x, y, viewport),
            PointerEvent::Up { x, y } => self.on_pointer_up(x, y, viewport),
            PointerEvent::Cancel => self.on_pointer_cancel(),
        }
    }

    fn on_pointer_down(&mut self, x: f64, y: f64, viewport: &Viewport) {
        if self.session().is_some() {
            // Only one session at a time; a second down is ignored
            return;
        }

        match self.mode() {
            ToolMode::Pan => {
                self.set_session(Some(GestureSession::Pan {
                    start_x: x,
                    start_y: y,
                    scroll_left: self.scroll_left,
                    scroll_top: self.scroll_top,
                }));
            }
            ToolMode::Add => self.on_add_down(x, y, viewport),
            ToolMode::Move => self.on_move_down(x, y, viewport),
            ToolMode::Line => self.on_line_down(x, y, viewport),
            ToolMode::Reposition => self.on_reposition_down(x, y, viewport),
        }
    }

    fn on_add_down(&mut self, x: f64, y: f64, viewport: &Viewport) {
        if !self.has_image() {
            return;
        }
        let coords = viewport.to_percent(x, y);

        // Clicking an existing marker selects it instead of creating a new
        // point on top of it
        if let Some(HitTarget::Badge(id)) = self.hit_test(coords) {
            self.select_point(id);
            return;
        }

        if self.decode_pending() {
            debug!("Creation session rejected: decode pending");
            return;
        }
        if !in_bounds(coords.0, coords.1) {
            return;
        }
        self.clear_line_selection();
        self.set_session(Some(GestureSession::Creation {
            anchor: coords,
            preview: coords,
        }));
        self.needs_redraw = true;
    }

    fn on_line_down(&mut self, x: f64, y: f64, viewport: &Viewport) {
        if !self.has_image() || self.decode_pending() {
            if self.decode_pending() {
                debug!("Line session rejected: decode pending");
            }
            return;
        }
        let coords = viewport.to_percent(x, y);
        if !in_bounds(coords.0, coords.1) {
            return;
        }
        self.clear_line_selection();
        self.set_session(Some(GestureSession::LineDraw {
            anchor: coords,
            preview: coords,
        }));
        self.needs_redraw = true;
    }

    fn on_move_down(&mut self, x: f64, y: f64, viewport: &Viewport) {
        if !self.has_image() {
            return;
        }
        let coords = viewport.to_percent(x, y);

        match self.hit_test(coords) {
            Some(HitTarget::Badge(id)) => {
                self.select_point(id);
                if self.decode_pending() {
                    debug!("Drag session rejected: decode pending");
                    return;
                }
                self.set_session(Some(GestureSession::Drag {
                    point: id,
                    part: DragPart::Badge,
                }));
            }
            Some(HitTarget::TargetDot(id)) => {
                self.select_point(id);
                if self.decode_pending() {
                    debug!("Drag session rejected: decode pending");
                    return;
                }
                self.set_session(Some(GestureSession::Drag {
                    point: id,
                    part: DragPart::Target,
                }));
            }
            Some(HitTarget::Line(id)) => {
                self.select_line(id);
            }
            None => {
                self.clear_line_selection();
            }
        }
    }

    fn on_reposition_down(&mut self, x: f64, y: f64, viewport: &Viewport) {
        let Some(target) = self.reposition_target() else {
            // Nothing armed; drop back to pan
            self.finish_reposition();
            return;
        };
        if !self.has_image() {
            return;
        }
        if self.decode_pending() {
            debug!("Reposition session rejected: decode pending");
            return;
        }
        let coords = viewport.to_percent(x, y);
        if !in_bounds(coords.0, coords.1) {
            return;
        }
        self.set_session(Some(GestureSession::Relocate {
            point: target,
            anchor: coords,
            preview: coords,
        }));
        self.needs_redraw = true;
    }

    fn on_pointer_move(&mut self, x: f64, y: f64, viewport: &Viewport) {
        let Some(session) = self.session().copied() else {
            return;
        };

        match session {
            GestureSession::Pan {
                start_x,
                start_y,
                scroll_left,
                scroll_top,
            } => {
                self.scroll_left = scroll_left - (x - start_x);
                self.scroll_top = scroll_top - (y - start_y);
            }
            GestureSession::Creation { anchor, .. } => {
                self.set_session(Some(GestureSession::Creation {
                    anchor,
                    preview: viewport.to_percent(x, y),
                }));
                self.needs_redraw = true;
            }
            GestureSession::LineDraw { anchor, .. } => {
                self.set_session(Some(GestureSession::LineDraw {
                    anchor,
                    preview: viewport.to_percent(x, y),
                }));
                self.needs_redraw = true;
            }
            GestureSession::Drag { point, part } => {
                let coords = viewport.to_percent(x, y);
                self.apply_drag(point, part, coords);
            }
            GestureSession::Relocate { point, anchor, .. } => {
                self.set_session(Some(GestureSession::Relocate {
                    point,
                    anchor,
                    preview: viewport.to_percent(x, y),
                }));
                self.needs_redraw = true;
            }
        }
    }

    fn on_pointer_up(&mut self, x: f64, y: f64, viewport: &Viewport) {
        let Some(session) = self.take_session() else {
            // Up with no matching down in this mode: no-op
            return;
        };

        match session {
            GestureSession::Pan { .. } => {}
            GestureSession::Creation { anchor, .. } => {
                let end = viewport.to_percent(x, y);
                if !in_bounds(end.0, end.1) {
                    self.needs_redraw = true;
                    return;
                }
                let id = self.document.add_point_at(end.0, end.1);
                if distance(anchor.0, anchor.1, end.0, end.1) > OFFSET_DRAG_THRESHOLD {
                    // Drag-to-offset: target at the down position
                    if let Some(point) = self.document.point_mut(id) {
                        point.target_x = Some(anchor.0);
                        point.target_y = Some(anchor.1);
                    }
                }
                self.select_point(id);
                self.needs_redraw = true;
            }
            GestureSession::LineDraw { anchor, .. } => {
                let end = viewport.to_percent(x, y);
                if !in_bounds(end.0, end.1) {
                    self.needs_redraw = true;
                    return;
                }
                let dx = (end.0 - anchor.0).abs();
                let dy = (end.1 - anchor.1).abs();
                if dx > LINE_AXIS_THRESHOLD || dy > LINE_AXIS_THRESHOLD {
                    self.document.add_line(anchor, end, self.active_line_color);
                } else {
                    debug!("Discarding degenerate line gesture ({dx:.2}, {dy:.2})");
                }
                self.needs_redraw = true;
            }
            GestureSession::Drag { point, part } => {
                let coords = viewport.to_percent(x, y);
                self.apply_drag(point, part, coords);
            }
            GestureSession::Relocate { point, anchor, .. } => {
                let end = viewport.to_percent(x, y);
                if in_bounds(end.0, end.1) {
                    if let Some(p) = self.document.point_mut(point) {
                        p.x = end.0;
                        p.y = end.1;
                        if distance(anchor.0, anchor.1, end.0, end.1) > OFFSET_DRAG_THRESHOLD {
                            p.target_x = Some(anchor.0);
                            p.target_y = Some(anchor.1);
                        } else {
                            p.target_x = Some(end.0);
                            p.target_y = Some(end.1);
                        }
                    }
                }
                // Reposition is transient either way
                self.finish_reposition();
                self.needs_redraw = true;
            }
        }
    }

    fn on_pointer_cancel(&mut self) {
        if self.take_session().is_some() {
            self.needs_redraw = true;
        }
    }

    /// Applies a move-drag position to the bound anchor, clamped into bounds.
    fn apply_drag(&mut self, id: Uuid, part: DragPart, coords: (f64, f64)) {
        let (x, y) = clamp_to_bounds(coords.0, coords.1);
        if let Some(point) = self.document.point_mut(id) {
            match part {
                DragPart::Badge => {
                    point.x = x;
                    point.y = y;
                }
                DragPart::Target => {
                    point.target_x = Some(x);
                    point.target_y = Some(y);
                }
            }
            self.needs_redraw = true;
        }
    }

    fn has_image(&self) -> bool {
        let (w, h) = self.document.image_size();
        w > 0 && h > 0
    }

    /// Finds the topmost element under a percent-space position.
    ///
    /// Badges win over target dots, which win over lines; within each layer
    /// the most recently drawn (last in the collection) element wins.
    fn hit_test(&self, coords: (f64, f64)) -> Option<HitTarget> {
        let (w, h) = self.document.image_size();
        if w == 0 || h == 0 {
            return None;
        }
        let (w, h) = (w as f64, h as f64);
        let metrics = MarkerMetrics::for_image(w, self.document.marker_scale());
        let px = (coords.0 / 100.0 * w, coords.1 / 100.0 * h);

        for point in self.document.points.iter().rev() {
            let badge = (point.x / 100.0 * w, point.y / 100.0 * h);
            if distance(px.0, px.1, badge.0, badge.1) <= metrics.badge_hit_radius() {
                return Some(HitTarget::Badge(point.id));
            }
        }

        for point in self.document.points.iter().rev() {
            // The target dot only exists on screen when a leader line does
            if !point.has_leader_line() {
                continue;
            }
            let Some((tx, ty)) = point.target() else {
                continue;
            };
            let dot = (tx / 100.0 * w, ty / 100.0 * h);
            if distance(px.0, px.1, dot.0, dot.1) <= metrics.target_hit_radius() {
                return Some(HitTarget::TargetDot(point.id));
            }
        }

        for line in self.document.lines.iter().rev() {
            let d = distance_to_segment(
                px.0,
                px.1,
                line.start_x / 100.0 * w,
                line.start_y / 100.0 * h,
                line.end_x / 100.0 * w,
                line.end_y / 100.0 * h,
            );
            if d <= metrics.line_hit_radius() {
                return Some(HitTarget::Line(line.id));
            }
        }

        None
    }
}
