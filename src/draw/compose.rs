//! Deterministic composition of the annotation layer onto a Cairo context.
//!
//! Both the interactive surface and the export pipeline call [`compose`], so
//! exported output matches the on-screen composition exactly. The draw order
//! is fixed: background, base image, user lines, leader lines, markers.
//! User space of the context is always base-image pixels; raster export
//! pre-scales for supersampling and the PDF surface maps pixels to points.

use super::color::{self, Color, MARKER_RED, WHITE};
use super::metrics::MarkerMetrics;
use super::text;
use crate::model::{Document, MapLine, MapPoint};

/// Renders the full composition for a document.
///
/// `base` is the decoded base image as a Cairo surface; when `None` the
/// background stays plain white. A base surface whose size differs from the
/// document's recorded dimensions is scaled to cover them.
pub fn compose(ctx: &cairo::Context, doc: &Document, base: Option<&cairo::ImageSurface>) {
    let (width, height) = doc.image_size();
    let (width, height) = (width as f64, height as f64);
    let metrics = MarkerMetrics::for_image(width, doc.marker_scale());

    // Opaque white underlay defeats transparent base images
    ctx.set_source_rgba(1.0, 1.0, 1.0, 1.0);
    ctx.rectangle(0.0, 0.0, width, height);
    let _ = ctx.fill();

    if let Some(surface) = base {
        let _ = ctx.save();
        let (sw, sh) = (surface.width() as f64, surface.height() as f64);
        if sw > 0.0 && sh > 0.0 && (sw != width || sh != height) {
            ctx.scale(width / sw, height / sh);
        }
        let _ = ctx.set_source_surface(surface, 0.0, 0.0);
        let _ = ctx.paint();
        let _ = ctx.restore();
    }

    render_lines(ctx, &doc.lines, &metrics, width, height);
    render_leaders(ctx, &doc.points, &metrics, width, height);
    render_markers(ctx, &doc.points, &metrics, width, height);
}

/// Renders all user-drawn lines (draw-order layer 2).
pub fn render_lines(
    ctx: &cairo::Context,
    lines: &[MapLine],
    metrics: &MarkerMetrics,
    width: f64,
    height: f64,
) {
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_width(metrics.line_width);

    for line in lines {
        let color = line.color.color().with_alpha(0.8);
        ctx.set_source_rgba(color.r, color.g, color.b, color.a);
        ctx.move_to(px(line.start_x, width), px(line.start_y, height));
        ctx.line_to(px(line.end_x, width), px(line.end_y, height));
        let _ = ctx.stroke();
    }
}

/// Renders leader lines and target dots (layer 3, beneath the markers).
pub fn render_leaders(
    ctx: &cairo::Context,
    points: &[MapPoint],
    metrics: &MarkerMetrics,
    width: f64,
    height: f64,
) {
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_width(metrics.leader_width);

    for point in points {
        if !point.has_leader_line() {
            continue;
        }
        let Some((target_x, target_y)) = point.target() else {
            continue;
        };

        let (tx, ty) = (px(target_x, width), px(target_y, height));
        let (bx, by) = (px(point.x, width), px(point.y, height));

        ctx.set_source_rgba(MARKER_RED.r, MARKER_RED.g, MARKER_RED.b, MARKER_RED.a);
        ctx.move_to(tx, ty);
        ctx.line_to(bx, by);
        let _ = ctx.stroke();

        ctx.arc(tx, ty, metrics.target_radius, 0.0, std::f64::consts::TAU);
        let _ = ctx.fill();
    }
}

/// Renders the point markers (topmost layer).
///
/// Each marker is a red capsule badge centered on the badge position showing
/// the sorted typology text, plus a white appendix label offset up-and-right
/// carrying the sequence number.
pub fn render_markers(
    ctx: &cairo::Context,
    points: &[MapPoint],
    metrics: &MarkerMetrics,
    width: f64,
    height: f64,
) {
    for point in points {
        let (x, y) = (px(point.x, width), px(point.y, height));
        render_badge(ctx, metrics, x, y, &point.display_typology());
        render_appendix(ctx, metrics, x, y, &point.number.to_string());
    }
}

fn render_badge(ctx: &cairo::Context, metrics: &MarkerMetrics, x: f64, y: f64, label: &str) {
    let layout = text::bold_layout(ctx, label, metrics.badge_font);
    let (text_width, _) = text::layout_size(&layout);

    let pill_height = metrics.badge_height;
    let padding = metrics.badge_font * 0.4;
    let pill_width = pill_height.max(text_width + padding * 2.0);

    capsule_path(ctx, x - pill_width / 2.0, y - pill_height / 2.0, pill_width, pill_height);
    ctx.set_source_rgba(MARKER_RED.r, MARKER_RED.g, MARKER_RED.b, MARKER_RED.a);
    let _ = ctx.fill_preserve();
    ctx.set_source_rgba(WHITE.r, WHITE.g, WHITE.b, WHITE.a);
    ctx.set_line_width(metrics.badge_border);
    let _ = ctx.stroke();

    text::show_centered(ctx, &layout, x, y, WHITE);
}

fn render_appendix(ctx: &cairo::Context, metrics: &MarkerMetrics, x: f64, y: f64, number: &str) {
    let layout = text::bold_layout(ctx, number, metrics.appendix_font);
    let (text_width, _) = text::layout_size(&layout);

    let radius = metrics.badge_height / 2.0;
    let padding = metrics.appendix_font * 0.4;
    let rect_height = metrics.appendix_font * 1.5;
    let rect_width = rect_height.max(text_width + padding * 2.0);
    let rect_x = x + radius * 0.7;
    let rect_y = y - radius * 1.3;

    rounded_rect_path(ctx, rect_x, rect_y, rect_width, rect_height, rect_height * 0.2);
    ctx.set_source_rgba(WHITE.r, WHITE.g, WHITE.b, WHITE.a);
    let _ = ctx.fill_preserve();
    ctx.set_source_rgba(MARKER_RED.r, MARKER_RED.g, MARKER_RED.b, MARKER_RED.a);
    ctx.set_line_width(metrics.appendix_border);
    let _ = ctx.stroke();

    text::show_centered(
        ctx,
        &layout,
        rect_x + rect_width / 2.0,
        rect_y + rect_height / 2.0,
        MARKER_RED,
    );
}

/// Renders the in-progress creation/reposition preview: a dashed leader from
/// the anchor to the current pointer plus the anchor dot.
///
/// Interactive hosts draw this above [`compose`]; exports never do.
pub fn render_creation_preview(
    ctx: &cairo::Context,
    metrics: &MarkerMetrics,
    anchor: (f64, f64),
    current: (f64, f64),
    width: f64,
    height: f64,
) {
    let (ax, ay) = (px(anchor.0, width), px(anchor.1, height));
    let (cx, cy) = (px(current.0, width), px(current.1, height));

    let _ = ctx.save();
    ctx.set_source_rgba(MARKER_RED.r, MARKER_RED.g, MARKER_RED.b, MARKER_RED.a);
    ctx.set_line_width(metrics.leader_width);
    ctx.set_dash(&[metrics.base * 0.25, metrics.base * 0.25], 0.0);
    ctx.move_to(ax, ay);
    ctx.line_to(cx, cy);
    let _ = ctx.stroke();
    let _ = ctx.restore();

    ctx.arc(ax, ay, metrics.target_radius, 0.0, std::f64::consts::TAU);
    ctx.set_source_rgba(MARKER_RED.r, MARKER_RED.g, MARKER_RED.b, MARKER_RED.a);
    let _ = ctx.fill();
}

/// Renders the in-progress line preview in the active palette color.
pub fn render_line_preview(
    ctx: &cairo::Context,
    metrics: &MarkerMetrics,
    anchor: (f64, f64),
    current: (f64, f64),
    color: Color,
    width: f64,
    height: f64,
) {
    let faded = color.with_alpha(0.8);
    ctx.set_source_rgba(faded.r, faded.g, faded.b, faded.a);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_width(metrics.line_width);
    ctx.move_to(px(anchor.0, width), px(anchor.1, height));
    ctx.line_to(px(current.0, width), px(current.1, height));
    let _ = ctx.stroke();
}

/// Strokes a 1px-equivalent neutral border, used by the report renderer.
pub fn stroke_rect(ctx: &cairo::Context, x: f64, y: f64, w: f64, h: f64, line_width: f64) {
    ctx.set_source_rgba(
        color::BORDER_GRAY.r,
        color::BORDER_GRAY.g,
        color::BORDER_GRAY.b,
        color::BORDER_GRAY.a,
    );
    ctx.set_line_width(line_width);
    ctx.rectangle(x, y, w, h);
    let _ = ctx.stroke();
}

fn px(percent: f64, dimension: f64) -> f64 {
    percent / 100.0 * dimension
}

fn capsule_path(ctx: &cairo::Context, x: f64, y: f64, w: f64, h: f64) {
    rounded_rect_path(ctx, x, y, w, h, h / 2.0);
}

fn rounded_rect_path(ctx: &cairo::Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.new_sub_path();
    ctx.arc(x + w - r, y + r, r, -std::f64::consts::FRAC_PI_2, 0.0);
    ctx.arc(x + w - r, y + h - r, r, 0.0, std::f64::consts::FRAC_PI_2);
    ctx.arc(x + r, y + h - r, r, std::f64::consts::FRAC_PI_2, std::f64::consts::PI);
    ctx.arc(x + r, y + r, r, std::f64::consts::PI, 1.5 * std::f64::consts::PI);
    ctx.close_path();
}
