//! Pango text helpers shared by the live view and both exporters.
//!
//! Every surface measures and rasterizes text through the same layouts so
//! badge pills get identical widths on screen, in the JPEG export, and in the
//! PDF vector pages.

use super::color::Color;

/// Creates a bold sans layout at an absolute pixel size.
///
/// Sizes are given in user-space pixels of the drawing context, which for
/// this renderer is always base-image pixels.
pub fn bold_layout(ctx: &cairo::Context, text: &str, size_px: f64) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(ctx);
    let mut desc = pango::FontDescription::new();
    desc.set_family("Sans");
    desc.set_weight(pango::Weight::Bold);
    desc.set_absolute_size(size_px * pango::SCALE as f64);
    layout.set_font_description(Some(&desc));
    layout.set_text(text);
    layout
}

/// Creates a regular-weight layout that word-wraps at the given width.
pub fn wrapped_layout(
    ctx: &cairo::Context,
    text: &str,
    size_px: f64,
    wrap_width_px: f64,
) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(ctx);
    let mut desc = pango::FontDescription::new();
    desc.set_family("Sans");
    desc.set_absolute_size(size_px * pango::SCALE as f64);
    layout.set_font_description(Some(&desc));
    layout.set_width((wrap_width_px * pango::SCALE as f64) as i32);
    layout.set_wrap(pango::WrapMode::WordChar);
    layout.set_text(text);
    layout
}

/// Logical layout extent in user-space pixels.
pub fn layout_size(layout: &pango::Layout) -> (f64, f64) {
    let (width, height) = layout.size();
    let scale = pango::SCALE as f64;
    (width as f64 / scale, height as f64 / scale)
}

/// Fills a layout centered on `(cx, cy)`.
pub fn show_centered(ctx: &cairo::Context, layout: &pango::Layout, cx: f64, cy: f64, color: Color) {
    let (width, height) = layout_size(layout);
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.move_to(cx - width / 2.0, cy - height / 2.0);
    pangocairo::functions::show_layout(ctx, layout);
}

/// Fills a layout with its top-left corner at `(x, y)`.
pub fn show_at(ctx: &cairo::Context, layout: &pango::Layout, x: f64, y: f64, color: Color) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.move_to(x, y);
    pangocairo::functions::show_layout(ctx, layout);
}
