//! Paginated vector report export.
//!
//! Produces one PDF with a diagram page sized to the base image's own aspect
//! ratio carrying the identical composition as vector primitives, followed by
//! A4 report pages listing every point in number order, four quadrant cells
//! per page. The document is written to a temporary sibling path and renamed
//! into place only on success, so a failed export never leaves a partial
//! artifact.

use super::error::ExportError;
use super::photo;
use crate::draw::color::BORDER_GRAY;
use crate::draw::{self, text};
use crate::model::{Document, MapPoint};
use std::fs;
use std::path::{Path, PathBuf};

/// A4 portrait page size in PDF points.
const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;

/// Report cells per page (2 × 2 quadrants).
const CELLS_PER_PAGE: usize = 4;

/// Photos rendered per report cell.
const PHOTOS_PER_CELL: usize = 2;

const HEADER_HEIGHT: f64 = 25.0;
const CELL_PADDING: f64 = 10.0;
const DESCRIPTION_HEIGHT: f64 = 60.0;

/// Renders and atomically writes the PDF report.
pub fn export_pdf(doc: &Document, base_image: &[u8], path: &Path) -> Result<(), ExportError> {
    let decoded = photo::decode_image(base_image).map_err(ExportError::Decode)?;
    let (width, height) = (decoded.width(), decoded.height());

    let mut doc = doc.clone();
    doc.set_image_size(width, height);
    let base_surface = photo::to_surface(&decoded)?;

    let tmp = temp_path(path);
    match write_document(&doc, &base_surface, &tmp) {
        Ok(page_count) => {
            fs::rename(&tmp, path)?;
            log::info!(
                "Exported PDF report ({} pages) to {}",
                page_count,
                path.display()
            );
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            Err(err)
        }
    }
}

fn temp_path(target: &Path) -> PathBuf {
    target.with_extension("pdf.tmp")
}

fn write_document(
    doc: &Document,
    base_surface: &cairo::ImageSurface,
    path: &Path,
) -> Result<usize, ExportError> {
    let (width, height) = doc.image_size();
    let (width, height) = (width as f64, height as f64);

    // Diagram page: 1 image pixel = 1 PDF point, orientation follows aspect
    let surface = cairo::PdfSurface::new(width, height, path)?;
    let ctx = cairo::Context::new(&surface)?;
    draw::compose(&ctx, doc, Some(base_surface));
    ctx.show_page()?;

    surface.set_size(PAGE_WIDTH, PAGE_HEIGHT)?;
    let report_pages = render_report_pages(&ctx, doc)?;

    surface.finish();
    Ok(1 + report_pages)
}

fn render_report_pages(ctx: &cairo::Context, doc: &Document) -> Result<usize, ExportError> {
    let sorted = doc.points_by_number();
    if sorted.is_empty() {
        return Ok(0);
    }

    let mut pages = 0;
    for chunk in sorted.chunks(CELLS_PER_PAGE) {
        for (slot, point) in chunk.iter().enumerate() {
            let column = slot % 2;
            let row = slot / 2;
            render_cell(ctx, point, column as f64, row as f64)?;
        }
        ctx.show_page()?;
        pages += 1;
    }
    Ok(pages)
}

fn render_cell(ctx: &cairo::Context, point: &MapPoint, column: f64, row: f64) -> Result<(), ExportError> {
    let quad_width = PAGE_WIDTH / 2.0;
    let quad_height = PAGE_HEIGHT / 2.0;
    let x_base = column * quad_width;
    let y_base = row * quad_height;

    // Cell border
    draw::compose::stroke_rect(ctx, x_base, y_base, quad_width, quad_height, 1.0);

    // Header band with title
    ctx.set_source_rgba(240.0 / 255.0, 240.0 / 255.0, 240.0 / 255.0, 1.0);
    ctx.rectangle(x_base, y_base, quad_width, HEADER_HEIGHT);
    let _ = ctx.fill();

    ctx.set_source_rgba(BORDER_GRAY.r, BORDER_GRAY.g, BORDER_GRAY.b, BORDER_GRAY.a);
    ctx.set_line_width(1.0);
    ctx.move_to(x_base, y_base + HEADER_HEIGHT);
    ctx.line_to(x_base + quad_width, y_base + HEADER_HEIGHT);
    let _ = ctx.stroke();

    let typology = point.display_typology();
    let title = if typology == "-" {
        format!("Punto N. {}", point.number)
    } else {
        format!("Punto N. {} (Tip. {})", point.number, typology)
    };
    let title_layout = text::bold_layout(ctx, &title, 12.0);
    let (_, title_height) = text::layout_size(&title_layout);
    text::show_at(
        ctx,
        &title_layout,
        x_base + CELL_PADDING,
        y_base + (HEADER_HEIGHT - title_height) / 2.0,
        crate::draw::color::BLACK,
    );

    // Content layout: photos on top, description at the bottom
    let content_y = y_base + HEADER_HEIGHT + CELL_PADDING;
    let content_width = quad_width - CELL_PADDING * 2.0;
    let content_height = quad_height - HEADER_HEIGHT - CELL_PADDING * 2.0;
    let image_area_height = content_height - DESCRIPTION_HEIGHT - 10.0;

    if point.images.is_empty() {
        render_photo_placeholder(
            ctx,
            x_base + quad_width / 2.0,
            content_y + image_area_height / 2.0,
        );
    } else {
        render_photos(ctx, point, x_base, content_y, content_width, image_area_height)?;
    }

    // Description, word-wrapped
    let description_y = content_y + image_area_height + 10.0;
    ctx.set_source_rgba(240.0 / 255.0, 240.0 / 255.0, 240.0 / 255.0, 1.0);
    ctx.set_line_width(1.0);
    ctx.move_to(x_base + CELL_PADDING, description_y - 5.0);
    ctx.line_to(x_base + quad_width - CELL_PADDING, description_y - 5.0);
    let _ = ctx.stroke();

    let description = if point.description.trim().is_empty() {
        "-"
    } else {
        point.description.as_str()
    };
    let body = text::wrapped_layout(ctx, description, 10.0, content_width);
    text::show_at(
        ctx,
        &body,
        x_base + CELL_PADDING,
        description_y + 5.0,
        crate::draw::Color::new(0.2, 0.2, 0.2, 1.0),
    );

    Ok(())
}

fn render_photos(
    ctx: &cairo::Context,
    point: &MapPoint,
    x_base: f64,
    content_y: f64,
    content_width: f64,
    image_area_height: f64,
) -> Result<(), ExportError> {
    let shown = &point.images[..point.images.len().min(PHOTOS_PER_CELL)];
    let gap = 5.0;
    let slot_width = if shown.len() == 1 {
        content_width
    } else {
        (content_width - gap) / 2.0
    };

    for (index, payload) in shown.iter().enumerate() {
        let decoded = match photo::decode_image(payload.as_bytes()) {
            Ok(decoded) => decoded,
            Err(err) => {
                log::warn!(
                    "Skipping undecodable photo {} of point {}: {}",
                    index + 1,
                    point.number,
                    err
                );
                continue;
            }
        };
        let surface = photo::to_surface(&decoded)?;
        let (photo_width, photo_height) = (decoded.width() as f64, decoded.height() as f64);

        // "Contain" fit, centered inside the slot
        let scale = (slot_width / photo_width).min(image_area_height / photo_height);
        let draw_width = photo_width * scale;
        let draw_height = photo_height * scale;

        let slot_x = x_base + CELL_PADDING + index as f64 * (slot_width + gap);
        let final_x = slot_x + (slot_width - draw_width) / 2.0;
        let final_y = content_y + (image_area_height - draw_height) / 2.0;

        let _ = ctx.save();
        ctx.translate(final_x, final_y);
        ctx.scale(scale, scale);
        let _ = ctx.set_source_surface(&surface, 0.0, 0.0);
        let _ = ctx.paint();
        let _ = ctx.restore();

        // Subtle frame around the photo
        ctx.set_source_rgba(220.0 / 255.0, 220.0 / 255.0, 220.0 / 255.0, 1.0);
        ctx.set_line_width(1.0);
        ctx.rectangle(final_x, final_y, draw_width, draw_height);
        let _ = ctx.stroke();
    }
    Ok(())
}

fn render_photo_placeholder(ctx: &cairo::Context, center_x: f64, center_y: f64) {
    let layout = pangocairo::functions::create_layout(ctx);
    let mut desc = pango::FontDescription::new();
    desc.set_family("Sans");
    desc.set_style(pango::Style::Italic);
    desc.set_absolute_size(10.0 * pango::SCALE as f64);
    layout.set_font_description(Some(&desc));
    layout.set_text("Nessuna foto allegata");

    let (width, height) = text::layout_size(&layout);
    ctx.set_source_rgba(150.0 / 255.0, 150.0 / 255.0, 150.0 / 255.0, 1.0);
    ctx.move_to(center_x - width / 2.0, center_y - height / 2.0);
    pangocairo::functions::show_layout(ctx, &layout);
}
