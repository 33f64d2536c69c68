//! Canvas compositing.
//!
//! The compositor takes a [`LayoutPlan`] and rasterises it: a white canvas
//! widened by the margins, the base image's color channels pasted at the
//! plan's offset, shapes stroked with tiny-skia, then label text drawn
//! through the injected [`GlyphProvider`]. Text goes last so it always sits on top of
//! its label box.

pub mod arrow;
pub mod glyph;

use std::io::{Seek, Write};
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tiny_skia::Pixmap;

use crate::config::{AnnotateConfig, Color};
use crate::error::WiremarkError;
use crate::ir::{order_regions, Region};
use crate::layout::{plan_layout, LayoutPlan};
use crate::report::{build_rows, ReportRow};

use self::glyph::GlyphProvider;

/// The output of one annotation run.
#[derive(Debug)]
pub struct Annotation {
    /// The composed canvas.
    pub image: RgbaImage,
    /// The plan the canvas was drawn from.
    pub plan: LayoutPlan,
    /// Report rows in rank order, sharing the image's identifiers.
    pub rows: Vec<ReportRow>,
}

/// Annotates `base` with every region.
///
/// Regions are ordered and assigned identifiers exactly once; the same
/// mapping feeds the labels and the report rows.
///
/// # Errors
/// Fails on an invalid region or configuration, or if the canvas cannot be
/// allocated. Nothing is returned on failure.
pub fn annotate(
    base: &DynamicImage,
    regions: Vec<Region>,
    config: &AnnotateConfig,
    glyphs: &dyn GlyphProvider,
) -> Result<Annotation, WiremarkError> {
    config.validate()?;
    let ordered = order_regions(regions)?;
    let identifiers = config.identifier_alphabet.assign(&ordered);

    let plan = plan_layout(
        &ordered,
        &identifiers,
        (base.width(), base.height()),
        config,
        glyphs,
    )?;
    let image = compose(base, &plan, glyphs, config.font_size)?;
    let rows = build_rows(&ordered, &identifiers);

    tracing::info!(
        regions = rows.len(),
        width = image.width(),
        height = image.height(),
        exhausted = plan.exhausted_count(),
        "annotation composed"
    );

    Ok(Annotation { image, plan, rows })
}

/// Rasterises a plan over `base`.
///
/// # Errors
/// Returns [`WiremarkError::CanvasAllocation`] if the canvas is too large
/// for the rasteriser.
pub fn compose(
    base: &DynamicImage,
    plan: &LayoutPlan,
    glyphs: &dyn GlyphProvider,
    font_size: f32,
) -> Result<RgbaImage, WiremarkError> {
    let (width, height) = (plan.canvas_width, plan.canvas_height);
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba(Color::WHITE.to_rgba()));
    // Pixels are copied, not blended; the alpha channel is dropped.
    let opaque = DynamicImage::ImageRgb8(base.to_rgb8()).to_rgba8();
    image::imageops::replace(&mut canvas, &opaque, i64::from(plan.paste_offset), 0);

    if width == 0 || height == 0 {
        return Ok(canvas);
    }

    let alloc_err = || WiremarkError::CanvasAllocation { width, height };

    // The canvas is opaque, so premultiplied and straight alpha agree.
    let mut pixmap = Pixmap::new(width, height).ok_or_else(alloc_err)?;
    pixmap.data_mut().copy_from_slice(canvas.as_raw());

    for placement in &plan.placements {
        arrow::draw_label_box(&mut pixmap, &placement.label_box, placement.color);
        arrow::draw_connector(&mut pixmap, &placement.connector, placement.color);
        arrow::draw_frame(&mut pixmap, &placement.frame, placement.color);
    }

    let mut canvas = RgbaImage::from_raw(width, height, pixmap.take()).ok_or_else(alloc_err)?;

    for placement in &plan.placements {
        glyphs.draw_text(
            &mut canvas,
            Rgba(placement.color.to_rgba()),
            placement.label_box.x() as i32,
            placement.label_box.y() as i32,
            font_size,
            &placement.text,
        );
    }

    Ok(canvas)
}

/// Decodes the base image.
pub fn load_image(path: &Path) -> Result<DynamicImage, WiremarkError> {
    image::open(path).map_err(|source| WiremarkError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Encodes the composed canvas as PNG; `path` only names the target in
/// errors.
pub fn encode_png<W: Write + Seek>(
    writer: &mut W,
    image: &RgbaImage,
    path: &Path,
) -> Result<(), WiremarkError> {
    image
        .write_to(writer, ImageFormat::Png)
        .map_err(|source| WiremarkError::ImageEncode {
            path: path.to_path_buf(),
            source,
        })
}
