//! Label layout: where each label, arrow and frame goes.
//!
//! Planning is separate from rasterising so a layout can be inspected (or
//! compared between runs) without drawing anything. The plan depends on
//! the ordered regions, their identifiers, the base image size, the
//! configuration and the glyph metrics used to size label text.

mod slots;

pub use slots::{SlotAllocator, LABEL_GAP, MIN_LABEL_Y, TARGET_LIFT};

use serde::Serialize;

use crate::config::{AnnotateConfig, Color, Mode};
use crate::error::WiremarkError;
use crate::ir::{CanvasSpace, Coord, Identifier, IdentifierMap, OrderedRegion, RegionBox};
use crate::render::arrow::Connector;
use crate::render::glyph::GlyphProvider;

/// Gap between a label (or region edge) and the connector's end points.
pub const ARROW_CLEARANCE: f64 = 5.0;

/// Vertical offset from a label's top to where its connector starts.
pub const ARROW_ANCHOR_DY: f64 = 12.0;

/// Marker appended to shortened labels.
pub const ELLIPSIS: char = '…';

/// The margin a label is placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The only margin in single mode (right of the image).
    Single,
    Left,
    Right,
}

/// The chosen position for one label.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LabelSlot {
    pub side: Side,
    pub x: f64,
    pub y: f64,
    /// The de-collision cap was reached and the label may overlap another.
    pub exhausted: bool,
}

/// Everything needed to draw one region's annotation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub rank: usize,
    pub identifier: Identifier,
    pub color: Color,
    pub slot: LabelSlot,
    /// The text drawn in the label, possibly shortened.
    pub text: String,
    /// The label's background box.
    pub label_box: RegionBox<CanvasSpace>,
    pub connector: Connector,
    /// The region outline, moved onto the canvas.
    pub frame: RegionBox<CanvasSpace>,
}

/// The full layout for one render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub mode: Mode,
    pub base_width: u32,
    pub base_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// x at which the base image is pasted.
    pub paste_offset: u32,
    pub placements: Vec<Placement>,
}

impl LayoutPlan {
    /// Number of labels whose slot search hit the attempt cap.
    pub fn exhausted_count(&self) -> usize {
        self.placements.iter().filter(|p| p.slot.exhausted).count()
    }
}

/// Builds the label text: identifier, colon, label.
///
/// Labels longer than `max_chars` characters keep their first `max_chars`
/// characters followed by [`ELLIPSIS`].
pub fn label_text(identifier: &Identifier, label: &str, max_chars: usize) -> String {
    if label.chars().count() > max_chars {
        let short: String = label.chars().take(max_chars).collect();
        format!("{}: {}{}", identifier, short, ELLIPSIS)
    } else {
        format!("{}: {}", identifier, label)
    }
}

/// Plans every label, connector and frame, in rank order.
///
/// # Errors
/// Returns [`WiremarkError::CanvasAllocation`] if the canvas width
/// overflows.
pub fn plan_layout(
    regions: &[OrderedRegion],
    identifiers: &IdentifierMap,
    base_size: (u32, u32),
    config: &AnnotateConfig,
    glyphs: &dyn GlyphProvider,
) -> Result<LayoutPlan, WiremarkError> {
    let (base_width, base_height) = base_size;
    let canvas_width = config
        .mode
        .canvas_width(base_width, config.margin_width)
        .ok_or(WiremarkError::CanvasAllocation {
            width: u32::MAX,
            height: base_height,
        })?;
    let paste_offset = config.mode.paste_offset(config.margin_width);
    let offset = f64::from(paste_offset);

    let mut slots = SlotAllocator::new(config, base_width);
    let mut placements = Vec::with_capacity(regions.len());

    for region in regions {
        let identifier = identifiers
            .get(region.rank)
            .cloned()
            .unwrap_or_else(|| config.identifier_alphabet.token(region.rank));
        let slot = slots.place(&region.bbox);
        let text = label_text(&identifier, &region.label, config.label_truncate_length);
        let (text_w, text_h) = glyphs.text_size(&text, config.font_size);
        let (text_w, text_h) = (f64::from(text_w), f64::from(text_h));

        let frame = region.bbox.to_canvas(offset);
        let anchor_y = slot.y + ARROW_ANCHOR_DY;
        let connector = match slot.side {
            Side::Left => Connector::new(
                Coord::new(slot.x + text_w + ARROW_CLEARANCE, anchor_y),
                Coord::new(frame.x() - ARROW_CLEARANCE, frame.center_y()),
            ),
            Side::Right | Side::Single => Connector::new(
                Coord::new(slot.x - ARROW_CLEARANCE, anchor_y),
                Coord::new(frame.right() + ARROW_CLEARANCE, frame.center_y()),
            ),
        };

        tracing::debug!(
            rank = region.rank,
            identifier = %identifier,
            side = ?slot.side,
            y = slot.y,
            "placed label"
        );

        placements.push(Placement {
            rank: region.rank,
            color: config.palette.color_for(region.rank),
            label_box: RegionBox::from_xywh(slot.x, slot.y, text_w, text_h),
            identifier,
            slot,
            text,
            connector,
            frame,
        });
    }

    Ok(LayoutPlan {
        mode: config.mode,
        base_width,
        base_height,
        canvas_width,
        canvas_height: base_height,
        paste_offset,
        placements,
    })
}

/// Fuzz-only entrypoint: parse a region list and plan it on a fixed canvas.
#[cfg(feature = "fuzzing")]
pub fn fuzz_plan_regions(bytes: &[u8]) -> Result<(), WiremarkError> {
    let regions = crate::ir::io_json::from_regions_slice(bytes).map_err(|source| {
        WiremarkError::RegionJsonParse {
            path: std::path::PathBuf::from("<fuzz>"),
            source,
        }
    })?;
    let config = AnnotateConfig::default();
    let ordered = crate::ir::order_regions(regions)?;
    let identifiers = config.identifier_alphabet.assign(&ordered);
    let _ = plan_layout(
        &ordered,
        &identifiers,
        (1280, 2000),
        &config,
        &crate::render::glyph::BitmapGlyphs,
    )?;
    Ok(())
}
