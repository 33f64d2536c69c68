//! Label slot allocation.
//!
//! Labels are packed greedily in rank order, independently per side: each
//! label starts just above its region's vertical centre and is pushed down
//! past any label already committed on the same side. First come, first
//! served; no label is ever moved once committed.

use crate::config::{AnnotateConfig, Mode};
use crate::ir::{ImageSpace, RegionBox};

use super::{LabelSlot, Side};

/// Horizontal gap between a margin's inner edge and its labels.
pub const LABEL_GAP: f64 = 20.0;

/// How far above the region's centre a label is first tried.
pub const TARGET_LIFT: f64 = 12.0;

/// No label is placed above this y.
pub const MIN_LABEL_Y: f64 = 10.0;

/// Assigns sides and vertical positions to labels for one render.
///
/// Owns the committed positions for each side; create a fresh allocator
/// per render.
#[derive(Clone, Debug)]
pub struct SlotAllocator {
    mode: Mode,
    base_width: f64,
    paste_offset: f64,
    label_height: f64,
    max_attempts: u32,
    left: Vec<f64>,
    right: Vec<f64>,
}

impl SlotAllocator {
    pub fn new(config: &AnnotateConfig, base_width: u32) -> Self {
        Self {
            mode: config.mode,
            base_width: f64::from(base_width),
            paste_offset: f64::from(config.mode.paste_offset(config.margin_width)),
            label_height: config.label_height,
            max_attempts: config.max_deconflict_attempts,
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Chooses the margin for a region.
    ///
    /// In bilateral mode a region whose horizontal centre is strictly left
    /// of the base image's midpoint goes left; a centre exactly on the
    /// midpoint goes right.
    pub fn side_for(&self, bbox: &RegionBox<ImageSpace>) -> Side {
        match self.mode {
            Mode::Single => Side::Single,
            Mode::Bilateral => {
                if bbox.center_x() < self.base_width / 2.0 {
                    Side::Left
                } else {
                    Side::Right
                }
            }
        }
    }

    /// Places the label for the next region in rank order and commits it.
    pub fn place(&mut self, bbox: &RegionBox<ImageSpace>) -> LabelSlot {
        let side = self.side_for(bbox);
        let target = (bbox.center_y() - TARGET_LIFT).max(MIN_LABEL_Y);
        let label_height = self.label_height;
        let max_attempts = self.max_attempts;

        let lane = match side {
            Side::Left => &mut self.left,
            Side::Right | Side::Single => &mut self.right,
        };
        let (y, exhausted) = settle(lane, target, label_height, max_attempts);
        lane.push(y);

        let x = match side {
            Side::Left => LABEL_GAP,
            Side::Right | Side::Single => self.base_width + self.paste_offset + LABEL_GAP,
        };

        if exhausted {
            tracing::warn!(
                ?side,
                y,
                attempts = max_attempts,
                "label slot search exhausted; label may overlap a neighbour"
            );
        }

        LabelSlot {
            side,
            x,
            y,
            exhausted,
        }
    }
}

/// Returns the first committed position within `label_height` of `y`.
fn first_collision(committed: &[f64], y: f64, label_height: f64) -> Option<f64> {
    committed
        .iter()
        .copied()
        .find(|pos| (y - pos).abs() < label_height)
}

/// Pushes `target` downward until it clears every committed position.
///
/// Each attempt checks the committed positions in commit order and jumps
/// to just below the first one that collides. Returns the final position
/// and whether it still collides after `max_attempts` jumps.
fn settle(committed: &[f64], target: f64, label_height: f64, max_attempts: u32) -> (f64, bool) {
    let mut candidate = target;
    for _ in 0..max_attempts {
        match first_collision(committed, candidate, label_height) {
            Some(pos) => candidate = pos + label_height,
            None => return (candidate, false),
        }
    }
    let exhausted = first_collision(committed, candidate, label_height).is_some();
    (candidate, exhausted)
}
