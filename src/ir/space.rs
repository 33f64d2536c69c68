//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! the captured screenshot's pixel space from the expanded output canvas.

use std::fmt;

/// Marker type for coordinates in the base image (the captured screenshot).
///
/// Region boxes arrive in this space and are never mutated.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSpace {}

/// Marker type for coordinates on the output canvas.
///
/// The canvas is the base image plus margin strip(s); a point moves from
/// image space to canvas space by adding the paste offset to its x value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasSpace {}

impl fmt::Debug for ImageSpace {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for CanvasSpace {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
