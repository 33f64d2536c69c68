//! Region rectangles in XYWH form.

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::space::{CanvasSpace, ImageSpace};

/// An axis-aligned rectangle stored as top-left corner plus size.
///
/// This is the shape the page renderer reports for each labeled element,
/// so it is kept as-is rather than converted to corner form.
///
/// Note: the constructor does NOT reject negative sizes. Malformed boxes
/// must be representable so that validation and ordering can report them
/// with context instead of failing during parsing.
#[derive(Clone, Copy, PartialEq)]
pub struct RegionBox<TSpace> {
    pub origin: Coord<TSpace>,
    pub width: f64,
    pub height: f64,
}

impl<TSpace> RegionBox<TSpace> {
    /// Creates a new box from its top-left corner and size.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Coord::new(x, y),
            width,
            height,
        }
    }

    /// Returns the left edge.
    #[inline]
    pub fn x(&self) -> f64 {
        self.origin.x
    }

    /// Returns the top edge.
    #[inline]
    pub fn y(&self) -> f64 {
        self.origin.y
    }

    /// Returns the right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.origin.x + self.width
    }

    /// Returns the bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.origin.x + self.width / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        self.origin.y + self.height / 2.0
    }

    /// Returns true if the position and size are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Returns true if either dimension is negative.
    #[inline]
    pub fn has_negative_size(&self) -> bool {
        self.width < 0.0 || self.height < 0.0
    }

    /// Returns true if the interiors of the two boxes intersect.
    ///
    /// Boxes that merely share an edge do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x() < other.right()
            && other.x() < self.right()
            && self.y() < other.bottom()
            && other.y() < self.bottom()
    }
}

impl RegionBox<ImageSpace> {
    /// Moves the box onto the output canvas by a horizontal paste offset.
    #[inline]
    pub fn to_canvas(&self, offset_x: f64) -> RegionBox<CanvasSpace> {
        RegionBox {
            origin: self.origin.to_canvas(offset_x),
            width: self.width,
            height: self.height,
        }
    }

    /// Returns true if the box lies completely inside an image of the given size.
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        self.x() >= 0.0
            && self.y() >= 0.0
            && self.right() <= f64::from(image_width)
            && self.bottom() <= f64::from(image_height)
    }
}

impl<TSpace> std::fmt::Debug for RegionBox<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionBox")
            .field("x", &self.origin.x)
            .field("y", &self.origin.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl<TSpace> Default for RegionBox<TSpace> {
    fn default() -> Self {
        Self::from_xywh(0.0, 0.0, 0.0, 0.0)
    }
}

// Custom serde implementation to avoid TSpace: Serialize/Deserialize bounds
impl<TSpace> Serialize for RegionBox<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("RegionBox", 4)?;
        state.serialize_field("x", &self.origin.x)?;
        state.serialize_field("y", &self.origin.y)?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.end()
    }
}

impl<'de, TSpace> Deserialize<'de> for RegionBox<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct BoxData {
            x: f64,
            y: f64,
            width: f64,
            height: f64,
        }
        let data = BoxData::deserialize(deserializer)?;
        Ok(RegionBox::from_xywh(data.x, data.y, data.width, data.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_edges_and_center() {
        let bbox: RegionBox<ImageSpace> = RegionBox::from_xywh(10.0, 20.0, 100.0, 60.0);
        assert_eq!(bbox.right(), 110.0);
        assert_eq!(bbox.bottom(), 80.0);
        assert_eq!(bbox.center_x(), 60.0);
        assert_eq!(bbox.center_y(), 50.0);
    }

    #[test]
    fn test_negative_size_is_representable() {
        let bbox: RegionBox<ImageSpace> = RegionBox::from_xywh(10.0, 20.0, -5.0, 60.0);
        assert!(bbox.has_negative_size());
        assert!(bbox.is_finite());
    }

    #[test]
    fn test_overlap_excludes_shared_edges() {
        let a: RegionBox<ImageSpace> = RegionBox::from_xywh(0.0, 0.0, 10.0, 10.0);
        let touching: RegionBox<ImageSpace> = RegionBox::from_xywh(10.0, 0.0, 10.0, 10.0);
        let crossing: RegionBox<ImageSpace> = RegionBox::from_xywh(5.0, 5.0, 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&crossing));
        assert!(crossing.overlaps(&a));
    }

    #[test]
    fn test_to_canvas_keeps_size() {
        let bbox: RegionBox<ImageSpace> = RegionBox::from_xywh(10.0, 20.0, 30.0, 40.0);
        let moved = bbox.to_canvas(400.0);
        assert_eq!(moved.x(), 410.0);
        assert_eq!(moved.y(), 20.0);
        assert_eq!(moved.width, 30.0);
        assert_eq!(moved.height, 40.0);
    }

    #[test]
    fn test_fits_within() {
        let bbox: RegionBox<ImageSpace> = RegionBox::from_xywh(0.0, 0.0, 640.0, 480.0);
        assert!(bbox.fits_within(640, 480));
        assert!(!bbox.fits_within(639, 480));
    }
}
