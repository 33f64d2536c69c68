//! Typed coordinate values using PhantomData for compile-time safety.

use serde::Serialize;
use std::marker::PhantomData;

use super::space::{CanvasSpace, ImageSpace};

/// A 2D point with a type-level marker for the coordinate space.
///
/// The `TSpace` parameter is either [`ImageSpace`] or [`CanvasSpace`], so a
/// point that has not been shifted by the paste offset cannot be handed to
/// code that draws on the canvas.
#[derive(Clone, Copy, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    /// Creates a new coordinate with the given x and y values.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Coord<ImageSpace> {
    /// Moves the point onto the canvas by a horizontal paste offset.
    #[inline]
    pub fn to_canvas(self, offset_x: f64) -> Coord<CanvasSpace> {
        Coord::new(self.x + offset_x, self.y)
    }
}

impl<TSpace> std::fmt::Debug for Coord<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coord")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<TSpace> Default for Coord<TSpace> {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

// Custom serde implementation to avoid a TSpace: Serialize bound
impl<TSpace> Serialize for Coord<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Coord", 2)?;
        state.serialize_field("x", &self.x)?;
        state.serialize_field("y", &self.y)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_is_finite() {
        let finite: Coord<ImageSpace> = Coord::new(10.0, 20.0);
        assert!(finite.is_finite());

        let nan: Coord<ImageSpace> = Coord::new(f64::NAN, 20.0);
        assert!(!nan.is_finite());

        let inf: Coord<ImageSpace> = Coord::new(10.0, f64::INFINITY);
        assert!(!inf.is_finite());
    }

    #[test]
    fn test_to_canvas_shifts_only_x() {
        let point: Coord<ImageSpace> = Coord::new(10.0, 20.0);
        let moved = point.to_canvas(400.0);
        assert_eq!(moved.x, 410.0);
        assert_eq!(moved.y, 20.0);
    }
}
