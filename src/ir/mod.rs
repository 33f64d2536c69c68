//! Region model for wiremark.
//!
//! This module defines the labeled rectangles captured from a rendered page,
//! their canonical top-to-bottom ordering, and the identifiers bound to that
//! ordering.
//!
//! # Design Principles
//!
//! 1. **Type Safety**: Marker types keep base-image coordinates apart from
//!    output-canvas coordinates, so the margin offset is applied exactly once.
//!
//! 2. **Single Ordering**: Ranks are computed once by a stable sort on the
//!    top edge and reused for identifiers, colors, drawing and report rows.
//!
//! 3. **Permissive Construction**: Malformed boxes (negative sizes, NaN) can
//!    be represented, so validation can report them and ordering can reject
//!    them with context.
//!
//! # Example
//!
//! ```
//! use wiremark::ir::{order_regions, IdentifierAlphabet, Region, RegionBox};
//!
//! let ordered = order_regions(vec![
//!     Region::new("Footer", RegionBox::from_xywh(0.0, 900.0, 640.0, 80.0)),
//!     Region::new("Title", RegionBox::from_xywh(40.0, 20.0, 300.0, 48.0)),
//! ])
//! .unwrap();
//! let ids = IdentifierAlphabet::default().assign(&ordered);
//! assert_eq!(ordered[0].label, "Title");
//! assert_eq!(ids.get(0).unwrap().as_str(), "①");
//! ```

mod bbox;
mod coord;
mod ids;
pub mod io_json;
mod model;
mod space;

// Re-export core types for convenient access
pub use bbox::RegionBox;
pub use coord::Coord;
pub use ids::{
    Identifier, IdentifierAlphabet, IdentifierMap, CIRCLED_NUMERALS, OVERFLOW_PLACEHOLDER,
};
pub use model::{order_regions, CharLimit, OrderedRegion, Region};
pub use space::{CanvasSpace, ImageSpace};
