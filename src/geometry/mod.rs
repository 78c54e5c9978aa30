//! Drawing protocols and the geometry queries built on them

pub mod bounds;
pub mod outline_pen;
pub mod pen;
pub mod point_inside;
pub mod point_to_segment;

// Re-export commonly used items
pub use bounds::{BoundsPen, ControlBoundsPen};
pub use outline_pen::{GlyphSet, OutlinePen};
pub use pen::{Pen, PointPen, PointType};
pub use point_inside::PointInsidePen;
pub use point_to_segment::PointToSegmentPen;
