//! Drawing visitor protocols
//!
//! [`Pen`] receives segments, [`PointPen`] receives raw points. Both receive
//! components by base glyph name and transform, leaving it to the pen to
//! resolve (or ignore) the reference.

use crate::objects::identifiable::Identifier;
use crate::objects::GlyphName;
use kurbo::{Affine, Point};

/// Point type as stored in UFO contours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointType {
    /// First point of an open contour
    Move,
    Line,
    /// Control point
    OffCurve,
    /// Ends a cubic curve
    Curve,
    /// Ends a quadratic spline
    QCurve,
}

impl PointType {
    pub fn is_on_curve(self) -> bool {
        self != PointType::OffCurve
    }
}

/// Segment-level drawing visitor
pub trait Pen {
    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    fn quad_to(&mut self, control: Point, end: Point);

    fn curve_to(&mut self, control1: Point, control2: Point, end: Point);

    /// Close the current contour
    fn close_path(&mut self);

    /// End the current contour without closing it
    fn end_path(&mut self);

    fn add_component(&mut self, base_glyph: Option<&GlyphName>, transform: Affine);
}

/// Point-level drawing visitor.
///
/// Identifier support for components is an optional capability: pens that
/// accept identifiers return `true` from [`PointPen::supports_identifiers`]
/// and implement [`PointPen::add_component_with_identifier`].
pub trait PointPen {
    fn begin_path(&mut self, identifier: Option<&Identifier>);

    fn end_path(&mut self);

    fn add_point(
        &mut self,
        point: Point,
        point_type: PointType,
        smooth: bool,
        name: Option<&str>,
        identifier: Option<&Identifier>,
    );

    fn add_component(&mut self, base_glyph: Option<&GlyphName>, transform: Affine);

    fn supports_identifiers(&self) -> bool {
        false
    }

    fn add_component_with_identifier(
        &mut self,
        base_glyph: Option<&GlyphName>,
        transform: Affine,
        identifier: Option<&Identifier>,
    ) {
        let _ = identifier;
        self.add_component(base_glyph, transform);
    }
}
