//! Hit testing against drawn outlines

use crate::geometry::outline_pen::{delegate_pen_to_outline, GlyphSet, OutlinePen};
use kurbo::{Point, Shape};

/// Tests whether a point lies in the filled area of whatever is drawn into
/// it, with the non-zero rule or, optionally, the even-odd rule.
pub struct PointInsidePen<'g> {
    outline: OutlinePen<'g>,
    point: Point,
    even_odd: bool,
}

impl<'g> PointInsidePen<'g> {
    pub fn new(glyph_set: &'g dyn GlyphSet, point: Point, even_odd: bool) -> Self {
        Self {
            outline: OutlinePen::new(glyph_set),
            point,
            even_odd,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.outline = self.outline.with_max_depth(max_depth);
        self
    }

    pub fn winding(&self) -> i32 {
        self.outline.path().winding(self.point)
    }

    pub fn result(&self) -> bool {
        let winding = self.winding();
        if self.even_odd {
            winding % 2 != 0
        } else {
            winding != 0
        }
    }
}

delegate_pen_to_outline!(PointInsidePen);
