//! Bounds pens

use crate::geometry::outline_pen::{delegate_pen_to_outline, GlyphSet, OutlinePen};
use kurbo::{BezPath, ParamCurveExtrema, PathEl, Rect};

fn include(bounds: Option<Rect>, rect: Rect) -> Option<Rect> {
    Some(match bounds {
        Some(bounds) => bounds.union(rect),
        None => rect,
    })
}

/// Tight bounds: curve extrema are included, control points are not
fn tight_bounds(path: &BezPath) -> Option<Rect> {
    let mut bounds = None;
    // Lone move_to points count too
    for el in path.elements() {
        if let PathEl::MoveTo(pt) = el {
            bounds = include(bounds, Rect::from_points(*pt, *pt));
        }
    }
    for seg in path.segments() {
        bounds = include(bounds, seg.bounding_box());
    }
    bounds
}

/// Box around every point of the path, on- or off-curve
fn control_bounds(path: &BezPath) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    let mut add = |pt: kurbo::Point| {
        bounds = Some(match bounds {
            Some(bounds) => bounds.union_pt(pt),
            None => Rect::from_points(pt, pt),
        });
    };
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => add(p),
            PathEl::QuadTo(p1, p2) => {
                add(p1);
                add(p2);
            }
            PathEl::CurveTo(p1, p2, p3) => {
                add(p1);
                add(p2);
                add(p3);
            }
            PathEl::ClosePath => {}
        }
    }
    bounds
}

/// Computes the bounds of whatever is drawn into it
pub struct BoundsPen<'g> {
    outline: OutlinePen<'g>,
}

impl<'g> BoundsPen<'g> {
    pub fn new(glyph_set: &'g dyn GlyphSet) -> Self {
        Self {
            outline: OutlinePen::new(glyph_set),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.outline = self.outline.with_max_depth(max_depth);
        self
    }

    /// (xMin, yMin, xMax, yMax), or `None` if nothing was drawn
    pub fn bounds(&self) -> Option<Rect> {
        tight_bounds(self.outline.path())
    }
}

delegate_pen_to_outline!(BoundsPen);

/// Like [`BoundsPen`], but measures point positions only. Curves without
/// points at their extrema are not measured exactly.
pub struct ControlBoundsPen<'g> {
    outline: OutlinePen<'g>,
}

impl<'g> ControlBoundsPen<'g> {
    pub fn new(glyph_set: &'g dyn GlyphSet) -> Self {
        Self {
            outline: OutlinePen::new(glyph_set),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.outline = self.outline.with_max_depth(max_depth);
        self
    }

    pub fn bounds(&self) -> Option<Rect> {
        control_bounds(self.outline.path())
    }
}

delegate_pen_to_outline!(ControlBoundsPen);
