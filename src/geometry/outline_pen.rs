//! Flattening glyph outlines, components included, into one path

use crate::core::config::DEFAULT_MAX_COMPONENT_DEPTH;
use crate::geometry::pen::Pen;
use crate::objects::GlyphName;
use kurbo::{Affine, BezPath, Point};
use tracing::warn;

/// Anything that can draw glyphs by name, typically a layer
pub trait GlyphSet {
    /// Draw the named glyph into `pen`. Returns false if there is no such glyph.
    fn draw_glyph(&self, name: &str, pen: &mut dyn Pen) -> bool;
}

/// Segment pen that accumulates everything it is given into a single
/// `BezPath`, resolving components through a [`GlyphSet`].
///
/// Components without a base glyph, or whose base glyph is missing, are
/// skipped with a warning.
///
/// Depth counts component references along one chain: a component added
/// directly to the pen is at level 1, a component inside its base glyph at
/// level 2, and so on. A component is drawn only while its level is at most
/// `max_depth`; deeper ones are treated as a reference cycle and cut off.
pub struct OutlinePen<'g> {
    glyph_set: &'g dyn GlyphSet,
    path: BezPath,
    transform: Affine,
    depth: usize,
    max_depth: usize,
}

impl<'g> OutlinePen<'g> {
    pub fn new(glyph_set: &'g dyn GlyphSet) -> Self {
        Self {
            glyph_set,
            path: BezPath::new(),
            transform: Affine::IDENTITY,
            depth: 0,
            max_depth: DEFAULT_MAX_COMPONENT_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub fn into_path(self) -> BezPath {
        self.path
    }
}

impl Pen for OutlinePen<'_> {
    fn move_to(&mut self, point: Point) {
        self.path.move_to(self.transform * point);
    }

    fn line_to(&mut self, point: Point) {
        self.path.line_to(self.transform * point);
    }

    fn quad_to(&mut self, control: Point, end: Point) {
        self.path
            .quad_to(self.transform * control, self.transform * end);
    }

    fn curve_to(&mut self, control1: Point, control2: Point, end: Point) {
        self.path.curve_to(
            self.transform * control1,
            self.transform * control2,
            self.transform * end,
        );
    }

    fn close_path(&mut self) {
        self.path.close_path();
    }

    fn end_path(&mut self) {}

    fn add_component(&mut self, base_glyph: Option<&GlyphName>, transform: Affine) {
        let Some(base_glyph) = base_glyph else {
            warn!("Skipping component without a base glyph");
            return;
        };
        if self.depth >= self.max_depth {
            warn!(
                "Component nesting deeper than {} at '{}'; possible reference cycle, skipping",
                self.max_depth, base_glyph
            );
            return;
        }

        let saved = self.transform;
        self.transform = saved * transform;
        self.depth += 1;

        let glyph_set = self.glyph_set;
        if !glyph_set.draw_glyph(base_glyph.as_str(), self) {
            warn!("Base glyph '{}' not found; skipping component", base_glyph);
        }

        self.depth -= 1;
        self.transform = saved;
    }
}

/// Forward every [`Pen`] method of a query pen to its inner [`OutlinePen`]
macro_rules! delegate_pen_to_outline {
    ($ty:ident) => {
        impl $crate::geometry::pen::Pen for $ty<'_> {
            fn move_to(&mut self, point: kurbo::Point) {
                $crate::geometry::pen::Pen::move_to(&mut self.outline, point);
            }

            fn line_to(&mut self, point: kurbo::Point) {
                $crate::geometry::pen::Pen::line_to(&mut self.outline, point);
            }

            fn quad_to(&mut self, control: kurbo::Point, end: kurbo::Point) {
                $crate::geometry::pen::Pen::quad_to(&mut self.outline, control, end);
            }

            fn curve_to(
                &mut self,
                control1: kurbo::Point,
                control2: kurbo::Point,
                end: kurbo::Point,
            ) {
                $crate::geometry::pen::Pen::curve_to(&mut self.outline, control1, control2, end);
            }

            fn close_path(&mut self) {
                $crate::geometry::pen::Pen::close_path(&mut self.outline);
            }

            fn end_path(&mut self) {
                $crate::geometry::pen::Pen::end_path(&mut self.outline);
            }

            fn add_component(
                &mut self,
                base_glyph: Option<&$crate::objects::GlyphName>,
                transform: kurbo::Affine,
            ) {
                $crate::geometry::pen::Pen::add_component(&mut self.outline, base_glyph, transform);
            }
        }
    };
}

pub(crate) use delegate_pen_to_outline;
