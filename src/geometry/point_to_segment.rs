//! Adapter from point-level drawing to segment-level drawing
//!
//! UFO contours: a contour whose first point is a `move` is open and starts
//! there. Otherwise the contour is closed and the first point's type says
//! how to reach it from the last point.

use crate::geometry::pen::{Pen, PointPen, PointType};
use crate::objects::identifiable::Identifier;
use crate::objects::GlyphName;
use kurbo::{Affine, Point};
use tracing::warn;

/// Collects the points of each contour and replays them as segments
pub struct PointToSegmentPen<'p> {
    pen: &'p mut dyn Pen,
    contour: Option<Vec<(Point, PointType)>>,
}

impl<'p> PointToSegmentPen<'p> {
    pub fn new(pen: &'p mut dyn Pen) -> Self {
        Self { pen, contour: None }
    }

    fn flush(&mut self, points: Vec<(Point, PointType)>) {
        if points.is_empty() {
            return;
        }

        if points[0].1 == PointType::Move {
            self.draw_open(&points);
            return;
        }

        // Closed contour: start at the first on-curve point so any leading
        // off-curves become part of the closing segment.
        match points.iter().position(|(_, typ)| typ.is_on_curve()) {
            Some(start) => {
                let mut rotated = points[start..].to_vec();
                rotated.extend_from_slice(&points[..start]);
                self.draw_closed(&rotated);
            }
            None => self.draw_all_offcurve(&points),
        }
    }

    fn draw_open(&mut self, points: &[(Point, PointType)]) {
        self.pen.move_to(points[0].0);
        let mut pending: Vec<Point> = Vec::new();
        for &(pt, typ) in &points[1..] {
            self.segment(&mut pending, pt, typ);
        }
        if !pending.is_empty() {
            warn!(
                "Open contour ends with {} dangling off-curve point(s); ignoring them",
                pending.len()
            );
        }
        self.pen.end_path();
    }

    fn draw_closed(&mut self, points: &[(Point, PointType)]) {
        let (first_pt, first_type) = points[0];
        self.pen.move_to(first_pt);

        let mut pending: Vec<Point> = Vec::new();
        for &(pt, typ) in &points[1..] {
            self.segment(&mut pending, pt, typ);
        }

        // Wrap-around segment back to the first point
        self.segment(&mut pending, first_pt, first_type);
        self.pen.close_path();
    }

    /// TrueType special case: a closed contour with no on-curve points.
    /// The implied on-curve between the last and first off-curves starts it.
    fn draw_all_offcurve(&mut self, points: &[(Point, PointType)]) {
        let offcurves: Vec<Point> = points.iter().map(|(pt, _)| *pt).collect();
        let (Some(&first), Some(&last)) = (offcurves.first(), offcurves.last()) else {
            return;
        };
        let start = last.midpoint(first);
        self.pen.move_to(start);
        self.qcurve(&offcurves, start);
        self.pen.close_path();
    }

    fn segment(&mut self, pending: &mut Vec<Point>, pt: Point, typ: PointType) {
        match typ {
            PointType::OffCurve => pending.push(pt),
            PointType::Move | PointType::Line => {
                if !pending.is_empty() {
                    warn!("Off-curve points before a line segment; ignoring them");
                    pending.clear();
                }
                self.pen.line_to(pt);
            }
            PointType::Curve => {
                match pending.len() {
                    0 => self.pen.line_to(pt),
                    1 => self.pen.quad_to(pending[0], pt),
                    n => self.pen.curve_to(pending[n - 2], pending[n - 1], pt),
                }
                pending.clear();
            }
            PointType::QCurve => {
                if pending.is_empty() {
                    self.pen.line_to(pt);
                } else {
                    self.qcurve(pending.as_slice(), pt);
                    pending.clear();
                }
            }
        }
    }

    /// Quadratic spline through `offcurves` ending at `end`, with implied
    /// on-curve points halfway between consecutive off-curves
    fn qcurve(&mut self, offcurves: &[Point], end: Point) {
        for (i, &cp) in offcurves.iter().enumerate() {
            let seg_end = match offcurves.get(i + 1) {
                Some(&next) => cp.midpoint(next),
                None => end,
            };
            self.pen.quad_to(cp, seg_end);
        }
    }
}

impl PointPen for PointToSegmentPen<'_> {
    fn begin_path(&mut self, _identifier: Option<&Identifier>) {
        if let Some(points) = self.contour.take() {
            warn!("begin_path called inside an unfinished contour; flushing it");
            self.flush(points);
        }
        self.contour = Some(Vec::new());
    }

    fn end_path(&mut self) {
        match self.contour.take() {
            Some(points) => self.flush(points),
            None => warn!("end_path called without begin_path"),
        }
    }

    fn add_point(
        &mut self,
        point: Point,
        point_type: PointType,
        _smooth: bool,
        _name: Option<&str>,
        _identifier: Option<&Identifier>,
    ) {
        match self.contour.as_mut() {
            Some(points) => points.push((point, point_type)),
            None => warn!("add_point called outside of a contour"),
        }
    }

    fn add_component(&mut self, base_glyph: Option<&GlyphName>, transform: Affine) {
        self.pen.add_component(base_glyph, transform);
    }

    // Identifiers are accepted and dropped
    fn supports_identifiers(&self) -> bool {
        true
    }
}
