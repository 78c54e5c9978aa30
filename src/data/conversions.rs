//! UFO conversion utilities
//!
//! In-memory conversion from norad's UFO types into the object graph (and
//! back, for components). Reading and writing files is left to the caller.

use crate::geometry::{Pen, PointPen, PointToSegmentPen, PointType};
use crate::objects::component::Component;
use crate::objects::contour::Contour;
use crate::objects::font::Font;
use crate::objects::glyph::Glyph;
use crate::objects::identifiable::Identifier;
use crate::objects::layer::{Layer, LayerSet};
use crate::objects::GlyphName;
use kurbo::{Affine, BezPath, Point};
use tracing::{debug, warn};

impl Component {
    /// Convert from a norad component. The identifier is kept as a preset;
    /// it is registered when the component is inserted into a glyph.
    pub fn from_norad(norad_component: &norad::Component) -> Self {
        let transform = &norad_component.transform;
        let component = Component::new()
            .with_base_glyph(norad_component.base.clone())
            .with_transformation(Affine::new([
                transform.x_scale,
                transform.xy_scale,
                transform.yx_scale,
                transform.y_scale,
                transform.x_offset,
                transform.y_offset,
            ]));

        match identifier(norad_component.identifier()) {
            Some(identifier) => component.with_identifier(identifier),
            None => component,
        }
    }

    /// Convert back to a norad component. UFO components always name a
    /// base glyph, so an empty component has no norad equivalent.
    pub fn to_norad(&self) -> Option<norad::Component> {
        let base = self.base_glyph()?.clone();
        let [x_scale, xy_scale, yx_scale, y_scale, x_offset, y_offset] =
            self.transformation().as_coeffs();
        let transform = norad::AffineTransform {
            x_scale,
            xy_scale,
            yx_scale,
            y_scale,
            x_offset,
            y_offset,
        };
        let identifier = self
            .identifier()
            .and_then(|id| norad::Identifier::new(id.as_str()).ok());
        Some(norad::Component::new(base, transform, identifier))
    }
}

/// Segment pen collecting one `BezPath` per contour
#[derive(Default)]
struct ContourCollector {
    contours: Vec<BezPath>,
    current: Option<BezPath>,
}

impl ContourCollector {
    fn finish(&mut self) {
        if let Some(path) = self.current.take() {
            if !path.elements().is_empty() {
                self.contours.push(path);
            }
        }
    }

    fn path(&mut self) -> &mut BezPath {
        self.current.get_or_insert_with(BezPath::new)
    }
}

impl Pen for ContourCollector {
    fn move_to(&mut self, point: Point) {
        self.finish();
        self.path().move_to(point);
    }

    fn line_to(&mut self, point: Point) {
        self.path().line_to(point);
    }

    fn quad_to(&mut self, control: Point, end: Point) {
        self.path().quad_to(control, end);
    }

    fn curve_to(&mut self, control1: Point, control2: Point, end: Point) {
        self.path().curve_to(control1, control2, end);
    }

    fn close_path(&mut self) {
        self.path().close_path();
        self.finish();
    }

    fn end_path(&mut self) {
        self.finish();
    }

    // Components are converted separately
    fn add_component(&mut self, _base_glyph: Option<&GlyphName>, _transform: Affine) {}
}

fn point_type(norad_type: &norad::PointType) -> PointType {
    match norad_type {
        norad::PointType::Move => PointType::Move,
        norad::PointType::Line => PointType::Line,
        norad::PointType::OffCurve => PointType::OffCurve,
        norad::PointType::Curve => PointType::Curve,
        norad::PointType::QCurve => PointType::QCurve,
    }
}

/// Replay one norad contour through the point-to-segment adapter
fn contour_path(norad_contour: &norad::Contour) -> Option<BezPath> {
    let mut collector = ContourCollector::default();
    {
        let mut point_pen = PointToSegmentPen::new(&mut collector);
        point_pen.begin_path(None);
        for point in &norad_contour.points {
            point_pen.add_point(
                Point::new(point.x, point.y),
                point_type(&point.typ),
                point.smooth,
                point.name.as_ref().map(|name| name.as_str()),
                None,
            );
        }
        point_pen.end_path();
    }
    collector.contours.pop()
}

fn identifier(norad_identifier: Option<&norad::Identifier>) -> Option<Identifier> {
    norad_identifier.and_then(|id| Identifier::new(id.as_str()).ok())
}

impl Contour {
    /// Convert from a norad contour, keeping the contour and point
    /// identifiers. `None` for a contour without points.
    pub fn from_norad(norad_contour: &norad::Contour) -> Option<Self> {
        let path = contour_path(norad_contour)?;
        let point_identifiers = norad_contour
            .points
            .iter()
            .filter_map(|point| identifier(point.identifier()))
            .collect();
        let contour = Contour::new(path).with_point_identifiers(point_identifiers);
        Some(match identifier(norad_contour.identifier()) {
            Some(id) => contour.with_identifier(id),
            None => contour,
        })
    }
}

impl Glyph {
    /// Convert from a norad glyph.
    ///
    /// Contour and point identifiers travel with their contours and are
    /// registered in the glyph's identifier scope, so components cannot
    /// claim them while the contour exists.
    pub fn from_norad(norad_glyph: &norad::Glyph) -> Self {
        let mut glyph = Glyph::new(norad_glyph.name().clone());
        glyph.width = norad_glyph.width;

        for norad_contour in &norad_glyph.contours {
            match Contour::from_norad(norad_contour) {
                Some(contour) => {
                    glyph.add_contour(contour);
                }
                None => warn!("Skipping empty contour in glyph '{}'", glyph.name()),
            }
        }
        for norad_component in &norad_glyph.components {
            glyph.append_component(Component::from_norad(norad_component));
        }
        glyph
    }
}

impl Layer {
    pub fn from_norad(norad_layer: &norad::Layer) -> Self {
        let mut layer = Layer::new(norad_layer.name().clone());
        for norad_glyph in norad_layer.iter() {
            layer.insert_glyph(Glyph::from_norad(norad_glyph));
        }
        debug!("Converted layer '{}' with {} glyphs", layer.name(), layer.len());
        layer
    }
}

impl Font {
    /// Build a document from every layer of a norad font
    pub fn from_norad(norad_font: &norad::Font) -> Self {
        let layers: Vec<Layer> = norad_font.layers.iter().map(Layer::from_norad).collect();
        let default_layer = norad_font.layers.default_layer().name().clone();
        Font::from_layers(LayerSet::from_layers(layers, Some(default_layer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{PathEl, Rect};

    fn name(value: &str) -> GlyphName {
        value.parse().unwrap()
    }

    fn square_contour(identifier: Option<&str>) -> norad::Contour {
        let points = [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]
            .into_iter()
            .map(|(x, y)| norad::ContourPoint::new(x, y, norad::PointType::Line, false, None, None))
            .collect();
        norad::Contour::new(points, identifier.map(|id| norad::Identifier::new(id).unwrap()))
    }

    fn norad_component(base: &str, dx: f64, identifier: Option<&str>) -> norad::Component {
        let transform = norad::AffineTransform {
            x_scale: 1.0,
            xy_scale: 0.0,
            yx_scale: 0.0,
            y_scale: 1.0,
            x_offset: dx,
            y_offset: 0.0,
        };
        norad::Component::new(
            name(base),
            transform,
            identifier.map(|id| norad::Identifier::new(id).unwrap()),
        )
    }

    #[test]
    fn test_component_round_trip_keeps_fields() {
        let original = norad_component("A", 25.0, Some("comp1"));
        let component = Component::from_norad(&original);
        assert_eq!(component.base_glyph(), Some(&name("A")));
        assert_eq!(component.transformation(), Affine::translate((25.0, 0.0)));
        assert_eq!(component.identifier().map(Identifier::as_str), Some("comp1"));

        let back = component.to_norad().unwrap();
        assert_eq!(back.base, name("A"));
        assert_eq!(back.transform.x_offset, 25.0);
        assert_eq!(back.identifier().map(|id| id.as_str()), Some("comp1"));
    }

    #[test]
    fn test_empty_component_has_no_norad_form() {
        assert!(Component::new().to_norad().is_none());
    }

    #[test]
    fn test_glyph_contours_become_closed_paths() {
        let mut norad_glyph = norad::Glyph::new("square");
        norad_glyph.width = 500.0;
        norad_glyph.contours.push(square_contour(Some("contour1")));

        let glyph = Glyph::from_norad(&norad_glyph);
        assert_eq!(glyph.width, 500.0);
        assert_eq!(glyph.contours().len(), 1);
        let elements = glyph.contours()[0].path().elements();
        assert_eq!(elements[0], PathEl::MoveTo(Point::new(0.0, 0.0)));
        assert_eq!(elements.last(), Some(&PathEl::ClosePath));
        assert!(glyph.identifiers().contains("contour1"));
    }

    #[test]
    fn test_component_cannot_take_contour_identifier() {
        let mut norad_glyph = norad::Glyph::new("Aacute");
        norad_glyph.contours.push(square_contour(Some("shared")));
        norad_glyph
            .components
            .push(norad_component("A", 0.0, Some("shared")));

        let glyph = Glyph::from_norad(&norad_glyph);
        assert_eq!(glyph.components()[0].identifier(), None);
        assert_eq!(glyph.identifiers().len(), 1);
    }

    #[test]
    fn test_font_conversion_resolves_components() {
        let mut norad_font = norad::Font::new();
        let mut base = norad::Glyph::new("A");
        base.contours.push(square_contour(None));
        let mut composite = norad::Glyph::new("Aring");
        composite
            .components
            .push(norad_component("A", 200.0, None));
        norad_font.default_layer_mut().insert_glyph(base);
        norad_font.default_layer_mut().insert_glyph(composite);

        let font = Font::from_norad(&norad_font);
        let glyph = font.glyph("public.default", "Aring").unwrap();
        let component = &glyph.components()[0];
        assert_eq!(component.glyph(&font).map(Glyph::name), Some(&name("Aring")));
        assert_eq!(
            component.bounds(&font),
            Some(Rect::new(200.0, 0.0, 300.0, 100.0))
        );
    }

    #[test]
    fn test_cleared_contours_release_converted_identifiers() {
        let mut norad_glyph = norad::Glyph::new("Aacute");
        let mut contour = square_contour(Some("c0"));
        contour.points[0] = norad::ContourPoint::new(
            0.0,
            0.0,
            norad::PointType::Line,
            false,
            None,
            Some(norad::Identifier::new("c0.p0").unwrap()),
        );
        norad_glyph.contours.push(contour);
        norad_glyph.components.push(norad_component("A", 0.0, None));

        let mut glyph = Glyph::from_norad(&norad_glyph);
        assert_eq!(glyph.contours()[0].identifier().map(Identifier::as_str), Some("c0"));
        assert_eq!(glyph.contours()[0].point_identifiers().len(), 1);
        assert_eq!(glyph.identifiers().len(), 2);

        glyph.clear_contours();
        assert!(glyph.identifiers().is_empty());

        let mut notifier = crate::objects::notifications::Notifier::new();
        let mut edit = glyph.edit_component(0, &mut notifier).unwrap();
        assert_eq!(edit.set_identifier(Some(Identifier::new("c0").unwrap())), Ok(true));
        assert_eq!(edit.set_identifier(Some(Identifier::new("c0.p0").unwrap())), Ok(true));
    }
}
