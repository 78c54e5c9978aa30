//! A glyph embedded in another glyph.
//!
//! A [`Component`] names a base glyph and places it with an affine
//! transform. It never owns its parent: the back-reference is a
//! [`ComponentParent`] lookup key that is resolved against the [`Font`] on
//! every use and checked for liveness.

use crate::core::errors::ObjectResult;
use crate::geometry::{
    BoundsPen, ControlBoundsPen, Pen, PointInsidePen, PointPen, PointToSegmentPen,
};
use crate::objects::font::Font;
use crate::objects::glyph::Glyph;
use crate::objects::identifiable::{self, Identifiable, Identifier, IdentifierScope};
use crate::objects::layer::{Layer, LayerSet};
use crate::objects::notifications::{
    Notification, NotificationData, NotificationName, Notifier, ObjectId,
};
use crate::objects::GlyphName;
use kurbo::{Affine, Point, Rect, Vec2};
use tracing::{debug, warn};

/// Where a component lives: the owning glyph's name, and the layer that
/// glyph sits in (if any). Non-owning; may go stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentParent {
    pub layer: Option<GlyphName>,
    pub glyph: GlyphName,
}

#[derive(Debug)]
pub struct Component {
    id: ObjectId,
    base_glyph: Option<GlyphName>,
    transformation: Affine,
    identifier: Option<Identifier>,
    dirty: bool,
    parent: Option<ComponentParent>,
}

impl Default for Component {
    fn default() -> Self {
        Self::new()
    }
}

impl Component {
    /// A detached component with no base glyph and the identity transform
    pub fn new() -> Self {
        Self {
            id: ObjectId::next(),
            base_glyph: None,
            transformation: Affine::IDENTITY,
            identifier: None,
            dirty: false,
            parent: None,
        }
    }

    /// Set the base glyph before the component is inserted anywhere
    pub fn with_base_glyph(mut self, base_glyph: GlyphName) -> Self {
        self.base_glyph = Some(base_glyph);
        self
    }

    pub fn with_transformation(mut self, transformation: Affine) -> Self {
        self.transformation = transformation;
        self
    }

    /// Preset an identifier. It is registered (or dropped, if taken) when
    /// the component is inserted into a glyph.
    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn object_id(&self) -> ObjectId {
        self.id
    }

    pub fn base_glyph(&self) -> Option<&GlyphName> {
        self.base_glyph.as_ref()
    }

    pub fn transformation(&self) -> Affine {
        self.transformation
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn parent(&self) -> Option<&ComponentParent> {
        self.parent.as_ref()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ComponentParent>) {
        self.parent = parent;
    }

    /// Drop the identifier without scope bookkeeping or notifications.
    /// Only for components that are not yet part of any scope.
    pub(crate) fn discard_identifier(&mut self) -> Option<Identifier> {
        self.identifier.take()
    }

    // ---------
    // Mutations
    // ---------

    /// Set or clear the dirty flag. Setting it posts `Component.Changed`.
    pub fn set_dirty(&mut self, dirty: bool, notifier: &mut Notifier) {
        let old = self.dirty;
        self.dirty = dirty;
        if dirty {
            notifier.post(&Notification {
                name: NotificationName::ComponentChanged,
                sender: self.id,
                data: NotificationData::Dirty { old, new: dirty },
            });
        }
    }

    /// Point the component at another glyph. The name is not checked
    /// against any glyph set; dangling references are allowed.
    ///
    /// Posts `Component.BaseGlyphChanged` and `Component.Changed`.
    pub fn set_base_glyph(
        &mut self,
        base_glyph: Option<GlyphName>,
        notifier: &mut Notifier,
    ) -> bool {
        if base_glyph == self.base_glyph {
            return false;
        }
        let old = std::mem::replace(&mut self.base_glyph, base_glyph.clone());
        self.dirty = true;
        debug!(
            "component {} base glyph {:?} -> {:?}",
            self.id.get(),
            old,
            base_glyph
        );
        notifier.post_change(
            NotificationName::ComponentBaseGlyphChanged,
            self.id,
            NotificationData::BaseGlyph {
                old,
                new: base_glyph,
            },
        );
        true
    }

    /// Posts `Component.TransformationChanged` and `Component.Changed`.
    pub fn set_transformation(
        &mut self,
        transformation: Affine,
        notifier: &mut Notifier,
    ) -> bool {
        if transformation == self.transformation {
            return false;
        }
        let old = std::mem::replace(&mut self.transformation, transformation);
        self.dirty = true;
        notifier.post_change(
            NotificationName::ComponentTransformationChanged,
            self.id,
            NotificationData::Transformation {
                old,
                new: transformation,
            },
        );
        true
    }

    /// Shift the offset terms of the transform
    pub fn move_by(&mut self, delta: impl Into<Vec2>, notifier: &mut Notifier) -> bool {
        let delta = delta.into();
        let [x_scale, xy_scale, yx_scale, y_scale, x_offset, y_offset] =
            self.transformation.as_coeffs();
        self.set_transformation(
            Affine::new([
                x_scale,
                xy_scale,
                yx_scale,
                y_scale,
                x_offset + delta.x,
                y_offset + delta.y,
            ]),
            notifier,
        )
    }

    /// Assign or clear the identifier within `scope`, the identifier set of
    /// the glyph that holds this component. Pass an empty scope for a
    /// detached component.
    ///
    /// Posts `Component.IdentifierChanged` and `Component.Changed`.
    pub fn set_identifier(
        &mut self,
        identifier: Option<Identifier>,
        scope: &mut IdentifierScope,
        notifier: &mut Notifier,
    ) -> ObjectResult<bool> {
        identifiable::set_identifier(self, identifier, scope, notifier)
    }

    pub fn generate_identifier(
        &mut self,
        scope: &mut IdentifierScope,
        notifier: &mut Notifier,
    ) -> ObjectResult<Identifier> {
        identifiable::generate_identifier(self, scope, notifier)
    }

    // -------
    // Parents
    // -------

    /// The glyph holding this component, if it can still be found in `font`
    pub fn glyph<'f>(&self, font: &'f Font) -> Option<&'f Glyph> {
        let parent = self.parent.as_ref()?;
        let layer = font.layers().get(parent.layer.as_ref()?.as_str())?;
        let glyph = layer.get(parent.glyph.as_str())?;
        glyph.contains_component(self.id).then_some(glyph)
    }

    pub fn layer<'f>(&self, font: &'f Font) -> Option<&'f Layer> {
        let glyph = self.glyph(font)?;
        font.layers().get(glyph.layer_name()?.as_str())
    }

    pub fn layer_set<'f>(&self, font: &'f Font) -> Option<&'f LayerSet> {
        self.glyph(font).map(|_| font.layers())
    }

    pub fn font<'f>(&self, font: &'f Font) -> Option<&'f Font> {
        self.glyph(font).map(|_| font)
    }

    /// Identifier set of the owning glyph; empty when there is none
    pub fn identifiers<'f>(&self, font: &'f Font) -> &'f IdentifierScope {
        self.glyph(font)
            .map(Glyph::identifiers)
            .unwrap_or(IdentifierScope::empty())
    }

    // --------
    // Drawing
    // --------

    /// Draw with a segment pen
    pub fn draw(&self, pen: &mut dyn Pen) {
        let mut point_pen = PointToSegmentPen::new(pen);
        self.draw_points(&mut point_pen);
    }

    /// Draw with a point pen.
    ///
    /// The identifier is only handed over when the pen advertises support
    /// for it; otherwise it is dropped with a warning.
    pub fn draw_points(&self, pen: &mut dyn PointPen) {
        let base_glyph = self.base_glyph.as_ref();
        if pen.supports_identifiers() {
            pen.add_component_with_identifier(
                base_glyph,
                self.transformation,
                self.identifier.as_ref(),
            );
            return;
        }

        if let Some(identifier) = &self.identifier {
            warn!(
                "Point pen does not accept identifiers; discarding identifier '{}' of component {}",
                identifier,
                self.id.get()
            );
        }
        pen.add_component(base_glyph, self.transformation);
    }

    // --------
    // Geometry
    // --------

    /// Bounds of the component's outline as (xMin, yMin, xMax, yMax).
    /// `None` when detached or when nothing was drawn.
    pub fn bounds(&self, font: &Font) -> Option<Rect> {
        let layer = self.layer(font)?;
        let mut pen = BoundsPen::new(layer).with_max_depth(font.settings().max_component_depth);
        self.draw(&mut pen);
        pen.bounds()
    }

    /// Bounds of all on- and off-curve points, ignoring curve extrema
    pub fn control_point_bounds(&self, font: &Font) -> Option<Rect> {
        let layer = self.layer(font)?;
        let mut pen =
            ControlBoundsPen::new(layer).with_max_depth(font.settings().max_component_depth);
        self.draw(&mut pen);
        pen.bounds()
    }

    /// Whether `point` falls in the filled area. A detached component
    /// contains nothing.
    pub fn point_inside(&self, font: &Font, point: Point, even_odd: bool) -> bool {
        let Some(layer) = self.layer(font) else {
            return false;
        };
        let mut pen = PointInsidePen::new(layer, point, even_odd)
            .with_max_depth(font.settings().max_component_depth);
        self.draw(&mut pen);
        pen.result()
    }
}

impl Identifiable for Component {
    const IDENTIFIER_CHANGED: NotificationName = NotificationName::ComponentIdentifierChanged;

    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    fn store_identifier(&mut self, identifier: Option<Identifier>) {
        self.identifier = identifier;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

/// A component together with the scope and notifier it edits against.
///
/// Obtained from [`Glyph::edit_component`] or [`Font::edit_component`], so
/// the identifier scope always belongs to the glyph that currently holds
/// the component.
pub struct ComponentEdit<'a> {
    component: &'a mut Component,
    identifiers: &'a mut IdentifierScope,
    notifier: &'a mut Notifier,
}

impl<'a> ComponentEdit<'a> {
    pub(crate) fn new(
        component: &'a mut Component,
        identifiers: &'a mut IdentifierScope,
        notifier: &'a mut Notifier,
    ) -> Self {
        Self {
            component,
            identifiers,
            notifier,
        }
    }

    pub fn component(&self) -> &Component {
        self.component
    }

    pub fn identifiers(&self) -> &IdentifierScope {
        self.identifiers
    }

    pub fn set_base_glyph(&mut self, base_glyph: Option<GlyphName>) -> bool {
        self.component.set_base_glyph(base_glyph, self.notifier)
    }

    pub fn set_transformation(&mut self, transformation: Affine) -> bool {
        self.component.set_transformation(transformation, self.notifier)
    }

    pub fn move_by(&mut self, delta: impl Into<Vec2>) -> bool {
        self.component.move_by(delta, self.notifier)
    }

    pub fn set_identifier(&mut self, identifier: Option<Identifier>) -> ObjectResult<bool> {
        self.component
            .set_identifier(identifier, self.identifiers, self.notifier)
    }

    pub fn generate_identifier(&mut self) -> ObjectResult<Identifier> {
        self.component
            .generate_identifier(self.identifiers, self.notifier)
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.component.set_dirty(dirty, self.notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PointType;
    use std::sync::{Arc, Mutex};

    fn name(value: &str) -> GlyphName {
        value.parse().unwrap()
    }

    fn recording_notifier() -> (Notifier, Arc<Mutex<Vec<Notification>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::new();
        let sink = log.clone();
        notifier.subscribe(None, None, move |n| sink.lock().unwrap().push(n.clone()));
        (notifier, log)
    }

    fn names(log: &Arc<Mutex<Vec<Notification>>>) -> Vec<NotificationName> {
        log.lock().unwrap().iter().map(|n| n.name).collect()
    }

    /// Point pen that records what it was given and advertises identifier
    /// support on request
    #[derive(Default)]
    struct RecordingPointPen {
        accepts_identifiers: bool,
        components: Vec<(Option<GlyphName>, Affine, Option<Identifier>)>,
    }

    impl PointPen for RecordingPointPen {
        fn begin_path(&mut self, _identifier: Option<&Identifier>) {}

        fn end_path(&mut self) {}

        fn add_point(
            &mut self,
            _point: Point,
            _point_type: PointType,
            _smooth: bool,
            _name: Option<&str>,
            _identifier: Option<&Identifier>,
        ) {
        }

        fn add_component(&mut self, base_glyph: Option<&GlyphName>, transform: Affine) {
            self.components.push((base_glyph.cloned(), transform, None));
        }

        fn supports_identifiers(&self) -> bool {
            self.accepts_identifiers
        }

        fn add_component_with_identifier(
            &mut self,
            base_glyph: Option<&GlyphName>,
            transform: Affine,
            identifier: Option<&Identifier>,
        ) {
            self.components
                .push((base_glyph.cloned(), transform, identifier.cloned()));
        }
    }

    #[test]
    fn test_new_component_defaults() {
        let component = Component::new();
        assert_eq!(component.base_glyph(), None);
        assert_eq!(component.transformation(), Affine::IDENTITY);
        assert_eq!(component.identifier(), None);
        assert!(!component.is_dirty());
        assert!(component.parent().is_none());
    }

    #[test]
    fn test_set_base_glyph() {
        let (mut notifier, log) = recording_notifier();
        let mut component = Component::new();

        assert!(component.set_base_glyph(Some(name("A")), &mut notifier));
        assert_eq!(component.base_glyph(), Some(&name("A")));
        assert!(component.is_dirty());
        assert_eq!(
            names(&log),
            vec![
                NotificationName::ComponentBaseGlyphChanged,
                NotificationName::ComponentChanged,
            ]
        );
        assert_eq!(
            log.lock().unwrap()[0].data,
            NotificationData::BaseGlyph {
                old: None,
                new: Some(name("A")),
            }
        );

        // Dangling names are fine
        assert!(component.set_base_glyph(Some(name("does.not.exist")), &mut notifier));
        assert!(component.set_base_glyph(None, &mut notifier));
        assert_eq!(component.base_glyph(), None);
    }

    #[test]
    fn test_unchanged_values_are_silent() {
        let (mut notifier, log) = recording_notifier();
        let mut component = Component::new().with_base_glyph(name("A"));

        assert!(!component.set_base_glyph(Some(name("A")), &mut notifier));
        assert!(!component.set_transformation(Affine::IDENTITY, &mut notifier));
        assert!(!component
            .set_identifier(None, &mut IdentifierScope::new(), &mut notifier)
            .unwrap());

        assert!(log.lock().unwrap().is_empty());
        assert!(!component.is_dirty());
    }

    #[test]
    fn test_move_by_translates_offsets_only() {
        let (mut notifier, log) = recording_notifier();
        let mut component =
            Component::new().with_transformation(Affine::new([1.0, 0.0, 0.0, 1.0, 10.0, 20.0]));

        assert!(component.move_by((5.0, -3.0), &mut notifier));
        assert_eq!(
            component.transformation().as_coeffs(),
            [1.0, 0.0, 0.0, 1.0, 15.0, 17.0]
        );
        assert_eq!(
            names(&log),
            vec![
                NotificationName::ComponentTransformationChanged,
                NotificationName::ComponentChanged,
            ]
        );
        assert!(component.is_dirty());
    }

    #[test]
    fn test_move_keeps_scale() {
        let mut notifier = Notifier::new();
        let mut component =
            Component::new().with_transformation(Affine::new([2.0, 0.5, 0.0, 3.0, 0.0, 0.0]));

        component.move_by(Vec2::new(1.0, 1.0), &mut notifier);
        assert_eq!(
            component.transformation().as_coeffs(),
            [2.0, 0.5, 0.0, 3.0, 1.0, 1.0]
        );

        // Zero move is a no-op
        component.set_dirty(false, &mut notifier);
        assert!(!component.move_by((0.0, 0.0), &mut notifier));
        assert!(!component.is_dirty());
    }

    #[test]
    fn test_set_dirty() {
        let (mut notifier, log) = recording_notifier();
        let mut component = Component::new();

        component.set_dirty(true, &mut notifier);
        assert!(component.is_dirty());
        assert_eq!(
            log.lock().unwrap()[0].data,
            NotificationData::Dirty {
                old: false,
                new: true,
            }
        );

        component.set_dirty(false, &mut notifier);
        assert!(!component.is_dirty());
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_detached_identifier_uses_given_scope() {
        let mut notifier = Notifier::new();
        let mut scope = IdentifierScope::new();
        let mut component = Component::new();

        let identifier = Identifier::new("c1").unwrap();
        component
            .set_identifier(Some(identifier.clone()), &mut scope, &mut notifier)
            .unwrap();
        assert_eq!(component.identifier(), Some(&identifier));
        assert!(scope.contains("c1"));

        let generated = component.generate_identifier(&mut scope, &mut notifier).unwrap();
        assert!(!scope.contains("c1"));
        assert!(scope.contains(generated.as_str()));
    }

    #[test]
    fn test_draw_points_passes_identifier_when_supported() {
        let component = Component::new()
            .with_base_glyph(name("A"))
            .with_transformation(Affine::translate((10.0, 0.0)))
            .with_identifier(Identifier::new("c1").unwrap());

        let mut pen = RecordingPointPen {
            accepts_identifiers: true,
            ..Default::default()
        };
        component.draw_points(&mut pen);

        assert_eq!(
            pen.components,
            vec![(
                Some(name("A")),
                Affine::translate((10.0, 0.0)),
                Some(Identifier::new("c1").unwrap()),
            )]
        );
    }

    #[test]
    fn test_draw_points_degrades_without_identifier_support() {
        let component = Component::new()
            .with_base_glyph(name("A"))
            .with_identifier(Identifier::new("c1").unwrap());

        let mut pen = RecordingPointPen::default();
        component.draw_points(&mut pen);

        assert_eq!(pen.components, vec![(Some(name("A")), Affine::IDENTITY, None)]);
    }

    #[test]
    fn test_detached_geometry_is_absent() {
        let font = Font::new();
        let component = Component::new().with_base_glyph(name("A"));

        assert!(component.glyph(&font).is_none());
        assert!(component.layer(&font).is_none());
        assert!(component.layer_set(&font).is_none());
        assert!(component.font(&font).is_none());
        assert!(component.identifiers(&font).is_empty());
        assert_eq!(component.bounds(&font), None);
        assert_eq!(component.control_point_bounds(&font), None);
        assert!(!component.point_inside(&font, Point::new(0.0, 0.0), false));
    }

    #[test]
    fn test_edit_handle_routes_through_scope() {
        let mut notifier = Notifier::new();
        let mut glyph = Glyph::new(name("Aacute"));
        glyph.append_component(Component::new().with_base_glyph(name("A")));

        let mut edit = glyph.edit_component(0, &mut notifier).unwrap();
        assert!(edit.move_by((1.0, 2.0)));
        assert!(edit.set_base_glyph(Some(name("B"))));
        let generated = edit.generate_identifier().unwrap();
        assert!(edit.identifiers().contains(generated.as_str()));
        edit.set_dirty(false);
        assert!(!edit.component().is_dirty());

        assert!(glyph.identifiers().contains(generated.as_str()));
        assert_eq!(glyph.components()[0].base_glyph(), Some(&name("B")));
    }
}
