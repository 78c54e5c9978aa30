//! Glyphs: outline contours, components and the shared identifier scope

use crate::core::errors::{ObjectError, ObjectResult};
use crate::geometry::Pen;
use crate::objects::component::{Component, ComponentEdit, ComponentParent};
use crate::objects::contour::Contour;
use crate::objects::identifiable::IdentifierScope;
use crate::objects::notifications::{Notifier, ObjectId};
use crate::objects::GlyphName;
use kurbo::PathEl;
use tracing::debug;

#[derive(Debug)]
pub struct Glyph {
    id: ObjectId,
    name: GlyphName,
    layer: Option<GlyphName>,
    pub width: f64,
    contours: Vec<Contour>,
    components: Vec<Component>,
    identifiers: IdentifierScope,
}

impl Glyph {
    pub fn new(name: GlyphName) -> Self {
        Self {
            id: ObjectId::next(),
            name,
            layer: None,
            width: 0.0,
            contours: Vec::new(),
            components: Vec::new(),
            identifiers: IdentifierScope::new(),
        }
    }

    pub fn object_id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &GlyphName {
        &self.name
    }

    /// Name of the layer holding this glyph, if it is in one
    pub fn layer_name(&self) -> Option<&GlyphName> {
        self.layer.as_ref()
    }

    /// Identifiers in use by this glyph's components, contours and points
    pub fn identifiers(&self) -> &IdentifierScope {
        &self.identifiers
    }

    pub(crate) fn identifiers_mut(&mut self) -> &mut IdentifierScope {
        &mut self.identifiers
    }

    pub(crate) fn set_name(&mut self, name: GlyphName) {
        self.name = name;
        self.restamp_components();
    }

    pub(crate) fn set_layer(&mut self, layer: Option<GlyphName>) {
        self.layer = layer;
        self.restamp_components();
    }

    fn parent_link(&self) -> ComponentParent {
        ComponentParent {
            layer: self.layer.clone(),
            glyph: self.name.clone(),
        }
    }

    fn restamp_components(&mut self) {
        let link = self.parent_link();
        for component in &mut self.components {
            component.set_parent(Some(link.clone()));
        }
    }

    // --------
    // Contours
    // --------

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Append a contour, registering its identifiers in this glyph's scope.
    /// Identifiers that are already taken are dropped from the contour.
    /// Returns the index used.
    pub fn add_contour(&mut self, contour: impl Into<Contour>) -> usize {
        let mut contour = contour.into();
        let Glyph {
            name, identifiers, ..
        } = self;
        contour.retain_identifiers(|identifier| {
            let inserted = identifiers.insert(identifier.clone());
            if !inserted {
                debug!(
                    "Glyph '{}' already uses identifier '{}'; dropping it from the added contour",
                    name, identifier
                );
            }
            inserted
        });
        self.contours.push(contour);
        self.contours.len() - 1
    }

    /// Take a contour out of the glyph, releasing its contour and point
    /// identifiers from this glyph's scope
    pub fn remove_contour(&mut self, index: usize) -> ObjectResult<Contour> {
        if index >= self.contours.len() {
            return Err(ObjectError::ContourIndexOutOfRange {
                glyph: self.name.to_string(),
                index,
            });
        }
        let contour = self.contours.remove(index);
        for identifier in contour.identifiers() {
            self.identifiers.remove(identifier.as_str());
        }
        Ok(contour)
    }

    /// Remove every contour, releasing all their identifiers
    pub fn clear_contours(&mut self) -> Vec<Contour> {
        let removed = std::mem::take(&mut self.contours);
        for identifier in removed.iter().flat_map(Contour::identifiers) {
            self.identifiers.remove(identifier.as_str());
        }
        removed
    }

    // ----------
    // Components
    // ----------

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn contains_component(&self, id: ObjectId) -> bool {
        self.component_index(id).is_some()
    }

    pub fn component_index(&self, id: ObjectId) -> Option<usize> {
        self.components
            .iter()
            .position(|component| component.object_id() == id)
    }

    pub fn append_component(&mut self, component: Component) -> usize {
        self.insert_component(self.components.len(), component)
    }

    /// Insert a component, taking ownership of it.
    ///
    /// A preset identifier is registered in this glyph's scope; if it is
    /// already taken, the component loses it. `index` is clamped to the
    /// current component count. Returns the index used.
    pub fn insert_component(&mut self, index: usize, mut component: Component) -> usize {
        if let Some(identifier) = component.identifier().cloned() {
            if !self.identifiers.insert(identifier.clone()) {
                debug!(
                    "Glyph '{}' already uses identifier '{}'; dropping it from the component",
                    self.name, identifier
                );
                component.discard_identifier();
            }
        }
        component.set_parent(Some(self.parent_link()));

        let index = index.min(self.components.len());
        self.components.insert(index, component);
        index
    }

    /// Take a component out of the glyph, releasing its identifier from
    /// this glyph's scope. The returned component is detached but keeps its
    /// identifier value.
    pub fn remove_component(&mut self, index: usize) -> ObjectResult<Component> {
        if index >= self.components.len() {
            return Err(self.out_of_range(index));
        }
        let mut component = self.components.remove(index);
        if let Some(identifier) = component.identifier() {
            self.identifiers.remove(identifier.as_str());
        }
        component.set_parent(None);
        Ok(component)
    }

    /// Remove every component, releasing all their identifiers
    pub fn clear_components(&mut self) -> Vec<Component> {
        let mut removed = Vec::with_capacity(self.components.len());
        while !self.components.is_empty() {
            if let Ok(component) = self.remove_component(self.components.len() - 1) {
                removed.push(component);
            }
        }
        removed.reverse();
        removed
    }

    /// Edit the component at `index` against this glyph's identifier scope
    pub fn edit_component<'a>(
        &'a mut self,
        index: usize,
        notifier: &'a mut Notifier,
    ) -> ObjectResult<ComponentEdit<'a>> {
        if index >= self.components.len() {
            return Err(self.out_of_range(index));
        }
        let Glyph {
            components,
            identifiers,
            ..
        } = self;
        Ok(ComponentEdit::new(&mut components[index], identifiers, notifier))
    }

    fn out_of_range(&self, index: usize) -> ObjectError {
        ObjectError::ComponentIndexOutOfRange {
            glyph: self.name.to_string(),
            index,
        }
    }

    // -------
    // Drawing
    // -------

    /// Draw contours, then components
    pub fn draw(&self, pen: &mut dyn Pen) {
        for contour in &self.contours {
            let mut open = false;
            for el in contour.path().elements() {
                match *el {
                    PathEl::MoveTo(p) => {
                        if open {
                            pen.end_path();
                        }
                        pen.move_to(p);
                        open = true;
                    }
                    PathEl::LineTo(p) => pen.line_to(p),
                    PathEl::QuadTo(p1, p2) => pen.quad_to(p1, p2),
                    PathEl::CurveTo(p1, p2, p3) => pen.curve_to(p1, p2, p3),
                    PathEl::ClosePath => {
                        pen.close_path();
                        open = false;
                    }
                }
            }
            if open {
                pen.end_path();
            }
        }
        for component in &self.components {
            component.draw(pen);
        }
    }
}
