//! The document root

use crate::core::config::Settings;
use crate::core::errors::{ObjectError, ObjectResult};
use crate::objects::component::ComponentEdit;
use crate::objects::glyph::Glyph;
use crate::objects::layer::{Layer, LayerSet};
use crate::objects::notifications::Notifier;

/// A font document: the layer set plus the notifier every object in the
/// document posts to.
///
/// Wrap a `Font` in a `Mutex` to share it across threads; every mutation
/// (identifier changes included) then runs inside that one lock.
#[derive(Debug, Default)]
pub struct Font {
    layers: LayerSet,
    notifier: Notifier,
    settings: Settings,
}

impl Font {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub(crate) fn from_layers(layers: LayerSet) -> Self {
        Self {
            layers,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerSet {
        &mut self.layers
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub fn default_layer(&self) -> &Layer {
        self.layers.default_layer()
    }

    pub fn default_layer_mut(&mut self) -> &mut Layer {
        self.layers.default_layer_mut()
    }

    pub fn glyph(&self, layer: &str, name: &str) -> Option<&Glyph> {
        self.layers.get(layer)?.get(name)
    }

    pub fn glyph_mut(&mut self, layer: &str, name: &str) -> Option<&mut Glyph> {
        self.layers.get_mut(layer)?.get_mut(name)
    }

    /// Edit a component in place, with the owning glyph's identifier scope
    /// and this font's notifier.
    pub fn edit_component(
        &mut self,
        layer: &str,
        glyph: &str,
        index: usize,
    ) -> ObjectResult<ComponentEdit<'_>> {
        let Font {
            layers, notifier, ..
        } = self;
        let layer = layers
            .get_mut(layer)
            .ok_or_else(|| ObjectError::LayerNotFound(layer.to_string()))?;
        let glyph = layer
            .get_mut(glyph)
            .ok_or_else(|| ObjectError::GlyphNotFound(glyph.to_string()))?;
        glyph.edit_component(index, notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::component::Component;
    use crate::objects::notifications::{Notification, NotificationName};
    use crate::objects::GlyphName;
    use std::sync::{Arc, Mutex};

    fn name(value: &str) -> GlyphName {
        value.parse().unwrap()
    }

    #[test]
    fn test_new_font_has_default_layer() {
        let font = Font::new();
        assert_eq!(font.layers().len(), 1);
        assert_eq!(font.default_layer().name().as_str(), "public.default");
        assert_eq!(font.notifier().observer_count(), 0);
        assert_eq!(font.settings(), &Settings::default());
    }

    #[test]
    fn test_edit_component_posts_to_font_notifier() {
        let mut font = Font::new();
        font.default_layer_mut()
            .new_glyph(name("Aacute"))
            .append_component(Component::new().with_base_glyph(name("A")));

        let log: Arc<Mutex<Vec<Notification>>> = Arc::default();
        let sink = log.clone();
        font.notifier_mut().subscribe(
            Some(NotificationName::ComponentTransformationChanged),
            None,
            move |n| sink.lock().unwrap().push(n.clone()),
        );

        let mut edit = font.edit_component("public.default", "Aacute", 0).unwrap();
        assert!(edit.move_by((10.0, 0.0)));
        assert_eq!(log.lock().unwrap().len(), 1);

        let component = &font.glyph("public.default", "Aacute").unwrap().components()[0];
        assert_eq!(component.transformation().as_coeffs()[4], 10.0);
        assert!(component.glyph(&font).is_some());
    }

    #[test]
    fn test_edit_component_lookup_errors() {
        let mut font = Font::new();
        font.default_layer_mut().new_glyph(name("A"));

        assert!(matches!(
            font.edit_component("background", "A", 0),
            Err(ObjectError::LayerNotFound(_))
        ));
        assert!(matches!(
            font.edit_component("public.default", "B", 0),
            Err(ObjectError::GlyphNotFound(_))
        ));
        assert!(matches!(
            font.edit_component("public.default", "A", 0),
            Err(ObjectError::ComponentIndexOutOfRange { .. })
        ));
    }
}
