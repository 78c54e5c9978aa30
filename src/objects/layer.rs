//! Layers and layer sets

use crate::core::errors::{ObjectError, ObjectResult};
use crate::geometry::{GlyphSet, Pen};
use crate::objects::glyph::Glyph;
use crate::objects::GlyphName;
use std::collections::BTreeMap;
use tracing::debug;

/// Name of the default layer in UFO sources
pub const DEFAULT_LAYER_NAME: &str = "public.default";

/// A named set of glyphs. Components resolve their base glyphs within the
/// layer of the glyph that holds them.
#[derive(Debug)]
pub struct Layer {
    name: GlyphName,
    glyphs: BTreeMap<String, Glyph>,
}

impl Layer {
    pub fn new(name: GlyphName) -> Self {
        Self {
            name,
            glyphs: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &GlyphName {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Glyph> {
        self.glyphs.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.glyphs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyphs in name order
    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.values()
    }

    /// Add a glyph, replacing (and returning) any glyph of the same name
    pub fn insert_glyph(&mut self, mut glyph: Glyph) -> Option<Glyph> {
        glyph.set_layer(Some(self.name.clone()));
        let replaced = self.glyphs.insert(glyph.name().to_string(), glyph);
        replaced.map(|mut old| {
            old.set_layer(None);
            old
        })
    }

    /// Create an empty glyph, or return the existing one with that name
    pub fn new_glyph(&mut self, name: GlyphName) -> &mut Glyph {
        let layer = self.name.clone();
        self.glyphs.entry(name.to_string()).or_insert_with(|| {
            let mut glyph = Glyph::new(name);
            glyph.set_layer(Some(layer));
            glyph
        })
    }

    pub fn remove_glyph(&mut self, name: &str) -> Option<Glyph> {
        let mut glyph = self.glyphs.remove(name)?;
        glyph.set_layer(None);
        Some(glyph)
    }

    /// Rename a glyph. Its components follow it; references to the old name
    /// from other glyphs are left as they are.
    pub fn rename_glyph(&mut self, old: &str, new: GlyphName) -> ObjectResult<()> {
        if old == new.as_str() {
            return Ok(());
        }
        if self.glyphs.contains_key(new.as_str()) {
            return Err(ObjectError::GlyphExists(new.to_string()));
        }
        let mut glyph = self
            .glyphs
            .remove(old)
            .ok_or_else(|| ObjectError::GlyphNotFound(old.to_string()))?;
        debug!("Renaming glyph '{}' to '{}' in layer '{}'", old, new, self.name);
        glyph.set_name(new.clone());
        self.glyphs.insert(new.to_string(), glyph);
        Ok(())
    }
}

impl GlyphSet for Layer {
    fn draw_glyph(&self, name: &str, pen: &mut dyn Pen) -> bool {
        match self.get(name) {
            Some(glyph) => {
                glyph.draw(pen);
                true
            }
            None => false,
        }
    }
}

/// The layers of a font, one of which is the default
#[derive(Debug)]
pub struct LayerSet {
    layers: Vec<Layer>,
    default_layer: GlyphName,
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerSet {
    /// A layer set holding only an empty default layer
    pub fn new() -> Self {
        let default_layer: GlyphName = GlyphName::new(DEFAULT_LAYER_NAME)
            .unwrap_or_else(|_| unreachable!("default layer name is valid"));
        Self {
            layers: vec![Layer::new(default_layer.clone())],
            default_layer,
        }
    }

    /// Build from existing layers. The first layer becomes the default
    /// unless one is named `public.default`.
    pub(crate) fn from_layers(layers: Vec<Layer>, default_layer: Option<GlyphName>) -> Self {
        if layers.is_empty() {
            return Self::new();
        }
        let default_layer = default_layer
            .filter(|name| layers.iter().any(|layer| layer.name() == name))
            .or_else(|| {
                layers
                    .iter()
                    .find(|layer| layer.name().as_str() == DEFAULT_LAYER_NAME)
                    .map(|layer| layer.name().clone())
            })
            .unwrap_or_else(|| layers[0].name().clone());
        Self {
            layers,
            default_layer,
        }
    }

    pub fn default_layer(&self) -> &Layer {
        self.layers
            .iter()
            .find(|layer| layer.name() == &self.default_layer)
            .unwrap_or(&self.layers[0])
    }

    pub fn default_layer_mut(&mut self) -> &mut Layer {
        let index = self
            .layers
            .iter()
            .position(|layer| layer.name() == &self.default_layer)
            .unwrap_or(0);
        &mut self.layers[index]
    }

    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name().as_str() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|layer| layer.name().as_str() == name)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &GlyphName> {
        self.layers.iter().map(Layer::name)
    }

    /// Add an empty layer
    pub fn new_layer(&mut self, name: GlyphName) -> ObjectResult<&mut Layer> {
        if self.get(name.as_str()).is_some() {
            return Err(ObjectError::LayerExists(name.to_string()));
        }
        self.layers.push(Layer::new(name));
        let index = self.layers.len() - 1;
        Ok(&mut self.layers[index])
    }

    /// Remove a layer. The default layer cannot be removed.
    pub fn remove_layer(&mut self, name: &str) -> ObjectResult<Layer> {
        if name == self.default_layer.as_str() {
            return Err(ObjectError::DefaultLayerRemoval(name.to_string()));
        }
        let index = self
            .layers
            .iter()
            .position(|layer| layer.name().as_str() == name)
            .ok_or_else(|| ObjectError::LayerNotFound(name.to_string()))?;
        let mut layer = self.layers.remove(index);
        // Detach the glyphs so their components no longer resolve
        for glyph in layer.glyphs.values_mut() {
            glyph.set_layer(None);
        }
        Ok(layer)
    }
}
