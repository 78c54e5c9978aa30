//! The component object graph
//!
//! A [`Font`] owns a [`LayerSet`]; layers own glyphs; glyphs own their
//! components and the identifier scope those components share. Components
//! refer back to their glyph through a [`ComponentParent`] key, never a
//! strong reference.

pub mod component;
pub mod contour;
pub mod font;
pub mod glyph;
pub mod identifiable;
pub mod layer;
pub mod notifications;

/// Validated glyph (and layer) name
pub type GlyphName = norad::Name;

// Re-export commonly used items
pub use component::{Component, ComponentEdit, ComponentParent};
pub use contour::Contour;
pub use font::Font;
pub use glyph::Glyph;
pub use identifiable::{Identifiable, Identifier, IdentifierScope};
pub use layer::{Layer, LayerSet, DEFAULT_LAYER_NAME};
pub use notifications::{
    Notification, NotificationData, NotificationName, Notifier, ObjectId, ObserverId,
};
