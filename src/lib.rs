//! Bezy object layer
//!
//! Glyph components and the object graph around them: scoped identifiers,
//! synchronous change notifications and outline geometry resolved through
//! pens.
pub mod core;
pub mod data;
pub mod geometry;
pub mod logging;
pub mod objects;

pub use crate::core::errors::{ObjectError, ObjectResult};
pub use crate::objects::{Component, Font, Glyph, GlyphName, Identifier, Layer, Notifier};
