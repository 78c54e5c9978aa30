//! Error types for the object layer
//!
//! Graph mutations that can violate an invariant return [`ObjectResult`].
//! Missing context (a detached component, a dangling base glyph) is never
//! an error: queries answer with `None` or `false` instead.

use crate::objects::identifiable::Identifier;
use thiserror::Error;

/// Result alias used across the object graph
pub type ObjectResult<T> = Result<T, ObjectError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// The identifier is already held by another object in the same glyph.
    ///
    /// This is a programming error on the caller's side: check
    /// `identifiers()` first or let the scope generate a fresh identifier.
    #[error("identifier '{0}' is already in use in this glyph")]
    DuplicateIdentifier(Identifier),

    #[error("'{0}' is not a valid identifier (1-100 printable ASCII characters)")]
    InvalidIdentifier(String),

    #[error("'{0}' is not a valid glyph name")]
    InvalidGlyphName(String),

    #[error("glyph '{0}' not found")]
    GlyphNotFound(String),

    #[error("layer '{0}' not found")]
    LayerNotFound(String),

    #[error("a glyph named '{0}' already exists in this layer")]
    GlyphExists(String),

    #[error("a layer named '{0}' already exists")]
    LayerExists(String),

    #[error("the default layer '{0}' cannot be removed")]
    DefaultLayerRemoval(String),

    #[error("glyph '{glyph}' has no component at index {index}")]
    ComponentIndexOutOfRange { glyph: String, index: usize },

    #[error("glyph '{glyph}' has no contour at index {index}")]
    ContourIndexOutOfRange { glyph: String, index: usize },
}
