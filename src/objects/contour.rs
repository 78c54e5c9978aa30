//! Outline contours together with the identifiers they hold

use crate::objects::identifiable::Identifier;
use kurbo::BezPath;

/// One contour of a glyph outline.
///
/// The identifiers of the contour and of its points are kept here so the
/// glyph can release them from its scope when the contour goes away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    path: BezPath,
    identifier: Option<Identifier>,
    point_identifiers: Vec<Identifier>,
}

impl From<BezPath> for Contour {
    fn from(path: BezPath) -> Self {
        Self::new(path)
    }
}

impl Contour {
    pub fn new(path: BezPath) -> Self {
        Self {
            path,
            identifier: None,
            point_identifiers: Vec::new(),
        }
    }

    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn with_point_identifiers(mut self, identifiers: Vec<Identifier>) -> Self {
        self.point_identifiers = identifiers;
        self
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    pub fn point_identifiers(&self) -> &[Identifier] {
        &self.point_identifiers
    }

    /// Contour identifier first, then point identifiers in point order
    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.identifier.iter().chain(self.point_identifiers.iter())
    }

    /// Keep only the identifiers `keep` accepts. Used when the contour
    /// joins a glyph whose scope already holds some of them.
    pub(crate) fn retain_identifiers(&mut self, mut keep: impl FnMut(&Identifier) -> bool) {
        if let Some(identifier) = &self.identifier {
            if !keep(identifier) {
                self.identifier = None;
            }
        }
        self.point_identifiers.retain(|identifier| keep(identifier));
    }
}
