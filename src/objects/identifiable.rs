//! Glyph-scoped identifiers
//!
//! Points, contours and components of one glyph share a single identifier
//! namespace, the glyph's [`IdentifierScope`]. Every identifiable object goes
//! through [`set_identifier`], which checks, releases and reserves inside
//! one `&mut` borrow of the scope so the uniqueness check and the insert
//! cannot be separated.

use crate::core::errors::{ObjectError, ObjectResult};
use crate::objects::notifications::{NotificationData, NotificationName, Notifier, ObjectId};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Maximum identifier length allowed by UFO 3
pub const MAX_IDENTIFIER_LENGTH: usize = 100;

/// Length of identifiers produced by [`make_random_identifier`]
const GENERATED_IDENTIFIER_LENGTH: usize = 10;

/// A validated object identifier: 1 to 100 characters in 0x20..=0x7E
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> ObjectResult<Self> {
        let value = value.into();
        if is_valid_identifier(&value) {
            Ok(Self(value))
        } else {
            Err(ObjectError::InvalidIdentifier(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_IDENTIFIER_LENGTH
        && value.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

impl FromStr for Identifier {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The set of identifiers in use within one glyph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierScope {
    identifiers: BTreeSet<Identifier>,
}

static EMPTY_SCOPE: IdentifierScope = IdentifierScope::new();

impl IdentifierScope {
    pub const fn new() -> Self {
        Self {
            identifiers: BTreeSet::new(),
        }
    }

    /// Shared empty scope, handed out when no owning glyph can be resolved
    pub fn empty() -> &'static IdentifierScope {
        &EMPTY_SCOPE
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Identifiers in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.identifiers.iter()
    }

    /// Reserve an identifier. Returns false if it was already taken.
    pub fn insert(&mut self, identifier: Identifier) -> bool {
        self.identifiers.insert(identifier)
    }

    /// Release an identifier. Returns false if it was not reserved.
    pub fn remove(&mut self, identifier: &str) -> bool {
        self.identifiers.remove(identifier)
    }

    /// Swap `old` for `new` in one step.
    ///
    /// Fails without touching the scope if `new` is already reserved.
    pub fn transfer(
        &mut self,
        old: Option<&Identifier>,
        new: Option<&Identifier>,
    ) -> ObjectResult<()> {
        if let Some(new) = new {
            if self.contains(new.as_str()) {
                return Err(ObjectError::DuplicateIdentifier(new.clone()));
            }
        }
        if let Some(old) = old {
            self.remove(old.as_str());
        }
        if let Some(new) = new {
            self.insert(new.clone());
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a IdentifierScope {
    type Item = &'a Identifier;
    type IntoIter = std::collections::btree_set::Iter<'a, Identifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.identifiers.iter()
    }
}

/// Produce a random identifier that is not in `existing`
pub fn make_random_identifier<R: Rng + ?Sized>(
    existing: &IdentifierScope,
    rng: &mut R,
) -> Identifier {
    loop {
        let candidate: String = (&mut *rng)
            .sample_iter(Alphanumeric)
            .take(GENERATED_IDENTIFIER_LENGTH)
            .map(char::from)
            .collect();
        if !existing.contains(&candidate) {
            return Identifier(candidate);
        }
    }
}

/// Capability shared by graph nodes that carry a glyph-scoped identifier
pub trait Identifiable {
    /// Channel posted to when the identifier changes
    const IDENTIFIER_CHANGED: NotificationName;

    fn object_id(&self) -> ObjectId;

    fn identifier(&self) -> Option<&Identifier>;

    /// Raw store with no bookkeeping. Callers go through [`set_identifier`].
    fn store_identifier(&mut self, identifier: Option<Identifier>);

    /// Set the dirty flag without posting
    fn mark_dirty(&mut self);
}

/// Assign an identifier, keeping `scope` in sync.
///
/// Returns `Ok(false)` when `new` equals the current identifier (nothing is
/// posted, the dirty flag is untouched). Fails with
/// [`ObjectError::DuplicateIdentifier`] if `new` is held by another object in
/// the scope, leaving both the object and the scope unchanged.
pub fn set_identifier<T: Identifiable + ?Sized>(
    item: &mut T,
    new: Option<Identifier>,
    scope: &mut IdentifierScope,
    notifier: &mut Notifier,
) -> ObjectResult<bool> {
    let old = item.identifier().cloned();
    if new == old {
        return Ok(false);
    }

    scope.transfer(old.as_ref(), new.as_ref())?;
    item.store_identifier(new.clone());
    item.mark_dirty();

    debug!(
        "object {} identifier {:?} -> {:?}",
        item.object_id().get(),
        old,
        new
    );
    notifier.post_change(
        T::IDENTIFIER_CHANGED,
        item.object_id(),
        NotificationData::Identifier { old, new },
    );
    Ok(true)
}

/// Assign a freshly generated identifier that is unique within `scope`
pub fn generate_identifier<T: Identifiable + ?Sized>(
    item: &mut T,
    scope: &mut IdentifierScope,
    notifier: &mut Notifier,
) -> ObjectResult<Identifier> {
    let identifier = make_random_identifier(scope, &mut rand::thread_rng());
    set_identifier(item, Some(identifier.clone()), scope, notifier)?;
    Ok(identifier)
}
