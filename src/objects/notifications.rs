//! Synchronous change notifications
//!
//! Objects post typed notifications to a [`Notifier`] owned by their
//! document. Observers are called in subscription order, on the caller's
//! stack, before the mutating call returns. There is no queue: an observer
//! always sees the object in the state the notification describes.

use crate::objects::identifiable::Identifier;
use crate::objects::GlyphName;
use kurbo::Affine;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of a graph node, used as notification sender
/// and for parent liveness checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Notification channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationName {
    /// Fires after every specific component notification and on `set_dirty(true)`
    ComponentChanged,
    ComponentBaseGlyphChanged,
    ComponentTransformationChanged,
    ComponentIdentifierChanged,
}

impl NotificationName {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationName::ComponentChanged => "Component.Changed",
            NotificationName::ComponentBaseGlyphChanged => "Component.BaseGlyphChanged",
            NotificationName::ComponentTransformationChanged => {
                "Component.TransformationChanged"
            }
            NotificationName::ComponentIdentifierChanged => "Component.IdentifierChanged",
        }
    }

    /// The generic "something changed" channel of the same object family
    pub fn changed(self) -> NotificationName {
        match self {
            NotificationName::ComponentChanged
            | NotificationName::ComponentBaseGlyphChanged
            | NotificationName::ComponentTransformationChanged
            | NotificationName::ComponentIdentifierChanged => NotificationName::ComponentChanged,
        }
    }
}

impl fmt::Display for NotificationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Old and new value of whatever changed
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationData {
    BaseGlyph {
        old: Option<GlyphName>,
        new: Option<GlyphName>,
    },
    Transformation {
        old: Affine,
        new: Affine,
    },
    Identifier {
        old: Option<Identifier>,
        new: Option<Identifier>,
    },
    Dirty {
        old: bool,
        new: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub name: NotificationName,
    pub sender: ObjectId,
    pub data: NotificationData,
}

/// Handle returned by [`Notifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Box<dyn FnMut(&Notification) + Send>;

struct Observer {
    id: ObserverId,
    name: Option<NotificationName>,
    sender: Option<ObjectId>,
    callback: Callback,
}

impl Observer {
    fn wants(&self, notification: &Notification) -> bool {
        self.name.is_none_or(|name| name == notification.name)
            && self.sender.is_none_or(|sender| sender == notification.sender)
    }
}

/// Per-document observer list
#[derive(Default)]
pub struct Notifier {
    observers: Vec<Observer>,
    next_observer: u64,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    ///
    /// `name` and `sender` narrow what the observer receives; `None` means
    /// "any". Filtering never looks at the payload.
    pub fn subscribe<F>(
        &mut self,
        name: Option<NotificationName>,
        sender: Option<ObjectId>,
        callback: F,
    ) -> ObserverId
    where
        F: FnMut(&Notification) + Send + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push(Observer {
            id,
            name,
            sender,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|observer| observer.id != id);
        self.observers.len() != before
    }

    pub fn is_subscribed(&self, id: ObserverId) -> bool {
        self.observers.iter().any(|observer| observer.id == id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Deliver a notification to every matching observer, in subscription order
    pub fn post(&mut self, notification: &Notification) {
        tracing::trace!(
            "posting {} from object {}",
            notification.name,
            notification.sender.get()
        );
        for observer in &mut self.observers {
            if observer.wants(notification) {
                (observer.callback)(notification);
            }
        }
    }

    /// Post a specific notification followed by its family's `Changed`
    /// notification carrying the same payload.
    pub fn post_change(
        &mut self,
        name: NotificationName,
        sender: ObjectId,
        data: NotificationData,
    ) {
        let changed = name.changed();
        let mut notification = Notification { name, sender, data };
        self.post(&notification);
        if changed != name {
            notification.name = changed;
            self.post(&notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn dirty(sender: ObjectId) -> Notification {
        Notification {
            name: NotificationName::ComponentChanged,
            sender,
            data: NotificationData::Dirty {
                old: false,
                new: true,
            },
        }
    }

    #[test]
    fn test_object_ids_are_unique() {
        let a = ObjectId::next();
        let b = ObjectId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::new();

        for tag in ["first", "second", "third"] {
            let log = log.clone();
            notifier.subscribe(None, None, move |_| log.lock().unwrap().push(tag));
        }

        notifier.post(&dirty(ObjectId::next()));
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_filters_by_name_and_sender() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::new();
        let watched = ObjectId::next();
        let other = ObjectId::next();

        let sink = hits.clone();
        notifier.subscribe(
            Some(NotificationName::ComponentTransformationChanged),
            None,
            move |n| sink.lock().unwrap().push(("by-name", n.sender)),
        );
        let sink = hits.clone();
        notifier.subscribe(None, Some(watched), move |n| {
            sink.lock().unwrap().push(("by-sender", n.sender))
        });

        notifier.post(&dirty(other));
        assert!(hits.lock().unwrap().is_empty());

        notifier.post(&dirty(watched));
        assert_eq!(*hits.lock().unwrap(), vec![("by-sender", watched)]);
    }

    #[test]
    fn test_post_change_adds_changed() {
        let names = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::new();
        let sink = names.clone();
        notifier.subscribe(None, None, move |n| sink.lock().unwrap().push(n.name));

        notifier.post_change(
            NotificationName::ComponentTransformationChanged,
            ObjectId::next(),
            NotificationData::Transformation {
                old: Affine::IDENTITY,
                new: Affine::translate((10.0, 0.0)),
            },
        );

        assert_eq!(
            *names.lock().unwrap(),
            vec![
                NotificationName::ComponentTransformationChanged,
                NotificationName::ComponentChanged,
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let count = Arc::new(Mutex::new(0));
        let mut notifier = Notifier::new();
        let sink = count.clone();
        let id = notifier.subscribe(None, None, move |_| *sink.lock().unwrap() += 1);

        assert!(notifier.is_subscribed(id));
        notifier.post(&dirty(ObjectId::next()));
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.post(&dirty(ObjectId::next()));

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(notifier.observer_count(), 0);
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(
            NotificationName::ComponentIdentifierChanged.to_string(),
            "Component.IdentifierChanged"
        );
        assert_eq!(
            NotificationName::ComponentBaseGlyphChanged.changed(),
            NotificationName::ComponentChanged
        );
    }
}
