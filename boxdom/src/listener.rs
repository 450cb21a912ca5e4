// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener handles and the per-element listener registry.

use core::cell::Cell;
use core::fmt;
use alloc::rc::Rc;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::DomError;
use crate::event::Event;

/// What a listener returns.
pub type ListenerResult = Result<(), DomError>;

/// A shared, identity-compared event callback.
///
/// Registration and removal match listeners by identity, so keep a clone of
/// the handle to remove it later.
///
/// A listener should reach its own element through
/// [`Event::current_target`] or a [`WeakElement`](crate::WeakElement).
/// Capturing a strong [`Element`](crate::Element) in a listener registered
/// on that element keeps both alive for good.
///
/// ```
/// use boxdom::Listener;
///
/// let a = Listener::from_fn(|_| {});
/// let b = a.clone();
/// let c = Listener::from_fn(|_| {});
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&mut Event) -> ListenerResult>);

impl Listener {
    /// A fallible listener. Errors abort the dispatch and reach its caller.
    pub fn new(f: impl Fn(&mut Event) -> ListenerResult + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// An infallible listener.
    pub fn from_fn(f: impl Fn(&mut Event) + 'static) -> Self {
        Self::new(move |event| {
            f(event);
            Ok(())
        })
    }

    /// Invoke the callback.
    pub fn call(&self, event: &mut Event) -> ListenerResult {
        (self.0)(event)
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// One registration.
///
/// `removed` is shared with in-flight dispatch snapshots so a removal takes
/// effect for the rest of the current dispatch too.
pub(crate) struct ListenerEntry {
    listener: Listener,
    use_capture: bool,
    removed: Cell<bool>,
}

impl ListenerEntry {
    pub(crate) fn listener(&self) -> &Listener {
        &self.listener
    }

    pub(crate) fn is_removed(&self) -> bool {
        self.removed.get()
    }
}

/// Snapshot of the listeners matching one (type, phase) pair.
pub(crate) type ListenerSnapshot = SmallVec<[Rc<ListenerEntry>; 4]>;

/// Ordered registrations keyed by event type.
///
/// Duplicates are allowed and kept in registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    by_type: HashMap<String, Vec<Rc<ListenerEntry>>>,
}

impl ListenerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration. An absent listener is ignored.
    pub fn add(
        &mut self,
        event_type: &str,
        listener: impl Into<Option<Listener>>,
        use_capture: bool,
    ) {
        let Some(listener) = listener.into() else {
            return;
        };
        self.by_type
            .entry_ref(event_type)
            .or_default()
            .push(Rc::new(ListenerEntry {
                listener,
                use_capture,
                removed: Cell::new(false),
            }));
    }

    /// Remove the first registration with this exact listener and capture flag.
    ///
    /// Returns `false` if nothing matched; an absent listener matches nothing.
    pub fn remove<'a>(
        &mut self,
        event_type: &str,
        listener: impl Into<Option<&'a Listener>>,
        use_capture: bool,
    ) -> bool {
        let Some(listener) = listener.into() else {
            return false;
        };
        let Some(entries) = self.by_type.get_mut(event_type) else {
            return false;
        };
        let Some(index) = entries
            .iter()
            .position(|e| e.use_capture == use_capture && e.listener.ptr_eq(listener))
        else {
            return false;
        };
        let entry = entries.remove(index);
        entry.removed.set(true);
        if entries.is_empty() {
            self.by_type.remove(event_type);
        }
        true
    }

    /// Whether this exact registration exists.
    pub fn contains(&self, event_type: &str, listener: &Listener, use_capture: bool) -> bool {
        self.by_type.get(event_type).is_some_and(|entries| {
            entries
                .iter()
                .any(|e| e.use_capture == use_capture && e.listener.ptr_eq(listener))
        })
    }

    /// Number of registrations for a type, both phases.
    pub fn count(&self, event_type: &str) -> usize {
        self.by_type.get(event_type).map_or(0, Vec::len)
    }

    /// Whether the registry holds nothing.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Registrations for `event_type` whose capture flag equals `capture`, in order.
    pub(crate) fn matching(&self, event_type: &str, capture: bool) -> ListenerSnapshot {
        self.by_type
            .get(event_type)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.use_capture == capture)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.by_type.iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}
