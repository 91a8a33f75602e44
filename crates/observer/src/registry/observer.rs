//! Observer<A, C>: named listener registry with synchronous emit.
//!
//! Each event name owns an ordered list of registrations. Delivery order is
//! registration order, and a given [`Listener`] appears at most once per name.
//!
//! Snapshot-on-emit semantics mean:
//!   - A listener removed *during* emission is still called in that round.
//!   - A listener added *during* emission is NOT called until the next emit.
//!
//! Once-listeners that fired are removed after the round, by registration ID,
//! so a handler re-registered mid-round keeps its new registration. Each
//! once-registration is claimed before it runs, so a nested or concurrent
//! emit of the same event cannot run it a second time.
//!
//! Panics inside a listener propagate to the caller and skip the rest of the
//! round. There is no error isolation at this level.
//!
//! All methods take `&self` (interior mutability via `parking_lot::Mutex`).
//! The lock is never held while a listener runs, so listeners may call
//! `on()`/`off()`/`emit()`/`reset()` on the same observer without deadlocking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::listener::{Entry, EntryId, Listener};
use super::snapshot::RegistrySnapshot;
use crate::error::{ObserverError, Result};

/// Registry of named event listeners.
///
/// `A` is the argument type passed to every listener of this registry (use a
/// tuple for several arguments). `C` is the context type listeners may be
/// bound to at emit time.
pub struct Observer<A, C = ()> {
    events: Mutex<IndexMap<String, Vec<Entry<A, C>>>>,
    next_id: AtomicU64,
}

impl<A, C> Observer<A, C> {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(IndexMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Register `listener` for `name`.
    ///
    /// Returns `Some(self)` for chaining, or `None` if nothing changed (empty
    /// name, or `listener` already registered for `name`).
    pub fn on(&self, name: &str, listener: &Listener<A, C>) -> Option<&Self> {
        self.try_on(name, listener).ok()
    }

    /// Like [`on`](Self::on), reporting why a call was a no-op.
    pub fn try_on(&self, name: &str, listener: &Listener<A, C>) -> Result<&Self> {
        self.insert(name, listener, false)
    }

    /// Register `listener` for `name`, to be removed after it first returns
    /// from an emit.
    ///
    /// If `listener` is already registered for `name` as a persistent
    /// listener, that registration becomes a once-registration in place.
    pub fn once(&self, name: &str, listener: &Listener<A, C>) -> Option<&Self> {
        self.try_once(name, listener).ok()
    }

    /// Like [`once`](Self::once), reporting why a call was a no-op.
    pub fn try_once(&self, name: &str, listener: &Listener<A, C>) -> Result<&Self> {
        self.insert(name, listener, true)
    }

    fn insert(&self, name: &str, listener: &Listener<A, C>, once: bool) -> Result<&Self> {
        if name.is_empty() {
            debug!("ignoring registration with empty event name");
            return Err(ObserverError::EmptyEventName);
        }

        let mut events = self.events.lock();
        let entries = events.entry(name.to_owned()).or_default();

        match entries.iter_mut().find(|e| e.listener == *listener) {
            Some(entry) if once && !entry.once => {
                entry.once = true;
                trace!(event = %name, entry = entry.id, "registration upgraded to once");
                Ok(self)
            }
            Some(entry) => {
                debug!(event = %name, entry = entry.id, "listener already registered");
                Err(ObserverError::DuplicateListener {
                    event: name.to_owned(),
                })
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                entries.push(Entry::new(id, listener.clone(), once));
                trace!(event = %name, entry = id, once, "listener registered");
                Ok(self)
            }
        }
    }

    /// Remove `listener` from `name`.
    ///
    /// Returns `None` if nothing changed. The event name stays known even when
    /// its last listener is removed.
    pub fn off(&self, name: &str, listener: &Listener<A, C>) -> Option<&Self> {
        self.try_off(name, listener).ok()
    }

    /// Like [`off`](Self::off), reporting why a call was a no-op.
    pub fn try_off(&self, name: &str, listener: &Listener<A, C>) -> Result<&Self> {
        if name.is_empty() {
            debug!("ignoring deregistration with empty event name");
            return Err(ObserverError::EmptyEventName);
        }

        let mut events = self.events.lock();
        let Some(entries) = events.get_mut(name) else {
            debug!(event = %name, "deregistration for unknown event");
            return Err(ObserverError::UnknownEvent {
                event: name.to_owned(),
            });
        };
        let Some(pos) = entries.iter().position(|e| e.listener == *listener) else {
            debug!(event = %name, "deregistration for unregistered listener");
            return Err(ObserverError::ListenerNotFound {
                event: name.to_owned(),
            });
        };

        let removed = entries.remove(pos);
        trace!(event = %name, entry = removed.id, "listener deregistered");
        Ok(self)
    }

    /// Drop every listener and forget every event name.
    pub fn reset(&self) {
        // Take the map out so listener drops run without the lock held.
        let old = std::mem::take(&mut *self.events.lock());
        debug!(events = old.len(), "registry reset");
    }

    // ------------------------------------------------------------------------
    // Emission
    // ------------------------------------------------------------------------

    /// Call every listener registered for `name`, in registration order, with
    /// `args` and the optional context `ctx`.
    ///
    /// Does nothing for an empty or unknown name. The same context is
    /// reborrowed for each listener, so changes made by one are visible to
    /// the next.
    pub fn emit(&self, name: &str, args: &A, mut ctx: Option<&mut C>) {
        if name.is_empty() {
            return;
        }

        // Snapshot under the lock (cheap: ref-count bumps), then release it.
        let snapshot: Vec<Entry<A, C>> = match self.events.lock().get(name) {
            Some(entries) => entries.clone(),
            None => return,
        };
        trace!(event = %name, listeners = snapshot.len(), "emitting");

        let mut sweep = OnceSweep {
            observer: self,
            name,
            fired: Vec::new(),
        };
        for entry in &snapshot {
            if !entry.once {
                entry.listener.call(ctx.as_deref_mut(), args);
                continue;
            }
            // Another pass (nested or on another thread) already ran it.
            let Some(claim) = entry.claim() else {
                continue;
            };
            entry.listener.call(ctx.as_deref_mut(), args);
            claim.keep();
            sweep.fired.push(entry.id);
        }
    }

    /// [`emit`](Self::emit) without a context.
    pub fn emit_args(&self, name: &str, args: &A) {
        self.emit(name, args, None);
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Known event names, in first-registration order.
    pub fn event_names(&self) -> Vec<String> {
        self.events.lock().keys().cloned().collect()
    }

    /// Number of listeners for `name`, or `None` if the name is unknown.
    pub fn listener_count(&self, name: &str) -> Option<usize> {
        self.events.lock().get(name).map(Vec::len)
    }

    pub fn contains(&self, name: &str, listener: &Listener<A, C>) -> bool {
        self.events
            .lock()
            .get(name)
            .is_some_and(|entries| entries.iter().any(|e| e.listener == *listener))
    }

    /// Whether `listener`'s registration under `name` is a once-registration,
    /// or `None` if it is not registered there.
    pub fn is_once(&self, name: &str, listener: &Listener<A, C>) -> Option<bool> {
        self.events
            .lock()
            .get(name)?
            .iter()
            .find(|e| e.listener == *listener)
            .map(|e| e.once)
    }

    /// `true` when no event name is known.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let events = self.events.lock();
        RegistrySnapshot {
            events: events
                .iter()
                .map(|(name, entries)| (name.clone(), entries.len()))
                .collect(),
        }
    }
}

impl<A, C> Default for Observer<A, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, C> fmt::Debug for Observer<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("events", &self.snapshot().events)
            .finish()
    }
}

/// Removes the once-registrations fired during one emit round.
///
/// Runs on drop so the sweep also happens when a later listener panics.
struct OnceSweep<'a, A, C> {
    observer: &'a Observer<A, C>,
    name: &'a str,
    fired: Vec<EntryId>,
}

impl<A, C> Drop for OnceSweep<'_, A, C> {
    fn drop(&mut self) {
        if self.fired.is_empty() {
            return;
        }
        let mut events = self.observer.events.lock();
        // The event may have been reset away mid-round; don't recreate it.
        if let Some(entries) = events.get_mut(self.name) {
            entries.retain(|e| !self.fired.contains(&e.id));
        }
        trace!(event = %self.name, removed = self.fired.len(), "once listeners swept");
    }
}
