//! Listener: a shared handler whose identity is its allocation.
//!
//! Handlers are stored as `Arc<dyn Fn(Option<&mut C>, &A)>` so snapshots are
//! cheap and so the registry can tell two registrations apart by pointer.
//! Cloning a [`Listener`] shares the handler; two `Listener::new` calls on the
//! same closure body produce two distinct listeners.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Closure type for event handlers.
///
/// The first parameter is the caller-supplied context (`None` when the
/// emitter passed none), the second the emitted arguments.
pub type ListenerFn<A, C> = dyn Fn(Option<&mut C>, &A) + Send + Sync;

/// Registration ID. Unique per registry, never reused.
pub(crate) type EntryId = u64;

/// A handler that can be registered with an [`Observer`](super::Observer).
///
/// Keep a clone around to deregister it later with
/// [`Observer::off`](super::Observer::off).
pub struct Listener<A, C = ()> {
    handler: Arc<ListenerFn<A, C>>,
}

impl<A, C> Listener<A, C> {
    pub fn new(handler: impl Fn(Option<&mut C>, &A) + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Invoke the handler directly, bypassing any registry.
    pub fn call(&self, ctx: Option<&mut C>, args: &A) {
        (self.handler)(ctx, args)
    }

    /// `true` if both handles point at the same handler.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl<A, C> Clone for Listener<A, C> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<A, C> PartialEq for Listener<A, C> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<A, C> Eq for Listener<A, C> {}

impl<A, C> fmt::Debug for Listener<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Arc::as_ptr(&self.handler).cast::<()>())
            .finish()
    }
}

/// One registration of a listener under one event name.
///
/// `once` belongs to the registration, not to the handler: the same
/// [`Listener`] may be a once-listener for one event and persistent for
/// another. `claimed` is shared by every snapshot of the registration, so
/// nested or concurrent emits agree on which of them runs a once-listener.
pub(crate) struct Entry<A, C> {
    pub(crate) id: EntryId,
    pub(crate) listener: Listener<A, C>,
    pub(crate) once: bool,
    claimed: Arc<AtomicBool>,
}

impl<A, C> Entry<A, C> {
    pub(crate) fn new(id: EntryId, listener: Listener<A, C>, once: bool) -> Self {
        Self {
            id,
            listener,
            once,
            claimed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reserve the single invocation of a once-registration.
    ///
    /// Returns `None` if another emit already holds or used it.
    pub(crate) fn claim(&self) -> Option<Claim<'_>> {
        if self.claimed.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(Claim {
            flag: &self.claimed,
            kept: false,
        })
    }
}

impl<A, C> Clone for Entry<A, C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            listener: self.listener.clone(),
            once: self.once,
            claimed: Arc::clone(&self.claimed),
        }
    }
}

/// A held once-claim. Released again on drop unless [`keep`](Claim::keep)
/// was called, so a listener that panics can still run on a later emit.
pub(crate) struct Claim<'a> {
    flag: &'a AtomicBool,
    kept: bool,
}

impl Claim<'_> {
    pub(crate) fn keep(mut self) {
        self.kept = true;
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        if !self.kept {
            self.flag.store(false, Ordering::Release);
        }
    }
}
