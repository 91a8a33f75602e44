//! Listener registry: named event listeners with synchronous emit.
//!
//! # Modules
//!
//! - [`listener`]: [`Listener<A, C>`] handles, compared by identity.
//! - [`observer`]: [`Observer<A, C>`], the registry itself.
//! - [`snapshot`]: [`RegistrySnapshot`], a name → listener-count view.

pub mod listener;
pub mod observer;
pub mod snapshot;

pub use listener::{Listener, ListenerFn};
pub use observer::Observer;
pub use snapshot::RegistrySnapshot;
