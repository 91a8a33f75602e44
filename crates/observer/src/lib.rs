//! In-process publish/subscribe registry.
//!
//! An [`Observer`] maps event names to ordered lists of [`Listener`]s.
//! Listeners are registered with `on` / `once`, removed with `off`, and
//! called synchronously, in registration order, by `emit`.
//!
//! ```
//! use observer::{Listener, Observer};
//!
//! #[derive(Default)]
//! struct Counter {
//!     count: i32,
//! }
//!
//! let ob: Observer<i32, Counter> = Observer::new();
//! let set = Listener::new(|ctx: Option<&mut Counter>, n: &i32| {
//!     if let Some(ctx) = ctx {
//!         ctx.count = *n;
//!     }
//! });
//! ob.on("event-name", &set);
//!
//! let mut ctx = Counter::default();
//! ob.emit("event-name", &5, Some(&mut ctx));
//! assert_eq!(ctx.count, 5);
//! ```

pub mod error;
pub mod registry;

pub use error::{ObserverError, Result};
pub use registry::{Listener, ListenerFn, Observer, RegistrySnapshot};
