//! RegistrySnapshot: a point-in-time view of event names and listener counts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Event names mapped to the number of listeners registered under each.
///
/// Names appear in first-registration order. An event whose listeners have
/// all been removed is still present with a count of `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub events: IndexMap<String, usize>,
}

impl RegistrySnapshot {
    /// Known event names, in first-registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    pub fn count(&self, name: &str) -> Option<usize> {
        self.events.get(name).copied()
    }

    /// Sum of listener counts across all events.
    pub fn total_listeners(&self) -> usize {
        self.events.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
