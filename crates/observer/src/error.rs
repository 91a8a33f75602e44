use thiserror::Error;

// ---------------------------------------------------------------------------
// ObserverError
// ---------------------------------------------------------------------------

/// Why a registry call left the registry unchanged.
///
/// Returned only by the strict `try_*` methods. The lenient `on` / `once` /
/// `off` swallow these and return `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserverError {
    #[error("Event name must not be empty")]
    EmptyEventName,

    #[error("Listener is already registered for event \"{event}\"")]
    DuplicateListener { event: String },

    #[error("No listeners have been registered for event \"{event}\"")]
    UnknownEvent { event: String },

    #[error("Listener is not registered for event \"{event}\"")]
    ListenerNotFound { event: String },
}

impl ObserverError {
    /// The event name the failed call targeted, if there was one.
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::EmptyEventName => None,
            Self::DuplicateListener { event }
            | Self::UnknownEvent { event }
            | Self::ListenerNotFound { event } => Some(event),
        }
    }
}

/// Convenience alias: the default error type is `ObserverError`.
pub type Result<T, E = ObserverError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
