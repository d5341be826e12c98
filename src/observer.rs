//! Diagnostic observers for container events.
//!
//! Observers receive resolution timings and ignored bindings. They are only
//! invoked when at least one is registered, so an unobserved container pays
//! nothing for them.

use std::sync::Arc;
use std::time::Duration;

use crate::Key;

/// Why a bind call had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The container was sealed
    Sealed,
    /// The produced or interface type was already bound
    AlreadyBound,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::Sealed => f.write_str("container sealed"),
            IgnoreReason::AlreadyBound => f.write_str("already bound"),
        }
    }
}

/// Observer trait for container events.
///
/// Observer calls are made synchronously during resolution. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_container::{Container, DiObserver, Key, Lifetime, Resolver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     seen: Mutex<Vec<&'static str>>,
/// }
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, key: &Key) {
///         self.seen.lock().unwrap().push(key.display_name());
///     }
///
///     fn resolved(&self, _key: &Key, _duration: Duration) {}
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let mut container = Container::new();
/// container.add_observer(recorder.clone());
/// container.bind(Lifetime::Factory, || 7u8);
///
/// container.get_required::<u8>();
/// assert_eq!(*recorder.seen.lock().unwrap(), vec!["u8"]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a binding builds an instance.
    fn resolving(&self, key: &Key);

    /// Called after the build finished, successfully or not.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when a bind call had no effect.
    fn bind_ignored(&self, key: &Key, reason: IgnoreReason) {
        let _ = (key, reason);
    }
}

/// Observer forwarding every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl LoggingObserver {
    /// Creates a logging observer.
    pub fn new() -> Self {
        Self
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::debug!(service = key.display_name(), "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(service = key.display_name(), ?duration, "resolved");
    }

    fn bind_ignored(&self, key: &Key, reason: IgnoreReason) {
        tracing::info!(service = key.display_name(), %reason, "bind ignored");
    }
}

/// Registered observers of one container.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline(always)]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    pub(crate) fn bind_ignored(&self, key: &Key, reason: IgnoreReason) {
        for observer in &self.observers {
            observer.bind_ignored(key, reason);
        }
    }
}
