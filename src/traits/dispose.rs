//! Disposal trait for resource cleanup.

/// Trait for synchronous resource disposal.
///
/// Implement this trait for services that need structured teardown (e.g., flushing caches,
/// closing connections). Bind such services with
/// [`Container::bind_disposable`](crate::Container::bind_disposable): every instance the
/// container builds for them is disposed once, in LIFO order, when the container is dropped.
/// Provided instances are never disposed by the container.
///
/// # Examples
///
/// ```
/// use ferrous_container::{Container, Dispose, Lifetime, Resolver};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// struct Cache {
///     flushed: AtomicBool,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) {
///         self.flushed.store(true, Ordering::SeqCst);
///     }
/// }
///
/// let mut container = Container::new();
/// container.bind_disposable(Lifetime::Singleton, || Cache { flushed: AtomicBool::new(false) });
///
/// let cache = container.get_required::<Cache>();
/// assert!(!cache.flushed.load(Ordering::SeqCst));
///
/// drop(container);
/// assert!(cache.flushed.load(Ordering::SeqCst));
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
