//! Resolver traits for instance resolution.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::{key_of, Key};

/// Core resolver trait for object-safe resolution.
///
/// This trait provides the type-erased resolution entry point. It is what
/// recursive construction goes through, so that bindings never reference each
/// other directly.
///
/// Most users should use the [`Resolver`] trait instead, which provides
/// ergonomic generic methods built on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves the instance bound to `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(_))` - The instance, type-erased as `Arc<dyn Any>` wrapping an `Arc<T>`
    /// * `Ok(None)` - Nothing is bound to `key`, or a provided instance was released
    /// * `Err(DiError)` - Construction failed (missing dependency, cycle, depth)
    fn resolve_any(&self, key: &Key) -> DiResult<Option<Arc<dyn Any + Send + Sync>>>;
}

/// High-level resolver interface with generic methods for type-safe resolution.
///
/// Both [`Container`](crate::Container) and [`ResolverContext`](crate::ResolverContext)
/// implement this trait.
///
/// # Examples
///
/// ```
/// use ferrous_container::{Container, Lifetime, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str) -> String;
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) -> String {
///         format!("LOG: {}", msg)
///     }
/// }
///
/// let mut container = Container::new();
/// container.bind(Lifetime::Singleton, || 42usize);
/// container.bind_as(
///     Lifetime::Singleton,
///     || ConsoleLogger,
///     |logger: Arc<ConsoleLogger>| logger as Arc<dyn Logger>,
/// );
///
/// // Resolve concrete types
/// let number = container.get_required::<usize>();
/// assert_eq!(*number, 42);
///
/// // Resolve trait objects
/// let logger = container.get_required::<dyn Logger>();
/// assert_eq!(logger.log("ready"), "LOG: ready");
///
/// // Unbound types are absent
/// assert!(container.get::<String>().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves `T`, distinguishing absence from failure.
    ///
    /// `Ok(None)` means `T` is not bound. Errors report construction
    /// failures of `T` or of something it depends on.
    fn resolve<T>(&self) -> DiResult<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = key_of::<T>();
        match self.resolve_any(&key)? {
            Some(any) => any
                .downcast_ref::<Arc<T>>()
                .cloned()
                .map(Some)
                .ok_or(DiError::TypeMismatch(key.display_name())),
            None => Ok(None),
        }
    }

    /// Resolves `T`, or `None` if it is not bound.
    ///
    /// Construction failures are logged at `warn` level and also reported
    /// as `None`. Use [`resolve`](Self::resolve) to observe them.
    fn get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match self.resolve::<T>() {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(
                    service = std::any::type_name::<T>(),
                    %error,
                    "resolution failed"
                );
                None
            }
        }
    }

    /// Resolves `T`, panicking if it is not bound or cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not bound or its construction fails.
    fn get_required<T>(&self) -> Arc<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let name = std::any::type_name::<T>();
        match self.resolve::<T>() {
            Ok(Some(value)) => value,
            Ok(None) => panic!("Failed to resolve {}: {:?}", name, DiError::NotFound(name)),
            Err(e) => panic!("Failed to resolve {}: {:?}", name, e),
        }
    }
}
