//! Binding lifetime definitions.

/// Lifetime policy of a binding.
///
/// Governs when a binding's constructor runs and whether its result is
/// cached by the [`Container`](crate::Container).
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Container, Lifetime, Resolver};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Request { id: u32 }
///
/// let mut container = Container::new();
///
/// // Singleton: one instance for the container's lifetime
/// container.bind(Lifetime::Singleton, || Config { url: "postgres://localhost".to_string() });
///
/// // Factory: new instance every time
/// container.bind(Lifetime::Factory, || Request { id: 7 });
///
/// // Provided: the caller keeps ownership
/// let name = Arc::new(String::from("app"));
/// container.provide(&name);
///
/// let c1 = container.get_required::<Config>();
/// let c2 = container.get_required::<Config>();
/// assert!(Arc::ptr_eq(&c1, &c2));
///
/// let r1 = container.get_required::<Request>();
/// let r2 = container.get_required::<Request>();
/// assert!(!Arc::ptr_eq(&r1, &r2));
///
/// assert!(Arc::ptr_eq(&name, &container.get_required::<String>()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Built once, cached and reused for every resolution.
    ///
    /// Singletons are built when bound if eager construction is enabled,
    /// otherwise on first request.
    Singleton,
    /// Built anew on every resolution and never served from the cache.
    ///
    /// Each built instance is still tracked by the container and released
    /// when the container is dropped.
    Factory,
    /// Supplied by the caller.
    ///
    /// The container keeps only a weak handle: it never owns and never
    /// destroys a provided instance.
    Provided,
}

impl Lifetime {
    /// Whether a tracked instance with this lifetime may be served from the cache.
    #[inline]
    pub fn is_cached(self) -> bool {
        !matches!(self, Lifetime::Factory)
    }
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Factory => "factory",
            Lifetime::Provided => "provided",
        };
        f.write_str(name)
    }
}
