//! The dependency container.
//!
//! This module contains the [`Container`] type: bindings are registered with
//! the `bind` family of methods, instances are resolved through the
//! [`Resolver`](crate::Resolver) trait, and everything the container built
//! is torn down when it is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ContainerOptions;
use crate::descriptors::BindingDescriptor;
use crate::error::{DiError, DiResult};
use crate::inject::{Constructor, Dependencies};
use crate::internal::{DisposeBag, InFlight};
use crate::key::{key_of, Key};
use crate::lifetime::Lifetime;
use crate::observer::{DiObserver, IgnoreReason, Observers};
use crate::registration::{AnyArc, Binding, BuildFn, InstanceStore, Registry, Slot, UpcastFn};
use crate::traits::Dispose;
use crate::validation::{self, ValidationReport};

mod context;
mod resolve;

pub use context::ResolverContext;

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// A registry of bindings together with every instance built from them.
///
/// Bindings are added while the container is open. [`seal`](Self::seal)
/// freezes the set of bindings; later `bind` calls are ignored. Resolution
/// works before and after sealing and only needs `&self`, so a sealed
/// container can be shared across threads behind an `Arc`.
///
/// Dropping the container runs registered disposers newest first, then
/// releases bindings and tracked instances in reverse creation order.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Container, Lifetime, Resolver};
/// use std::sync::Arc;
///
/// struct Database {
///     url: String,
/// }
///
/// struct UserService {
///     db: Arc<Database>,
/// }
///
/// let mut container = Container::new();
/// container.bind(Lifetime::Singleton, || Database {
///     url: "postgres://localhost".to_string(),
/// });
/// container.bind(Lifetime::Factory, |db: Arc<Database>| UserService { db });
/// container.seal();
///
/// let users = container.get_required::<UserService>();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
pub struct Container {
    id: u64,
    options: ContainerOptions,
    registry: Registry,
    instances: Mutex<InstanceStore>,
    disposers: Mutex<DisposeBag>,
    in_flight: InFlight,
    observers: Observers,
    sealed: bool,
}

impl Container {
    /// Creates an empty container with default options.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Creates an empty container with the given options.
    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
            options,
            registry: Registry::default(),
            instances: Mutex::new(InstanceStore::default()),
            disposers: Mutex::new(DisposeBag::default()),
            in_flight: InFlight::default(),
            observers: Observers::default(),
            sealed: false,
        }
    }

    /// Options this container was created with.
    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// Registers an observer for resolution and bind events.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    // ----- Registration -----

    /// Binds `T` to a constructor under the given lifetime.
    ///
    /// The constructor's parameters declare its dependencies: `Arc<D>` for a
    /// required one, `Option<Arc<D>>` for an optional one. With
    /// [`Lifetime::Singleton`] and eager singletons enabled, `T` is built
    /// right away; a failure is logged and the build is retried on first
    /// request. Binding [`Lifetime::Provided`] here registers `T` without an
    /// instance, so it resolves to nothing; use [`provide`](Self::provide).
    ///
    /// Returns `false`, leaving the container unchanged, if it is sealed or
    /// `T` is already bound.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_container::{Container, Lifetime, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct Counter(u32);
    ///
    /// let mut container = Container::new();
    /// assert!(container.bind(Lifetime::Factory, || Counter(1)));
    /// assert!(!container.bind(Lifetime::Factory, || Counter(2)));
    ///
    /// let a = container.get_required::<Counter>();
    /// let b = container.get_required::<Counter>();
    /// assert!(!Arc::ptr_eq(&a, &b));
    /// assert_eq!(b.0, 1);
    /// ```
    pub fn bind<T, Deps, C>(&mut self, lifetime: Lifetime, ctor: C) -> bool
    where
        T: Send + Sync + 'static,
        Deps: Dependencies,
        C: Constructor<T, Deps>,
    {
        let key = key_of::<T>();
        if !self.admit(key, None) {
            return false;
        }
        let build = Self::build_fn(lifetime, move |ctx| {
            let deps = Deps::resolve(ctx)?;
            Ok(Arc::new(Arc::new(ctor.construct(deps))) as AnyArc)
        });
        self.register(Binding::new(key, Deps::declare(), lifetime, build))
    }

    /// Binds `T` and also serves it as the interface `I`.
    ///
    /// `upcast` converts the produced `Arc<T>` into `Arc<I>`, typically
    /// `|t: Arc<T>| t as Arc<dyn Trait>`. Both types resolve through the same
    /// binding, so a singleton is shared between them. Nothing is registered
    /// if either `I` or `T` is already bound.
    pub fn bind_as<I, T, Deps, C, U>(&mut self, lifetime: Lifetime, ctor: C, upcast: U) -> bool
    where
        I: ?Sized + Send + Sync + 'static,
        T: Send + Sync + 'static,
        Deps: Dependencies,
        C: Constructor<T, Deps>,
        U: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
    {
        let interface = key_of::<I>();
        let key = key_of::<T>();
        if !self.admit(key, Some(interface)) {
            return false;
        }
        let build = Self::build_fn(lifetime, move |ctx| {
            let deps = Deps::resolve(ctx)?;
            Ok(Arc::new(Arc::new(ctor.construct(deps))) as AnyArc)
        });
        let upcast: UpcastFn = Box::new(move |value: &AnyArc| {
            let concrete = value
                .downcast_ref::<Arc<T>>()
                .cloned()
                .ok_or(DiError::TypeMismatch(key.display_name()))?;
            Ok(Arc::new(upcast(concrete)) as AnyArc)
        });
        let binding = Binding::new(key, Deps::declare(), lifetime, build).with_interface(interface, upcast);
        self.register(binding)
    }

    /// Binds `T` like [`bind`](Self::bind) and disposes every built instance
    /// when the container is dropped.
    pub fn bind_disposable<T, Deps, C>(&mut self, lifetime: Lifetime, ctor: C) -> bool
    where
        T: Dispose,
        Deps: Dependencies,
        C: Constructor<T, Deps>,
    {
        let key = key_of::<T>();
        if !self.admit(key, None) {
            return false;
        }
        let build = Self::build_fn(lifetime, move |ctx| {
            let deps = Deps::resolve(ctx)?;
            let value = Arc::new(ctor.construct(deps));
            ctx.register_disposer(value.clone());
            Ok(Arc::new(value) as AnyArc)
        });
        self.register(Binding::new(key, Deps::declare(), lifetime, build))
    }

    /// Registers an instance owned by the caller.
    ///
    /// The container keeps only a weak handle: `get` returns this exact
    /// instance while the caller holds it and nothing once it is dropped.
    /// Works for trait objects, e.g. `provide::<dyn Logger>(&logger)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_container::{Container, Resolver};
    /// use std::sync::Arc;
    ///
    /// let name = Arc::new(String::from("app"));
    /// let mut container = Container::new();
    /// container.provide(&name);
    ///
    /// assert!(Arc::ptr_eq(&container.get_required::<String>(), &name));
    /// drop(name);
    /// assert!(container.get::<String>().is_none());
    /// ```
    pub fn provide<T>(&mut self, instance: &Arc<T>) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = key_of::<T>();
        if !self.admit(key, None) {
            return false;
        }
        let weak = Arc::downgrade(instance);
        self.registry
            .insert(Binding::new(key, Vec::new(), Lifetime::Provided, None));
        self.instances.get_mut().track(
            key,
            Lifetime::Provided,
            Slot::Provided(Box::new(move || weak.upgrade().map(|a| Arc::new(a) as AnyArc))),
        );
        tracing::debug!(service = key.display_name(), "provided instance registered");
        true
    }

    /// Freezes the set of bindings. Idempotent.
    pub fn seal(&mut self) {
        if !self.sealed {
            tracing::debug!(bindings = self.registry.len(), "container sealed");
        }
        self.sealed = true;
    }

    /// Whether [`seal`](Self::seal) has been called.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    // ----- Introspection -----

    /// Whether `T` is bound, either directly or as an interface.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains_key(&key_of::<T>())
    }

    /// Number of bindings.
    pub fn binding_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of instances tracked for teardown, including every factory build.
    pub fn tracked_count(&self) -> usize {
        self.instances.lock().len()
    }

    /// Tracked instances in creation order, as requested key and lifetime.
    pub fn tracked(&self) -> Vec<(Key, Lifetime)> {
        self.instances
            .lock()
            .iter()
            .map(|entry| (entry.key, entry.lifetime))
            .collect()
    }

    /// Describes every binding in registration order.
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        self.registry.iter().map(BindingDescriptor::from_binding).collect()
    }

    /// Checks declared dependencies without building anything.
    ///
    /// Reports required dependencies that cannot produce an instance and
    /// cycles in the declared dependency graph. A provided binding counts
    /// only while its instance is alive.
    pub fn validate(&self) -> ValidationReport {
        let instances = self.instances.lock();
        validation::validate(&self.registry, &instances, self.options.resolution)
    }

    // ----- Internals -----

    /// Decides whether a bind call for `key` (and `interface`) may proceed.
    fn admit(&self, key: Key, interface: Option<Key>) -> bool {
        let reason = if self.sealed {
            IgnoreReason::Sealed
        } else if self.registry.contains_key(&key)
            || interface.is_some_and(|i| self.registry.contains_key(&i))
        {
            IgnoreReason::AlreadyBound
        } else {
            return true;
        };
        tracing::debug!(service = key.display_name(), %reason, "bind ignored");
        if self.observers.has_observers() {
            self.observers.bind_ignored(&key, reason);
        }
        false
    }

    /// Provided bindings made through `bind` have nothing to build.
    fn build_fn<F>(lifetime: Lifetime, f: F) -> Option<BuildFn>
    where
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync + 'static,
    {
        match lifetime {
            Lifetime::Provided => None,
            Lifetime::Singleton | Lifetime::Factory => Some(Box::new(f)),
        }
    }

    fn register(&mut self, binding: Binding) -> bool {
        let key = binding.key;
        let lifetime = binding.lifetime;
        let dependencies = binding.dependencies.len();
        if !self.registry.insert(binding) {
            return false;
        }
        tracing::debug!(service = key.display_name(), %lifetime, dependencies, "binding registered");

        match lifetime {
            Lifetime::Singleton if self.options.eager_singletons => {
                if let Err(error) = self.resolve_key(&key) {
                    tracing::warn!(service = key.display_name(), %error, "eager singleton build failed");
                }
            }
            Lifetime::Provided => {
                self.instances
                    .get_mut()
                    .track(key, Lifetime::Provided, Slot::Provided(Box::new(|| None)));
            }
            _ => {}
        }
        true
    }

    pub(crate) fn push_disposer(&self, hook: Box<dyn FnOnce() + Send>) {
        self.disposers.lock().push(hook);
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("bindings", &self.registry.len())
            .field("tracked", &self.instances.lock().len())
            .field("sealed", &self.sealed)
            .finish()
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        let disposers = self.disposers.get_mut();
        let disposed = disposers.len();
        disposers.run_all_reverse();

        let bindings = self.registry.clear_reverse();
        let released = self.instances.get_mut().clear_reverse();
        tracing::debug!(disposed, bindings, released, "container torn down");
    }
}
