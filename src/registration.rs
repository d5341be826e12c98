//! Binding and tracked-instance storage.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::container::ResolverContext;
use crate::error::DiResult;
use crate::inject::DeclaredDependency;
use crate::key::Key;
use crate::lifetime::Lifetime;

// Type-erased Arc for storage; the payload is always an `Arc<T>`
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type BuildFn = Box<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;
pub(crate) type UpcastFn = Box<dyn Fn(&AnyArc) -> DiResult<AnyArc> + Send + Sync>;
pub(crate) type UpgradeFn = Box<dyn Fn() -> Option<AnyArc> + Send + Sync>;

/// Recipe for producing one type, optionally also served under an interface.
pub(crate) struct Binding {
    pub(crate) key: Key,
    pub(crate) interface: Option<Key>,
    pub(crate) dependencies: Vec<DeclaredDependency>,
    pub(crate) lifetime: Lifetime,
    build: Option<BuildFn>,
    upcast: Option<UpcastFn>,
    /// Singleton cache owned by the binding itself
    single_runtime: OnceCell<AnyArc>,
}

impl Binding {
    pub(crate) fn new(
        key: Key,
        dependencies: Vec<DeclaredDependency>,
        lifetime: Lifetime,
        build: Option<BuildFn>,
    ) -> Self {
        Self {
            key,
            interface: None,
            dependencies,
            lifetime,
            build,
            upcast: None,
            single_runtime: OnceCell::new(),
        }
    }

    /// Also serves this binding under `interface`, converting with `upcast`.
    pub(crate) fn with_interface(mut self, interface: Key, upcast: UpcastFn) -> Self {
        self.interface = Some(interface);
        self.upcast = Some(upcast);
        self
    }

    /// Every key this binding answers to.
    pub(crate) fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        std::iter::once(self.key).chain(self.interface)
    }

    /// Whether this binding can build instances itself.
    pub(crate) fn has_build(&self) -> bool {
        self.build.is_some()
    }

    /// Builds an instance for `requested`.
    ///
    /// Singleton bindings build at most once and hand out their own cached
    /// instance afterwards. Returns `None` for bindings without a build step.
    pub(crate) fn produce(&self, requested: &Key, ctx: &ResolverContext<'_>) -> DiResult<Option<AnyArc>> {
        let Some(build) = &self.build else {
            return Ok(None);
        };

        let value = match self.lifetime {
            Lifetime::Singleton => match self.single_runtime.get() {
                Some(value) => value.clone(),
                None => {
                    // Another thread may hold the cell; refuse to wait if that closes a loop
                    let in_flight = ctx.in_flight();
                    let _waiting = in_flight.wait_for(self.key)?;
                    self.single_runtime
                        .get_or_try_init(|| {
                            let _building = in_flight.build(self.key);
                            build(ctx)
                        })?
                        .clone()
                }
            },
            Lifetime::Factory | Lifetime::Provided => build(ctx)?,
        };

        match &self.upcast {
            Some(upcast) if self.interface.as_ref() == Some(requested) => upcast(&value).map(Some),
            _ => Ok(Some(value)),
        }
    }
}

/// All bindings of a container, in registration order.
#[derive(Default)]
pub(crate) struct Registry {
    bindings: Vec<Binding>,
    /// Produced and interface keys -> position in `bindings`
    index: HashMap<Key, usize>,
}

impl Registry {
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts a binding unless one of its keys is taken.
    pub(crate) fn insert(&mut self, binding: Binding) -> bool {
        if binding.keys().any(|k| self.index.contains_key(&k)) {
            return false;
        }
        let pos = self.bindings.len();
        for key in binding.keys() {
            self.index.insert(key, pos);
        }
        self.bindings.push(binding);
        true
    }

    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<&Binding> {
        self.index.get(key).map(|&pos| &self.bindings[pos])
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Drops every binding, newest first. Returns how many were dropped.
    pub(crate) fn clear_reverse(&mut self) -> usize {
        let count = self.bindings.len();
        self.index.clear();
        while let Some(binding) = self.bindings.pop() {
            drop(binding);
        }
        count
    }
}

/// Storage for one tracked instance.
pub(crate) enum Slot {
    /// Built by the container and owned by it
    Owned(AnyArc),
    /// Supplied by the caller; only a weak handle is kept
    Provided(UpgradeFn),
}

/// A materialized instance together with the policy it was produced under.
pub(crate) struct TrackedInstance {
    pub(crate) key: Key,
    pub(crate) lifetime: Lifetime,
    slot: Slot,
}

/// Result of a cache lookup.
pub(crate) enum Cached {
    Live(AnyArc),
    /// A provided instance whose owner has dropped it
    Released,
}

/// Every instance the container has materialized.
#[derive(Default)]
pub(crate) struct InstanceStore {
    tracked: Vec<TrackedInstance>,
    /// Key -> most recent entry in `tracked`
    latest: HashMap<Key, usize>,
}

impl InstanceStore {
    /// Looks up a cacheable instance for `key`. Factory entries never hit.
    pub(crate) fn cached(&self, key: &Key) -> Option<Cached> {
        let entry = &self.tracked[*self.latest.get(key)?];
        if !entry.lifetime.is_cached() {
            return None;
        }
        Some(match &entry.slot {
            Slot::Owned(value) => Cached::Live(value.clone()),
            Slot::Provided(upgrade) => upgrade().map_or(Cached::Released, Cached::Live),
        })
    }

    pub(crate) fn track(&mut self, key: Key, lifetime: Lifetime, slot: Slot) {
        if lifetime == Lifetime::Singleton {
            if let Some(&pos) = self.latest.get(&key) {
                if self.tracked[pos].lifetime == Lifetime::Singleton {
                    return;
                }
            }
        }
        self.latest.insert(key, self.tracked.len());
        self.tracked.push(TrackedInstance { key, lifetime, slot });
    }

    pub(crate) fn len(&self) -> usize {
        self.tracked.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TrackedInstance> {
        self.tracked.iter()
    }

    /// Releases every tracked instance, newest first.
    ///
    /// Owned instances lose the container's strong handle; provided slots
    /// only ever held a weak one. Returns how many owned instances were released.
    pub(crate) fn clear_reverse(&mut self) -> usize {
        let mut released = 0;
        self.latest.clear();
        while let Some(entry) = self.tracked.pop() {
            if let Slot::Owned(value) = entry.slot {
                drop(value);
                released += 1;
            }
        }
        released
    }
}
