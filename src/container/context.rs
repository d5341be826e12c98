//! Resolver context for dependency injection.
//!
//! This module contains the ResolverContext type which is what declared
//! dependencies are resolved through while a binding builds.

use std::any::Any;
use std::sync::Arc;

use crate::config::ResolutionMode;
use crate::error::{DiError, DiResult};
use crate::internal::InFlight;
use crate::key::Key;
use crate::traits::{Dispose, Resolver, ResolverCore};

use super::Container;

/// Context handed to a binding while it builds.
///
/// Wraps the owning [`Container`] together with the key of the binding under
/// construction, so that dependency failures can name both sides.
pub struct ResolverContext<'a> {
    container: &'a Container,
    service: Key,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(container: &'a Container, service: Key) -> Self {
        Self { container, service }
    }

    /// The binding currently being built.
    pub fn service(&self) -> Key {
        self.service
    }

    /// How unresolved optional dependencies are treated.
    pub fn resolution_mode(&self) -> ResolutionMode {
        self.container.options().resolution
    }

    /// Error for a declared dependency `T` that resolved to nothing.
    pub(crate) fn missing<T: ?Sized + 'static>(&self) -> DiError {
        DiError::MissingDependency {
            service: self.service.display_name(),
            dependency: std::any::type_name::<T>(),
        }
    }

    /// Singleton builds in progress on any thread.
    pub(crate) fn in_flight(&self) -> &'a InFlight {
        &self.container.in_flight
    }

    /// Registers `service` to be disposed when the container is dropped.
    pub(crate) fn register_disposer<T: Dispose>(&self, service: Arc<T>) {
        self.container.push_disposer(Box::new(move || service.dispose()));
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<Option<Arc<dyn Any + Send + Sync>>> {
        self.container.resolve_key(key)
    }
}

impl<'a> Resolver for ResolverContext<'a> {}
