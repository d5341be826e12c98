//! Recursive resolution.

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use crate::error::DiResult;
use crate::internal::ResolutionGuard;
use crate::key::Key;
use crate::registration::{AnyArc, Cached, Slot};
use crate::traits::{Resolver, ResolverCore};

use super::{Container, ResolverContext};

impl Container {
    /// Resolves `key`: cache, then binding lookup, then build and track.
    pub(crate) fn resolve_key(&self, key: &Key) -> DiResult<Option<AnyArc>> {
        let cached = self.instances.lock().cached(key);
        if let Some(cached) = cached {
            tracing::trace!(service = key.display_name(), "cache hit");
            return Ok(match cached {
                Cached::Live(value) => Some(value),
                Cached::Released => None,
            });
        }

        let Some(binding) = self.registry.get(key) else {
            return Ok(None);
        };

        // Guarded by the produced key so interface and implementation
        // requests for one binding count as the same node.
        let _guard = ResolutionGuard::enter(self.id, binding.key, self.options.max_depth)?;
        let ctx = ResolverContext::new(self, binding.key);

        let produced = if self.observers.has_observers() {
            let start = Instant::now();
            self.observers.resolving(key);
            let result = binding.produce(key, &ctx);
            self.observers.resolved(key, start.elapsed());
            result
        } else {
            binding.produce(key, &ctx)
        }?;

        if let Some(value) = &produced {
            self.instances
                .lock()
                .track(*key, binding.lifetime, Slot::Owned(value.clone()));
        }
        Ok(produced)
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, key: &Key) -> DiResult<Option<Arc<dyn Any + Send + Sync>>> {
        self.resolve_key(key)
    }
}

impl Resolver for Container {}
