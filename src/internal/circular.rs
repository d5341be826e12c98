//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::key::Key;

// Thread-local resolution state for circular dependency detection
thread_local! {
    static RESOLUTION_TLS: RefCell<Vec<(u64, Key)>> = const { RefCell::new(Vec::new()) };
}

/// Guard marking a binding as under construction on the current thread.
///
/// Entries are tagged with the owning container's id so that one container
/// resolving from another is not mistaken for a cycle.
pub(crate) struct ResolutionGuard {
    container: u64,
    key: Key,
}

impl ResolutionGuard {
    /// Pushes `key` onto the resolution stack.
    ///
    /// Fails with [`DiError::Circular`] if the key is already being built by
    /// the same container, or [`DiError::DepthExceeded`] past `max_depth`.
    pub(crate) fn enter(container: u64, key: Key, max_depth: usize) -> DiResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut stack = tls.borrow_mut();
            let ours = stack.iter().filter(|(id, _)| *id == container);

            // Circular detection BEFORE pushing the new key
            if let Some(start) = ours.clone().position(|(_, k)| *k == key) {
                let mut path: Vec<&'static str> = ours
                    .skip(start)
                    .map(|(_, k)| k.display_name())
                    .collect();
                path.push(key.display_name());
                return Err(DiError::Circular(path));
            }

            let depth = ours.count();
            if depth >= max_depth {
                return Err(DiError::DepthExceeded(depth));
            }

            stack.push((container, key));
            Ok(Self { container, key })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut stack = tls.borrow_mut();
            if let Some(pos) = stack
                .iter()
                .rposition(|(id, k)| *id == self.container && *k == self.key)
            {
                stack.remove(pos);
            }
        });
    }
}
