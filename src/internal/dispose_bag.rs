//! Internal disposal bag for managing cleanup hooks.

/// Container for disposal hooks with LIFO execution order.
#[derive(Default)]
pub(crate) struct DisposeBag {
    hooks: Vec<Box<dyn FnOnce() + Send>>,
}

impl DisposeBag {
    /// Add a disposal hook.
    pub(crate) fn push(&mut self, f: Box<dyn FnOnce() + Send>) {
        self.hooks.push(f);
    }

    /// Execute all hooks in reverse order (LIFO).
    pub(crate) fn run_all_reverse(&mut self) {
        while let Some(f) = self.hooks.pop() {
            (f)();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.hooks.len()
    }
}
