//! Cross-thread cycle detection for singleton builds.
//!
//! The thread-local resolution stack only sees one thread. Two threads that
//! enter a singleton cycle from opposite ends would each hold one cell's
//! initialization and block on the other's. Every thread records the cell it
//! is about to wait on and every builder records the cell it initializes, so
//! the thread whose wait would close a loop gets `DiError::Circular` instead
//! of blocking.

use std::collections::{HashMap, HashSet};
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

use crate::error::{DiError, DiResult};
use crate::key::Key;

#[derive(Default)]
struct WaitGraph {
    /// Singleton cell -> thread running its initializer
    building: HashMap<Key, ThreadId>,
    /// Thread -> singleton cell it is waiting on
    waiting: HashMap<ThreadId, Key>,
}

/// Singleton builds in progress within one container.
#[derive(Default)]
pub(crate) struct InFlight {
    graph: Mutex<WaitGraph>,
}

impl InFlight {
    /// Records that the current thread is about to wait on `key`'s cell.
    ///
    /// Fails with [`DiError::Circular`] if the thread building that cell is,
    /// directly or through other threads, waiting on a cell this thread builds.
    pub(crate) fn wait_for(&self, key: Key) -> DiResult<WaitGuard<'_>> {
        let me = thread::current().id();
        let mut graph = self.graph.lock();

        // Follow building -> waiting edges from `key`
        let mut chain = vec![key];
        let mut seen = HashSet::new();
        let mut current = key;
        while let Some(&owner) = graph.building.get(&current) {
            if owner == me {
                let mut path: Vec<&'static str> = Vec::with_capacity(chain.len() + 1);
                path.push(current.display_name());
                path.extend(chain.iter().map(Key::display_name));
                return Err(DiError::Circular(path));
            }
            if !seen.insert(owner) {
                break;
            }
            match graph.waiting.get(&owner) {
                Some(&next) => {
                    chain.push(next);
                    current = next;
                }
                None => break,
            }
        }

        graph.waiting.insert(me, key);
        Ok(WaitGuard { in_flight: self, thread: me, key })
    }

    /// Marks the current thread as running `key`'s initializer.
    pub(crate) fn build(&self, key: Key) -> BuildGuard<'_> {
        let me = thread::current().id();
        let mut graph = self.graph.lock();
        graph.building.insert(key, me);
        // Running the initializer means no longer waiting for it
        if graph.waiting.get(&me) == Some(&key) {
            graph.waiting.remove(&me);
        }
        BuildGuard { in_flight: self, key }
    }
}

pub(crate) struct WaitGuard<'a> {
    in_flight: &'a InFlight,
    thread: ThreadId,
    key: Key,
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        let mut graph = self.in_flight.graph.lock();
        if graph.waiting.get(&self.thread) == Some(&self.key) {
            graph.waiting.remove(&self.thread);
        }
    }
}

pub(crate) struct BuildGuard<'a> {
    in_flight: &'a InFlight,
    key: Key,
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.graph.lock().building.remove(&self.key);
    }
}
