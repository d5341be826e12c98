/// Concurrent access integration tests
///
/// These tests verify that a sealed container behaves correctly when shared
/// between threads: singletons stay unique, factories stay distinct, and
/// cycle detection on one thread never affects another. A singleton cycle
/// entered from both ends at once fails instead of deadlocking.

use ferrous_container::{Container, ContainerOptions, DiError, Lifetime, Resolver};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;
use std::time::Duration;

// ===== Test Services =====

#[derive(Debug)]
pub struct CounterService {
    count: AtomicU32,
    thread_id: String,
}

impl CounterService {
    pub fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
            thread_id: format!("created-by-{:?}", thread::current().id()),
        }
    }

    pub fn increment(&self) -> u32 {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get_count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }
}

pub struct RequestHandler {
    counter: Arc<CounterService>,
}

struct Left {
    _right: Arc<Right>,
}

struct Right {
    _left: Arc<Left>,
}

struct Slow;

struct Upstream {
    _slow: Arc<Slow>,
    _downstream: Arc<Downstream>,
}

struct Downstream {
    _slow: Arc<Slow>,
    _upstream: Arc<Upstream>,
}

fn lazy_container() -> Container {
    let mut container = Container::with_options(ContainerOptions::default().eager_singletons(false));
    container.bind(Lifetime::Singleton, CounterService::new);
    container.bind(Lifetime::Factory, |counter: Arc<CounterService>| RequestHandler { counter });
    container.seal();
    container
}

#[test]
fn test_concurrent_singleton_built_once() {
    let builds = Arc::new(AtomicU32::new(0));
    let builds_clone = builds.clone();

    let mut container = Container::with_options(ContainerOptions::default().eager_singletons(false));
    container.bind(Lifetime::Singleton, move || {
        builds_clone.fetch_add(1, Ordering::SeqCst);
        CounterService::new()
    });
    container.seal();

    let barrier = Barrier::new(8);
    let resolved: Vec<Arc<CounterService>> = crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|_| {
                    barrier.wait();
                    container.get_required::<CounterService>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    for service in &resolved[1..] {
        assert!(Arc::ptr_eq(&resolved[0], service));
    }
    assert_eq!(container.tracked_count(), 1);
}

#[test]
fn test_concurrent_factories_share_singleton_dependency() {
    let container = lazy_container();

    crossbeam_utils::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|_| {
                for _ in 0..25 {
                    let handler = container.get_required::<RequestHandler>();
                    handler.counter.increment();
                }
            });
        }
    })
    .unwrap();

    let counter = container.get_required::<CounterService>();
    assert_eq!(counter.get_count(), 100);
    assert!(counter.thread_id.starts_with("created-by-"));
    // 100 handlers plus the singleton
    assert_eq!(container.tracked_count(), 101);
}

#[test]
fn test_shared_container_behind_arc() {
    let container = Arc::new(lazy_container());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let container = container.clone();
            thread::spawn(move || container.get_required::<RequestHandler>().counter.increment())
        })
        .collect();

    let mut results: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    results.sort_unstable();
    assert_eq!(results, vec![1, 2, 3, 4]);
}

#[test]
fn test_cycle_on_one_thread_does_not_affect_others() {
    let mut container = Container::with_options(ContainerOptions::default().eager_singletons(false));
    container.bind(Lifetime::Factory, |right: Arc<Right>| Left { _right: right });
    container.bind(Lifetime::Factory, |left: Arc<Left>| Right { _left: left });
    container.bind(Lifetime::Singleton, CounterService::new);
    container.seal();

    crossbeam_utils::thread::scope(|s| {
        let cyclic = s.spawn(|_| {
            (0..50)
                .filter(|_| matches!(container.resolve::<Left>(), Err(DiError::Circular(_))))
                .count()
        });
        let healthy = s.spawn(|_| {
            (0..50)
                .filter(|_| container.get::<CounterService>().is_some())
                .count()
        });

        assert_eq!(cyclic.join().unwrap(), 50);
        assert_eq!(healthy.join().unwrap(), 50);
    })
    .unwrap();
}

#[test]
fn test_singleton_cycle_entered_from_both_threads_fails() {
    let mut container = Container::with_options(ContainerOptions::default().eager_singletons(false));
    // Slow holds each thread inside its own singleton build until both have started
    container.bind(Lifetime::Factory, || {
        thread::sleep(Duration::from_millis(200));
        Slow
    });
    container.bind(
        Lifetime::Singleton,
        |slow: Arc<Slow>, downstream: Arc<Downstream>| Upstream { _slow: slow, _downstream: downstream },
    );
    container.bind(
        Lifetime::Singleton,
        |slow: Arc<Slow>, upstream: Arc<Upstream>| Downstream { _slow: slow, _upstream: upstream },
    );
    container.seal();

    let container = Arc::new(container);
    let barrier = Arc::new(Barrier::new(2));
    let (tx, rx) = mpsc::channel();

    {
        let (container, barrier, tx) = (container.clone(), barrier.clone(), tx.clone());
        thread::spawn(move || {
            barrier.wait();
            let failed = matches!(container.resolve::<Upstream>(), Err(DiError::Circular(_)));
            let _ = tx.send(failed);
        });
    }
    {
        let (container, barrier) = (container.clone(), barrier.clone());
        thread::spawn(move || {
            barrier.wait();
            let failed = matches!(container.resolve::<Downstream>(), Err(DiError::Circular(_)));
            let _ = tx.send(failed);
        });
    }

    // A deadlock leaves both senders blocked, so bound the wait
    for _ in 0..2 {
        let failed = rx
            .recv_timeout(Duration::from_secs(10))
            .expect("resolution deadlocked");
        assert!(failed);
    }

    // Neither cell was filled
    assert!(container.get::<Upstream>().is_none());
    assert!(container.get::<Downstream>().is_none());
}
