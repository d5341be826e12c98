use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_container::*;
use std::sync::Arc;

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let mut container = Container::new();
    container.bind(Lifetime::Singleton, || 42u64);
    container.seal();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = container.get::<u64>().unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                let mut container =
                    Container::with_options(ContainerOptions::default().eager_singletons(false));
                container.bind(Lifetime::Singleton, || ExpensiveToCreate {
                    data: (0..1000).collect(),
                });
                container
            },
            |container| {
                let v = container.get::<ExpensiveToCreate>().unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_factory(c: &mut Criterion) {
    struct Service {
        data: [u8; 64],
    }

    // Factory builds are tracked until teardown, so each batch gets a fresh container
    c.bench_function("factory_build", |b| {
        b.iter_batched_ref(
            || {
                let mut container = Container::new();
                container.bind(Lifetime::Factory, || Service { data: [0; 64] });
                container
            },
            |container| {
                let v = container.get::<Service>().unwrap();
                black_box(&v.data);
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_concrete_vs_interface(c: &mut Criterion) {
    trait Greeter: Send + Sync {
        fn greet(&self) -> usize;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> usize {
            5
        }
    }

    let mut group = c.benchmark_group("concrete_vs_interface");

    let mut container = Container::new();
    container.bind_as(
        Lifetime::Singleton,
        || English,
        |english: Arc<English>| english as Arc<dyn Greeter>,
    );
    container.seal();
    // Prime the interface entry
    let _ = container.get::<dyn Greeter>().unwrap();

    group.bench_function("concrete", |b| {
        b.iter(|| {
            let v = container.get::<English>().unwrap();
            black_box(v.greet());
        })
    });

    group.bench_function("interface", |b| {
        b.iter(|| {
            let v = container.get::<dyn Greeter>().unwrap();
            black_box(v.greet());
        })
    });

    group.finish();
}

fn bench_dependency_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dependency_chain");

    // Factory at the top of a chain of singletons
    struct Service1;
    struct Service2 { _s1: Arc<Service1> }
    struct Service3 { _s2: Arc<Service2> }
    struct Service4 { _s3: Arc<Service3> }
    struct Service5 { _s4: Arc<Service4> }
    struct Service6 { _s5: Arc<Service5> }
    struct Service7 { _s6: Arc<Service6> }
    struct Service8 { _s7: Arc<Service7> }

    fn chain() -> Container {
        let mut container = Container::new();
        container.bind(Lifetime::Singleton, || Service1);
        container.bind(Lifetime::Singleton, |s: Arc<Service1>| Service2 { _s1: s });
        container.bind(Lifetime::Singleton, |s: Arc<Service2>| Service3 { _s2: s });
        container.bind(Lifetime::Singleton, |s: Arc<Service3>| Service4 { _s3: s });
        container.bind(Lifetime::Singleton, |s: Arc<Service4>| Service5 { _s4: s });
        container.bind(Lifetime::Singleton, |s: Arc<Service5>| Service6 { _s5: s });
        container.bind(Lifetime::Singleton, |s: Arc<Service6>| Service7 { _s6: s });
        container.bind(Lifetime::Factory, |s: Arc<Service7>| Service8 { _s7: s });
        container.seal();
        container
    }

    group.bench_function("chain_depth_8", |b| {
        b.iter_batched_ref(
            chain,
            |container| {
                let service = container.get::<Service8>().unwrap();
                black_box(&service);
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("build_and_teardown", |b| {
        b.iter(|| {
            let container = chain();
            black_box(container.get::<Service8>().unwrap());
        })
    });

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let mut container = Container::new();
    container.bind(Lifetime::Singleton, || 42u64);
    container.seal();

    for &thread_count in &[1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("singleton_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    crossbeam_utils::thread::scope(|s| {
                        for _ in 0..threads {
                            let container_ref = &container;
                            s.spawn(move |_| {
                                for _ in 0..iters / threads as u64 {
                                    let v = container_ref.get::<u64>().unwrap();
                                    black_box(v);
                                }
                            });
                        }
                    })
                    .unwrap();
                    start.elapsed()
                })
            },
        );
    }

    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_validation(c: &mut Criterion) {
    struct Leaf;
    struct Mid { _leaf: Arc<Leaf> }
    struct Top { _mid: Arc<Mid>, _leaf: Option<Arc<Leaf>> }

    let mut container = Container::new();
    container.bind(Lifetime::Singleton, || Leaf);
    container.bind(Lifetime::Factory, |leaf: Arc<Leaf>| Mid { _leaf: leaf });
    container.bind(
        Lifetime::Factory,
        |mid: Arc<Mid>, leaf: Option<Arc<Leaf>>| Top { _mid: mid, _leaf: leaf },
    );

    c.bench_function("validate_small_graph", |b| {
        b.iter(|| black_box(container.validate().is_valid()))
    });
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_factory,
    bench_concrete_vs_interface,
    bench_dependency_chain,
    bench_contention
);

criterion_group!(macro_benches, bench_validation);

criterion_main!(micro_benches, macro_benches);
