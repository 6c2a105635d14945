// Produce/recycle throughput benchmarks.
//
// Measures the locked hot path against a `Box` round trip through the
// global allocator, plus the cost of the guard and of lock contention.

use std::hint::black_box;
use std::sync::Arc;
use std::thread;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use slotpool::{FixedPool, PoolConfig};

#[derive(Default)]
struct Child {
    value: u64,
    _pad: [u64; 7],
}

fn pool(capacity: usize) -> FixedPool<Child> {
    FixedPool::with_config(PoolConfig::production(capacity).with_name("bench")).unwrap()
}

fn bench_single_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_cycle");

    let fixed = pool(1024);
    group.bench_function("fixed_pool", |b| {
        b.iter(|| {
            let mut handle = fixed.produce_with(|| Child {
                value: 7,
                ..Child::default()
            });
            black_box(&handle);
            fixed.recycle(&mut handle);
        });
    });

    group.bench_function("guard", |b| {
        b.iter(|| {
            let mut child = fixed.acquire().unwrap();
            child.value = black_box(7);
        });
    });

    group.bench_function("boxed", |b| {
        b.iter(|| {
            let child = Box::new(Child {
                value: 7,
                ..Child::default()
            });
            black_box(child);
        });
    });

    group.finish();
}

fn bench_fill_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_and_drain");

    for capacity in [64, 1024, 16_384] {
        let fixed = pool(capacity);
        let mut held = Vec::with_capacity(capacity);
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, _| {
            b.iter(|| {
                while let Some(handle) = fixed.produce() {
                    held.push(handle);
                }
                for handle in held.drain(..) {
                    fixed.recycle_handle(handle);
                }
            });
        });
    }

    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");
    group.sample_size(20);

    for threads in [2, 4, 8] {
        let fixed = Arc::new(pool(1024));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let workers: Vec<_> = (0..threads)
                    .map(|_| {
                        let fixed = Arc::clone(&fixed);
                        thread::spawn(move || {
                            for _ in 0..1_000 {
                                let mut handle = fixed.produce();
                                fixed.recycle(&mut handle);
                            }
                        })
                    })
                    .collect();
                for worker in workers {
                    worker.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_cycle, bench_fill_and_drain, bench_contended);
criterion_main!(benches);
