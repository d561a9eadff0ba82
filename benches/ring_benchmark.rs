use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use ringroute::{HashAlgorithm, HashRing, Node, RingConfig, Request};
use std::hint::black_box;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::thread;

fn populate_ring(ring: &HashRing, count: usize) {
    for i in 0..count {
        let weight = NonZeroU32::new((i % 3) as u32 + 1).unwrap();
        ring.add_node(Node::with_weight(format!("node-{}", i), format!("10.0.0.{}", i), weight));
    }
}

fn make_request(i: usize) -> Request {
    Request::new(format!("req-{}", i), "svc-1", "GET")
}

fn bench_add_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("01_add_node_by_multiplier");

    for multiplier in [10u32, 100, 500] {
        group.throughput(Throughput::Elements(multiplier as u64));

        group.bench_with_input(
            BenchmarkId::new("add_node", multiplier),
            &multiplier,
            |b, &multiplier| {
                let ring = HashRing::new(multiplier).unwrap();
                populate_ring(&ring, 16);

                b.iter_batched(
                    || Node::new("node-new", "10.0.1.1"),
                    |node| ring.add_node(node),
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_assign(c: &mut Criterion) {
    let mut group = c.benchmark_group("02_assign");

    for (name, algorithm) in [("fnv1a", HashAlgorithm::Fnv1a), ("xxhash64", HashAlgorithm::XxHash64)] {
        group.throughput(Throughput::Elements(1));

        group.bench_function(BenchmarkId::new("assign", name), |b| {
            let ring = HashRing::from_config(&RingConfig::new(100, algorithm, 16)).unwrap();
            populate_ring(&ring, 32);

            let mut counter = 0;
            b.iter(|| {
                black_box(ring.assign(&make_request(counter % 1000)));
                counter += 1;
            });
        });
    }

    group.finish();
}

fn bench_remove_readd(c: &mut Criterion) {
    let ring = HashRing::new(100).unwrap();
    populate_ring(&ring, 16);

    c.bench_function("03_remove_readd_churn", |b| {
        b.iter(|| {
            ring.remove_node("node-3");
            ring.add_node(Node::new("node-3", "10.0.0.3"));
        });
    });
}

fn bench_concurrent_handle(c: &mut Criterion) {
    let mut group = c.benchmark_group("04_concurrent_handle");

    for num_threads in &[1, 2, 4, 8] {
        group.throughput(Throughput::Elements(*num_threads as u64 * 1000));

        group.bench_with_input(
            BenchmarkId::new("threads", num_threads),
            num_threads,
            |b, &num_threads| {
                let ring = Arc::new(HashRing::new(100).unwrap());
                populate_ring(&ring, 16);

                b.iter(|| {
                    let handles: Vec<_> = (0..num_threads).map(|_| {
                        let ring_clone = Arc::clone(&ring);
                        thread::spawn(move || {
                            for i in 0..1000 {
                                ring_clone.handle_request(&make_request(i));
                            }
                        })
                    }).collect();

                    handles.into_iter().for_each(|h| h.join().unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_describe(c: &mut Criterion) {
    let ring = HashRing::new(100).unwrap();
    populate_ring(&ring, 64);

    c.bench_function("05_describe_ring_state", |b| {
        b.iter(|| black_box(ring.describe_ring_state()));
    });
}

criterion_group!(
    benches,
    bench_add_node,
    bench_assign,
    bench_remove_readd,
    bench_concurrent_handle,
    bench_describe,
);
criterion_main!(benches);
