use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rtring::RtRing;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

const OPS_PER_PRODUCER: u64 = 1_000_000;

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");
    group.throughput(Throughput::Elements(1));

    group.bench_function("insert", |b| {
        let ring: RtRing<u64> = RtRing::default();
        let mut i = 0u64;
        b.iter(|| {
            ring.insert(black_box(i));
            i += 1;
        });
    });

    group.bench_function("insert_retrieve", |b| {
        let ring: RtRing<u64> = RtRing::default();
        let mut i = 0u64;
        b.iter(|| {
            ring.insert(i);
            i += 1;
            black_box(ring.retrieve());
        });
    });

    group.bench_function("retrieve_empty", |b| {
        let ring: RtRing<u64> = RtRing::default();
        ring.insert(0);
        ring.retrieve();
        b.iter(|| black_box(ring.retrieve()));
    });

    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");

    for producers in [1u64, 2, 4] {
        group.throughput(Throughput::Elements(producers * OPS_PER_PRODUCER));
        group.bench_with_input(
            BenchmarkId::new("producers_with_two_consumers", producers),
            &producers,
            |b, &producers| {
                b.iter(|| {
                    let ring: Arc<RtRing<Box<u64>>> = Arc::new(RtRing::default());
                    let done = Arc::new(AtomicBool::new(false));

                    let consumers: Vec<_> = (0..2)
                        .map(|_| {
                            let ring = Arc::clone(&ring);
                            let done = Arc::clone(&done);
                            thread::spawn(move || {
                                let mut got = 0u64;
                                while !done.load(Ordering::Relaxed) {
                                    if ring.retrieve().is_some() {
                                        got += 1;
                                    }
                                }
                                got
                            })
                        })
                        .collect();

                    let handles: Vec<_> = (0..producers)
                        .map(|_| {
                            let ring = Arc::clone(&ring);
                            thread::spawn(move || {
                                for i in 0..OPS_PER_PRODUCER {
                                    ring.insert(Box::new(i));
                                }
                            })
                        })
                        .collect();

                    for h in handles {
                        h.join().unwrap();
                    }
                    done.store(true, Ordering::Relaxed);
                    for h in consumers {
                        black_box(h.join().unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_uncontended, bench_contended);
criterion_main!(benches);
