//! Demo: a fast sensor producer, a slow control-loop consumer.
//!
//! The consumer runs at a fraction of the producer rate and always acts on
//! the freshest sample; stale samples are released by the ring.
//!
//! Run with: `RUST_LOG=rtring=trace cargo run --features demo --bin rtring-demo`

use rtring::{RtRing, METRICS_CONFIG};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Sample {
    seq: u64,
    taken_at: Instant,
    values: [f32; 16],
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let dropped = Arc::new(AtomicU64::new(0));
    let release = {
        let dropped = Arc::clone(&dropped);
        move |_stale: Box<Sample>| {
            dropped.fetch_add(1, Ordering::Relaxed);
        }
    };

    let ring = Arc::new(RtRing::<Box<Sample>, _>::with_config(release, METRICS_CONFIG));
    let running = Arc::new(AtomicBool::new(true));

    let sensor = {
        let ring = Arc::clone(&ring);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut seq = 0u64;
            while running.load(Ordering::Relaxed) {
                ring.insert(Box::new(Sample {
                    seq,
                    taken_at: Instant::now(),
                    values: [seq as f32; 16],
                }));
                seq += 1;
                thread::sleep(Duration::from_micros(100));
            }
        })
    };

    let control = {
        let ring = Arc::clone(&ring);
        thread::spawn(move || {
            for tick in 0..20 {
                thread::sleep(Duration::from_millis(10));
                match ring.retrieve() {
                    Some(sample) => info!(
                        tick,
                        seq = sample.seq,
                        age_us = sample.taken_at.elapsed().as_micros() as u64,
                        first = sample.values[0],
                        "control step"
                    ),
                    None => info!(tick, "no fresh sample"),
                }
            }
        })
    };

    control.join().unwrap();
    running.store(false, Ordering::Relaxed);
    sensor.join().unwrap();

    let metrics = ring.metrics();
    info!(
        inserted = metrics.inserted,
        retrieved = metrics.retrieved,
        overwritten = metrics.overwritten,
        released_by_callback = dropped.load(Ordering::Relaxed),
        "done"
    );
}
