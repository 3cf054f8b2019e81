//! rtring - Most-Recent-Wins Ring Buffer for Real-Time Threads
//!
//! A fixed-capacity ring that hands items from producer threads to consumer
//! threads when freshness matters more than completeness. A consumer that
//! falls behind gets the newest available item, never a backlog.
//!
//! # Key Features
//!
//! - Any number of producers and consumers, sharing the ring by reference
//! - Per-slot `spin::Mutex` locks; the only global step is drawing a sequence number
//! - No allocation after construction; every lock guards O(1) work
//! - Unconsumed items are released through a caller-supplied callback when
//!   their slot is reused or the ring is torn down, never leaked
//!
//! # Example
//!
//! ```
//! use rtring::RtRing;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let ring: Arc<RtRing<Box<[f32; 3]>, _>> =
//!     Arc::new(RtRing::new(|stale: Box<[f32; 3]>| drop(stale)));
//!
//! let producer = {
//!     let ring = Arc::clone(&ring);
//!     thread::spawn(move || {
//!         for i in 0..100 {
//!             ring.insert(Box::new([i as f32; 3]));
//!         }
//!     })
//! };
//! producer.join().unwrap();
//!
//! // The consumer only ever sees the freshest sample.
//! assert_eq!(ring.retrieve().map(|s| s[0]), Some(99.0));
//! assert!(ring.retrieve().is_none());
//! ```

mod config;
mod error;
mod invariants;
mod metrics;
mod release;
mod ring;
mod slot;

pub use config::{Config, DEFAULT_CAPACITY, DEFAULT_WINDOW, METRICS_CONFIG};
pub use error::RingError;
pub use metrics::{Metrics, MetricsSnapshot};
pub use release::{DropRelease, Release};
pub use ring::RtRing;
