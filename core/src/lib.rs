//! Access coordinators for a shared resource.
//!
//! A coordinator serializes *access windows*, closures handed in by the
//! client, under one of two disciplines chosen at construction:
//!
//! - [`AccessMode::Exclusive`] (EREW): every read and write excludes every
//!   other access.
//! - [`AccessMode::ConcurrentRead`] (CREW): reads run alongside each other,
//!   a write runs alone. A write acts as a barrier: reads submitted before it
//!   finish before it starts, and reads submitted after it wait until it is
//!   done.
//!
//! `read` blocks the calling thread and returns the closure's value. `write`
//! queues the closure and returns at once; it runs later on the coordinator's
//! serial worker thread, in submission order.
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! use crew_core_rs::{AccessCoordinator, AccessMode, Coordinator};
//!
//! let coordinator = Coordinator::new(AccessMode::ConcurrentRead).unwrap();
//! let counter = Arc::new(AtomicUsize::new(0));
//!
//! assert_eq!(coordinator.read(|| counter.load(Ordering::SeqCst)), 0);
//! let cloned_counter = counter.clone();
//! coordinator.write(move || {
//!   cloned_counter.fetch_add(1, Ordering::SeqCst);
//! });
//! assert_eq!(coordinator.read(|| counter.load(Ordering::SeqCst)), 1);
//! ```
//!
//! Calling `read` or `write` on a coordinator from inside one of its own
//! access windows is a programming error and hangs.

pub mod coordinator;

pub use coordinator::*;
