//! Blocking concurrency helpers shared by the crew crates.
//!
//! These are thread-oriented counterparts of the usual latch and wait-group
//! primitives, plus a gauge that remembers the highest observed overlap of
//! critical sections.

pub mod concurrent;
