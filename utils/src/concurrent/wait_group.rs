use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};


/// Waits for a dynamic set of threads to finish, in the manner of Go's
/// `sync.WaitGroup`.
#[derive(Debug, Clone, Default)]
pub struct WaitGroup {
  inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
  count: Mutex<usize>,
  condvar: Condvar,
}

impl WaitGroup {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_count(count: usize) -> Self {
    let wg = Self::new();
    wg.add(count);
    wg
  }

  pub fn add(&self, n: usize) {
    let mut count = self.inner.count.lock();
    *count += n;
  }

  pub fn done(&self) {
    let mut count = self.inner.count.lock();
    tracing::debug!("done: count={}", *count);
    *count = count.saturating_sub(1);
    if *count == 0 {
      self.inner.condvar.notify_all();
    }
  }

  pub fn count(&self) -> usize {
    *self.inner.count.lock()
  }

  pub fn wait(&self) {
    let mut count = self.inner.count.lock();
    while *count > 0 {
      self.inner.condvar.wait(&mut count);
    }
  }

  /// Returns `false` if the group was still busy when `timeout` elapsed.
  pub fn wait_timeout(&self, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    let mut count = self.inner.count.lock();
    while *count > 0 {
      if self.inner.condvar.wait_until(&mut count, deadline).timed_out() {
        return *count == 0;
      }
    }
    true
  }
}
