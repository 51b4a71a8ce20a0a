use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[cfg(test)]
mod tests;

/// A one-shot latch that releases its waiters once `count_down` has been
/// called `count` times.
#[derive(Clone)]
pub struct CountDownLatch {
  inner: Arc<Inner>,
}

struct Inner {
  count: Mutex<usize>,
  condvar: Condvar,
}

impl Debug for CountDownLatch {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CountDownLatch").field("count", &self.count()).finish()
  }
}

impl Eq for CountDownLatch {}

impl PartialEq for CountDownLatch {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl Default for CountDownLatch {
  fn default() -> Self {
    Self::new(0)
  }
}

impl CountDownLatch {
  pub fn new(count: usize) -> Self {
    Self {
      inner: Arc::new(Inner {
        count: Mutex::new(count),
        condvar: Condvar::new(),
      }),
    }
  }

  pub fn count(&self) -> usize {
    *self.inner.count.lock()
  }

  /// Decrements the count. Extra calls after reaching zero are ignored.
  pub fn count_down(&self) {
    let mut count = self.inner.count.lock();
    if *count == 0 {
      tracing::warn!("CountDownLatch::count_down called on an open latch");
      return;
    }
    *count -= 1;
    if *count == 0 {
      self.inner.condvar.notify_all();
    }
  }

  pub fn wait(&self) {
    let mut count = self.inner.count.lock();
    while *count > 0 {
      self.inner.condvar.wait(&mut count);
    }
  }

  /// Waits at most `timeout`. Returns `true` if the latch opened in time.
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
