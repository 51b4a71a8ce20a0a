use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// Counts how many sections are currently inside a region and remembers the
/// highest count ever observed.
///
/// ```rust
/// use crew_utils_rs::concurrent::PeakGauge;
///
/// let gauge = PeakGauge::new();
/// {
///   let _a = gauge.enter();
///   let _b = gauge.enter();
///   assert_eq!(gauge.current(), 2);
/// }
/// assert_eq!(gauge.current(), 0);
/// assert_eq!(gauge.peak(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PeakGauge {
  inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
  current: AtomicUsize,
  peak: AtomicUsize,
}

impl PeakGauge {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn enter(&self) -> PeakGaugeGuard {
    let current = self.inner.current.fetch_add(1, Ordering::SeqCst) + 1;
    self.inner.peak.fetch_max(current, Ordering::SeqCst);
    PeakGaugeGuard {
      inner: self.inner.clone(),
    }
  }

  pub fn current(&self) -> usize {
    self.inner.current.load(Ordering::SeqCst)
  }

  pub fn peak(&self) -> usize {
    self.inner.peak.load(Ordering::SeqCst)
  }
}

/// Leaves the gauge on drop.
#[derive(Debug)]
pub struct PeakGaugeGuard {
  inner: Arc<Inner>,
}

impl Drop for PeakGaugeGuard {
  fn drop(&mut self) {
    self.inner.current.fetch_sub(1, Ordering::SeqCst);
  }
}
