use std::thread;
use std::time::Duration;

use crate::concurrent::{CountDownLatch, PeakGauge};

#[test]
fn test_sequential_sections_peak_at_one() {
  let gauge = PeakGauge::new();
  for _ in 0..10 {
    let _guard = gauge.enter();
  }
  assert_eq!(gauge.peak(), 1);
  assert_eq!(gauge.current(), 0);
}

#[test]
fn test_overlapping_threads_raise_peak() {
  let gauge = PeakGauge::new();
  let all_inside = CountDownLatch::new(3);

  let handles = (0..3)
    .map(|_| {
      let gauge = gauge.clone();
      let all_inside = all_inside.clone();
      thread::spawn(move || {
        let _guard = gauge.enter();
        all_inside.count_down();
        all_inside.wait_timeout(Duration::from_secs(5));
      })
    })
    .collect::<Vec<_>>();

  for handle in handles {
    handle.join().unwrap();
  }

  assert_eq!(gauge.peak(), 3);
  assert_eq!(gauge.current(), 0);
}
