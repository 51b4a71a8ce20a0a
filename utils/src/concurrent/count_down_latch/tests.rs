use std::thread;
use std::time::Duration;

use crate::concurrent::CountDownLatch;

#[test]
fn test_open_latch_does_not_block() {
  let latch = CountDownLatch::default();
  latch.wait();
  assert!(latch.wait_timeout(Duration::from_millis(1)));
}

#[test]
fn test_wait_returns_after_all_count_downs() {
  let latch = CountDownLatch::new(3);

  let handles = (0..3)
    .map(|_| {
      let latch = latch.clone();
      thread::spawn(move || latch.count_down())
    })
    .collect::<Vec<_>>();

  assert!(latch.wait_timeout(Duration::from_secs(5)));
  assert_eq!(latch.count(), 0);

  for handle in handles {
    handle.join().unwrap();
  }
}

#[test]
fn test_wait_timeout_expires_while_closed() {
  let latch = CountDownLatch::new(2);
  latch.count_down();
  assert!(!latch.wait_timeout(Duration::from_millis(20)));
  assert_eq!(latch.count(), 1);
}

#[test]
fn test_count_down_saturates_at_zero() {
  let latch = CountDownLatch::new(1);
  latch.count_down();
  latch.count_down();
  assert_eq!(latch.count(), 0);
}

#[test]
fn test_clones_share_state() {
  let latch = CountDownLatch::new(1);
  let other = latch.clone();
  assert_eq!(latch, other);
  other.count_down();
  assert_eq!(latch.count(), 0);
  assert_ne!(latch, CountDownLatch::new(1));
}
