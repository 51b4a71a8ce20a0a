use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crew_utils_rs::concurrent::{CountDownLatch, PeakGauge, WaitGroup};
use parking_lot::Mutex;

use crate::coordinator::test_support::{eventually, init_tracing, recording_handler};
use crate::coordinator::{AccessCoordinator, AccessMode, AccessPhase, Config, ConfigOption, ExclusiveCoordinator};

const TIMEOUT: Duration = Duration::from_secs(10);

#[test]
fn test_mode_is_exclusive() {
  init_tracing();
  let coordinator = ExclusiveCoordinator::new().unwrap();
  assert_eq!(coordinator.mode(), AccessMode::Exclusive);
  assert!(coordinator.state().is_idle());
}

#[test]
fn test_reads_and_writes_never_overlap() {
  init_tracing();
  let coordinator = ExclusiveCoordinator::new().unwrap();
  let gauge = PeakGauge::new();
  let wg = WaitGroup::with_count(6);

  for t in 0..6 {
    let coordinator = coordinator.clone();
    let gauge = gauge.clone();
    let wg = wg.clone();
    thread::spawn(move || {
      for _ in 0..20 {
        if t % 3 == 0 {
          let gauge = gauge.clone();
          coordinator.write(move || {
            let _inside = gauge.enter();
            thread::sleep(Duration::from_micros(100));
          });
        } else {
          coordinator.read(|| {
            let _inside = gauge.enter();
            thread::sleep(Duration::from_micros(100));
          });
        }
      }
      wg.done();
    });
  }

  assert!(wg.wait_timeout(Duration::from_secs(30)));
  coordinator.flush();
  assert_eq!(gauge.peak(), 1);
}

#[test]
fn test_submission_order_is_preserved_across_reads_and_writes() {
  init_tracing();
  let coordinator = ExclusiveCoordinator::new().unwrap();
  let log = Arc::new(Mutex::new(Vec::new()));
  let a_started = CountDownLatch::new(1);
  let a_release = CountDownLatch::new(1);

  let reader_a = {
    let coordinator = coordinator.clone();
    let log = log.clone();
    let a_started = a_started.clone();
    let a_release = a_release.clone();
    thread::spawn(move || {
      coordinator.read(|| {
        a_started.count_down();
        a_release.wait_timeout(TIMEOUT);
        log.lock().push("A");
      })
    })
  };
  assert!(a_started.wait_timeout(TIMEOUT));

  let cloned_log = log.clone();
  coordinator.write(move || cloned_log.lock().push("W"));

  let reader_c = {
    let coordinator = coordinator.clone();
    let log = log.clone();
    thread::spawn(move || coordinator.read(|| log.lock().push("C")))
  };
  assert!(eventually(TIMEOUT, || coordinator.state().waiting_readers == 1));
  assert_eq!(coordinator.state().phase(), AccessPhase::ReadersActive(1));
  assert_eq!(coordinator.state().pending_writes, 1);

  a_release.count_down();
  reader_a.join().unwrap();
  reader_c.join().unwrap();

  assert_eq!(*log.lock(), vec!["A", "W", "C"]);
}

#[test]
fn test_running_write_is_reported_in_state() {
  init_tracing();
  let coordinator = ExclusiveCoordinator::new().unwrap();
  let started = CountDownLatch::new(1);
  let release = CountDownLatch::new(1);

  {
    let started = started.clone();
    let release = release.clone();
    coordinator.write(move || {
      started.count_down();
      release.wait_timeout(TIMEOUT);
    });
  }
  assert!(started.wait_timeout(TIMEOUT));
  assert_eq!(coordinator.state().phase(), AccessPhase::WriterActive);

  release.count_down();
  coordinator.flush();
  assert!(coordinator.state().is_idle());
}

#[test]
fn test_write_returns_before_action_runs() {
  init_tracing();
  let coordinator = ExclusiveCoordinator::new().unwrap();
  let release = CountDownLatch::new(1);
  let ran = Arc::new(AtomicBool::new(false));

  {
    let release = release.clone();
    let ran = ran.clone();
    coordinator.write(move || {
      release.wait_timeout(TIMEOUT);
      ran.store(true, Ordering::SeqCst);
    });
  }
  assert!(!ran.load(Ordering::SeqCst));

  release.count_down();
  assert!(coordinator.read(|| ran.load(Ordering::SeqCst)));
}

#[test]
fn test_failures_do_not_leak_exclusion() {
  init_tracing();
  let (handler, failures) = recording_handler();
  let coordinator = ExclusiveCoordinator::from_config(&Config::from([
    ConfigOption::with_mode(AccessMode::Exclusive),
    ConfigOption::with_failure_handler(handler),
  ]))
  .unwrap();

  let result = panic::catch_unwind(AssertUnwindSafe(|| coordinator.read(|| panic!("read failed"))));
  assert!(result.is_err());
  coordinator.write(|| panic!("write failed"));
  coordinator.try_write(|| Err::<(), _>("write refused"));

  let (tx, rx) = std::sync::mpsc::channel();
  let cloned = coordinator.clone();
  thread::spawn(move || {
    let _ = tx.send(cloned.read(|| 42));
  });
  assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), 42);

  let failures = failures.lock().clone();
  assert_eq!(failures.len(), 2);
  assert_eq!(failures[0].message(), "write failed");
  assert_eq!(failures[1].message(), "write refused");
  assert!(failures[0].sequence() < failures[1].sequence());
  assert!(coordinator.state().is_idle());
}

#[test]
fn test_counted_readers_always_precede_a_later_write() {
  init_tracing();
  let coordinator = ExclusiveCoordinator::new().unwrap();

  for _ in 0..200 {
    let log = Arc::new(Mutex::new(Vec::new()));
    let finished = Arc::new(AtomicUsize::new(0));
    let readers = ["A", "B"]
      .into_iter()
      .map(|name| {
        let coordinator = coordinator.clone();
        let log = log.clone();
        let finished = finished.clone();
        thread::spawn(move || {
          coordinator.read(|| log.lock().push(name));
          finished.fetch_add(1, Ordering::SeqCst);
        })
      })
      .collect::<Vec<_>>();

    assert!(eventually(TIMEOUT, || {
      let state = coordinator.state();
      finished.load(Ordering::SeqCst) + state.active_readers + state.waiting_readers == 2
    }));

    let cloned_log = log.clone();
    coordinator.write(move || cloned_log.lock().push("W"));
    for reader in readers {
      reader.join().unwrap();
    }
    coordinator.flush();

    let log = log.lock().clone();
    assert_eq!(log.last(), Some(&"W"), "reads counted before the write ran after it: {:?}", log);
  }
}
