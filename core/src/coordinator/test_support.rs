use std::sync::Arc;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use crate::coordinator::{AccessFailure, FailureHandler};

pub(crate) fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

pub(crate) fn recording_handler() -> (FailureHandler, Arc<Mutex<Vec<AccessFailure>>>) {
  let failures = Arc::new(Mutex::new(Vec::new()));
  let cloned_failures = failures.clone();
  let handler = FailureHandler::new(move |failure| cloned_failures.lock().push(failure.clone()));
  (handler, failures)
}

/// Polls `condition` until it holds or `timeout` elapses.
pub(crate) fn eventually(timeout: std::time::Duration, mut condition: impl FnMut() -> bool) -> bool {
  let deadline = std::time::Instant::now() + timeout;
  while std::time::Instant::now() < deadline {
    if condition() {
      return true;
    }
    std::thread::sleep(std::time::Duration::from_millis(1));
  }
  condition()
}
