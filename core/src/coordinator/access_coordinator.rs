use std::convert::Infallible;
use std::fmt::{Debug, Display};

use crate::coordinator::{AccessMode, AccessState};

/// The contract every coordinator exposes to client code.
///
/// Clients hold a coordinator and route every access to the protected
/// resource through `read` and `write`, without caring which discipline is
/// active.
pub trait AccessCoordinator: Debug + Send + Sync {
  fn mode(&self) -> AccessMode;

  /// Runs `action` inside a read window on the calling thread and returns its
  /// value once it has completed. Blocks while an earlier write is pending or
  /// running.
  ///
  /// Waiting parks the OS thread in every mode. On an async runtime this
  /// stalls the runtime worker, so route calls through `spawn_blocking`.
  fn read<T, F>(&self, action: F) -> T
  where
    F: FnOnce() -> T;

  /// Queues `action` to run inside a write window and returns immediately.
  fn write<F>(&self, action: F)
  where
    F: FnOnce() + Send + 'static, {
    self.try_write(move || {
      action();
      Ok::<(), Infallible>(())
    })
  }

  /// Queues a fallible write. An `Err` is reported to the configured
  /// [`FailureHandler`](crate::FailureHandler), as is a panic.
  fn try_write<F, E>(&self, action: F)
  where
    F: FnOnce() -> Result<(), E> + Send + 'static,
    E: Display + 'static;

  /// Blocks until every write submitted before this call has completed.
  /// Parks the calling thread the same way `read` does.
  fn flush(&self);

  fn state(&self) -> AccessState;
}
