use std::fmt::Display;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::coordinator::{
  AccessCoordinator, AccessKind, AccessMode, AccessState, Config, CoordinatorError, ExclusionGate,
};

#[cfg(test)]
mod tests;

/// EREW coordinator: every read and write runs alone.
///
/// Reads go through the gate's blocking entry point, writes through its
/// deferred one, so reads and writes share a single FIFO order.
#[derive(Debug, Clone)]
pub struct ExclusiveCoordinator {
  inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
  gate: ExclusionGate,
  state: Arc<Mutex<AccessState>>,
}

impl ExclusiveCoordinator {
  pub fn new() -> Result<Self, CoordinatorError> {
    Self::from_config(&Config::with_mode(AccessMode::Exclusive))
  }

  pub fn from_config(config: &Config) -> Result<Self, CoordinatorError> {
    Ok(Self {
      inner: Arc::new(Inner {
        gate: ExclusionGate::from_config(config)?,
        state: Arc::new(Mutex::new(AccessState::default())),
      }),
    })
  }
}

impl AccessCoordinator for ExclusiveCoordinator {
  fn mode(&self) -> AccessMode {
    AccessMode::Exclusive
  }

  fn read<T, F>(&self, action: F) -> T
  where
    F: FnOnce() -> T, {
    // Counting and enqueueing under one lock keeps the snapshot in step with
    // the gate's queue order.
    let turn = {
      let mut state = self.inner.state.lock();
      let turn = self.inner.gate.reserve_turn();
      state.waiting_readers += 1;
      turn
    };
    let _turn = turn.acquire();
    let _window = Window::open(&self.inner.state, AccessKind::Read);
    action()
  }

  fn try_write<F, E>(&self, action: F)
  where
    F: FnOnce() -> Result<(), E> + Send + 'static,
    E: Display + 'static, {
    let shared_state = self.inner.state.clone();
    let mut state = self.inner.state.lock();
    let sequence = self.inner.gate.try_run_deferred(AccessKind::Write, move || {
      let _window = Window::open(&shared_state, AccessKind::Write);
      action()
    });
    state.pending_writes += 1;
    drop(state);
    tracing::debug!(gate = %self.inner.gate.name(), sequence, "write queued");
  }

  fn flush(&self) {
    self.inner.gate.flush();
  }

  fn state(&self) -> AccessState {
    *self.inner.state.lock()
  }
}

/// Bookkeeping for one access; released on drop so an unwinding action
/// leaves the state consistent.
struct Window<'a> {
  state: &'a Mutex<AccessState>,
  kind: AccessKind,
}

impl<'a> Window<'a> {
  fn open(state: &'a Mutex<AccessState>, kind: AccessKind) -> Self {
    let mut guard = state.lock();
    match kind {
      AccessKind::Read => {
        guard.waiting_readers -= 1;
        guard.active_readers += 1;
      }
      AccessKind::Write => guard.writer_active = true,
    }
    Self { state, kind }
  }
}

impl Drop for Window<'_> {
  fn drop(&mut self) {
    let mut guard = self.state.lock();
    match self.kind {
      AccessKind::Read => guard.active_readers -= 1,
      AccessKind::Write => {
        guard.writer_active = false;
        guard.pending_writes -= 1;
      }
    }
    if std::thread::panicking() {
      tracing::debug!(kind = %self.kind, "access window released during unwind");
    }
  }
}

static_assertions::assert_impl_all!(ExclusiveCoordinator: Send, Sync);
