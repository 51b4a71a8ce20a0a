use std::collections::VecDeque;
use std::fmt::Display;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::coordinator::{
  AccessCoordinator, AccessKind, AccessMode, AccessState, Config, CoordinatorError, ExclusionGate,
};


/// CREW coordinator: reads run concurrently, writes run alone.
///
/// Every write opens a new *generation*. A read belongs to the generation
/// that is current when it is submitted and may only start once every
/// earlier write has completed; a write may only start once all reads of its
/// own generation (those submitted before it) have finished. Writes are
/// serialized in submission order by an [`ExclusionGate`]'s deferred queue.
#[derive(Debug, Clone)]
pub struct ConcurrentReadCoordinator {
  inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
  shared: Arc<Shared>,
  gate: ExclusionGate,
}

#[derive(Debug)]
struct Shared {
  state: Mutex<CrewState>,
  /// Signalled when a write completes.
  write_completed: Condvar,
  /// Signalled when the oldest generation has no outstanding reads.
  generation_drained: Condvar,
}

#[derive(Debug)]
struct CrewState {
  submitted_writes: u64,
  completed_writes: u64,
  /// Outstanding reads per generation, starting at `completed_writes`.
  /// Always holds `submitted_writes - completed_writes + 1` entries.
  outstanding_reads: VecDeque<usize>,
  active_readers: usize,
  writer_active: bool,
}

impl CrewState {
  fn new() -> Self {
    Self {
      submitted_writes: 0,
      completed_writes: 0,
      outstanding_reads: VecDeque::from([0]),
      active_readers: 0,
      writer_active: false,
    }
  }

  fn register_read(&mut self) -> u64 {
    if let Some(count) = self.outstanding_reads.back_mut() {
      *count += 1;
    }
    self.submitted_writes
  }

  fn register_write(&mut self) -> u64 {
    let generation = self.submitted_writes;
    self.submitted_writes += 1;
    self.outstanding_reads.push_back(0);
    generation
  }

  fn read_may_start(&self, generation: u64) -> bool {
    !self.writer_active && self.completed_writes == generation
  }

  fn write_may_start(&self, generation: u64) -> bool {
    !self.writer_active
      && self.active_readers == 0
      && self.completed_writes == generation
      && self.outstanding_reads.front() == Some(&0)
  }

  /// Returns `true` if the oldest generation just drained.
  fn finish_read(&mut self) -> bool {
    self.active_readers -= 1;
    match self.outstanding_reads.front_mut() {
      Some(count) => {
        *count -= 1;
        *count == 0
      }
      None => false,
    }
  }

  fn finish_write(&mut self) {
    self.writer_active = false;
    self.completed_writes += 1;
    self.outstanding_reads.pop_front();
  }

  fn snapshot(&self) -> AccessState {
    let outstanding = self.outstanding_reads.iter().sum::<usize>();
    AccessState {
      active_readers: self.active_readers,
      waiting_readers: outstanding - self.active_readers,
      pending_writes: (self.submitted_writes - self.completed_writes) as usize,
      writer_active: self.writer_active,
    }
  }
}

impl ConcurrentReadCoordinator {
  pub fn new() -> Result<Self, CoordinatorError> {
    Self::from_config(&Config::with_mode(AccessMode::ConcurrentRead))
  }

  pub fn from_config(config: &Config) -> Result<Self, CoordinatorError> {
    Ok(Self {
      inner: Arc::new(Inner {
        shared: Arc::new(Shared {
          state: Mutex::new(CrewState::new()),
          write_completed: Condvar::new(),
          generation_drained: Condvar::new(),
        }),
        gate: ExclusionGate::from_config(config)?,
      }),
    })
  }
}

impl AccessCoordinator for ConcurrentReadCoordinator {
  fn mode(&self) -> AccessMode {
    AccessMode::ConcurrentRead
  }

  fn read<T, F>(&self, action: F) -> T
  where
    F: FnOnce() -> T, {
    let _window = ReadWindow::open(&self.inner.shared);
    action()
  }

  fn try_write<F, E>(&self, action: F)
  where
    F: FnOnce() -> Result<(), E> + Send + 'static,
    E: Display + 'static, {
    let shared = self.inner.shared.clone();
    // Registration and enqueueing happen under one lock so the gate's queue
    // order matches generation order.
    let mut state = self.inner.shared.state.lock();
    let generation = state.register_write();
    self.inner.gate.try_run_deferred(AccessKind::Write, move || {
      let _window = WriteWindow::open(&shared, generation);
      action()
    });
    drop(state);
    tracing::debug!(gate = %self.inner.gate.name(), generation, "write queued");
  }

  fn flush(&self) {
    // The hand-off queues behind every earlier write, including the report
    // of its failure.
    self.inner.gate.flush();
  }

  fn state(&self) -> AccessState {
    self.inner.shared.state.lock().snapshot()
  }
}

struct ReadWindow<'a> {
  shared: &'a Shared,
}

impl<'a> ReadWindow<'a> {
  fn open(shared: &'a Shared) -> Self {
    let mut state = shared.state.lock();
    let generation = state.register_read();
    while !state.read_may_start(generation) {
      shared.write_completed.wait(&mut state);
    }
    state.active_readers += 1;
    Self { shared }
  }
}

impl Drop for ReadWindow<'_> {
  fn drop(&mut self) {
    let mut state = self.shared.state.lock();
    let drained = state.finish_read();
    if std::thread::panicking() {
      tracing::debug!("read window released during unwind");
    }
    if drained && state.submitted_writes > state.completed_writes {
      self.shared.generation_drained.notify_all();
    }
  }
}

struct WriteWindow<'a> {
  shared: &'a Shared,
  generation: u64,
}

impl<'a> WriteWindow<'a> {
  fn open(shared: &'a Shared, generation: u64) -> Self {
    let mut state = shared.state.lock();
    while !state.write_may_start(generation) {
      shared.generation_drained.wait(&mut state);
    }
    state.writer_active = true;
    Self { shared, generation }
  }
}

impl Drop for WriteWindow<'_> {
  fn drop(&mut self) {
    let mut state = self.shared.state.lock();
    state.finish_write();
    if std::thread::panicking() {
      tracing::debug!(generation = self.generation, "write window released during unwind");
    } else {
      tracing::debug!(generation = self.generation, "write completed");
    }
    self.shared.write_completed.notify_all();
  }
}

static_assertions::assert_impl_all!(ConcurrentReadCoordinator: Send, Sync);
