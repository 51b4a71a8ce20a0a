use std::convert::Infallible;
use std::fmt::{Debug, Display, Formatter};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use tokio::sync::mpsc;

use crate::coordinator::{AccessFailure, AccessKind, Config, CoordinatorError, FailureHandler};


type Task = Box<dyn FnOnce() -> Result<(), String> + Send + 'static>;

enum Job {
  Deferred {
    kind: AccessKind,
    sequence: u64,
    task: Task,
  },
  /// Lends the turn to a caller until it releases it.
  Handoff(Arc<TurnSignal>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnPhase {
  Queued,
  Granted,
  Released,
}

#[derive(Debug)]
struct TurnSignal {
  phase: Mutex<TurnPhase>,
  changed: Condvar,
}

impl TurnSignal {
  fn new() -> Self {
    Self {
      phase: Mutex::new(TurnPhase::Queued),
      changed: Condvar::new(),
    }
  }

  fn grant_and_wait_release(&self) {
    let mut phase = self.phase.lock();
    if *phase == TurnPhase::Queued {
      *phase = TurnPhase::Granted;
      self.changed.notify_all();
    }
    while *phase != TurnPhase::Released {
      self.changed.wait(&mut phase);
    }
  }

  fn wait_granted(&self) {
    let mut phase = self.phase.lock();
    while *phase == TurnPhase::Queued {
      self.changed.wait(&mut phase);
    }
  }

  fn release(&self) {
    let mut phase = self.phase.lock();
    *phase = TurnPhase::Released;
    self.changed.notify_all();
  }
}

/// A place in the gate's queue, reserved by [`ExclusionGate::reserve_turn`].
///
/// Dropping it, whether before or after [`acquire`](Turn::acquire), hands
/// the turn back to the worker.
#[derive(Debug)]
pub struct Turn {
  signal: Arc<TurnSignal>,
}

impl Turn {
  /// Parks the calling thread until every earlier submission has finished.
  pub fn acquire(self) -> Self {
    self.signal.wait_granted();
    self
  }
}

impl Drop for Turn {
  fn drop(&mut self) {
    self.signal.release();
  }
}

/// A single mutual-exclusion gate with a blocking and a deferred entry point.
///
/// Both entry points feed one FIFO queue drained by a dedicated worker
/// thread, so at most one submitted action runs at any instant and actions
/// start in submission order. Deferred actions run on the worker; blocking
/// actions run on the caller's thread while the worker waits for them.
///
/// The blocking entry point parks the calling OS thread on a condition
/// variable; on an async runtime prefer `tokio::task::spawn_blocking` so no
/// runtime worker is held up.
pub struct ExclusionGate {
  name: String,
  sender: Option<mpsc::UnboundedSender<Job>>,
  worker: Option<JoinHandle<()>>,
  sequence: AtomicU64,
}

impl Debug for ExclusionGate {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ExclusionGate")
      .field("name", &self.name)
      .field("submitted", &self.sequence.load(Ordering::Relaxed))
      .finish()
  }
}

impl ExclusionGate {
  pub fn new() -> Result<Self, CoordinatorError> {
    Self::from_config(&Config::default())
  }

  pub fn from_config(config: &Config) -> Result<Self, CoordinatorError> {
    let (sender, receiver) = mpsc::unbounded_channel();
    let failure_handler = config.failure_handler.clone();
    let span = tracing::debug_span!("serial_worker", gate = %config.worker_name, prefix = %config.log_prefix);
    let worker = thread::Builder::new()
      .name(config.worker_name.clone())
      .spawn(move || {
        let _entered = span.enter();
        run_worker(receiver, failure_handler);
      })
      .map_err(|source| CoordinatorError::WorkerSpawn {
        name: config.worker_name.clone(),
        source,
      })?;
    Ok(Self {
      name: config.worker_name.clone(),
      sender: Some(sender),
      worker: Some(worker),
      sequence: AtomicU64::new(0),
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Waits for the turn, runs `action` on the calling thread and returns its
  /// value. A panic in `action` hands the turn back and then resumes
  /// unwinding in the caller.
  pub fn run_blocking<T, F>(&self, action: F) -> T
  where
    F: FnOnce() -> T, {
    let _turn = self.reserve_turn().acquire();
    action()
  }

  /// Enqueues a blocking turn without waiting for it. The queue position is
  /// fixed when this returns, so callers can record the submission under
  /// their own lock.
  pub fn reserve_turn(&self) -> Turn {
    let signal = Arc::new(TurnSignal::new());
    self.next_sequence();
    self.submit(Job::Handoff(signal.clone()));
    Turn { signal }
  }

  /// Queues `action` behind everything submitted so far and returns its
  /// sequence number without waiting.
  pub fn run_deferred<F>(&self, kind: AccessKind, action: F) -> u64
  where
    F: FnOnce() + Send + 'static, {
    self.try_run_deferred(kind, move || {
      action();
      Ok::<(), Infallible>(())
    })
  }

  /// Like [`run_deferred`](Self::run_deferred), but an `Err` returned by
  /// `action` is reported to the failure handler.
  pub fn try_run_deferred<F, E>(&self, kind: AccessKind, action: F) -> u64
  where
    F: FnOnce() -> Result<(), E> + Send + 'static,
    E: Display + 'static, {
    let sequence = self.next_sequence();
    self.submit(Job::Deferred {
      kind,
      sequence,
      task: Box::new(move || action().map_err(|e| e.to_string())),
    });
    sequence
  }

  /// Blocks until every action submitted before this call has finished.
  pub fn flush(&self) {
    self.run_blocking(|| ())
  }

  fn next_sequence(&self) -> u64 {
    self.sequence.fetch_add(1, Ordering::Relaxed)
  }

  fn submit(&self, job: Job) {
    let sent = match &self.sender {
      Some(sender) => sender.send(job).is_ok(),
      None => false,
    };
    // The worker contains every panic it observes, so it only stops after the
    // sender is gone.
    if !sent {
      tracing::error!(gate = %self.name, "serial worker is not running");
      panic!("serial worker of gate '{}' is not running", self.name);
    }
  }
}

impl Drop for ExclusionGate {
  fn drop(&mut self) {
    self.sender.take();
    if let Some(worker) = self.worker.take() {
      if worker.thread().id() == thread::current().id() {
        tracing::debug!(gate = %self.name, "gate dropped on its own worker; detaching");
        return;
      }
      if worker.join().is_err() {
        tracing::error!(gate = %self.name, "serial worker terminated abnormally");
      }
    }
  }
}

fn run_worker(mut receiver: mpsc::UnboundedReceiver<Job>, failure_handler: FailureHandler) {
  tracing::debug!("serial worker started");
  while let Some(job) = receiver.blocking_recv() {
    match job {
      Job::Handoff(signal) => signal.grant_and_wait_release(),
      Job::Deferred { kind, sequence, task } => {
        let failure = match panic::catch_unwind(AssertUnwindSafe(task)) {
          Ok(Ok(())) => None,
          Ok(Err(message)) => Some(AccessFailure::ActionFailed {
            kind,
            sequence,
            message,
          }),
          Err(payload) => Some(AccessFailure::from_panic(kind, sequence, payload.as_ref())),
        };
        if let Some(failure) = failure {
          report(&failure_handler, &failure);
        }
      }
    }
  }
  tracing::debug!("serial worker stopped");
}

fn report(failure_handler: &FailureHandler, failure: &AccessFailure) {
  if panic::catch_unwind(AssertUnwindSafe(|| failure_handler.handle(failure))).is_err() {
    tracing::error!("failure handler panicked while reporting: {}", failure);
  }
}
