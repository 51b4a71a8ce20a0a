
/// Point-in-time snapshot of a coordinator's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessState {
  pub active_readers: usize,
  /// Reads submitted but still waiting for their turn.
  pub waiting_readers: usize,
  /// Writes submitted but not yet completed, including a running one.
  pub pending_writes: usize,
  pub writer_active: bool,
}

/// Coarse state of a coordinator.
///
/// `WriterPending` is only reported when no reader is active: readers that
/// were admitted before a write was queued keep the coordinator in
/// `ReadersActive` until they drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPhase {
  Idle,
  ReadersActive(usize),
  WriterPending,
  WriterActive,
}

impl AccessState {
  pub fn phase(&self) -> AccessPhase {
    if self.writer_active {
      AccessPhase::WriterActive
    } else if self.active_readers > 0 {
      AccessPhase::ReadersActive(self.active_readers)
    } else if self.pending_writes > 0 {
      AccessPhase::WriterPending
    } else {
      AccessPhase::Idle
    }
  }

  pub fn is_idle(&self) -> bool {
    self.phase() == AccessPhase::Idle
  }
}
