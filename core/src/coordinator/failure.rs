use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use thiserror::Error;

use crate::coordinator::AccessKind;


/// A client action that did not complete normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessFailure {
  #[error("{kind} action #{sequence} panicked: {message}")]
  ActionPanicked {
    kind: AccessKind,
    sequence: u64,
    message: String,
  },
  #[error("{kind} action #{sequence} failed: {message}")]
  ActionFailed {
    kind: AccessKind,
    sequence: u64,
    message: String,
  },
}

impl AccessFailure {
  pub fn from_panic(kind: AccessKind, sequence: u64, payload: &(dyn Any + Send)) -> Self {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
      s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
      s.clone()
    } else {
      "non-string panic payload".to_string()
    };
    AccessFailure::ActionPanicked {
      kind,
      sequence,
      message,
    }
  }

  pub fn kind(&self) -> AccessKind {
    match self {
      AccessFailure::ActionPanicked { kind, .. } | AccessFailure::ActionFailed { kind, .. } => *kind,
    }
  }

  /// Submission number of the failed action on its coordinator.
  pub fn sequence(&self) -> u64 {
    match self {
      AccessFailure::ActionPanicked { sequence, .. } | AccessFailure::ActionFailed { sequence, .. } => *sequence,
    }
  }

  pub fn message(&self) -> &str {
    match self {
      AccessFailure::ActionPanicked { message, .. } | AccessFailure::ActionFailed { message, .. } => message,
    }
  }

  pub fn is_panic(&self) -> bool {
    matches!(self, AccessFailure::ActionPanicked { .. })
  }
}

static_assertions::assert_impl_all!(AccessFailure: Send, Sync);

/// Sink for failures of deferred actions.
///
/// A `write` has no caller left to receive its outcome, so failures are
/// handed to this handler on the serial worker thread. The default handler
/// logs them at error level.
#[derive(Clone)]
pub struct FailureHandler(Arc<dyn Fn(&AccessFailure) + Send + Sync + 'static>);

impl FailureHandler {
  pub fn new<F>(f: F) -> Self
  where
    F: Fn(&AccessFailure) + Send + Sync + 'static, {
    Self(Arc::new(f))
  }

  pub fn logging() -> Self {
    Self::new(|failure| {
      tracing::error!(
        kind = %failure.kind(),
        sequence = failure.sequence(),
        "deferred access failed: {}",
        failure
      );
    })
  }

  /// Logs the failure and aborts the process.
  pub fn abort() -> Self {
    Self::new(|failure| {
      tracing::error!("aborting after deferred access failure: {}", failure);
      std::process::abort();
    })
  }

  pub fn handle(&self, failure: &AccessFailure) {
    (self.0)(failure)
  }
}

impl Default for FailureHandler {
  fn default() -> Self {
    Self::logging()
  }
}

impl Debug for FailureHandler {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str("FailureHandler")
  }
}

static_assertions::assert_impl_all!(FailureHandler: Send, Sync);
