use thiserror::Error;

/// Errors produced by the coordinator itself, as opposed to failures of the
/// client's actions (see [`AccessFailure`](crate::AccessFailure)).
#[derive(Debug, Error)]
pub enum CoordinatorError {
  #[error("Failed to spawn serial worker '{name}': {source}")]
  WorkerSpawn {
    name: String,
    #[source]
    source: std::io::Error,
  },
}

static_assertions::assert_impl_all!(CoordinatorError: Send, Sync);
