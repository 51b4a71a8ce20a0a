use std::fmt::Display;

use crate::coordinator::{
  AccessCoordinator, AccessMode, AccessState, Config, ConfigOption, ConcurrentReadCoordinator, CoordinatorError,
  ExclusiveCoordinator,
};


/// A coordinator whose discipline is picked at construction.
///
/// Cloning yields another handle to the same coordinator.
#[derive(Debug, Clone)]
pub enum Coordinator {
  Exclusive(ExclusiveCoordinator),
  ConcurrentRead(ConcurrentReadCoordinator),
}

impl Coordinator {
  pub fn new(mode: AccessMode) -> Result<Self, CoordinatorError> {
    Self::from_config(Config::with_mode(mode))
  }

  pub fn from_config(config: Config) -> Result<Self, CoordinatorError> {
    tracing::debug!(mode = %config.mode, worker = %config.worker_name, prefix = %config.log_prefix, "creating coordinator");
    match config.mode {
      AccessMode::Exclusive => ExclusiveCoordinator::from_config(&config).map(Coordinator::Exclusive),
      AccessMode::ConcurrentRead => ConcurrentReadCoordinator::from_config(&config).map(Coordinator::ConcurrentRead),
    }
  }

  pub fn with_options(options: impl IntoIterator<Item = ConfigOption>) -> Result<Self, CoordinatorError> {
    Self::from_config(Config::from(options))
  }
}

impl From<ExclusiveCoordinator> for Coordinator {
  fn from(coordinator: ExclusiveCoordinator) -> Self {
    Coordinator::Exclusive(coordinator)
  }
}

impl From<ConcurrentReadCoordinator> for Coordinator {
  fn from(coordinator: ConcurrentReadCoordinator) -> Self {
    Coordinator::ConcurrentRead(coordinator)
  }
}

impl AccessCoordinator for Coordinator {
  fn mode(&self) -> AccessMode {
    match self {
      Coordinator::Exclusive(c) => c.mode(),
      Coordinator::ConcurrentRead(c) => c.mode(),
    }
  }

  fn read<T, F>(&self, action: F) -> T
  where
    F: FnOnce() -> T, {
    match self {
      Coordinator::Exclusive(c) => c.read(action),
      Coordinator::ConcurrentRead(c) => c.read(action),
    }
  }

  fn try_write<F, E>(&self, action: F)
  where
    F: FnOnce() -> Result<(), E> + Send + 'static,
    E: Display + 'static, {
    match self {
      Coordinator::Exclusive(c) => c.try_write(action),
      Coordinator::ConcurrentRead(c) => c.try_write(action),
    }
  }

  fn flush(&self) {
    match self {
      Coordinator::Exclusive(c) => c.flush(),
      Coordinator::ConcurrentRead(c) => c.flush(),
    }
  }

  fn state(&self) -> AccessState {
    match self {
      Coordinator::Exclusive(c) => c.state(),
      Coordinator::ConcurrentRead(c) => c.state(),
    }
  }
}

static_assertions::assert_impl_all!(Coordinator: Send, Sync, Clone);
