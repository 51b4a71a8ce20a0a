use crate::coordinator::{AccessMode, ConfigOption, FailureHandler};

#[derive(Debug, Clone)]
pub struct Config {
  pub mode: AccessMode,
  /// Thread name of the serial worker that runs deferred writes.
  pub worker_name: String,
  /// Recorded as the `prefix` field of the serial worker's span.
  pub log_prefix: String,
  pub failure_handler: FailureHandler,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      mode: AccessMode::default(),
      worker_name: "crew-worker".to_string(),
      log_prefix: "".to_string(),
      failure_handler: FailureHandler::default(),
    }
  }
}

impl Config {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> Config {
    let mut config = Config::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }

  pub fn with_mode(mode: AccessMode) -> Config {
    Config::from([ConfigOption::with_mode(mode)])
  }
}
