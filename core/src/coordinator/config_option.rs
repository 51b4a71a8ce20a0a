use crate::coordinator::{AccessMode, Config, FailureHandler};


#[derive(Debug, Clone)]
pub enum ConfigOption {
  SetMode(AccessMode),
  SetWorkerName(String),
  SetLogPrefix(String),
  SetFailureHandler(FailureHandler),
}

impl ConfigOption {
  pub fn apply(&self, config: &mut Config) {
    match self {
      ConfigOption::SetMode(mode) => {
        config.mode = *mode;
      }
      ConfigOption::SetWorkerName(name) => {
        config.worker_name = name.clone();
      }
      ConfigOption::SetLogPrefix(prefix) => {
        config.log_prefix = prefix.clone();
      }
      ConfigOption::SetFailureHandler(handler) => {
        config.failure_handler = handler.clone();
      }
    }
  }

  pub fn with_mode(mode: AccessMode) -> ConfigOption {
    ConfigOption::SetMode(mode)
  }

  pub fn with_worker_name(name: impl Into<String>) -> ConfigOption {
    ConfigOption::SetWorkerName(name.into())
  }

  pub fn with_log_prefix(prefix: impl Into<String>) -> ConfigOption {
    ConfigOption::SetLogPrefix(prefix.into())
  }

  pub fn with_failure_handler(handler: FailureHandler) -> ConfigOption {
    ConfigOption::SetFailureHandler(handler)
  }
}
