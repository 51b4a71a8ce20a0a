mod access_coordinator;
mod access_kind;
mod access_mode;
mod access_state;
mod config;
mod config_option;
mod coordinator_error;
mod crew;
mod erew;
mod exclusion_gate;
mod failure;
mod mode_selector;
#[cfg(test)]
mod test_support;

pub use {
  self::access_coordinator::*, self::access_kind::*, self::access_mode::*, self::access_state::*, self::config::*,
  self::config_option::*, self::coordinator_error::*, self::crew::*, self::erew::*, self::exclusion_gate::*,
  self::failure::*, self::mode_selector::*,
};
