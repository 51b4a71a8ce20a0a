use strum::{Display, EnumIter, EnumString};


/// Access discipline of a coordinator, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum AccessMode {
  /// EREW: reads and writes all exclude each other.
  #[strum(to_string = "exclusive", serialize = "erew")]
  Exclusive,
  /// CREW: reads share, writes exclude everything.
  #[default]
  #[strum(to_string = "concurrent_read", serialize = "crew")]
  ConcurrentRead,
}

impl AccessMode {
  pub fn allows_concurrent_reads(&self) -> bool {
    matches!(self, AccessMode::ConcurrentRead)
  }
}
