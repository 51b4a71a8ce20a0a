use strum::Display;

/// Tag of a submitted access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AccessKind {
  Read,
  Write,
}
