mod count_down_latch;
mod peak_gauge;
mod wait_group;

pub use self::{count_down_latch::*, peak_gauge::*, wait_group::*};
