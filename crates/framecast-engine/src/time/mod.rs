//! Frame timing.
//!
//! The runtime owns one `FrameClock` and ticks it once per presented frame;
//! frame sources receive the resulting `FrameTime`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
