//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to a frame session.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
