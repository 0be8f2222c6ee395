//! Framecast engine crate.
//!
//! Displays CPU-rendered RGBA8 frames through the GPU: each frame is copied into
//! a texture and drawn over the whole drawable with a fixed fullscreen shader.

pub mod blit;
pub mod device;
pub mod error;
pub mod frame;
pub mod logging;
pub mod session;
pub mod source;
pub mod time;
pub mod window;

pub use blit::{BlitConfig, SamplerFilter};
pub use device::{GpuInit, SurfaceErrorAction};
pub use error::{FrameError, InitError, ReadbackError, Unsupported};
pub use frame::FrameBuffer;
pub use session::{FrameSession, SessionConfig};
pub use source::FrameSource;
