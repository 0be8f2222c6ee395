//! GPU device + presentation target management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - binding the device to a window surface, or to an offscreen target when headless
//! - acquiring frames and providing encoders/views for rendering

mod frame;
mod gpu;
mod init;
mod readback;
mod surface;

pub use frame::GpuFrame;
pub use gpu::Gpu;
pub(crate) use gpu::ensure_within_limits;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
