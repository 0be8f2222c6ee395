//! Error taxonomy for session setup, frame submission and readback.
//!
//! Initialization failures are terminal for rendering; frame failures are
//! terminal for the current frame only. Nothing here is retried.

use thiserror::Error;

/// Failure while building a [`FrameSession`](crate::session::FrameSession).
#[derive(Debug, Error)]
pub enum InitError {
    /// Width or height was zero.
    #[error("invalid frame size {width}x{height}; both dimensions must be non-zero")]
    ZeroSize { width: u32, height: u32 },

    /// A frame or drawable dimension exceeds the device's texture limit.
    #[error("size {width}x{height} exceeds the device texture limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    /// No GPU access is available on this platform.
    #[error("unsupported platform: {0}")]
    Unsupported(#[from] Unsupported),
}

impl InitError {
    /// Returns `true` when the platform offers no usable GPU path.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, InitError::Unsupported(_))
    }
}

/// The stage at which GPU acquisition gave up.
#[derive(Debug, Error)]
pub enum Unsupported {
    #[error("failed to create a presentation surface")]
    Surface(#[source] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter")]
    Adapter(#[source] wgpu::RequestAdapterError),

    #[error("adapter refused to create a device")]
    Device(#[source] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats for this adapter")]
    NoSurfaceFormat,
}

/// Failure while uploading or presenting a single frame.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Frame byte length is not `width * height * 4`.
    #[error("frame buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA8")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Frame dimensions differ from the texture allocated at initialization.
    #[error("frame is {width}x{height} but the texture is {texture_width}x{texture_height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        texture_width: u32,
        texture_height: u32,
    },

    /// `width * height * 4` does not fit in memory.
    #[error("frame size {width}x{height} overflows the address space")]
    TooLarge { width: u32, height: u32 },

    /// The drawable could not be acquired.
    #[error("failed to acquire the drawable: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Failure while copying the drawable back to host memory.
#[derive(Debug, Error)]
pub enum ReadbackError {
    #[error("readback is only available for offscreen sessions")]
    NotOffscreen,

    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),

    #[error("failed to map readback buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),

    #[error("map callback was dropped before completing")]
    Disconnected,
}
