//! Frame producers.

use crate::frame::FrameBuffer;
use crate::time::FrameTime;

/// Supplies one RGBA8 frame per presented frame.
///
/// The runtime allocates a [`FrameBuffer`] of [`FrameSource::size`] once and hands
/// it back every frame, so sources only overwrite pixels.
pub trait FrameSource {
    /// Frame dimensions in pixels. Must stay constant for the life of the source.
    fn size(&self) -> (u32, u32);

    /// Writes the next frame into `frame`.
    fn render(&mut self, time: &FrameTime, frame: &mut FrameBuffer);
}

