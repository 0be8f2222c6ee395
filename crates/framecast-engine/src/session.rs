//! Frame session: the resource bundle returned by initialization.
//!
//! A session is either complete (device, drawable, texture, pipeline, sampler)
//! or was never built; there is no partially initialized state. Each displayed
//! frame is an [`FrameSession::upload`] followed by a [`FrameSession::present`].

use crate::blit::{BlitConfig, Blitter};
use crate::device::{self, Gpu, GpuInit};
use crate::error::{FrameError, InitError, ReadbackError};
use crate::frame::FrameBuffer;

/// Session parameters.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub gpu: GpuInit,
    pub blit: BlitConfig,

    /// Drawable size when it differs from the frame size (e.g. an upscaled window).
    ///
    /// `None` sizes the drawable to the frame.
    pub surface_size: Option<(u32, u32)>,
}

/// GPU context plus blit resources for one stream of frames.
pub struct FrameSession<'w> {
    gpu: Gpu<'w>,
    blitter: Blitter,
}

impl<'w> FrameSession<'w> {
    /// Initializes a session presenting to `target` with a `width x height` frame texture.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        width: u32,
        height: u32,
        config: &SessionConfig,
    ) -> Result<Self, InitError> {
        if width == 0 || height == 0 {
            return Err(InitError::ZeroSize { width, height });
        }

        let (surface_width, surface_height) = config.surface_size.unwrap_or((width, height));
        let gpu = Gpu::new(target, surface_width, surface_height, &config.gpu).await?;
        Self::with_gpu(gpu, width, height, &config.blit)
    }

    /// Initializes a session whose drawable is an offscreen texture.
    ///
    /// Presented frames can be fetched with [`FrameSession::read_pixels`].
    pub async fn headless(
        width: u32,
        height: u32,
        config: &SessionConfig,
    ) -> Result<Self, InitError> {
        if width == 0 || height == 0 {
            return Err(InitError::ZeroSize { width, height });
        }

        let (surface_width, surface_height) = config.surface_size.unwrap_or((width, height));
        let gpu = Gpu::headless(surface_width, surface_height, &config.gpu).await?;
        Self::with_gpu(gpu, width, height, &config.blit)
    }

    fn with_gpu(
        gpu: Gpu<'w>,
        width: u32,
        height: u32,
        blit: &BlitConfig,
    ) -> Result<Self, InitError> {
        device::ensure_within_limits(gpu.device(), width, height)?;
        let blitter = Blitter::new(gpu.device(), gpu.surface_format(), width, height, blit);
        Ok(Self { gpu, blitter })
    }

    /// Copies one RGBA8 frame into the texture.
    ///
    /// Fails fast when `bytes.len() != width * height * 4` or when the dimensions
    /// differ from the texture's.
    pub fn upload(&self, bytes: &[u8], width: u32, height: u32) -> Result<(), FrameError> {
        self.blitter.upload(self.gpu.queue(), bytes, width, height)
    }

    pub fn upload_frame(&self, frame: &FrameBuffer) -> Result<(), FrameError> {
        self.upload(frame.as_bytes(), frame.width(), frame.height())
    }

    /// Draws the texture's current contents over the whole drawable and submits.
    pub fn present(&self) -> Result<(), FrameError> {
        let mut frame = self.gpu.begin_frame()?;
        self.blitter
            .draw(self.gpu.device(), &mut frame.encoder, &frame.view);
        self.gpu.submit(frame);
        Ok(())
    }

    /// Returns the last presented frame as tight RGBA8 rows (headless sessions only).
    pub fn read_pixels(&self) -> Result<Vec<u8>, ReadbackError> {
        self.gpu.read_pixels()
    }

    /// Frame (texture) size.
    pub fn size(&self) -> (u32, u32) {
        self.blitter.size()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.gpu.size()
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu.surface_format()
    }

    pub fn texture_format(&self) -> wgpu::TextureFormat {
        self.blitter.texture_format()
    }

    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }

    pub fn device(&self) -> &wgpu::Device {
        self.gpu.device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.gpu.queue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blit::SamplerFilter;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn nearest() -> SessionConfig {
        SessionConfig {
            blit: BlitConfig {
                filter: SamplerFilter::Nearest,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Builds a headless session, or returns `None` on machines without GPU access.
    fn session(width: u32, height: u32, config: &SessionConfig) -> Option<FrameSession<'static>> {
        match pollster::block_on(FrameSession::headless(width, height, config)) {
            Ok(s) => Some(s),
            Err(InitError::Unsupported(e)) => {
                eprintln!("skipping GPU test: {e}");
                None
            }
            Err(e) => panic!("unexpected init failure: {e}"),
        }
    }

    fn frame_of(width: u32, height: u32, pixels: &[[u8; 4]]) -> FrameBuffer {
        FrameBuffer::from_rgba(width, height, pixels.concat()).unwrap()
    }

    fn show(s: &FrameSession<'_>, frame: &FrameBuffer) -> Vec<u8> {
        s.upload_frame(frame).unwrap();
        s.present().unwrap();
        s.read_pixels().unwrap()
    }

    // ── initialization ────────────────────────────────────────────────────

    #[test]
    fn zero_size_fails_without_a_bundle() {
        let err = pollster::block_on(FrameSession::headless(0, 0, &SessionConfig::default()))
            .err()
            .expect("zero size must fail");
        assert!(matches!(err, InitError::ZeroSize { .. }));
    }

    #[test]
    fn headless_bundle_is_complete() {
        let Some(s) = session(4, 3, &SessionConfig::default()) else {
            return;
        };
        assert_eq!(s.size(), (4, 3));
        assert_eq!(s.surface_size(), (4, 3));
        assert!(s.gpu().is_offscreen());
        assert_eq!(s.surface_format(), wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(s.texture_format(), wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(s.gpu().alpha_mode(), None);
    }

    /// Width far beyond any adapter's 2D texture limit.
    const OVERSIZED: u32 = 1 << 20;

    fn init_error(width: u32, height: u32, config: &SessionConfig) -> Option<InitError> {
        match pollster::block_on(FrameSession::headless(width, height, config)) {
            Ok(_) => panic!("{width}x{height} must exceed the texture limit"),
            Err(InitError::Unsupported(e)) => {
                eprintln!("skipping GPU test: {e}");
                None
            }
            Err(e) => Some(e),
        }
    }

    #[test]
    fn oversized_drawable_fails_instead_of_panicking() {
        let Some(err) = init_error(OVERSIZED, 1, &SessionConfig::default()) else {
            return;
        };
        assert!(matches!(
            err,
            InitError::TooLarge { width: OVERSIZED, height: 1, .. }
        ));
    }

    #[test]
    fn oversized_frame_on_small_drawable_fails() {
        let config = SessionConfig {
            surface_size: Some((4, 4)),
            ..Default::default()
        };
        let Some(err) = init_error(1, OVERSIZED, &config) else {
            return;
        };
        assert!(matches!(
            err,
            InitError::TooLarge { width: 1, height: OVERSIZED, .. }
        ));
    }

    #[test]
    fn large_but_supported_frame_initializes() {
        let Some(small) = session(1, 1, &SessionConfig::default()) else {
            return;
        };
        let max = small.device().limits().max_texture_dimension_2d;
        drop(small);

        // 4096 is above the old downlevel limit of 2048.
        let side = max.min(4096);
        let Some(s) = session(side, 16, &SessionConfig::default()) else {
            return;
        };
        assert_eq!(s.size(), (side, 16));
    }

    // ── upload validation ─────────────────────────────────────────────────

    #[test]
    fn upload_rejects_wrong_length() {
        let Some(s) = session(2, 1, &nearest()) else {
            return;
        };
        let err = s.upload(&[255, 0, 0, 255], 2, 1).unwrap_err();
        assert!(matches!(
            err,
            FrameError::SizeMismatch { expected: 8, actual: 4, .. }
        ));
    }

    #[test]
    fn upload_rejects_other_dimensions() {
        let Some(s) = session(2, 1, &nearest()) else {
            return;
        };
        let err = s.upload(&[0; 8], 1, 2).unwrap_err();
        assert!(matches!(
            err,
            FrameError::DimensionMismatch { texture_width: 2, texture_height: 1, .. }
        ));
    }

    // ── round trip ────────────────────────────────────────────────────────

    #[test]
    fn red_green_pair_shows_left_red_right_green() {
        let Some(s) = session(2, 1, &nearest()) else {
            return;
        };
        let out = show(&s, &frame_of(2, 1, &[RED, GREEN]));
        assert_eq!(out, [RED, GREEN].concat());
    }

    #[test]
    fn red_green_pair_fills_halves_of_a_larger_drawable() {
        let config = SessionConfig {
            surface_size: Some((4, 2)),
            ..nearest()
        };
        let Some(s) = session(2, 1, &config) else {
            return;
        };
        let out = show(&s, &frame_of(2, 1, &[RED, GREEN]));

        let row = [RED, RED, GREEN, GREEN].concat();
        assert_eq!(out, [row.clone(), row].concat());
    }

    #[test]
    fn every_pixel_lands_at_its_row_major_offset() {
        let (w, h) = (5, 3);
        let mut frame = FrameBuffer::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                frame.set_pixel(x, y, [(x * 50) as u8, (y * 80) as u8, (x + y) as u8, 255]);
            }
        }

        let Some(s) = session(w, h, &nearest()) else {
            return;
        };
        let out = show(&s, &frame);
        assert_eq!(out.as_slice(), frame.as_bytes());
    }

    #[test]
    fn presenting_twice_yields_identical_frames() {
        let Some(s) = session(2, 2, &nearest()) else {
            return;
        };
        let first = show(&s, &frame_of(2, 2, &[RED, GREEN, BLUE, WHITE]));

        s.present().unwrap();
        let second = s.read_pixels().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn consecutive_frames_do_not_bleed() {
        let Some(s) = session(2, 1, &nearest()) else {
            return;
        };
        let a = frame_of(2, 1, &[RED, GREEN]);
        let b = frame_of(2, 1, &[BLUE, WHITE]);

        assert_eq!(show(&s, &a), a.as_bytes());
        assert_eq!(show(&s, &b), b.as_bytes());
    }

    #[test]
    fn rejected_upload_keeps_previous_frame() {
        let Some(s) = session(2, 1, &nearest()) else {
            return;
        };
        let a = frame_of(2, 1, &[RED, GREEN]);
        assert_eq!(show(&s, &a), a.as_bytes());

        assert!(s.upload(&[0; 3], 2, 1).is_err());
        s.present().unwrap();
        assert_eq!(s.read_pixels().unwrap(), a.as_bytes());
    }
}
