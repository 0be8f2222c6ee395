/// Sampler filtering used when the frame is stretched onto the drawable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum SamplerFilter {
    /// Bilinear; smooth when the drawable and frame sizes differ.
    #[default]
    Linear,
    /// Point sampling; exact texel reproduction at 1:1 and integer scales.
    Nearest,
}

impl SamplerFilter {
    pub(crate) fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            SamplerFilter::Linear => wgpu::FilterMode::Linear,
            SamplerFilter::Nearest => wgpu::FilterMode::Nearest,
        }
    }
}

/// Blit resource parameters.
#[derive(Debug, Clone)]
pub struct BlitConfig {
    pub filter: SamplerFilter,

    /// Also allow the frame texture to be used as a render attachment.
    pub render_attachment: bool,

    /// Load-op clear color. The fullscreen draw overwrites it entirely.
    pub clear_color: wgpu::Color,
}

impl Default for BlitConfig {
    fn default() -> Self {
        Self {
            filter: SamplerFilter::Linear,
            render_attachment: true,
            clear_color: wgpu::Color::BLACK,
        }
    }
}
