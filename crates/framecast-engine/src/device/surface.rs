/// High-level response after a surface error.
///
/// Surfaces are never reconfigured here; a lost surface ends the session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Transient error; skip the current frame.
    SkipFrame,
    /// The drawable is gone or memory is exhausted; terminate gracefully.
    Fatal,
}

impl SurfaceErrorAction {
    /// Maps a `SurfaceError` to the action the host loop should take.
    pub fn classify(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Timeout
            | wgpu::SurfaceError::Outdated
            | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::OutOfMemory => {
                SurfaceErrorAction::Fatal
            }
        }
    }
}

pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(formats[0])
}

pub(crate) fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    if let Some(mode) = requested.filter(|m| modes.contains(m)) {
        return mode;
    }

    let fallback = modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    if let Some(mode) = requested {
        log::warn!("alpha mode {mode:?} unsupported by surface; using {fallback:?}");
    }

    fallback
}
