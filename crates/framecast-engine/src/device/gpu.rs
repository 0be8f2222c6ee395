use wgpu::SurfaceError;

use crate::error::{InitError, ReadbackError, Unsupported};

use super::readback::OffscreenTarget;
use super::surface;
use super::{GpuFrame, GpuInit};

/// Where finished frames go.
enum Head<'w> {
    /// Swapchain bound to a window (or any other surface target).
    Surface {
        surface: wgpu::Surface<'w>,
        config: wgpu::SurfaceConfiguration,
    },
    /// Plain texture that can be read back to the host.
    Offscreen(OffscreenTarget),
}

/// Owns wgpu core objects and the presentation target.
///
/// This type is the low-level rendering context:
/// - creates and stores Adapter/Device/Queue
/// - creates and configures the Surface (swapchain), or an offscreen target
/// - acquires frames and provides an encoder + view for rendering
pub struct Gpu<'w> {
    /// Selected adapter; kept alive for the session.
    _adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    head: Head<'w>,

    /// Pixel format of the drawable.
    format: wgpu::TextureFormat,

    /// Drawable size in physical pixels.
    size: (u32, u32),
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a surface target (usually `&Window`).
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        width: u32,
        height: u32,
        init: &GpuInit,
    ) -> Result<Self, InitError> {
        ensure_size(width, height)?;

        let instance = create_instance();

        let surface = instance
            .create_surface(target)
            .map_err(Unsupported::Surface)?;

        let (adapter, device, queue) = acquire_device(&instance, Some(&surface), init).await?;
        ensure_within_limits(&device, width, height)?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, init.prefer_srgb)
            .ok_or(Unsupported::NoSurfaceFormat)?;
        let alpha_mode = surface::choose_alpha_mode(&caps.alpha_modes, init.alpha_mode);

        log::info!("surface configured: {width}x{height} {format:?} alpha={alpha_mode:?}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        Ok(Self {
            _adapter: adapter,
            device,
            queue,
            head: Head::Surface { surface, config },
            format,
            size: (width, height),
        })
    }

    /// Creates a GPU context that renders into an offscreen RGBA8 texture.
    pub async fn headless(width: u32, height: u32, init: &GpuInit) -> Result<Self, InitError> {
        ensure_size(width, height)?;

        let instance = create_instance();
        let (adapter, device, queue) = acquire_device(&instance, None, init).await?;
        ensure_within_limits(&device, width, height)?;
        let target = OffscreenTarget::new(&device, width, height);

        log::info!(
            "offscreen target configured: {width}x{height} {:?}",
            OffscreenTarget::FORMAT
        );

        Ok(Self {
            _adapter: adapter,
            device,
            queue,
            head: Head::Offscreen(target),
            format: OffscreenTarget::FORMAT,
            size: (width, height),
        })
    }

    /// Returns the drawable's pixel format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Returns the drawable size (physical pixels).
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Returns `true` when frames land in an offscreen texture.
    pub fn is_offscreen(&self) -> bool {
        matches!(self.head, Head::Offscreen(_))
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the alpha mode the surface was configured with.
    pub fn alpha_mode(&self) -> Option<wgpu::CompositeAlphaMode> {
        match &self.head {
            Head::Surface { config, .. } => Some(config.alpha_mode),
            Head::Offscreen(_) => None,
        }
    }

    /// Acquires the next drawable and creates an encoder.
    ///
    /// The returned frame owns the surface texture until [`Gpu::submit`].
    pub fn begin_frame(&self) -> Result<GpuFrame, SurfaceError> {
        let (surface_texture, view) = match &self.head {
            Head::Surface { surface, .. } => {
                let surface_texture = surface.get_current_texture()?;
                if surface_texture.suboptimal {
                    log::debug!("surface texture is suboptimal");
                }
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                (Some(surface_texture), view)
            }
            Head::Offscreen(target) => (None, target.view()),
        };

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("framecast frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands for the given frame and presents it.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);

        if let Some(surface_texture) = surface_texture {
            surface_texture.present();
        }
    }

    /// Copies the last presented offscreen frame back to the host as tight RGBA8 rows.
    pub fn read_pixels(&self) -> Result<Vec<u8>, ReadbackError> {
        match &self.head {
            Head::Offscreen(target) => target.read(&self.device, &self.queue),
            Head::Surface { .. } => Err(ReadbackError::NotOffscreen),
        }
    }
}

fn ensure_size(width: u32, height: u32) -> Result<(), InitError> {
    if width == 0 || height == 0 {
        return Err(InitError::ZeroSize { width, height });
    }
    Ok(())
}

/// Rejects texture sizes the device cannot allocate.
///
/// wgpu reports oversized textures through its uncaptured-error handler, which
/// panics by default.
pub(crate) fn ensure_within_limits(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> Result<(), InitError> {
    let max = device.limits().max_texture_dimension_2d;
    if width > max || height > max {
        return Err(InitError::TooLarge { width, height, max });
    }
    Ok(())
}

fn create_instance() -> wgpu::Instance {
    // Use all backends to allow wgpu to select the optimal platform backend.
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

async fn acquire_device(
    instance: &wgpu::Instance,
    compatible_surface: Option<&wgpu::Surface<'_>>,
    init: &GpuInit,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue), Unsupported> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface,
            force_fallback_adapter: init.force_fallback_adapter,
        })
        .await
        .map_err(Unsupported::Adapter)?;

    let info = adapter.get_info();
    log::info!("using adapter {} ({:?})", info.name, info.backend);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("framecast device"),
            required_features: init.required_features,
            required_limits: init.required_limits.clone().using_resolution(adapter.limits()),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .map_err(Unsupported::Device)?;

    Ok((adapter, device, queue))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_width_is_rejected_before_touching_the_gpu() {
        let err = pollster::block_on(Gpu::headless(0, 4, &GpuInit::default()))
            .err()
            .expect("zero width must fail");
        assert!(matches!(err, InitError::ZeroSize { width: 0, height: 4 }));
        assert!(!err.is_unsupported());
    }

    #[test]
    fn zero_height_is_rejected_before_touching_the_gpu() {
        let err = pollster::block_on(Gpu::headless(4, 0, &GpuInit::default()))
            .err()
            .expect("zero height must fail");
        assert!(matches!(err, InitError::ZeroSize { width: 4, height: 0 }));
    }
}
