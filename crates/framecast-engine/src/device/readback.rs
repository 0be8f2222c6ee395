//! Offscreen drawable and host readback.
//!
//! Buffer copies require each row to start on a `COPY_BYTES_PER_ROW_ALIGNMENT`
//! boundary, so the readback buffer is padded and the padding is stripped
//! again after mapping.

use std::sync::mpsc;

use crate::error::ReadbackError;

/// Row layout of an RGBA8 texture copied into a mappable buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct BufferDimensions {
    pub width: u32,
    pub height: u32,
    pub unpadded_bytes_per_row: u32,
    pub padded_bytes_per_row: u32,
}

impl BufferDimensions {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let unpadded_bytes_per_row = width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padding = (align - unpadded_bytes_per_row % align) % align;

        Self {
            width,
            height,
            unpadded_bytes_per_row,
            padded_bytes_per_row: unpadded_bytes_per_row + padding,
        }
    }

    pub(crate) fn buffer_size(&self) -> u64 {
        self.padded_bytes_per_row as u64 * self.height as u64
    }

    /// Copies the visible part of each padded row into a tightly packed vector.
    pub(crate) fn unpad(&self, padded: &[u8]) -> Vec<u8> {
        let row = self.unpadded_bytes_per_row as usize;
        let mut pixels = Vec::with_capacity(row * self.height as usize);
        for chunk in padded
            .chunks(self.padded_bytes_per_row as usize)
            .take(self.height as usize)
        {
            pixels.extend_from_slice(&chunk[..row]);
        }
        pixels
    }
}

/// Render target used in place of a window surface.
pub(crate) struct OffscreenTarget {
    texture: wgpu::Texture,
    output_buffer: wgpu::Buffer,
    dimensions: BufferDimensions,
}

impl OffscreenTarget {
    pub(crate) const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let dimensions = BufferDimensions::new(width, height);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("framecast offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("framecast readback buffer"),
            size: dimensions.buffer_size(),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            texture,
            output_buffer,
            dimensions,
        }
    }

    pub(crate) fn view(&self) -> wgpu::TextureView {
        self.texture
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Copies the target into host memory and blocks until the copy is mapped.
    pub(crate) fn read(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Vec<u8>, ReadbackError> {
        let dims = self.dimensions;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("framecast readback encoder"),
        });

        encoder.copy_texture_to_buffer(
            self.texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &self.output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(dims.padded_bytes_per_row),
                    rows_per_image: Some(dims.height),
                },
            },
            wgpu::Extent3d {
                width: dims.width,
                height: dims.height,
                depth_or_array_layers: 1,
            },
        );

        queue.submit(std::iter::once(encoder.finish()));

        let slice = self.output_buffer.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        device.poll(wgpu::PollType::wait_indefinitely())?;
        rx.recv().map_err(|_| ReadbackError::Disconnected)??;

        // Mapped views must be dropped before unmapping.
        let pixels = {
            let padded = slice.get_mapped_range();
            dims.unpad(&padded)
        };
        self.output_buffer.unmap();

        Ok(pixels)
    }
}
