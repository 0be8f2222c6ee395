//! Framebuffer blit.
//!
//! Owns the GPU side of a frame: one RGBA8 texture, a fixed WGSL shader pair, the
//! render pipeline built from it and a sampler. Uploads replace the whole texture;
//! draws cover the target with two triangles sampling it.

mod blitter;
mod config;

pub use blitter::Blitter;
pub use config::{BlitConfig, SamplerFilter};
