use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::device::SurfaceErrorAction;
use crate::error::FrameError;
use crate::frame::FrameBuffer;
use crate::session::{FrameSession, SessionConfig};
use crate::source::FrameSource;
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,

    /// Integer upscale from frame pixels to window pixels.
    pub scale: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "framecast".to_string(),
            scale: 1,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and presents frames from `source` until it is closed.
    ///
    /// The window is not resizable; the drawable keeps its initial size.
    pub fn run<S>(config: RuntimeConfig, session: SessionConfig, source: S) -> Result<()>
    where
        S: FrameSource + 'static,
    {
        let (width, height) = source.size();
        anyhow::ensure!(
            width > 0 && height > 0,
            "frame source has zero size {width}x{height}"
        );

        let frame = FrameBuffer::new(width, height).context("frame source size is too large")?;
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        let mut state = AppState {
            config,
            session,
            source,
            frame,
            clock: FrameClock::new(),
            entry: None,
            failure: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    session: FrameSession<'this>,
}

struct AppState<S>
where
    S: FrameSource + 'static,
{
    config: RuntimeConfig,
    session: SessionConfig,
    source: S,

    /// Reused every frame; the session copies it during upload.
    frame: FrameBuffer,
    clock: FrameClock,

    entry: Option<WindowEntry>,

    /// First fatal error; returned from `Runtime::run`.
    failure: Option<anyhow::Error>,
}

impl<S> AppState<S>
where
    S: FrameSource + 'static,
{
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        self.entry = None;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let (width, height) = self.frame.size();
        let (window_width, window_height) = window_size(width, height, self.config.scale)?;

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(window_width, window_height))
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        // Window managers may ignore the requested size; draw to what we got.
        let inner = window.inner_size();
        let mut session_config = self.session.clone();
        session_config.surface_size = if inner.width > 0 && inner.height > 0 {
            Some((inner.width, inner.height))
        } else {
            Some((window_width, window_height))
        };

        let entry = WindowEntryTryBuilder {
            window,
            session_builder: |w| {
                pollster::block_on(FrameSession::new(w, width, height, &session_config))
            },
        }
        .try_build()
        .context("GPU initialization failed")?;

        entry.with_session(|session| {
            if let Some(alpha_mode) = session.gpu().alpha_mode() {
                log::debug!("window surface alpha mode: {alpha_mode:?}");
            }
        });

        Ok(entry)
    }

    fn draw_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_ref() else {
            return;
        };

        let time = self.clock.tick();
        self.source.render(&time, &mut self.frame);

        let frame = &self.frame;
        let result = entry.with(|fields| {
            fields.session.upload_frame(frame)?;
            fields.window.pre_present_notify();
            fields.session.present()
        });

        match result {
            Ok(()) => {}
            Err(FrameError::Surface(err)) => match SurfaceErrorAction::classify(&err) {
                SurfaceErrorAction::SkipFrame => {
                    log::warn!("skipping frame {}: {err}", time.frame_index);
                }
                SurfaceErrorAction::Fatal => {
                    self.fail(
                        event_loop,
                        anyhow::Error::new(err).context("presentation surface is unusable"),
                    );
                }
            },
            Err(err) => {
                self.fail(event_loop, anyhow::Error::new(err).context("frame upload failed"));
            }
        }
    }
}

/// Window inner size for a frame shown at an integer `scale` (0 is treated as 1).
fn window_size(width: u32, height: u32, scale: u32) -> Result<(u32, u32)> {
    let scale = scale.max(1);
    let scaled = width.checked_mul(scale).zip(height.checked_mul(scale));
    scaled.with_context(|| format!("{width}x{height} frame at {scale}x overflows the window size"))
}

impl<S> ApplicationHandler for AppState<S>
where
    S: FrameSource + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.failure.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.clock.reset();
                self.entry = Some(entry);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: every frame pulls a new image from the source.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => self.draw_frame(event_loop),

            _ => {}
        }
    }
}
