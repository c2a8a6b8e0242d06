//! Seams between the animation core and the windowing/graphics host.
//!
//! The core never talks to a GPU API directly. It negotiates a drawable
//! configuration through [`ContextProvider`], catches out-of-band host failures
//! through [`ErrorHook`], draws through [`DrawSurface`] and reports progress through
//! [`StatusSink`]. The wgpu/winit binding in `gpu` implements all of them; tests use
//! recording fakes.

use std::sync::{Arc, Mutex, PoisonError};

use glam::Mat4;

use crate::cube::CubeFace;
use crate::frame::Perspective;
use crate::types::SurfaceConfig;

/// Drawable configuration negotiation and context lifetime.
pub trait ContextProvider {
    /// Host-side description of a matching drawable configuration.
    type Config;
    /// Host-side drawing context bound to a configuration.
    type Context;

    /// Finds a configuration satisfying `request`, or `None` when the display has
    /// nothing suitable.
    fn select_config(&mut self, request: &SurfaceConfig) -> Option<Self::Config>;

    /// Creates a context; `None` is the null handle.
    fn create_context(&mut self, config: &Self::Config) -> Option<Self::Context>;

    /// Releases the context from the drawable. Must precede [`Self::destroy_context`].
    fn unbind(&mut self, context: &mut Self::Context);

    fn destroy_context(&mut self, context: Self::Context);

    fn release_config(&mut self, config: Self::Config);
}

/// Process-wide handler for errors the host reports after the fact.
pub trait ErrorHook {
    /// Whatever was installed before, handed back on restore.
    type Saved;

    /// Routes every host error into `sink` until restored.
    fn install_error_hook(&mut self, sink: ErrorSink) -> Self::Saved;

    /// Forces delivery of any error the host has not reported yet.
    fn flush_errors(&mut self);

    fn restore_error_hook(&mut self, saved: Self::Saved);
}

/// Immediate-mode drawing on a bound context.
pub trait DrawSurface: ContextProvider {
    /// Binds `context` to the drawable. Returns false when nothing can be drawn
    /// this time (the frame is skipped).
    fn make_current(&mut self, context: &mut Self::Context) -> bool;

    /// One-time state after creation: depth testing and the clear colour.
    fn prepare(&mut self, context: &mut Self::Context, clear_color: [f32; 4]);

    fn set_viewport(&mut self, context: &mut Self::Context, width: u32, height: u32);

    /// Clears colour and depth buffers.
    fn clear(&mut self, context: &mut Self::Context);

    fn set_projection(&mut self, context: &mut Self::Context, projection: &Perspective);

    fn set_model_transform(&mut self, context: &mut Self::Context, transform: Mat4);

    fn submit_quads(&mut self, context: &mut Self::Context, faces: &[CubeFace]);

    /// Presents the frame.
    fn swap_buffers(&mut self, context: &mut Self::Context);
}

/// Everything the coordinator needs from a graphics host.
pub trait GraphicsHost: DrawSurface + ErrorHook {}

impl<T> GraphicsHost for T where T: DrawSurface + ErrorHook {}

/// Where the window shows its state to the user.
pub trait StatusSink {
    fn set_status(&mut self, text: &str);

    /// Updates the pause/resume control's label and whether it accepts input.
    fn set_toggle(&mut self, label: &str, enabled: bool);
}

/// Collects host error messages while an [`ErrorHook`] routes them here.
///
/// Cloning shares the same buffer, so the copy handed to a host callback and the
/// copy kept by the trap observe the same errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    errors: Arc<Mutex<Vec<String>>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, message: impl Into<String>) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self
            .errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.errors.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
