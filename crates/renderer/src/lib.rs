//! Renderer crate for cubeview, a spinning-cube 3D viewer.
//!
//! The window lifecycle is a small state machine that never touches a GPU API
//! directly, so it can be driven by recording hosts in tests:
//!
//! ```text
//!   cubeview CLI
//!        │ RendererConfig
//!        ▼
//!   Renderer::run ──▶ winit event loop ──▶ LifecycleEvent ──▶ WindowCoordinator
//!                           │                                    │
//!                           └─▶ TimerQueue deadlines ──▶ tick ───┤
//!                                                                ▼
//!                                      error trap / render_frame ──▶ GpuHost (wgpu)
//! ```
//!
//! `WindowCoordinator` owns the graphics context, the animation scheduler and
//! the status text. `GpuHost` implements the host traits on top of wgpu.

mod coordinator;
mod cube;
mod error;
mod frame;
mod gpu;
mod host;
mod trap;
mod types;
mod window;

#[cfg(test)]
mod testing;

use anyhow::Result;

pub use coordinator::{
    FrameStats, LifecycleEvent, Phase, WindowCoordinator, STATUS_PAUSED, STATUS_SPINNING,
    TOGGLE_PAUSE, TOGGLE_RESUME,
};
pub use cube::{CubeFace, CUBE_FACES};
pub use error::{CreationFailure, InitError};
pub use frame::{model_transform, render_frame, FrameOutcome, FrameSummary, Perspective, SkipReason};
pub use gpu::{GpuConfig, GpuContext, GpuHost};
pub use host::{ContextProvider, DrawSurface, ErrorHook, ErrorSink, GraphicsHost, StatusSink};
pub use trap::{attempt_with_trap, ErrorTrap, Trapped};
pub use types::{AnimationSettings, SceneSettings, SurfaceConfig, ViewportSize};

/// Everything the viewer window needs, already merged from config file and CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub title: String,
    /// Initial inner size in physical pixels.
    pub window_size: (u32, u32),
    pub surface: SurfaceConfig,
    pub scene: SceneSettings,
    pub animation: AnimationSettings,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            title: "3D Viewer".to_string(),
            window_size: (640, 520),
            surface: SurfaceConfig::default(),
            scene: SceneSettings::default(),
            animation: AnimationSettings::default(),
        }
    }
}

/// Entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the viewer window and blocks until it is closed.
    ///
    /// Graphics initialisation failures do not end the run: the window stays open
    /// with a diagnostic in its title. Errors are returned only when the event
    /// loop or window cannot be created at all.
    pub fn run(&mut self) -> Result<()> {
        window::run_viewer(self.config.clone())
    }
}
