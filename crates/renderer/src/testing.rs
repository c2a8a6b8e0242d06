//! Recording host used by unit tests.

use glam::Mat4;

use crate::cube::CubeFace;
use crate::frame::Perspective;
use crate::host::{ContextProvider, DrawSurface, ErrorHook, ErrorSink, StatusSink};
use crate::types::SurfaceConfig;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawCall {
    MakeCurrent,
    Prepare([f32; 4]),
    Viewport(u32, u32),
    Clear,
    Projection(Perspective),
    Model(Mat4),
    Quads(usize),
    Swap,
}

impl DrawCall {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            DrawCall::MakeCurrent => "make_current",
            DrawCall::Prepare(_) => "prepare",
            DrawCall::Viewport(..) => "viewport",
            DrawCall::Clear => "clear",
            DrawCall::Projection(_) => "projection",
            DrawCall::Model(_) => "model",
            DrawCall::Quads(_) => "quads",
            DrawCall::Swap => "swap",
        }
    }
}

#[derive(Debug)]
pub(crate) struct MockContext {
    pub id: u32,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    pub no_config: bool,
    pub null_context: bool,
    /// Reported out of band during creation; only visible after a flush.
    pub async_rejection: Option<String>,
    pub refuse_bind: bool,

    pub requested: Option<SurfaceConfig>,
    pub create_attempts: u32,
    pub unbound: Vec<u32>,
    pub destroyed: Vec<u32>,
    pub configs_released: u32,
    pub calls: Vec<DrawCall>,
    pub stray_errors: Vec<String>,
    pub(crate) hook: Option<ErrorSink>,
    pub(crate) queued: Vec<String>,
    pub(crate) next_context: u32,
}

impl RecordingHost {
    pub(crate) fn context_for_tests(&mut self) -> MockContext {
        self.next_context += 1;
        MockContext {
            id: self.next_context,
        }
    }

    pub(crate) fn frames(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Swap))
            .count()
    }

    pub(crate) fn last_projection(&self) -> Option<Perspective> {
        self.calls.iter().rev().find_map(|call| match call {
            DrawCall::Projection(projection) => Some(*projection),
            _ => None,
        })
    }

    pub(crate) fn hook_installed(&self) -> bool {
        self.hook.is_some()
    }
}

impl ContextProvider for RecordingHost {
    type Config = SurfaceConfig;
    type Context = MockContext;

    fn select_config(&mut self, request: &SurfaceConfig) -> Option<SurfaceConfig> {
        self.requested = Some(*request);
        (!self.no_config).then_some(*request)
    }

    fn create_context(&mut self, _config: &SurfaceConfig) -> Option<MockContext> {
        self.create_attempts += 1;
        if let Some(message) = self.async_rejection.clone() {
            self.queued.push(message);
        }
        if self.null_context {
            None
        } else {
            Some(self.context_for_tests())
        }
    }

    fn unbind(&mut self, context: &mut MockContext) {
        self.unbound.push(context.id);
    }

    fn destroy_context(&mut self, context: MockContext) {
        self.destroyed.push(context.id);
    }

    fn release_config(&mut self, _config: SurfaceConfig) {
        self.configs_released += 1;
    }
}

impl ErrorHook for RecordingHost {
    type Saved = Option<ErrorSink>;

    fn install_error_hook(&mut self, sink: ErrorSink) -> Self::Saved {
        self.hook.replace(sink)
    }

    fn flush_errors(&mut self) {
        for message in std::mem::take(&mut self.queued) {
            match &self.hook {
                Some(sink) => sink.record(message),
                None => self.stray_errors.push(message),
            }
        }
    }

    fn restore_error_hook(&mut self, saved: Self::Saved) {
        self.hook = saved;
    }
}

impl DrawSurface for RecordingHost {
    fn make_current(&mut self, _context: &mut MockContext) -> bool {
        if self.refuse_bind {
            return false;
        }
        self.calls.push(DrawCall::MakeCurrent);
        true
    }

    fn prepare(&mut self, _context: &mut MockContext, clear_color: [f32; 4]) {
        self.calls.push(DrawCall::Prepare(clear_color));
    }

    fn set_viewport(&mut self, _context: &mut MockContext, width: u32, height: u32) {
        self.calls.push(DrawCall::Viewport(width, height));
    }

    fn clear(&mut self, _context: &mut MockContext) {
        self.calls.push(DrawCall::Clear);
    }

    fn set_projection(&mut self, _context: &mut MockContext, projection: &Perspective) {
        self.calls.push(DrawCall::Projection(*projection));
    }

    fn set_model_transform(&mut self, _context: &mut MockContext, transform: Mat4) {
        self.calls.push(DrawCall::Model(transform));
    }

    fn submit_quads(&mut self, _context: &mut MockContext, faces: &[CubeFace]) {
        self.calls.push(DrawCall::Quads(faces.len()));
    }

    fn swap_buffers(&mut self, _context: &mut MockContext) {
        self.calls.push(DrawCall::Swap);
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingStatus {
    pub status: String,
    pub toggle_label: String,
    pub toggle_enabled: bool,
    pub updates: usize,
}

impl StatusSink for RecordingStatus {
    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
        self.updates += 1;
    }

    fn set_toggle(&mut self, label: &str, enabled: bool) {
        self.toggle_label = label.to_string();
        self.toggle_enabled = enabled;
    }
}
