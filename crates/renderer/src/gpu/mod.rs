//! wgpu binding of the host traits.
//!
//! - `context` picks adapter, surface and depth formats for a requested drawable
//!   configuration and owns the device plus swapchain state once created.
//! - `pipeline` holds the WGSL cube pipeline and its vertex/uniform buffers.
//!
//! Device creation runs under the coordinator's error trap. Validation errors
//! raised by wgpu are routed through a swappable handler slot, and flushing the
//! host means polling the device until queued work (and its errors) completed.

mod context;
mod pipeline;

use std::sync::{Arc, Mutex, PoisonError};

use glam::Mat4;
use winit::window::Window;

use crate::cube::CubeFace;
use crate::frame::Perspective;
use crate::host::{ContextProvider, DrawSurface, ErrorHook, ErrorSink};
use crate::types::SurfaceConfig;

pub use context::{GpuConfig, GpuContext};

/// Process-wide destination for uncaptured device errors.
#[derive(Clone, Default)]
struct ErrorSlot {
    handler: Arc<Mutex<Option<ErrorSink>>>,
}

impl ErrorSlot {
    fn swap(&self, sink: Option<ErrorSink>) -> Option<ErrorSink> {
        let mut handler = self.handler.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *handler, sink)
    }

    fn report(&self, message: String) {
        let handler = self.handler.lock().unwrap_or_else(PoisonError::into_inner);
        match handler.as_ref() {
            Some(sink) => sink.record(message),
            None => tracing::error!(%message, "unhandled GPU error"),
        }
    }
}

pub struct GpuHost {
    instance: wgpu::Instance,
    window: Arc<Window>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    errors: ErrorSlot,
}

impl GpuHost {
    pub fn new(window: Arc<Window>) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });
        Self {
            instance,
            window,
            surface: None,
            device: None,
            errors: ErrorSlot::default(),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl ContextProvider for GpuHost {
    type Config = GpuConfig;
    type Context = GpuContext;

    fn select_config(&mut self, request: &SurfaceConfig) -> Option<GpuConfig> {
        let surface = match self.instance.create_surface(self.window.clone()) {
            Ok(surface) => surface,
            Err(err) => {
                tracing::warn!(%err, "failed to create rendering surface");
                return None;
            }
        };
        let adapter = match pollster::block_on(self.instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            },
        )) {
            Ok(adapter) => adapter,
            Err(err) => {
                tracing::warn!(%err, "no GPU adapter can present to this window");
                return None;
            }
        };

        let caps = surface.get_capabilities(&adapter);
        let Some(color_format) = context::pick_color_format(&caps.formats, request.color_bits)
        else {
            tracing::warn!(
                color_bits = request.color_bits,
                formats = ?caps.formats,
                "no surface format with the requested colour depth"
            );
            return None;
        };
        let depth_format = context::depth_format_for(request.depth_bits).filter(|format| {
            adapter
                .get_texture_format_features(*format)
                .allowed_usages
                .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
        });
        let Some(depth_format) = depth_format else {
            tracing::warn!(depth_bits = request.depth_bits, "no usable depth format");
            return None;
        };
        let present_mode = context::pick_present_mode(&caps.present_modes, request.double_buffer);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let info = adapter.get_info();
        tracing::debug!(
            adapter = %info.name,
            backend = ?info.backend,
            ?color_format,
            ?depth_format,
            ?present_mode,
            "selected drawable configuration"
        );

        self.surface = Some(surface);
        Some(GpuConfig {
            adapter,
            color_format,
            depth_format,
            present_mode,
            alpha_mode,
        })
    }

    fn create_context(&mut self, config: &GpuConfig) -> Option<GpuContext> {
        let surface = self.surface.as_ref()?;
        let requested = pollster::block_on(config.adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("cubeview device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                .using_resolution(config.adapter.limits()),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::default(),
        }));
        let (device, queue) = match requested {
            Ok(pair) => pair,
            Err(err) => {
                self.errors.report(format!("device request failed: {err}"));
                return None;
            }
        };

        let slot = self.errors.clone();
        device.on_uncaptured_error(Box::new(move |error: wgpu::Error| {
            slot.report(error.to_string())
        }));

        let context = GpuContext::new(
            device.clone(),
            queue,
            surface,
            config,
            self.window.inner_size(),
        );
        self.device = Some(device);
        Some(context)
    }

    fn unbind(&mut self, context: &mut GpuContext) {
        // An acquired but unpresented frame is discarded.
        context.frame = None;
    }

    fn destroy_context(&mut self, context: GpuContext) {
        tracing::debug!(?context, "destroying graphics context");
        drop(context);
        self.device = None;
    }

    fn release_config(&mut self, config: GpuConfig) {
        tracing::debug!(?config, "releasing drawable configuration");
        self.surface = None;
    }
}

impl ErrorHook for GpuHost {
    type Saved = Option<ErrorSink>;

    fn install_error_hook(&mut self, sink: ErrorSink) -> Self::Saved {
        self.errors.swap(Some(sink))
    }

    fn flush_errors(&mut self) {
        if let Some(device) = &self.device {
            if let Err(err) = device.poll(wgpu::PollType::Wait) {
                self.errors.report(format!("device poll failed: {err}"));
            }
        }
    }

    fn restore_error_hook(&mut self, saved: Self::Saved) {
        self.errors.swap(saved);
    }
}

impl DrawSurface for GpuHost {
    fn make_current(&mut self, context: &mut GpuContext) -> bool {
        let Some(surface) = self.surface.as_ref() else {
            return false;
        };
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return false;
        }
        if (size.width, size.height) != context.surface_size() {
            context.resize(surface, size);
        }

        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                context.reconfigure(surface);
                match surface.get_current_texture() {
                    Ok(frame) => frame,
                    Err(err) => {
                        tracing::warn!(%err, "surface unavailable after reconfigure; skipping frame");
                        return false;
                    }
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to acquire surface texture; skipping frame");
                return false;
            }
        };
        context.frame = Some(frame);
        true
    }

    fn prepare(&mut self, context: &mut GpuContext, clear_color: [f32; 4]) {
        let [r, g, b, a] = clear_color.map(f64::from);
        context.clear_color = wgpu::Color { r, g, b, a };
    }

    fn set_viewport(&mut self, context: &mut GpuContext, width: u32, height: u32) {
        let (surface_width, surface_height) = context.surface_size();
        context.viewport = (width.min(surface_width), height.min(surface_height));
    }

    fn clear(&mut self, context: &mut GpuContext) {
        context.clear_pending = true;
    }

    fn set_projection(&mut self, context: &mut GpuContext, projection: &Perspective) {
        context.clip_from_view = projection.clip_from_view();
    }

    fn set_model_transform(&mut self, context: &mut GpuContext, transform: Mat4) {
        context.view_from_model = transform;
    }

    fn submit_quads(&mut self, context: &mut GpuContext, faces: &[CubeFace]) {
        context.draw(faces);
    }

    fn swap_buffers(&mut self, context: &mut GpuContext) {
        context.present();
    }
}
