use glam::Mat4;
use winit::dpi::PhysicalSize;

use super::pipeline::{cube_vertices, CubePipeline, CubeUniforms};
use crate::cube::CubeFace;

/// Adapter and formats that satisfy a requested drawable configuration.
pub struct GpuConfig {
    pub(crate) adapter: wgpu::Adapter,
    pub(crate) color_format: wgpu::TextureFormat,
    pub(crate) depth_format: wgpu::TextureFormat,
    pub(crate) present_mode: wgpu::PresentMode,
    pub(crate) alpha_mode: wgpu::CompositeAlphaMode,
}

impl std::fmt::Debug for GpuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuConfig")
            .field("adapter", &self.adapter.get_info().name)
            .field("color_format", &self.color_format)
            .field("depth_format", &self.depth_format)
            .field("present_mode", &self.present_mode)
            .finish()
    }
}

/// Picks a surface format with the requested bits per colour channel.
///
/// Linear formats win over sRGB ones so the face colours come out as written.
pub(crate) fn pick_color_format(
    formats: &[wgpu::TextureFormat],
    color_bits: u8,
) -> Option<wgpu::TextureFormat> {
    let matches_depth = |format: &wgpu::TextureFormat| match color_bits {
        8 => matches!(
            format,
            wgpu::TextureFormat::Bgra8Unorm
                | wgpu::TextureFormat::Rgba8Unorm
                | wgpu::TextureFormat::Bgra8UnormSrgb
                | wgpu::TextureFormat::Rgba8UnormSrgb
        ),
        10 => matches!(format, wgpu::TextureFormat::Rgb10a2Unorm),
        _ => false,
    };
    formats
        .iter()
        .copied()
        .filter(matches_depth)
        .find(|format| !format.is_srgb())
        .or_else(|| formats.iter().copied().find(matches_depth))
}

pub(crate) fn depth_format_for(depth_bits: u8) -> Option<wgpu::TextureFormat> {
    match depth_bits {
        16 => Some(wgpu::TextureFormat::Depth16Unorm),
        24 => Some(wgpu::TextureFormat::Depth24Plus),
        32 => Some(wgpu::TextureFormat::Depth32Float),
        _ => None,
    }
}

/// FIFO presents whole frames in order, which is what double buffering asks for.
/// Single buffering prefers the modes that present as soon as possible.
pub(crate) fn pick_present_mode(
    modes: &[wgpu::PresentMode],
    double_buffer: bool,
) -> wgpu::PresentMode {
    if !double_buffer {
        if let Some(mode) = [wgpu::PresentMode::Immediate, wgpu::PresentMode::Mailbox]
            .into_iter()
            .find(|mode| modes.contains(mode))
        {
            return mode;
        }
    }
    wgpu::PresentMode::Fifo
}

pub(crate) struct DepthTarget {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTarget {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cube depth target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Device, swapchain configuration and per-frame draw state for one window.
pub struct GpuContext {
    pub(crate) device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    depth_format: wgpu::TextureFormat,
    depth: DepthTarget,
    pipeline: CubePipeline,
    pub(crate) frame: Option<wgpu::SurfaceTexture>,
    pub(crate) clear_color: wgpu::Color,
    pub(crate) clear_pending: bool,
    pub(crate) viewport: (u32, u32),
    pub(crate) clip_from_view: Mat4,
    pub(crate) view_from_model: Mat4,
}

impl std::fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext")
            .field("size", &(self.surface_config.width, self.surface_config.height))
            .field("format", &self.surface_config.format)
            .field("frame_acquired", &self.frame.is_some())
            .finish()
    }
}

impl GpuContext {
    pub(crate) fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: &wgpu::Surface<'static>,
        config: &GpuConfig,
        size: PhysicalSize<u32>,
    ) -> Self {
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: config.color_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: config.present_mode,
            alpha_mode: config.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth = DepthTarget::new(
            &device,
            config.depth_format,
            surface_config.width,
            surface_config.height,
        );
        let pipeline = CubePipeline::new(&device, config.color_format, config.depth_format);

        Self {
            device,
            queue,
            depth_format: config.depth_format,
            depth,
            pipeline,
            frame: None,
            clear_color: wgpu::Color::BLACK,
            clear_pending: false,
            viewport: (surface_config.width, surface_config.height),
            clip_from_view: Mat4::IDENTITY,
            view_from_model: Mat4::IDENTITY,
            surface_config,
        }
    }

    pub(crate) fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Reconfigures the swapchain and depth target for a new drawable size.
    pub(crate) fn resize(&mut self, surface: &wgpu::Surface<'static>, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.reconfigure(surface);
        tracing::debug!(width = size.width, height = size.height, "surface resized");
    }

    pub(crate) fn reconfigure(&mut self, surface: &wgpu::Surface<'static>) {
        surface.configure(&self.device, &self.surface_config);
        self.depth = DepthTarget::new(
            &self.device,
            self.depth_format,
            self.surface_config.width,
            self.surface_config.height,
        );
    }

    /// Encodes and submits one pass drawing `faces` into the acquired frame.
    pub(crate) fn draw(&mut self, faces: &[CubeFace]) {
        let Some(frame) = self.frame.as_ref() else {
            return;
        };
        let vertices = cube_vertices(faces);
        let uniforms = CubeUniforms::new(self.clip_from_view * self.view_from_model);
        self.queue.write_buffer(
            &self.pipeline.vertex_buffer,
            0,
            bytemuck::cast_slice(&vertices),
        );
        self.queue
            .write_buffer(&self.pipeline.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let load = if self.clear_pending {
            wgpu::LoadOp::Clear(self.clear_color)
        } else {
            wgpu::LoadOp::Load
        };
        let (width, height) = self.viewport;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("cube frame encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cube pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.pipeline.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.pipeline.vertex_buffer.slice(..));
            pass.draw(0..vertices.len() as u32, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        self.clear_pending = false;
    }

    /// Presents the acquired frame, if any.
    pub(crate) fn present(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.present();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn eight_bit_request_prefers_linear_formats() {
        let formats = [
            TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Rgb10a2Unorm,
            TextureFormat::Bgra8Unorm,
        ];
        assert_eq!(
            pick_color_format(&formats, 8),
            Some(TextureFormat::Bgra8Unorm)
        );
        assert_eq!(
            pick_color_format(&formats[..1], 8),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn ten_bit_request_needs_a_ten_bit_surface() {
        assert_eq!(
            pick_color_format(&[TextureFormat::Rgb10a2Unorm], 10),
            Some(TextureFormat::Rgb10a2Unorm)
        );
        assert_eq!(pick_color_format(&[TextureFormat::Bgra8Unorm], 10), None);
        assert_eq!(pick_color_format(&[TextureFormat::Bgra8Unorm], 12), None);
    }

    #[test]
    fn depth_bits_map_to_depth_formats() {
        assert_eq!(depth_format_for(16), Some(TextureFormat::Depth16Unorm));
        assert_eq!(depth_format_for(24), Some(TextureFormat::Depth24Plus));
        assert_eq!(depth_format_for(32), Some(TextureFormat::Depth32Float));
        assert_eq!(depth_format_for(8), None);
    }

    #[test]
    fn single_buffer_prefers_immediate_presentation() {
        use wgpu::PresentMode::*;
        assert_eq!(pick_present_mode(&[Fifo, Mailbox, Immediate], true), Fifo);
        assert_eq!(pick_present_mode(&[Fifo, Mailbox, Immediate], false), Immediate);
        assert_eq!(pick_present_mode(&[Fifo, Mailbox], false), Mailbox);
        assert_eq!(pick_present_mode(&[Fifo], false), Fifo);
    }
}
