//! WebGPU line-list render pipeline

use super::lines::Frame;
use super::vertex::Vertex;

/// Smallest vertex buffer allocation, in bytes
const MIN_VERTEX_BUFFER: wgpu::BufferAddress = 4096;

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    /// Reused across frames; grows when a frame needs more room
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: wgpu::BufferAddress,
    vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Stage size in stage pixels, letterboxed into the viewport
    pub stage_size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        stage_size: (u32, u32),
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lunar-lander-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("Surface configured: {}x{} {:?}", width, height, format);

        let pipeline = create_line_pipeline(&device, format);
        let vertex_buffer = create_vertex_buffer(&device, MIN_VERTEX_BUFFER);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: MIN_VERTEX_BUFFER,
            vertex_count: 0,
            size: (width, height),
            stage_size,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Convert stage pixels (origin top-left, y down) to normalized device coordinates
    pub fn stage_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        stage_to_ndc(self.size, self.stage_size, x, y)
    }

    /// Map a frame's vertices to NDC and copy them into the vertex buffer
    fn upload(&mut self, frame: &Frame) {
        let vertices: Vec<Vertex> = frame
            .vertices
            .iter()
            .map(|v| {
                let (x, y) = self.stage_to_ndc(v.position[0], v.position[1]);
                Vertex::new(x, y, v.color)
            })
            .collect();
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);

        let needed = bytes.len() as wgpu::BufferAddress;
        if needed > self.vertex_capacity {
            self.vertex_capacity = needed.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {} bytes", self.vertex_capacity);
        }
        if !bytes.is_empty() {
            self.queue.write_buffer(&self.vertex_buffer, 0, bytes);
        }
        self.vertex_count = vertices.len() as u32;
    }

    /// Upload a finished frame and render it
    pub fn render(&mut self, frame: &Frame) -> Result<(), wgpu::SurfaceError> {
        self.upload(frame);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        let [r, g, b, a] = frame.clear_color.to_rgba_f32();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("stage_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, size: wgpu::BufferAddress) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("line_vertices"),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Unlit colored line list, no depth
fn create_line_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("line_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("line_pipeline_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("line_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::LineList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Letterboxed mapping of stage pixels into a viewport, in NDC
pub fn stage_to_ndc(viewport: (u32, u32), stage: (u32, u32), x: f32, y: f32) -> (f32, f32) {
    let (vw, vh) = (viewport.0.max(1) as f32, viewport.1.max(1) as f32);
    let (sw, sh) = (stage.0.max(1) as f32, stage.1.max(1) as f32);
    let scale = (vw / sw).min(vh / sh);

    // Stage extent as a fraction of the viewport
    let fx = sw * scale / vw;
    let fy = sh * scale / vh;

    let nx = (x / sw * 2.0 - 1.0) * fx;
    let ny = (1.0 - y / sh * 2.0) * fy;
    (nx, ny)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_corners_fill_matching_viewport() {
        let (x, y) = stage_to_ndc((1024, 768), (1024, 768), 0.0, 0.0);
        assert_eq!((x, y), (-1.0, 1.0));
        let (x, y) = stage_to_ndc((1024, 768), (1024, 768), 1024.0, 768.0);
        assert_eq!((x, y), (1.0, -1.0));
    }

    #[test]
    fn test_letterbox_on_wide_viewport() {
        // 4:3 stage in a 16:9 window: bars on the left and right
        let (x, y) = stage_to_ndc((1920, 1080), (1024, 768), 0.0, 0.0);
        assert!(x > -1.0);
        assert!((y - 1.0).abs() < 1e-6);
        let (cx, cy) = stage_to_ndc((1920, 1080), (1024, 768), 512.0, 384.0);
        assert!(cx.abs() < 1e-6 && cy.abs() < 1e-6);
    }

    #[test]
    fn test_zero_viewport_does_not_divide_by_zero() {
        let (x, y) = stage_to_ndc((0, 0), (1024, 768), 512.0, 384.0);
        assert!(x.is_finite() && y.is_finite());
    }
}
