//! SDF-based WebGPU render pipeline
//!
//! Draws the arena in a single fullscreen-triangle pass: every circle is a
//! signed distance evaluated in the fragment shader. The win screen reuses
//! the same pass with wide, faded edges.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::consts::*;
use crate::platform::Viewport;
use crate::sim::Color;
use crate::ui::SceneView;

/// Circles per frame: a full wave plus the player
const MAX_GPU_CIRCLES: usize = 32;
/// Edge softness in arena pixels when drawing the frozen win frame
const BLUR_EDGE: f32 = 12.0;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],  // offset 0
    arena: [f32; 2],       // offset 8
    offset: [f32; 2],      // offset 16
    scale: f32,            // offset 24
    circle_count: u32,     // offset 28
    blur: f32,             // offset 32
    _pad0: [u32; 3],       // offset 36
    background: [f32; 4],  // offset 48 (16-byte aligned for WGSL vec4)
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CircleData {
    pos: [f32; 2],
    radius: f32,
    _pad: f32,
    color: [f32; 4],
}

const EMPTY_CIRCLE: CircleData = CircleData {
    pos: [0.0; 2],
    radius: 0.0,
    _pad: 0.0,
    color: [0.0; 4],
};

// WGSL aligns `background` to 16 bytes
const _: () = assert!(std::mem::size_of::<Globals>() == 64);

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    circles_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                arena: [ARENA_WIDTH, ARENA_HEIGHT],
                offset: [0.0, 0.0],
                scale: 1.0,
                circle_count: 0,
                blur: 0.0,
                _pad0: [0; 3],
                background: Color::WHITE.to_f32(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Uniform rather than storage: WebGL2 has no storage buffers
        let circles_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("circles"),
            size: (std::mem::size_of::<CircleData>() * MAX_GPU_CIRCLES) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: circles_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            circles_buffer,
            bind_group,
            size: (width, height),
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

    /// Upload the scene and draw it. Screens without a scene get a plain background.
    pub fn render(
        &mut self,
        scene: Option<&SceneView>,
        background: Color,
    ) -> Result<(), wgpu::SurfaceError> {
        let resolution = glam::Vec2::new(self.size.0 as f32, self.size.1 as f32);
        let viewport = Viewport::fit(resolution);

        let mut circles_data = [EMPTY_CIRCLE; MAX_GPU_CIRCLES];
        let mut count = 0;
        if let Some(scene) = scene {
            // Food first, player last so it draws on top
            let bodies = scene
                .circles
                .iter()
                .map(|c| (c.pos, c.radius, c.color))
                .chain(std::iter::once((
                    scene.player.pos,
                    scene.player.radius,
                    scene.player.color,
                )));
            for (slot, (pos, radius, color)) in circles_data.iter_mut().zip(bodies) {
                *slot = CircleData {
                    pos: [pos.x, pos.y],
                    radius,
                    _pad: 0.0,
                    color: color.to_f32(),
                };
                count += 1;
            }
        }

        let globals = Globals {
            resolution: [resolution.x, resolution.y],
            arena: [ARENA_WIDTH, ARENA_HEIGHT],
            offset: [viewport.offset.x, viewport.offset.y],
            scale: viewport.scale,
            circle_count: count,
            blur: if scene.is_some_and(|s| s.blurred) {
                BLUR_EDGE
            } else {
                0.0
            },
            _pad0: [0; 3],
            background: background.to_f32(),
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        self.queue
            .write_buffer(&self.circles_buffer, 0, bytemuck::cast_slice(&circles_data));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
