use fnv::FnvHashMap;
use showcase_core::{EntityId, Rgb, Scene};
use web_sys as web;

mod helpers;
mod points;
use points::{
    create_entity_buffers, create_points_pipeline, EntityBuffers, PointsPipeline, PointsUniforms,
};

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    points: PointsPipeline,
    // Uploaded clouds, created lazily the first frame an entity is attached
    entities: FnvHashMap<EntityId, EntityBuffers>,
    width: u32,
    height: u32,
}

fn clear_color(c: Rgb) -> wgpu::Color {
    wgpu::Color {
        r: c.r as f64,
        g: c.g as f64,
        b: c.b as f64,
        a: 1.0,
    }
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = helpers::pick_surface_format(&caps.formats)
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
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
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let points = create_points_pipeline(&device, format);
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            points,
            entities: FnvHashMap::default(),
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reapply the current configuration after the surface was lost or outdated.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Drop GPU copies of entities that no longer own a cloud and upload the
    /// ones that are attached but not uploaded yet.
    fn sync_entities(&mut self, scene: &Scene) {
        self.entities
            .retain(|id, _| scene.entity(*id).is_some_and(|e| e.cloud().is_some()));
        for entity in scene.attached() {
            if self.entities.contains_key(&entity.id()) {
                continue;
            }
            if let Some(cloud) = entity.cloud() {
                let buffers = create_entity_buffers(&self.device, &self.points, cloud.instances());
                log::debug!("[gpu] uploaded {} ({} points)", entity.name(), buffers.count);
                self.entities.insert(entity.id(), buffers);
            }
        }
    }

    /// Clear to the scene background and draw every attached cloud.
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        self.sync_entities(scene);
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        let viewport = [self.width as f32, self.height as f32];
        for entity in scene.attached() {
            if let Some(b) = self.entities.get(&entity.id()) {
                let u = PointsUniforms::for_entity(entity, scene.camera(), viewport);
                self.queue
                    .write_buffer(&b.uniform_buffer, 0, bytemuck::bytes_of(&u));
            }
        }
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("particles_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(scene.background())),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.points.pipeline);
            for entity in scene.attached() {
                let Some(b) = self.entities.get(&entity.id()) else {
                    continue;
                };
                rpass.set_bind_group(0, &b.bind_group, &[]);
                rpass.set_vertex_buffer(0, b.instances.slice(..));
                rpass.draw(0..6, 0..b.count);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
