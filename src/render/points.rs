use super::helpers;
use showcase_core::{Camera, PointInstance, VisualEntity};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PointsUniforms {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) view: [[f32; 4]; 4],
    pub(crate) projection: [[f32; 4]; 4],
    pub(crate) colour1: [f32; 4],
    pub(crate) colour2: [f32; 4],
    pub(crate) viewport: [f32; 2],
    pub(crate) time: f32,
    pub(crate) scale: f32,
    pub(crate) amplitude: f32,
    pub(crate) frequency: f32,
    pub(crate) time_frequency: f32,
    pub(crate) random_frequency: f32,
    pub(crate) alpha: f32,
    pub(crate) _pad: [f32; 3],
}

impl PointsUniforms {
    pub(crate) fn for_entity(entity: &VisualEntity, camera: &Camera, viewport: [f32; 2]) -> Self {
        let u = entity.uniforms();
        let [r1, g1, b1] = u.colour1.to_array();
        let [r2, g2, b2] = u.colour2.to_array();
        Self {
            model: entity.model_matrix().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
            colour1: [r1, g1, b1, 1.0],
            colour2: [r2, g2, b2, 1.0],
            viewport,
            time: u.time,
            scale: u.scale,
            amplitude: u.amplitude,
            frequency: u.frequency,
            time_frequency: u.time_frequency,
            random_frequency: u.random_frequency,
            alpha: u.alpha,
            _pad: [0.0; 3],
        }
    }
}

pub(crate) struct PointsPipeline {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) bgl: wgpu::BindGroupLayout,
}

/// GPU copies of one entity's cloud and uniforms.
pub(crate) struct EntityBuffers {
    pub(crate) instances: wgpu::Buffer,
    pub(crate) count: u32,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

pub(crate) fn create_points_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
) -> PointsPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("particles_shader"),
        source: wgpu::ShaderSource::Wgsl(showcase_core::PARTICLES_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("particles_bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("particles_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let instance_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PointInstance>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRS,
    };
    let pipeline = helpers::make_instanced_pipeline(
        device,
        "particles_pipeline",
        &layout,
        &shader,
        &[instance_layout],
        color_format,
        helpers::ADDITIVE_BLEND,
    );
    PointsPipeline { pipeline, bgl }
}

pub(crate) fn create_entity_buffers(
    device: &wgpu::Device,
    points: &PointsPipeline,
    instances: &[PointInstance],
) -> EntityBuffers {
    let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("particles_instances"),
        contents: bytemuck::cast_slice(instances),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("particles_uniforms"),
        size: std::mem::size_of::<PointsUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("particles_bg"),
        layout: &points.bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });
    EntityBuffers {
        instances: instance_buffer,
        count: instances.len() as u32,
        uniform_buffer,
        bind_group,
    }
}
