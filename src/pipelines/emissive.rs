use crate::{
    data_structures::model::{ModelVertex, Vertex},
    pipelines::{DepthMode, basic::mk_render_pipeline},
};

/// Flat colour taken from a uniform. Used by the pole lights.
pub fn mk_emissive_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    uniform_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Emissive Pipeline Layout"),
        bind_group_layouts: &[Some(camera_bind_group_layout), Some(uniform_bind_group_layout)],
        immediate_size: 0,
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Emissive Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("emissive.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        format,
        Some(wgpu::BlendState::REPLACE),
        DepthMode::ReadWrite,
        Some(wgpu::Face::Back),
        &[ModelVertex::desc()],
        shader,
    )
}
