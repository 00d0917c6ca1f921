use crate::{
    data_structures::model::{ModelVertex, Vertex},
    pipelines::{DepthMode, basic::mk_render_pipeline},
};

/// Animated gradient between the two portal colours, driven by `time`.
pub fn mk_portal_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    uniform_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Portal Pipeline Layout"),
        bind_group_layouts: &[Some(camera_bind_group_layout), Some(uniform_bind_group_layout)],
        immediate_size: 0,
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Portal Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("portal.wgsl").into()),
    };
    // The portal is a single plane seen from both sides.
    mk_render_pipeline(
        device,
        &layout,
        format,
        Some(wgpu::BlendState::REPLACE),
        DepthMode::ReadWrite,
        None,
        &[ModelVertex::desc()],
        shader,
    )
}
