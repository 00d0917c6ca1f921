use crate::{
    data_structures::model::Vertex,
    fireflies::{FireflyPosition, FireflyScale},
    pipelines::{DepthMode, basic::mk_render_pipeline},
};

/// Adds `colour * alpha` onto whatever is already in the target.
pub const ADDITIVE_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Instanced quads, additive, depth tested but never written.
pub fn mk_fireflies_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    uniform_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Fireflies Pipeline Layout"),
        bind_group_layouts: &[Some(camera_bind_group_layout), Some(uniform_bind_group_layout)],
        immediate_size: 0,
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Fireflies Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("fireflies.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        format,
        Some(ADDITIVE_BLENDING),
        DepthMode::ReadOnly,
        None,
        &[FireflyPosition::desc(), FireflyScale::desc()],
        shader,
    )
}
