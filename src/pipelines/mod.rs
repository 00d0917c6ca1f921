//! Render pipelines, one per material plus the fireflies.

pub mod basic;
pub mod emissive;
pub mod fireflies;
pub mod portal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    ReadWrite,
    /// Depth tested, never written. For blended geometry.
    ReadOnly,
}

#[derive(Debug)]
pub struct Pipelines {
    pub baked: wgpu::RenderPipeline,
    pub emissive: wgpu::RenderPipeline,
    pub portal: wgpu::RenderPipeline,
    pub fireflies: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        texture_layout: &wgpu::BindGroupLayout,
        uniform_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            baked: basic::mk_baked_pipeline(device, format, camera_layout, texture_layout),
            emissive: emissive::mk_emissive_pipeline(device, format, camera_layout, uniform_layout),
            portal: portal::mk_portal_pipeline(device, format, camera_layout, uniform_layout),
            fireflies: fireflies::mk_fireflies_pipeline(device, format, camera_layout, uniform_layout),
        }
    }
}
