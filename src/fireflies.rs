//! Firefly particle field.
//!
//! Positions and scales are generated once and uploaded as two instance-rate
//! vertex buffers (`position` and `aScale`). Each firefly is drawn as a
//! camera-facing quad whose pixel size follows the point-sprite formula
//! `size * aScale * pixelRatio / -viewZ`.

use rand::Rng;
use wgpu::util::DeviceExt;

use crate::{data_structures::model::Vertex, settings::Settings, viewport::Viewport};

pub const HALF_WIDTH: f32 = 2.0;
pub const MAX_HEIGHT: f32 = 1.5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FireflyField {
    /// Flat xyz triples.
    pub positions: Vec<f32>,
    pub scales: Vec<f32>,
}

impl FireflyField {
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut positions = vec![0.0f32; count * 3];
        let mut scales = vec![0.0f32; count];

        for i in 0..count {
            positions[i * 3] = (rng.gen_range(0.0f32..1.0) - 0.5) * 2.0 * HALF_WIDTH;
            positions[i * 3 + 1] = rng.gen_range(0.0f32..1.0) * MAX_HEIGHT;
            positions[i * 3 + 2] = (rng.gen_range(0.0f32..1.0) - 0.5) * 2.0 * HALF_WIDTH;

            scales[i] = rng.gen_range(0.0f32..1.0);
        }

        Self { positions, scales }
    }

    pub fn random(count: usize) -> Self {
        Self::generate(count, &mut rand::thread_rng())
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn position(&self, i: usize) -> Option<[f32; 3]> {
        self.positions
            .get(i * 3..i * 3 + 3)
            .map(|p| [p[0], p[1], p[2]])
    }
}

/// Vertex layouts of the two instance buffers.
pub struct FireflyPosition;
pub struct FireflyScale;

impl Vertex for FireflyPosition {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

impl Vertex for FireflyScale {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32,
            }],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FireflyUniform {
    /// Framebuffer size in physical pixels.
    pub resolution: [f32; 2],
    pub time: f32,
    pub pixel_ratio: f32,
    pub size: f32,
    // Uniforms require 16 byte (4 float) spacing
    pub _padding: [f32; 3],
}

impl FireflyUniform {
    pub fn new(time: f32, settings: &Settings, viewport: &Viewport) -> Self {
        let (width, height) = viewport.physical_size();
        Self {
            resolution: [width.max(1) as f32, height.max(1) as f32],
            time,
            pixel_ratio: viewport.pixel_ratio() as f32,
            size: settings.firefly_size(),
            _padding: [0.0; 3],
        }
    }
}

/// GPU buffers of the particle field. Empty fields own no vertex buffers.
#[derive(Debug)]
pub struct FireflyBuffers {
    pub positions: Option<wgpu::Buffer>,
    pub scales: Option<wgpu::Buffer>,
    pub count: u32,
    pub uniform: FireflyUniform,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl FireflyBuffers {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        field: &FireflyField,
        settings: &Settings,
        viewport: &Viewport,
    ) -> Self {
        let mk_buffer = |label: &str, data: &[f32]| {
            (!data.is_empty()).then(|| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(data),
                    usage: wgpu::BufferUsages::VERTEX,
                })
            })
        };
        let positions = mk_buffer("Firefly Position Buffer", &field.positions);
        let scales = mk_buffer("Firefly Scale Buffer", &field.scales);

        let uniform = FireflyUniform::new(0.0, settings, viewport);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Firefly Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("firefly_bind_group"),
        });

        Self {
            positions,
            scales,
            count: field.len() as u32,
            uniform,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, time: f32, settings: &Settings, viewport: &Viewport) {
        self.uniform = FireflyUniform::new(time, settings, viewport);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
