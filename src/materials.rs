//! Material bindings of the portal model.
//!
//! Three materials live for the whole session: the baked surface, the
//! emissive pole lights and the animated portal. [`bind_materials`] maps the
//! named children of the loaded model onto them; [`Materials`] owns the GPU
//! side (uniform buffers and bind groups).

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        scene_graph::{MaterialSlot, ModelNode},
        texture::Texture,
    },
    error::SceneError,
    settings::{Colour, Settings},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Samples the baked lighting texture.
    Baked,
    /// Flat emissive colour.
    PoleLight,
    /// Animated gradient.
    PortalLight,
}

pub const POLE_LIGHT_COLOUR: Colour = Colour::rgb(0xff, 0xff, 0xe5);

const BINDING_TABLE: [(&str, MaterialKind); 4] = [
    ("baked", MaterialKind::Baked),
    ("portalLight", MaterialKind::PortalLight),
    ("poleLightA", MaterialKind::PoleLight),
    ("poleLightB", MaterialKind::PoleLight),
];

/// Node names the model must provide and the material each one receives.
pub fn binding_table() -> &'static [(&'static str, MaterialKind)] {
    &BINDING_TABLE
}

/// Assigns materials to the model.
///
/// Every node is given the baked material, then the direct children named in
/// [`binding_table`] get theirs. Fails without touching the tree when one of
/// those children is missing.
pub fn bind_materials(root: &mut ModelNode) -> Result<(), SceneError> {
    if let Some((missing, _)) = BINDING_TABLE
        .iter()
        .find(|(name, _)| root.child(name).is_none())
    {
        return Err(SceneError::MissingNode(missing.to_string()));
    }

    root.traverse_mut(&mut |node| node.material = MaterialSlot::Bound(MaterialKind::Baked));
    for (name, kind) in BINDING_TABLE {
        if let Some(node) = root.child_mut(name) {
            node.material = MaterialSlot::Bound(kind);
        }
    }
    Ok(())
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PoleLightUniform {
    pub colour: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PortalUniform {
    pub colour_start: [f32; 3],
    pub time: f32,
    pub colour_end: [f32; 3],
    // Uniforms require 16 byte (4 float) spacing
    pub _padding: f32,
}

impl PortalUniform {
    pub fn new(time: f32, settings: &Settings) -> Self {
        Self {
            colour_start: settings.portal_colour_start().to_linear(),
            time,
            colour_end: settings.portal_colour_end().to_linear(),
            _padding: 0.0,
        }
    }
}

pub fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some(label),
    })
}

pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("baked_texture_bind_group_layout"),
    })
}

fn uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some(label),
    })
}

fn texture_bind_group(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, texture: &Texture) -> wgpu::BindGroup {
    let sampler = match &texture.sampler {
        Some(sampler) => sampler.clone(),
        None => crate::data_structures::texture::create_default_sampler(device),
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
        label: Some("baked_texture_bind_group"),
    })
}

/// GPU state of the three scene materials.
#[derive(Debug)]
pub struct Materials {
    pub texture_layout: wgpu::BindGroupLayout,
    pub uniform_layout: wgpu::BindGroupLayout,
    pub baked: wgpu::BindGroup,
    pub pole_light: wgpu::BindGroup,
    pub portal: wgpu::BindGroup,
    portal_uniform: PortalUniform,
    portal_buffer: wgpu::Buffer,
    #[allow(unused)]
    pole_light_buffer: wgpu::Buffer,
}

impl Materials {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, settings: &Settings) -> Self {
        let texture_layout = texture_layout(device);
        let uniform_layout = uniform_layout(device, "material_uniform_bind_group_layout");

        let placeholder = Texture::create_placeholder(device, queue, [255, 255, 255, 255]);
        let baked = texture_bind_group(device, &texture_layout, &placeholder);

        let [r, g, b] = POLE_LIGHT_COLOUR.to_linear();
        let pole_light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Pole Light Buffer"),
            contents: bytemuck::cast_slice(&[PoleLightUniform {
                colour: [r, g, b, 1.0],
            }]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let pole_light = uniform_bind_group(device, &uniform_layout, &pole_light_buffer, "pole_light_bind_group");

        let portal_uniform = PortalUniform::new(0.0, settings);
        let portal_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Portal Buffer"),
            contents: bytemuck::cast_slice(&[portal_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let portal = uniform_bind_group(device, &uniform_layout, &portal_buffer, "portal_bind_group");

        Self {
            texture_layout,
            uniform_layout,
            baked,
            pole_light,
            portal,
            portal_uniform,
            portal_buffer,
            pole_light_buffer,
        }
    }

    pub fn bind_group(&self, kind: MaterialKind) -> &wgpu::BindGroup {
        match kind {
            MaterialKind::Baked => &self.baked,
            MaterialKind::PoleLight => &self.pole_light,
            MaterialKind::PortalLight => &self.portal,
        }
    }

    /// Replaces the placeholder with the loaded baked texture.
    pub fn set_baked_texture(&mut self, device: &wgpu::Device, texture: &Texture) {
        self.baked = texture_bind_group(device, &self.texture_layout, texture);
    }

    pub fn write_portal(&mut self, queue: &wgpu::Queue, time: f32, settings: &Settings) {
        self.portal_uniform = PortalUniform::new(time, settings);
        queue.write_buffer(&self.portal_buffer, 0, bytemuck::cast_slice(&[self.portal_uniform]));
    }

    pub fn portal_uniform(&self) -> &PortalUniform {
        &self.portal_uniform
    }
}
