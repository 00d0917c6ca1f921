//! Frame encoding for the portal scene.
//!
//! [`SceneRenderer`] owns every GPU resource that is independent of the
//! output surface: the camera uniform, the three materials, the pipelines
//! and the firefly buffers. It can therefore render into a window surface
//! as well as into an offscreen texture.
//!
//! Draw order within the single render pass:
//! 1. meshes with the baked material
//! 2. meshes with the pole light material
//! 3. meshes with the portal material
//! 4. fireflies (blended, depth tested, no depth writes)

use crate::{
    camera::CameraResources,
    config::CameraConfig,
    data_structures::{
        model::{DrawMesh, Mesh},
        scene_graph::ModelNode,
        texture::Texture,
    },
    fireflies::{FireflyBuffers, FireflyField},
    materials::{MaterialKind, Materials},
    pipelines::Pipelines,
    settings::Settings,
    viewport::Viewport,
};

/// Meshes of the model sorted by the pipeline that draws them.
#[derive(Debug, Default)]
pub struct Batches<'a> {
    pub baked: Vec<&'a Mesh>,
    pub pole_light: Vec<&'a Mesh>,
    pub portal: Vec<&'a Mesh>,
}

impl<'a> Batches<'a> {
    /// Nodes without a bound material are drawn with the baked material.
    pub fn collect(root: &'a ModelNode) -> Self {
        let mut batches = Self::default();
        root.traverse(&mut |node| {
            let batch = match node.material.kind().unwrap_or(MaterialKind::Baked) {
                MaterialKind::Baked => &mut batches.baked,
                MaterialKind::PoleLight => &mut batches.pole_light,
                MaterialKind::PortalLight => &mut batches.portal,
            };
            batch.extend(node.meshes.iter());
        });
        batches
    }

    pub fn len(&self) -> usize {
        self.baked.len() + self.pole_light.len() + self.portal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct SceneRenderer {
    pub camera: CameraResources,
    pub materials: Materials,
    pub pipelines: Pipelines,
    pub fireflies: FireflyBuffers,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        field: &FireflyField,
        settings: &Settings,
        viewport: &Viewport,
        camera_config: &CameraConfig,
    ) -> Self {
        let (width, height) = viewport.size();
        let mut camera = CameraResources::new(device, camera_config, width.max(1), height.max(1));
        camera.resize(width.max(1), height.max(1), viewport.physical_size().1);

        let materials = Materials::new(device, queue, settings);
        let pipelines = Pipelines::new(
            device,
            format,
            &camera.bind_group_layout,
            &materials.texture_layout,
            &materials.uniform_layout,
        );
        let fireflies = FireflyBuffers::new(device, &materials.uniform_layout, field, settings, viewport);

        Self {
            camera,
            materials,
            pipelines,
            fireflies,
        }
    }

    /// Uploads the time driven uniforms of the portal and the fireflies.
    pub fn write_time(&mut self, queue: &wgpu::Queue, time: f32, settings: &Settings, viewport: &Viewport) {
        self.materials.write_portal(queue, time, settings);
        self.fireflies.write(queue, time, settings, viewport);
    }

    pub fn update_camera(&mut self, queue: &wgpu::Queue) {
        self.camera.update(queue);
    }

    pub fn resize(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.size();
        self.camera.resize(width, height, viewport.physical_size().1);
    }

    pub fn set_baked_texture(&mut self, device: &wgpu::Device, texture: &Texture) {
        self.materials.set_baked_texture(device, texture);
    }

    /// Records one render pass that clears to `clear` and draws the scene.
    ///
    /// `model` is `None` until the model finished loading; the fireflies are
    /// drawn regardless.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        colour_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        clear: wgpu::Color,
        model: Option<&ModelNode>,
    ) {
        let batches = model.map(Batches::collect).unwrap_or_default();

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: colour_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
            multiview_mask: None,
        });

        let camera = &self.camera.bind_group;
        let passes = [
            (&self.pipelines.baked, MaterialKind::Baked, &batches.baked),
            (&self.pipelines.emissive, MaterialKind::PoleLight, &batches.pole_light),
            (&self.pipelines.portal, MaterialKind::PortalLight, &batches.portal),
        ];
        for (pipeline, kind, meshes) in passes {
            if meshes.is_empty() {
                continue;
            }
            render_pass.set_pipeline(pipeline);
            let material = self.materials.bind_group(kind);
            for mesh in meshes {
                render_pass.draw_mesh(mesh, material, camera);
            }
        }

        let fireflies = &self.fireflies;
        if let (Some(positions), Some(scales)) = (&fireflies.positions, &fireflies.scales) {
            render_pass.set_pipeline(&self.pipelines.fireflies);
            render_pass.set_bind_group(0, camera, &[]);
            render_pass.set_bind_group(1, &fireflies.bind_group, &[]);
            render_pass.set_vertex_buffer(0, positions.slice(..));
            render_pass.set_vertex_buffer(1, scales.slice(..));
            // One quad of two triangles per firefly
            render_pass.draw(0..6, 0..fireflies.count);
        }
    }
}
