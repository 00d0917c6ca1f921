#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use portal_scene::{
    data_structures::scene_graph::ModelNode,
    frame_loop::{FrameScheduler, FrameSource, FrameTarget},
};
use rand::{SeedableRng, rngs::StdRng};

pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A model shaped like the authored portal: the four bound children plus
/// some nested nodes below `baked`.
pub(crate) fn portal_model() -> ModelNode {
    ModelNode::with_children(
        "Scene",
        vec![
            ModelNode::with_children(
                "baked",
                vec![ModelNode::new("bench"), ModelNode::new("rocks")],
            ),
            ModelNode::new("portalLight"),
            ModelNode::new("poleLightA"),
            ModelNode::new("poleLightB"),
        ],
    )
}

/// Same as [`portal_model`] without the child called `missing`.
pub(crate) fn portal_model_without(missing: &str) -> ModelNode {
    let mut root = portal_model();
    root.children.retain(|child| child.name != missing);
    root
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    WriteTime(f32),
    UpdateControls,
    Render,
    RequestFrame,
}

pub(crate) type CallLog = Rc<RefCell<Vec<Call>>>;

/// Frame target that records every call into a shared log.
pub(crate) struct RecordingTarget {
    pub(crate) log: CallLog,
    /// Renders fail while this is set.
    pub(crate) fail: bool,
}

impl RecordingTarget {
    pub(crate) fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    pub(crate) fn renders(&self) -> usize {
        self.log.borrow().iter().filter(|c| **c == Call::Render).count()
    }
}

impl FrameTarget for RecordingTarget {
    type Error = String;

    fn write_time(&mut self, elapsed: f32) {
        self.log.borrow_mut().push(Call::WriteTime(elapsed));
    }

    fn update_controls(&mut self) {
        self.log.borrow_mut().push(Call::UpdateControls);
    }

    fn render(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Call::Render);
        if self.fail {
            Err("surface lost".to_string())
        } else {
            Ok(())
        }
    }
}

pub(crate) struct RecordingScheduler {
    pub(crate) log: CallLog,
}

impl FrameScheduler for RecordingScheduler {
    fn request_frame(&self) {
        self.log.borrow_mut().push(Call::RequestFrame);
    }
}

/// Delivers a fixed number of frames, then reports teardown.
pub(crate) struct ScriptedFrames {
    pub(crate) log: CallLog,
    remaining: u32,
    delivered: Cell<u32>,
}

impl ScriptedFrames {
    pub(crate) fn new(log: &CallLog, frames: u32) -> Self {
        Self {
            log: log.clone(),
            remaining: frames,
            delivered: Cell::new(0),
        }
    }

    pub(crate) fn delivered(&self) -> u32 {
        self.delivered.get()
    }
}

impl FrameScheduler for ScriptedFrames {
    fn request_frame(&self) {
        self.log.borrow_mut().push(Call::RequestFrame);
    }
}

impl FrameSource for ScriptedFrames {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.delivered.set(self.delivered.get() + 1);
        true
    }
}

/// A device without a surface for offscreen rendering.
#[cfg(feature = "integration-tests")]
pub(crate) async fn headless_device() -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..wgpu::InstanceDescriptor::new_without_display_handle()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await?;
    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("test device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
            ..Default::default()
        })
        .await?;
    Ok((device, queue))
}

/// Copies `texture` into a mappable buffer and reads it back as RGBA8.
///
/// `width * 4` must be a multiple of 256.
#[cfg(feature = "integration-tests")]
pub(crate) async fn read_back(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
) -> anyhow::Result<image::RgbaImage> {
    let u32_size = std::mem::size_of::<u32>() as u32;
    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        size: (u32_size * width * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        label: None,
        mapped_at_creation: false,
    });
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Read Back Encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(u32_size * width),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).unwrap();
    });
    device.poll(wgpu::PollType::Wait {
        submission_index: None,
        timeout: Some(std::time::Duration::from_secs(3)),
    })?;
    rx.receive().await.unwrap()?;
    let data = buffer_slice.get_mapped_range().to_vec();
    image::RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| anyhow::anyhow!("read back buffer has the wrong size"))
}
