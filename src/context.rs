use std::sync::Arc;

use winit::{dpi::PhysicalSize, window::Window};

use crate::{config::SceneConfig, data_structures::texture, error::SceneError, viewport::Viewport};

/// The window together with the GPU objects bound to its surface.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub viewport: Viewport,
    max_pixel_ratio: f64,
}

impl Context {
    pub async fn new(window: Arc<Window>, scene: &SceneConfig) -> Result<Self, SceneError> {
        let physical = window.inner_size();
        let viewport = Viewport::from_physical(physical, window.scale_factor(), scene.max_pixel_ratio);

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| SceneError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SceneError::Surface(e.to_string()))?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                ..Default::default()
            })
            .await
            .map_err(|e| SceneError::Surface(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are uploaded in linear space and rely on an sRGB target.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| SceneError::Surface("the surface supports no format".to_string()))?;
        let (width, height) = surface_size(&viewport, physical);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        if !viewport.is_empty() {
            surface.configure(&device, &config);
        }

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width.max(1), config.height.max(1)],
            "depth_texture",
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            viewport,
            max_pixel_ratio: scene.max_pixel_ratio,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_texture.view
    }

    /// Applies a new window size or scale factor. Zero sized windows are
    /// ignored and `false` is returned.
    pub fn resize(&mut self, physical: PhysicalSize<u32>, scale_factor: f64) -> bool {
        if physical.width == 0 || physical.height == 0 {
            return false;
        }
        self.viewport = Viewport::from_physical(physical, scale_factor, self.max_pixel_ratio);
        if self.viewport.is_empty() {
            return false;
        }
        let (width, height) = surface_size(&self.viewport, physical);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            texture::Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
        log::debug!(
            "resized to {:?} at pixel ratio {}",
            self.viewport.size(),
            self.viewport.pixel_ratio()
        );
        true
    }

    /// Configures the surface again after it was lost or outdated.
    pub fn reconfigure(&mut self) {
        let physical = self.window.inner_size();
        let scale_factor = self.window.scale_factor();
        self.resize(physical, scale_factor);
    }
}

/// Framebuffer size for `viewport`. Native surfaces must match the window
/// extent, so the clamped ratio only shapes the canvas on the web.
fn surface_size(viewport: &Viewport, physical: PhysicalSize<u32>) -> (u32, u32) {
    if cfg!(target_arch = "wasm32") {
        viewport.physical_size()
    } else {
        (physical.width, physical.height)
    }
}
