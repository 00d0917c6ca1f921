//! Logical viewport size and the clamped pixel ratio.

use crate::config::MAX_PIXEL_RATIO;

/// Size of the output surface in logical pixels plus the pixel ratio used to
/// derive the framebuffer size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    max_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_density: f64) -> Self {
        Self::with_max_ratio(width, height, device_density, MAX_PIXEL_RATIO)
    }

    pub fn with_max_ratio(width: u32, height: u32, device_density: f64, max_pixel_ratio: f64) -> Self {
        let mut viewport = Self {
            width,
            height,
            pixel_ratio: 1.0,
            max_pixel_ratio,
        };
        viewport.resize(width, height, device_density);
        viewport
    }

    /// Builds the viewport from a physical size as reported by winit.
    pub fn from_physical(physical: winit::dpi::PhysicalSize<u32>, scale_factor: f64, max_pixel_ratio: f64) -> Self {
        let logical = physical.to_logical::<f64>(scale_factor);
        Self::with_max_ratio(
            logical.width.round() as u32,
            logical.height.round() as u32,
            scale_factor,
            max_pixel_ratio,
        )
    }

    pub fn resize(&mut self, width: u32, height: u32, device_density: f64) {
        self.width = width;
        self.height = height;
        self.pixel_ratio = clamp_pixel_ratio(device_density, self.max_pixel_ratio);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Framebuffer size: logical size scaled by the clamped pixel ratio.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width as f64 * self.pixel_ratio).round() as u32,
            (self.height as f64 * self.pixel_ratio).round() as u32,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

pub fn clamp_pixel_ratio(device_density: f64, max: f64) -> f64 {
    if device_density.is_finite() && device_density > 0.0 {
        device_density.min(max)
    } else {
        1.0
    }
}
