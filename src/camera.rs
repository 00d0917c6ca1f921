//! Perspective camera with an orbit controller.
//!
//! The controller turns pointer drags into rotations around a fixed target
//! and wheel/pinch input into dolly. Input only accumulates a pending delta;
//! [`OrbitController::update`] applies a damped fraction of it every frame,
//! so the camera keeps drifting briefly after the pointer is released.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
};

use crate::config::CameraConfig;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const POLAR_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, target: P) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }

    /// Polar angle of the camera around its target, measured from +Y.
    pub fn polar_angle(&self) -> f32 {
        Spherical::from_offset(self.position - self.target).phi
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).magnitude()
    }
}

#[derive(Debug, Clone)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Radius, azimuth (`theta`, around +Y from +Z) and polar angle (`phi`, from +Y).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vector3<f32>) -> Self {
        let radius = offset.magnitude();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

#[derive(Debug)]
pub struct OrbitController {
    delta: Spherical,
    scale: f32,
    damping_factor: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    min_polar_angle: f32,
    max_polar_angle: f32,
    min_distance: f32,
    max_distance: f32,
    dragging: bool,
    cursor: Option<PhysicalPosition<f64>>,
    touches: Vec<(u64, PhysicalPosition<f64>)>,
    surface_height: f32,
}

impl OrbitController {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            delta: Spherical::default(),
            scale: 1.0,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            min_polar_angle: config.min_polar_angle,
            max_polar_angle: config.max_polar_angle,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            dragging: false,
            cursor: None,
            touches: Vec::new(),
            surface_height: 1.0,
        }
    }

    /// Rotation speed is relative to the height of the surface in physical pixels.
    pub fn set_surface_height(&mut self, height: u32) {
        self.surface_height = height.max(1) as f32;
    }

    /// Rotates by a pointer movement given in physical pixels.
    pub fn handle_drag(&mut self, dx: f64, dy: f64) {
        let full_turn = 2.0 * PI * self.rotate_speed / self.surface_height;
        self.delta.theta -= full_turn * dx as f32;
        self.delta.phi -= full_turn * dy as f32;
    }

    /// Positive steps move the camera towards the target.
    pub fn handle_scroll(&mut self, steps: f32) {
        let zoom_scale = 0.95f32.powf(self.zoom_speed);
        if steps > 0.0 {
            self.scale *= zoom_scale;
        } else if steps < 0.0 {
            self.scale /= zoom_scale;
        }
    }

    /// Feeds a window event. Returns `true` when the event moved the camera.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                let previous = self.cursor.replace(*position);
                match previous {
                    Some(last) if self.dragging => {
                        self.handle_drag(position.x - last.x, position.y - last.y);
                        true
                    }
                    _ => false,
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.dragging = false;
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.handle_scroll(steps);
                steps != 0.0
            }
            WindowEvent::Touch(touch) => self.handle_touch(touch.id, touch.phase, touch.location),
            _ => false,
        }
    }

    fn handle_touch(&mut self, id: u64, phase: TouchPhase, location: PhysicalPosition<f64>) -> bool {
        match phase {
            TouchPhase::Started => {
                self.touches.retain(|(t, _)| *t != id);
                self.touches.push((id, location));
                false
            }
            TouchPhase::Moved => {
                let Some(index) = self.touches.iter().position(|(t, _)| *t == id) else {
                    return false;
                };
                let last = self.touches[index].1;
                match self.touches.len() {
                    1 => {
                        self.touches[index].1 = location;
                        self.handle_drag(location.x - last.x, location.y - last.y);
                    }
                    _ => {
                        let other = self.touches[1 - index.min(1)].1;
                        let before = distance(last, other);
                        self.touches[index].1 = location;
                        let after = distance(location, other);
                        if before > 0.0 && after > 0.0 {
                            self.scale *= (before / after) as f32;
                        }
                    }
                }
                true
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.retain(|(t, _)| *t != id);
                false
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        self.delta.theta.abs() < f32::EPSILON && self.delta.phi.abs() < f32::EPSILON && self.scale == 1.0
    }

    /// Applies the damped share of the pending input to `camera`.
    pub fn update(&mut self, camera: &mut Camera) {
        let mut spherical = Spherical::from_offset(camera.position - camera.target);

        spherical.theta += self.delta.theta * self.damping_factor;
        spherical.phi += self.delta.phi * self.damping_factor;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.position = camera.target + spherical.to_offset();

        self.delta.theta *= 1.0 - self.damping_factor;
        self.delta.phi *= 1.0 - self.damping_factor;
        self.scale = 1.0;
    }
}

fn distance(a: PhysicalPosition<f64>, b: PhysicalPosition<f64>) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        let identity = Matrix4::identity().into();
        Self {
            view: identity,
            proj: identity,
            view_proj: identity,
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        let view = camera.calc_matrix();
        let proj = projection.calc_matrix();
        self.view = view.into();
        self.proj = proj.into();
        self.view_proj = (proj * view).into();
    }
}

/// Camera state together with its GPU uniform.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub projection: Projection,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, config: &CameraConfig, width: u32, height: u32) -> Self {
        let camera = Camera::new(config.position, config.target);
        let projection = Projection::new(width, height, cgmath::Deg(config.fovy), config.znear, config.zfar);
        let mut controller = OrbitController::new(config);
        controller.set_surface_height(height);

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, &projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            projection,
            controller,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Advances the orbit controller and uploads the new matrices.
    pub fn update(&mut self, queue: &wgpu::Queue) {
        self.controller.update(&mut self.camera);
        self.uniform.update_view_proj(&self.camera, &self.projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    pub fn resize(&mut self, width: u32, height: u32, surface_height: u32) {
        self.projection.resize(width, height);
        self.controller.set_surface_height(surface_height);
    }
}
