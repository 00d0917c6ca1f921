//! Static configuration of the portal scene.
//!
//! Everything here is fixed at startup. Values mirror the scene as it was
//! authored: asset locations, camera placement, orbit limits and the firefly
//! count. Tests and embedders override fields with struct update syntax:
//!
//! ```
//! let config = portal_scene::config::SceneConfig {
//!     firefly_count: 0,
//!     ..Default::default()
//! };
//! assert_eq!(config.firefly_count, 0);
//! ```

use std::{f32::consts::PI, time::Duration};

/// Relative path of the baked portal model.
pub const MODEL_PATH: &str = "model/portal.glb";
/// Relative path of the baked lighting texture.
pub const TEXTURE_PATH: &str = "texture/baked.jpg";
/// Directory of the Draco decoder. Kept for parity with the authored scene;
/// Draco-compressed meshes are rejected by the glTF loader.
pub const DRACO_DECODER_PATH: &str = "draco/";
/// CSS selector of the canvas the scene renders into on the web.
pub const CANVAS_SELECTOR: &str = "canvas.webgl";
/// Upper bound for the device pixel ratio.
pub const MAX_PIXEL_RATIO: f64 = 2.0;
pub const DEFAULT_FIREFLY_COUNT: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Polar angle limits in radians, measured from the up axis.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// Fraction of the pending rotation applied per frame.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [4.0, 2.0, 4.0],
            target: [0.0, 0.0, 0.0],
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
            min_polar_angle: -PI / 4.0,
            max_polar_angle: PI / 2.5,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.5,
            max_distance: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub canvas_selector: String,
    pub model_path: String,
    pub texture_path: String,
    pub decoder_path: String,
    pub firefly_count: usize,
    pub camera: CameraConfig,
    pub max_pixel_ratio: f64,
    /// A load still pending after this long is reported as failed.
    /// `None` waits forever.
    pub load_timeout: Option<Duration>,
    /// Enables the keyboard bound debug panel.
    pub debug_panel: bool,
    /// Starts with the frame statistics overlay switched on.
    pub stats: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas_selector: CANVAS_SELECTOR.to_string(),
            model_path: MODEL_PATH.to_string(),
            texture_path: TEXTURE_PATH.to_string(),
            decoder_path: DRACO_DECODER_PATH.to_string(),
            firefly_count: DEFAULT_FIREFLY_COUNT,
            camera: CameraConfig::default(),
            max_pixel_ratio: MAX_PIXEL_RATIO,
            load_timeout: Some(Duration::from_secs(30)),
            debug_panel: true,
            stats: false,
        }
    }
}
