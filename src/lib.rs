//! portal-scene
//!
//! A small decorative 3D scene rendered with wgpu, natively and in the
//! browser: a baked portal model with an animated portal surface, two
//! emissive pole lights and a field of drifting fireflies, viewed through a
//! damped orbit camera.
//!
//! High-level modules
//! - `config`: static scene configuration (asset paths, camera, limits)
//! - `assets`: background loading and the per-asset load state machine
//! - `resources`: helpers to read files and decode the model and texture
//! - `data_structures`: meshes, the loaded node tree and textures
//! - `materials`: material kinds, the node binding table and their GPU state
//! - `fireflies`: the particle field and its buffers
//! - `camera`, `viewport`: orbit camera and resize handling
//! - `pipelines`, `render`: WGSL pipelines and frame encoding
//! - `frame_loop`, `stats`: the per-frame cycle and its timing statistics
//! - `settings`, `debug_panel`: live-editable parameters
//! - `flow`: the winit application shell
//!
//! ```no_run
//! portal_scene::run(portal_scene::SceneConfig::default()).expect("the scene failed");
//! ```

pub mod assets;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod debug_panel;
pub mod error;
pub mod fireflies;
pub mod flow;
pub mod frame_loop;
pub mod materials;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod settings;
pub mod stats;
pub mod viewport;

pub use config::SceneConfig;
pub use error::SceneError;
pub use flow::run;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point: renders into the page's `canvas.webgl`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    run(SceneConfig::default()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
