//! Engine data structures: meshes, textures and the scene graph.
//!
//! - `model` contains vertex layouts, GPU meshes and the draw helpers
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `scene_graph` holds the named node tree of the loaded model

pub mod model;
pub mod scene_graph;
pub mod texture;
