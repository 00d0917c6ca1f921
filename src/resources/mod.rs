use std::io::{BufReader, Cursor};

use anyhow::{Context as _, bail};

use crate::data_structures::scene_graph::{ModelNode, scene_root};

/**
 * This module contains all logic for loading meshes and textures from external files.
 */
pub mod texture;

pub use texture::{load_binary, load_texture};

/// Extension the authored model may use for its meshes. The glTF reader
/// cannot decode it.
const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// Loads a glTF/GLB file into a [`ModelNode`] tree.
///
/// The root is a synthetic node whose children are the root nodes of the
/// default scene (or the first scene if none is marked as default).
pub async fn load_model_gltf(file_name: &str, device: &wgpu::Device) -> anyhow::Result<ModelNode> {
    let gltf_bytes = load_binary(file_name).await?;
    let gltf_reader = BufReader::new(Cursor::new(gltf_bytes));
    let gltf = gltf::Gltf::from_reader(gltf_reader)
        .with_context(|| format!("{file_name} is not a valid glTF file"))?;

    if gltf.extensions_required().any(|ext| ext == DRACO_EXTENSION) {
        bail!("{file_name} requires {DRACO_EXTENSION}, which is not supported");
    }

    // Load buffers
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .with_context(|| format!("{file_name} references a missing binary chunk"))?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(&sibling_path(file_name, uri)).await?;
                buffer_data.push(bin);
            }
        }
    }

    let scene = match gltf.default_scene() {
        Some(scene) => scene,
        None => match gltf.scenes().next() {
            Some(scene) => scene,
            None => bail!("{file_name} contains no scene"),
        },
    };
    let root = scene_root(scene, &buffer_data, device);
    log::info!("{} loaded with {} nodes", file_name, root.node_count());

    Ok(root)
}

/// Path of `uri` relative to the directory of `file_name`.
fn sibling_path(file_name: &str, uri: &str) -> String {
    match file_name.rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/{uri}"),
        None => uri.to_string(),
    }
}
