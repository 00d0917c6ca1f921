//! Scene graph of the loaded model.
//!
//! A glTF scene is converted into a tree of named [`ModelNode`]s. Every node
//! carries a [`MaterialSlot`] that starts out as `Default` and is filled in by
//! [`crate::materials::bind_materials`]. The scene is static, so node
//! transforms are applied to the vertex positions while converting.

use cgmath::{Matrix4, SquareMatrix, Vector4};

use crate::{
    data_structures::model::{Mesh, ModelVertex},
    materials::MaterialKind,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MaterialSlot {
    /// Nothing assigned yet. Drawn with the baked material.
    #[default]
    Default,
    Bound(MaterialKind),
}

impl MaterialSlot {
    pub fn kind(&self) -> Option<MaterialKind> {
        match self {
            MaterialSlot::Default => None,
            MaterialSlot::Bound(kind) => Some(*kind),
        }
    }
}

#[derive(Debug, Default)]
pub struct ModelNode {
    pub name: String,
    pub material: MaterialSlot,
    pub meshes: Vec<Mesh>,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_children(name: impl Into<String>, children: Vec<ModelNode>) -> Self {
        Self {
            name: name.into(),
            children,
            ..Default::default()
        }
    }

    /// Direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&ModelNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut ModelNode> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// Depth-first, parents before children.
    pub fn traverse<'a>(&'a self, f: &mut dyn FnMut(&'a ModelNode)) {
        f(self);
        for child in &self.children {
            child.traverse(f);
        }
    }

    pub fn traverse_mut(&mut self, f: &mut dyn FnMut(&mut ModelNode)) {
        f(self);
        for child in &mut self.children {
            child.traverse_mut(f);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ModelNode::node_count).sum::<usize>()
    }
}

/// Converts a glTF node and its subtree.
///
/// `parent` is the accumulated world transform of the parent node.
pub fn to_model_node(
    node: gltf::scene::Node,
    buffers: &[Vec<u8>],
    device: &wgpu::Device,
    parent: Matrix4<f32>,
) -> ModelNode {
    let world = parent * Matrix4::from(node.transform().matrix());
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));

    let mut meshes = Vec::new();
    if let Some(mesh) = node.mesh() {
        for (idx, primitive) in mesh.primitives().enumerate() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

            let mut vertices: Vec<ModelVertex> = match reader.read_positions() {
                Some(positions) => positions
                    .map(|p| {
                        let p = world * Vector4::new(p[0], p[1], p[2], 1.0);
                        ModelVertex {
                            position: [p.x, p.y, p.z],
                            tex_coords: Default::default(),
                        }
                    })
                    .collect(),
                None => {
                    log::warn!("primitive {} of node `{}` has no positions", idx, name);
                    continue;
                }
            };
            if let Some(tex_coords) = reader.read_tex_coords(0).map(|v| v.into_f32()) {
                vertices
                    .iter_mut()
                    .zip(tex_coords)
                    .for_each(|(vertex, uv)| vertex.tex_coords = uv);
            }
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };

            let label = format!("{}#{}", name, idx);
            meshes.push(Mesh::new(device, &label, &vertices, &indices));
        }
    }

    let children = node
        .children()
        .map(|child| to_model_node(child, buffers, device, world))
        .collect();

    ModelNode {
        name,
        material: MaterialSlot::Default,
        meshes,
        children,
    }
}

/// Root node for a glTF scene: a synthetic `Scene` node whose children are
/// the scene's root nodes.
pub fn scene_root(scene: gltf::Scene, buffers: &[Vec<u8>], device: &wgpu::Device) -> ModelNode {
    let children = scene
        .nodes()
        .map(|node| to_model_node(node, buffers, device, Matrix4::identity()))
        .collect();
    ModelNode::with_children(scene.name().unwrap_or("Scene"), children)
}
