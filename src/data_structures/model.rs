//! Geometry descriptions and meshes decoded from model files.
//!
//! Primitive geometry is described, not tessellated: building vertex data for
//! planes, spheres and friends is the renderer's job. Meshes read from model
//! files carry their decoded vertex data in [`MeshData`].

use std::sync::Arc;

use crate::data_structures::texture::Texture;

/// Vertex data of a decoded mesh (Y-up, counter-clockwise winding).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// The material a model file assigns to a mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialAsset {
    pub name: String,
    /// Diffuse texture, if the file referenced one and it could be loaded.
    pub texture: Option<Arc<Texture>>,
}

/// A mesh produced by loading a model file.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshAsset {
    pub name: String,
    pub data: Arc<MeshData>,
    pub material: Option<MaterialAsset>,
}

/// Geometry of a mesh node.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Plane {
        width: f32,
        height: f32,
    },
    Sphere {
        radius: f32,
        segments_w: u32,
        segments_h: u32,
    },
    Cube {
        width: f32,
        height: f32,
        depth: f32,
        tile6: bool,
    },
    Torus {
        radius: f32,
        tube_radius: f32,
        segments_r: u32,
        segments_t: u32,
    },
    Loaded(Arc<MeshData>),
}
