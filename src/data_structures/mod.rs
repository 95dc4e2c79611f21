//! Engine data structures: scene graph, materials, textures and transforms.
//!
//! - `scene_graph` is the node arena (lights, meshes, containers) with parent links
//! - `material` holds texture slots, lighting and shadow settings
//! - `model` contains geometry descriptions and meshes decoded from model files
//! - `texture` contains decoded texture data and the placeholder texture
//! - `transform` holds local/world transformation data per node

pub mod material;
pub mod model;
pub mod scene_graph;
pub mod texture;
pub mod transform;
