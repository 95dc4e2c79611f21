//! Materials: texture slots plus lighting and shadow settings.

use std::sync::Arc;

use crate::data_structures::{scene_graph::NodeId, texture::Texture};

/// Soft shadow map method bound to a directional light.
///
/// `samples` and `range` control the softness of the penumbra, `epsilon` is the
/// depth bias used against shadow acne.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowMethod {
    pub light: NodeId,
    pub samples: u32,
    pub range: f32,
    pub epsilon: f32,
}

impl ShadowMethod {
    pub const DEFAULT_EPSILON: f32 = 0.02;

    pub fn soft(light: NodeId, samples: u32, range: f32) -> Self {
        Self {
            light,
            samples,
            range,
            epsilon: Self::DEFAULT_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// A textured, lit material.
///
/// `texture` is the diffuse map and is never empty: materials start with the
/// placeholder texture. Normal and specular maps are optional.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub texture: Arc<Texture>,
    pub normal_map: Option<Arc<Texture>>,
    pub specular_map: Option<Arc<Texture>>,
    pub shadow_method: Option<ShadowMethod>,
    /// Lights this material is shaded with.
    pub lights: Vec<NodeId>,
    pub gloss: f32,
    pub specular: f32,
    pub ambient: f32,
    /// 0xRRGGBB
    pub ambient_color: u32,
    pub repeat: bool,
    pub mipmap: bool,
}

impl Material {
    pub fn new(name: &str, texture: Arc<Texture>) -> Self {
        Self {
            name: name.to_string(),
            texture,
            normal_map: None,
            specular_map: None,
            shadow_method: None,
            lights: Vec::new(),
            gloss: 50.0,
            specular: 1.0,
            ambient: 1.0,
            ambient_color: 0xffffff,
            repeat: false,
            mipmap: true,
        }
    }

    pub fn with_lights(mut self, lights: &[NodeId]) -> Self {
        self.lights = lights.to_vec();
        self
    }

    pub fn has_diffuse_map(&self) -> bool {
        !self.texture.is_placeholder()
    }
}
