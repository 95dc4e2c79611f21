//! Asynchronous asset resolution.
//!
//! Scenes describe what they need as [`AssetRequest`]s: a locator, the role the
//! loaded asset plays and the material or node it is bound to. The
//! [`dispatcher::AssetDispatcher`] hands each locator to a loader once, and as
//! loads finish (in any order, single or batched) routes every
//! [`ResolvedAsset`] through the [`registry::AssetRegistry`] to
//! [`binding::apply`], which mutates the scene graph in place.
//!
//! Load failures and assets nobody asked for are logged and otherwise ignored.
//! Wiring mistakes (a texture role pointed at a node, a handle that does not
//! exist, ...) surface as [`ConfigError`] and abort setup.

use std::{fmt, str::FromStr, sync::Arc};

use crate::data_structures::{
    material::ShadowMethod,
    model::MeshAsset,
    scene_graph::{MaterialId, NodeId},
    texture::Texture,
};

pub mod binding;
pub mod dispatcher;
pub mod error;
pub mod registry;

pub use error::ConfigError;

/// Shadow and lighting setup applied to meshes loaded for a [`Role::Mesh`] request.
///
/// Everything in here is known at scene setup time; none of it comes from the
/// loaded file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowCasting {
    pub light: NodeId,
    pub samples: u32,
    pub range: f32,
    pub epsilon: f32,
    pub gloss: f32,
    pub specular: f32,
    pub ambient: f32,
    /// 0xRRGGBB
    pub ambient_color: u32,
}

impl ShadowCasting {
    /// Soft shadows from `light` with the lighting used for loaded models.
    pub fn soft(light: NodeId, samples: u32, range: f32) -> Self {
        Self {
            light,
            samples,
            range,
            epsilon: 0.2,
            gloss: 30.0,
            specular: 1.0,
            ambient: 1.0,
            ambient_color: 0x303040,
        }
    }

    pub fn shadow_method(&self) -> ShadowMethod {
        ShadowMethod::soft(self.light, self.samples, self.range).with_epsilon(self.epsilon)
    }
}

/// The slot a loaded asset fills.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Role {
    /// Attach the loaded meshes under a node and let them cast shadows.
    Mesh(ShadowCasting),
    DiffuseTexture,
    NormalMap,
    SpecularMap,
}

impl Role {
    /// Parse a role name. `mesh` needs its shadow setup passed along.
    pub fn parse(name: &str, shadow: Option<ShadowCasting>) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "diffuse" => Ok(Role::DiffuseTexture),
            "normal" => Ok(Role::NormalMap),
            "specular" => Ok(Role::SpecularMap),
            "mesh" => shadow.map(Role::Mesh).ok_or(ConfigError::MissingShadowSetup),
            _ => Err(ConfigError::UnknownRole(name.to_string())),
        }
    }

    /// Whether an asset of `kind` can fill this role.
    pub fn accepts(&self, kind: AssetKind) -> bool {
        match self {
            Role::Mesh(_) => kind == AssetKind::Mesh,
            Role::DiffuseTexture | Role::NormalMap | Role::SpecularMap => {
                kind == AssetKind::Texture
            }
        }
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s, None)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Mesh(_) => "mesh",
            Role::DiffuseTexture => "diffuse",
            Role::NormalMap => "normal",
            Role::SpecularMap => "specular",
        })
    }
}

/// Non-owning handle to the scene object a request mutates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Material(MaterialId),
    Node(NodeId),
}

/// One outstanding need of a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetRequest {
    pub locator: String,
    pub role: Role,
    pub target: Target,
}

impl AssetRequest {
    pub fn new(locator: &str, role: Role, target: Target) -> Self {
        Self {
            locator: locator.to_string(),
            role,
            target,
        }
    }

    pub fn diffuse(locator: &str, material: MaterialId) -> Self {
        Self::new(locator, Role::DiffuseTexture, Target::Material(material))
    }

    pub fn normal_map(locator: &str, material: MaterialId) -> Self {
        Self::new(locator, Role::NormalMap, Target::Material(material))
    }

    pub fn specular_map(locator: &str, material: MaterialId) -> Self {
        Self::new(locator, Role::SpecularMap, Target::Material(material))
    }

    pub fn mesh(locator: &str, parent: NodeId, shadow: ShadowCasting) -> Self {
        Self::new(locator, Role::Mesh(shadow), Target::Node(parent))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Mesh,
    Texture,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Mesh(Arc<MeshAsset>),
    Texture(Arc<Texture>),
}

/// A finished load, tagged with the locator it was requested under.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedAsset {
    pub locator: String,
    pub payload: Payload,
}

impl ResolvedAsset {
    pub fn texture(locator: &str, texture: Texture) -> Self {
        Self {
            locator: locator.to_string(),
            payload: Payload::Texture(Arc::new(texture)),
        }
    }

    pub fn mesh(locator: &str, mesh: MeshAsset) -> Self {
        Self {
            locator: locator.to_string(),
            payload: Payload::Mesh(Arc::new(mesh)),
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self.payload {
            Payload::Mesh(_) => AssetKind::Mesh,
            Payload::Texture(_) => AssetKind::Texture,
        }
    }

    /// Name of the payload, for logging.
    pub fn name(&self) -> &str {
        match &self.payload {
            Payload::Mesh(mesh) => &mesh.name,
            Payload::Texture(texture) => &texture.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_texture_roles() {
        assert_eq!("diffuse".parse::<Role>(), Ok(Role::DiffuseTexture));
        assert_eq!(" Normal ".parse::<Role>(), Ok(Role::NormalMap));
        assert_eq!("specular".parse::<Role>(), Ok(Role::SpecularMap));
    }

    #[test]
    fn unknown_role_is_a_configuration_error() {
        assert_eq!(
            "emissive".parse::<Role>(),
            Err(ConfigError::UnknownRole("emissive".to_string()))
        );
    }

    #[test]
    fn mesh_role_needs_shadow_setup() {
        assert_eq!("mesh".parse::<Role>(), Err(ConfigError::MissingShadowSetup));
        let shadow = ShadowCasting::soft(NodeId(1), 10, 5.0);
        assert_eq!(Role::parse("mesh", Some(shadow)), Ok(Role::Mesh(shadow)));
    }

    #[test]
    fn roles_accept_matching_kinds() {
        let mesh = Role::Mesh(ShadowCasting::soft(NodeId(1), 10, 5.0));
        assert!(mesh.accepts(AssetKind::Mesh));
        assert!(!mesh.accepts(AssetKind::Texture));
        assert!(Role::NormalMap.accepts(AssetKind::Texture));
        assert!(!Role::SpecularMap.accepts(AssetKind::Mesh));
    }
}
