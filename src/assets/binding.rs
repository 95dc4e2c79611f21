//! Applies resolved assets to their targets in the scene graph.

use std::sync::Arc;

use log::debug;

use crate::{
    assets::{ConfigError, Payload, ResolvedAsset, Role, ShadowCasting, Target},
    data_structures::{
        material::Material,
        model::{Geometry, MeshAsset},
        scene_graph::{MaterialId, MeshNode, Node, NodeId, SceneGraph},
        texture::Texture,
    },
};

/// Check that `role` can be applied to `target` in `scene`.
///
/// Texture roles need an existing material, the mesh role needs an existing node
/// and a light to cast shadows from.
pub fn validate(scene: &SceneGraph, target: Target, role: Role) -> Result<(), ConfigError> {
    match (role, target) {
        (Role::Mesh(shadow), Target::Node(node)) => {
            if scene.node(node).is_none() {
                return Err(ConfigError::UnknownTarget(target));
            }
            if !scene.is_light(shadow.light) {
                return Err(ConfigError::NotALight(shadow.light));
            }
            Ok(())
        }
        (Role::DiffuseTexture | Role::NormalMap | Role::SpecularMap, Target::Material(material)) => {
            match scene.material(material) {
                Some(_) => Ok(()),
                None => Err(ConfigError::UnknownTarget(target)),
            }
        }
        _ => Err(ConfigError::InvalidTarget { role, target }),
    }
}

/// Apply `asset` to `target` in the role it was requested for.
///
/// Applying the same asset to the same target and role again leaves the scene
/// unchanged: texture slots are overwritten with the same texture and loaded
/// meshes are attached once per payload.
pub fn apply(
    scene: &mut SceneGraph,
    target: Target,
    role: Role,
    asset: &ResolvedAsset,
) -> Result<(), ConfigError> {
    validate(scene, target, role)?;
    if !role.accepts(asset.kind()) {
        return Err(ConfigError::PayloadMismatch {
            locator: asset.locator.clone(),
            role,
            found: asset.kind(),
        });
    }

    match (&asset.payload, role, target) {
        (Payload::Texture(texture), _, Target::Material(material)) => {
            let Some(material) = scene.material_mut(material) else {
                return Err(ConfigError::UnknownTarget(target));
            };
            let slot = match role {
                Role::NormalMap => &mut material.normal_map,
                Role::SpecularMap => &mut material.specular_map,
                _ => {
                    material.texture = texture.clone();
                    debug!("'{}' is now the diffuse map of '{}'", asset.locator, material.name);
                    return Ok(());
                }
            };
            *slot = Some(texture.clone());
            debug!("'{}' is now the {} map of '{}'", asset.locator, role, material.name);
            Ok(())
        }
        (Payload::Mesh(mesh), Role::Mesh(shadow), Target::Node(parent)) => {
            attach_mesh(scene, parent, mesh, &shadow)
        }
        _ => Err(ConfigError::InvalidTarget { role, target }),
    }
}

fn attach_mesh(
    scene: &mut SceneGraph,
    parent: NodeId,
    mesh: &Arc<MeshAsset>,
    shadow: &ShadowCasting,
) -> Result<(), ConfigError> {
    let node = match find_attached(scene, parent, mesh) {
        Some(node) => node,
        None => {
            let shared = mesh
                .material
                .as_ref()
                .and_then(|material| find_material(scene, parent, &material.name));
            let material = match shared {
                Some(material) => material,
                None => {
                    let texture = mesh
                        .material
                        .as_ref()
                        .and_then(|material| material.texture.clone())
                        .unwrap_or_else(|| {
                            Arc::new(Texture::create_placeholder(Texture::PLACEHOLDER_SIZE))
                        });
                    let material_name = mesh
                        .material
                        .as_ref()
                        .map(|material| material.name.as_str())
                        .unwrap_or(&mesh.name);
                    scene.add_material(Material::new(material_name, texture))
                }
            };
            let mut mesh_node = MeshNode::new(Geometry::Loaded(mesh.data.clone()), material);
            mesh_node.source = Some(mesh.clone());
            debug!("Attaching mesh '{}' below {:?}", mesh.name, parent);
            scene.add_child(parent, Node::mesh(&mesh.name, mesh_node))
        }
    };

    let Some(mesh_node) = scene.node_mut(node).and_then(Node::as_mesh_mut) else {
        return Err(ConfigError::UnknownTarget(Target::Node(node)));
    };
    mesh_node.casts_shadows = true;
    let material_id = mesh_node.material;

    let Some(material) = scene.material_mut(material_id) else {
        return Err(ConfigError::UnknownTarget(Target::Material(material_id)));
    };
    material.shadow_method = Some(shadow.shadow_method());
    material.lights = vec![shadow.light];
    material.gloss = shadow.gloss;
    material.specular = shadow.specular;
    material.ambient = shadow.ambient;
    material.ambient_color = shadow.ambient_color;
    Ok(())
}

/// The material of a mesh below `parent` whose file material is called `name`.
///
/// Meshes of one model file that name the same material share it.
fn find_material(scene: &SceneGraph, parent: NodeId, name: &str) -> Option<MaterialId> {
    scene.children(parent).iter().find_map(|&child| {
        let node = scene.node(child).and_then(Node::as_mesh)?;
        let source = node.source.as_ref()?.material.as_ref()?;
        (source.name == name).then_some(node.material)
    })
}

/// The child of `parent` created from `mesh` by an earlier apply.
fn find_attached(scene: &SceneGraph, parent: NodeId, mesh: &Arc<MeshAsset>) -> Option<NodeId> {
    scene.children(parent).iter().copied().find(|&child| {
        scene
            .node(child)
            .and_then(Node::as_mesh)
            .and_then(|node| node.source.as_ref())
            .is_some_and(|source| Arc::ptr_eq(source, mesh))
    })
}
