//! Scene graph and hierarchical scene organization.
//!
//! The scene is an arena of nodes addressed by [`NodeId`]. Each node knows its
//! parent and owns a list of child ids, so the tree never forms cycles and
//! handles stay valid for the lifetime of the graph (nodes are never removed).
//! Materials live in a second arena addressed by [`MaterialId`] so that several
//! meshes can share one material.

use std::sync::Arc;

use log::warn;

use crate::data_structures::{
    material::Material,
    model::{Geometry, MeshAsset},
    transform::Transform,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: cgmath::Vector3<f32>,
    /// 0xRRGGBB
    pub color: u32,
    pub ambient: f32,
    pub diffuse: f32,
}

impl DirectionalLight {
    pub fn new(direction: cgmath::Vector3<f32>) -> Self {
        Self {
            direction,
            color: 0xffffff,
            ambient: 0.0,
            diffuse: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshNode {
    pub geometry: Geometry,
    pub material: MaterialId,
    pub casts_shadows: bool,
    pub uv_scale: (f32, f32),
    /// The loaded asset this mesh was created from, if any.
    pub source: Option<Arc<MeshAsset>>,
}

impl MeshNode {
    pub fn new(geometry: Geometry, material: MaterialId) -> Self {
        Self {
            geometry,
            material,
            casts_shadows: true,
            uv_scale: (1.0, 1.0),
            source: None,
        }
    }

    pub fn with_uv_scale(mut self, u: f32, v: f32) -> Self {
        self.uv_scale = (u, v);
        self
    }

    pub fn with_shadows(mut self, casts_shadows: bool) -> Self {
        self.casts_shadows = casts_shadows;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Container,
    Light(DirectionalLight),
    Mesh(MeshNode),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub local: Transform,
    world: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            local: Transform::default(),
            world: Transform::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn container(name: &str) -> Self {
        Self::new(name, NodeKind::Container)
    }

    pub fn light(name: &str, light: DirectionalLight) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn mesh(name: &str, mesh: MeshNode) -> Self {
        Self::new(name, NodeKind::Mesh(mesh))
    }

    pub fn with_transform(mut self, local: Transform) -> Self {
        self.local = local;
        self
    }

    pub fn world_transform(&self) -> &Transform {
        &self.world
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_mesh(&self) -> Option<&MeshNode> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut MeshNode> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&DirectionalLight> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut DirectionalLight> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    materials: Vec<Material>,
}

impl SceneGraph {
    /// Create a graph holding only the root container.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::container("scene")],
            materials: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Attach `node` below `parent` and return its handle.
    ///
    /// An unknown parent is reported and the node is attached to the root instead.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let parent = if parent.0 < self.nodes.len() {
            parent
        } else {
            warn!(
                "Parent {:?} of node '{}' does not exist, attaching it to the root.",
                parent, node.name
            );
            self.root()
        };
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, material)| (MaterialId(i), material))
    }

    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &MeshNode)> {
        self.nodes()
            .filter_map(|(id, node)| node.as_mesh().map(|mesh| (id, mesh)))
    }

    pub fn lights(&self) -> impl Iterator<Item = (NodeId, &DirectionalLight)> {
        self.nodes()
            .filter_map(|(id, node)| node.as_light().map(|light| (id, light)))
    }

    pub fn is_light(&self, id: NodeId) -> bool {
        self.node(id).and_then(Node::as_light).is_some()
    }

    /// Recompute every world transform as `parent.world * local`, starting at the root.
    pub fn update_world_transforms(&mut self) {
        let mut stack = vec![(self.root(), Transform::default())];
        while let Some((id, parent_world)) = stack.pop() {
            let node = &mut self.nodes[id.0];
            node.world = &parent_world * &node.local;
            let world = node.world;
            stack.extend(node.children.iter().map(|&child| (child, world)));
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::texture::Texture;

    fn material(scene: &mut SceneGraph) -> MaterialId {
        scene.add_material(Material::new(
            "plain",
            Arc::new(Texture::create_placeholder(8)),
        ))
    }

    #[test]
    fn children_keep_parent_links() {
        let mut scene = SceneGraph::new();
        let group = scene.add_child(scene.root(), Node::container("group"));
        let mat = material(&mut scene);
        let mesh = scene.add_child(
            group,
            Node::mesh("plane", MeshNode::new(Geometry::Plane { width: 1.0, height: 1.0 }, mat)),
        );
        assert_eq!(scene.children(scene.root()), &[group]);
        assert_eq!(scene.children(group), &[mesh]);
        assert_eq!(scene.node(mesh).unwrap().parent(), Some(group));
        assert_eq!(scene.meshes().count(), 1);
    }

    #[test]
    fn unknown_parent_falls_back_to_root() {
        let mut scene = SceneGraph::new();
        let orphan = scene.add_child(NodeId(42), Node::container("orphan"));
        assert_eq!(scene.node(orphan).unwrap().parent(), Some(scene.root()));
    }

    #[test]
    fn world_transforms_compose_down_the_tree() {
        let mut scene = SceneGraph::new();
        let loader = scene.add_child(
            scene.root(),
            Node::container("loader")
                .with_transform(Transform::from_position(0.0, 0.0, -200.0).with_uniform_scale(300.0)),
        );
        let child = scene.add_child(
            loader,
            Node::container("child").with_transform(Transform::from_position(0.0, 1.0, 0.0)),
        );
        scene.update_world_transforms();
        let world = scene.node(child).unwrap().world_transform();
        assert_eq!(world.position, cgmath::Vector3::new(0.0, 300.0, -200.0));
    }

    #[test]
    fn lights_are_found() {
        let mut scene = SceneGraph::new();
        let light = scene.add_child(
            scene.root(),
            Node::light("sun", DirectionalLight::new(cgmath::Vector3::new(0.0, -1.0, 0.0))),
        );
        assert!(scene.is_light(light));
        assert!(!scene.is_light(scene.root()));
        assert_eq!(scene.lights().count(), 1);
    }
}
