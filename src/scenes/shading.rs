//! Four textured primitives lit by a white and a cyan directional light.

use std::sync::Arc;

use cgmath::Vector3;
use instant::Duration;

use crate::{
    assets::AssetRequest,
    camera::HoverController,
    context::Context,
    data_structures::{
        material::Material,
        model::Geometry,
        scene_graph::{DirectionalLight, MaterialId, MeshNode, Node, NodeId},
        texture::Texture,
        transform::Transform,
    },
    flow::SceneFlow,
    resources::LoaderContext,
};

/// Direction of the moving light `millis` milliseconds after the scene started.
pub fn light1_direction(millis: f32) -> Vector3<f32> {
    let angle = millis / 10000.0;
    Vector3::new(angle.sin() * 150000.0, -1000.0, angle.cos() * 150000.0)
}

fn light(color: u32) -> DirectionalLight {
    DirectionalLight {
        color,
        ambient: 0.1,
        diffuse: 0.7,
        ..DirectionalLight::new(Vector3::new(0.0, -1.0, 0.0))
    }
}

fn placeholder_material(name: &str, lights: &[NodeId]) -> Material {
    Material::new(
        name,
        Arc::new(Texture::create_placeholder(Texture::PLACEHOLDER_SIZE)),
    )
    .with_lights(lights)
}

/// Handles to the materials the texture requests target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadingMaterials {
    pub plane: MaterialId,
    pub sphere: MaterialId,
    pub cube: MaterialId,
    pub torus: MaterialId,
}

#[derive(Debug, Default)]
pub struct Shading {
    light1: Option<NodeId>,
    materials: Option<ShadingMaterials>,
    elapsed: Duration,
}

impl Shading {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn materials(&self) -> Option<ShadingMaterials> {
        self.materials
    }
}

impl SceneFlow for Shading {
    fn name(&self) -> &str {
        "Shading"
    }

    fn on_init(
        &mut self,
        ctx: &mut Context,
        _loader: &mut LoaderContext,
    ) -> anyhow::Result<Vec<AssetRequest>> {
        ctx.camera = HoverController::new(45.0, 20.0, 1000.0).with_tilt_bounds(0.0, 90.0);

        let scene = &mut ctx.scene;
        let root = scene.root();
        let light1 = scene.add_child(root, Node::light("light1", light(0xffffff)));
        let light2 = scene.add_child(root, Node::light("light2", light(0x00ffff)));
        let lights = [light1, light2];

        let mut plane = placeholder_material("plane", &lights);
        plane.repeat = true;
        plane.mipmap = false;
        let sphere = placeholder_material("sphere", &lights);
        let mut cube = placeholder_material("cube", &lights);
        cube.mipmap = false;
        let mut torus = placeholder_material("torus", &lights);
        torus.repeat = true;

        let materials = ShadingMaterials {
            plane: scene.add_material(plane),
            sphere: scene.add_material(sphere),
            cube: scene.add_material(cube),
            torus: scene.add_material(torus),
        };

        scene.add_child(
            root,
            Node::mesh(
                "plane",
                MeshNode::new(
                    Geometry::Plane {
                        width: 1000.0,
                        height: 1000.0,
                    },
                    materials.plane,
                )
                .with_uv_scale(2.0, 2.0),
            )
            .with_transform(Transform::from_position(0.0, -20.0, 0.0)),
        );
        scene.add_child(
            root,
            Node::mesh(
                "sphere",
                MeshNode::new(
                    Geometry::Sphere {
                        radius: 150.0,
                        segments_w: 40,
                        segments_h: 20,
                    },
                    materials.sphere,
                ),
            )
            .with_transform(Transform::from_position(300.0, 160.0, 300.0)),
        );
        scene.add_child(
            root,
            Node::mesh(
                "cube",
                MeshNode::new(
                    Geometry::Cube {
                        width: 200.0,
                        height: 200.0,
                        depth: 200.0,
                        tile6: false,
                    },
                    materials.cube,
                ),
            )
            .with_transform(Transform::from_position(300.0, 160.0, -250.0)),
        );
        scene.add_child(
            root,
            Node::mesh(
                "torus",
                MeshNode::new(
                    Geometry::Torus {
                        radius: 150.0,
                        tube_radius: 60.0,
                        segments_r: 40,
                        segments_t: 20,
                    },
                    materials.torus,
                )
                .with_uv_scale(10.0, 5.0),
            )
            .with_transform(Transform::from_position(-250.0, 160.0, -250.0)),
        );

        self.light1 = Some(light1);
        self.materials = Some(materials);

        Ok(vec![
            AssetRequest::diffuse("floor_diffuse.jpg", materials.plane),
            AssetRequest::normal_map("floor_normal.jpg", materials.plane),
            AssetRequest::specular_map("floor_specular.jpg", materials.plane),
            AssetRequest::diffuse("beachball_diffuse.jpg", materials.sphere),
            AssetRequest::specular_map("beachball_specular.jpg", materials.sphere),
            AssetRequest::diffuse("trinket_diffuse.jpg", materials.cube),
            AssetRequest::normal_map("trinket_normal.jpg", materials.cube),
            AssetRequest::specular_map("trinket_specular.jpg", materials.cube),
            AssetRequest::diffuse("weave_diffuse.jpg", materials.torus),
            // one texture serves as both normal and specular map
            AssetRequest::normal_map("weave_normal.jpg", materials.torus),
            AssetRequest::specular_map("weave_normal.jpg", materials.torus),
        ])
    }

    fn on_update(&mut self, ctx: &mut Context, dt: Duration) {
        self.elapsed += dt;
        let millis = self.elapsed.as_secs_f32() * 1000.0;
        let Some(id) = self.light1 else {
            return;
        };
        if let Some(light) = ctx.scene.node_mut(id).and_then(Node::as_light_mut) {
            light.direction = light1_direction(millis);
        }
    }
}
