//! A soldier ant loaded from a 3DS file, standing on a sand plane and casting
//! soft shadows from a slowly circling light.
//!
//! The 3DS file refers to its texture as `texture.jpg`; the loader context
//! remaps that to the real file before the model is loaded.

use std::sync::Arc;

use cgmath::Vector3;
use instant::Duration;
use winit::event::WindowEvent;

use crate::{
    assets::{AssetRequest, ShadowCasting},
    camera::HoverController,
    context::Context,
    data_structures::{
        material::{Material, ShadowMethod},
        model::Geometry,
        scene_graph::{DirectionalLight, MeshNode, Node, NodeId},
        texture::Texture,
        transform::Transform,
    },
    flow::SceneFlow,
    resources::LoaderContext,
};

pub const MODEL: &str = "soldier_ant.3ds";
pub const MODEL_TEXTURE: &str = "texture.jpg";
pub const MODEL_TEXTURE_FILE: &str = "soldier_ant.jpg";
pub const GROUND_TEXTURE: &str = "CoarseRedSand.jpg";

const SHADOW_SAMPLES: u32 = 10;
const SHADOW_RANGE: f32 = 5.0;
const SHADOW_EPSILON: f32 = 0.2;

/// Direction of the light `millis` milliseconds after the scene started.
pub fn light_direction(millis: f32) -> Vector3<f32> {
    Vector3::new(-(millis / 4000.0).sin(), -1.0, -(millis / 4000.0).cos())
}

#[derive(Debug, Default)]
pub struct Load3ds {
    light: Option<NodeId>,
    model: Option<NodeId>,
    elapsed: Duration,
}

impl Load3ds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn light(&self) -> Option<NodeId> {
        self.light
    }

    /// The node the model's meshes are attached to.
    pub fn model(&self) -> Option<NodeId> {
        self.model
    }
}

impl SceneFlow for Load3ds {
    fn name(&self) -> &str {
        "Load 3DS"
    }

    fn on_init(
        &mut self,
        ctx: &mut Context,
        loader: &mut LoaderContext,
    ) -> anyhow::Result<Vec<AssetRequest>> {
        // far plane kept short for shadow map precision
        ctx.far = 2100.0;
        ctx.camera = HoverController::new(45.0, 20.0, 1000.0)
            .with_tilt_bounds(10.0, 90.0)
            .with_wheel_zoom(false);

        let scene = &mut ctx.scene;
        let root = scene.root();
        let light = scene.add_child(
            root,
            Node::light("light", DirectionalLight::new(Vector3::new(-1.0, -1.0, 1.0))),
        );

        let mut ground_material = Material::new(
            "ground",
            Arc::new(Texture::create_placeholder(Texture::PLACEHOLDER_SIZE)),
        )
        .with_lights(&[light]);
        ground_material.shadow_method =
            Some(ShadowMethod::soft(light, SHADOW_SAMPLES, SHADOW_RANGE).with_epsilon(SHADOW_EPSILON));
        ground_material.specular = 0.0;
        let ground_material = scene.add_material(ground_material);
        scene.add_child(
            root,
            Node::mesh(
                "ground",
                MeshNode::new(
                    Geometry::Plane {
                        width: 1000.0,
                        height: 1000.0,
                    },
                    ground_material,
                )
                .with_shadows(false),
            ),
        );

        let model = scene.add_child(
            root,
            Node::container("loader")
                .with_transform(Transform::from_position(0.0, 0.0, -200.0).with_uniform_scale(300.0)),
        );

        loader.map_url(MODEL_TEXTURE, MODEL_TEXTURE_FILE);
        self.light = Some(light);
        self.model = Some(model);

        let mut shadow = ShadowCasting::soft(light, SHADOW_SAMPLES, SHADOW_RANGE);
        shadow.epsilon = SHADOW_EPSILON;
        Ok(vec![
            AssetRequest::mesh(MODEL, model, shadow),
            AssetRequest::diffuse(GROUND_TEXTURE, ground_material),
        ])
    }

    fn on_update(&mut self, ctx: &mut Context, dt: Duration) {
        self.elapsed += dt;
        let millis = self.elapsed.as_secs_f32() * 1000.0;
        let Some(id) = self.light else {
            return;
        };
        if let Some(light) = ctx.scene.node_mut(id).and_then(Node::as_light_mut) {
            light.direction = light_direction(millis);
        }
    }

    fn on_window_events(&mut self, _ctx: &mut Context, event: &WindowEvent) {
        if let WindowEvent::Resized(size) = event {
            log::debug!("Viewport resized to {}x{}", size.width, size.height);
        }
    }
}
