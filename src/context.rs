use crate::{camera::HoverController, data_structures::scene_graph::SceneGraph};

/// Everything a scene owns while it runs.
///
/// The frame loop hands the context to the scene in every lifecycle hook. The
/// scene builds its graph and configures the camera in `on_init` and animates
/// both afterwards.
#[derive(Debug)]
pub struct Context {
    pub scene: SceneGraph,
    pub camera: HoverController,
    /// Far clipping plane distance.
    pub far: f32,
    pub title: String,
}

impl Context {
    pub const DEFAULT_FAR: f32 = 3000.0;

    pub fn new(title: &str) -> Self {
        Self {
            scene: SceneGraph::new(),
            camera: HoverController::new(0.0, 0.0, 1000.0),
            far: Self::DEFAULT_FAR,
            title: title.to_string(),
        }
    }
}
