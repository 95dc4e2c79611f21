//! The renderer contract and the summary renderer.
//!
//! Rasterization lives outside this crate. A [`Renderer`] receives the scene
//! graph and the camera view once per frame. [`TitleRenderer`] is the stand-in
//! shipped with the demos: it reports what would be drawn in the window title
//! and the log.

use std::{fmt, sync::Arc};

use instant::{Duration, Instant};
use winit::window::Window;

use crate::{camera::CameraView, data_structures::scene_graph::SceneGraph};

/// Produces one frame from the scene graph and camera.
pub trait Renderer {
    fn render(&mut self, scene: &SceneGraph, camera: &CameraView) -> anyhow::Result<()>;
}

/// What a frame contains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub meshes: usize,
    pub shadow_casters: usize,
    pub lights: usize,
    /// Materials whose diffuse map is loaded (not the placeholder).
    pub textured_materials: usize,
    pub materials: usize,
    /// Triangles of loaded meshes. Primitives are tessellated by the renderer.
    pub loaded_triangles: usize,
}

impl SceneSummary {
    pub fn of(scene: &SceneGraph) -> Self {
        let mut summary = SceneSummary::default();
        for (_, mesh) in scene.meshes() {
            summary.meshes += 1;
            if mesh.casts_shadows {
                summary.shadow_casters += 1;
            }
            if let Some(source) = &mesh.source {
                summary.loaded_triangles += source.data.triangle_count();
            }
        }
        summary.lights = scene.lights().count();
        for (_, material) in scene.materials() {
            summary.materials += 1;
            if material.has_diffuse_map() {
                summary.textured_materials += 1;
            }
        }
        summary
    }
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} meshes ({} casting shadows), {} lights, {}/{} textured materials, {} loaded triangles",
            self.meshes,
            self.shadow_casters,
            self.lights,
            self.textured_materials,
            self.materials,
            self.loaded_triangles
        )
    }
}

/// Writes frame rate and scene statistics to the window title twice a second.
pub struct TitleRenderer {
    window: Option<Arc<Window>>,
    base_title: String,
    frame_count: u32,
    last_report: Instant,
    last_summary: Option<SceneSummary>,
}

impl TitleRenderer {
    const REPORT_INTERVAL: Duration = Duration::from_millis(500);

    /// Without a window the statistics only go to the log.
    pub fn new(window: Option<Arc<Window>>, base_title: &str) -> Self {
        Self {
            window,
            base_title: base_title.to_string(),
            frame_count: 0,
            last_report: Instant::now(),
            last_summary: None,
        }
    }

    pub fn last_summary(&self) -> Option<&SceneSummary> {
        self.last_summary.as_ref()
    }
}

impl Renderer for TitleRenderer {
    fn render(&mut self, scene: &SceneGraph, camera: &CameraView) -> anyhow::Result<()> {
        self.frame_count = self.frame_count.saturating_add(1);
        let summary = SceneSummary::of(scene);
        if self.last_summary != Some(summary) {
            log::info!("{}: {}", self.base_title, summary);
            self.last_summary = Some(summary);
        }

        let elapsed = self.last_report.elapsed();
        if elapsed >= Self::REPORT_INTERVAL {
            let fps = self.frame_count as f32 / elapsed.as_secs_f32();
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "{} - {:.1} fps, {} - eye ({:.0}, {:.0}, {:.0})",
                    self.base_title, fps, summary, camera.eye.x, camera.eye.y, camera.eye.z
                ));
            }
            self.frame_count = 0;
            self.last_report = Instant::now();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::{
        material::Material,
        model::Geometry,
        scene_graph::{DirectionalLight, MeshNode, Node},
        texture::Texture,
    };

    #[test]
    fn summary_counts_scene_contents() {
        let mut scene = SceneGraph::new();
        scene.add_child(
            scene.root(),
            Node::light("light", DirectionalLight::new(cgmath::Vector3::new(0.0, -1.0, 0.0))),
        );
        let placeholder = scene.add_material(Material::new(
            "plain",
            Arc::new(Texture::create_placeholder(8)),
        ));
        scene.add_child(
            scene.root(),
            Node::mesh(
                "ground",
                MeshNode::new(Geometry::Plane { width: 1000.0, height: 1000.0 }, placeholder)
                    .with_shadows(false),
            ),
        );
        let summary = SceneSummary::of(&scene);
        assert_eq!(summary.meshes, 1);
        assert_eq!(summary.shadow_casters, 0);
        assert_eq!(summary.lights, 1);
        assert_eq!((summary.textured_materials, summary.materials), (0, 1));
    }

    #[test]
    fn headless_title_renderer_records_summary() {
        let scene = SceneGraph::new();
        let mut renderer = TitleRenderer::new(None, "test");
        let view = CameraView {
            eye: cgmath::Point3::new(0.0, 0.0, 1.0),
            target: cgmath::Point3::new(0.0, 0.0, 0.0),
            far: 100.0,
        };
        renderer.render(&scene, &view).unwrap();
        assert_eq!(renderer.last_summary(), Some(&SceneSummary::default()));
    }
}
