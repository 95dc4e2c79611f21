//! flow-scenes
//!
//! Two demo scenes for an instancing-oriented engine: a 3DS model loaded with a
//! deferred texture remap, and primitive geometry lit by two directional lights.
//! Both scenes resolve their assets asynchronously and are navigated with a
//! hover (orbit) camera. The renderer itself is an external collaborator behind
//! the [`render::Renderer`] trait.
//!
//! High-level modules
//! - `assets`: request registry, async load dispatcher and material binding
//! - `camera`: hover controller driven by pointer drags and the mouse wheel
//! - `context`: per-run state owned by the frame loop (scene graph, camera)
//! - `data_structures`: scene graph arena, materials, textures and transforms
//! - `flow`: the frame loop and the winit application driver
//! - `resources`: loader collaborators (file system, 3DS parser, image decoding)
//! - `render`: the renderer contract and a summary renderer
//! - `scenes`: the two demo scenes
//!

pub mod assets;
pub mod camera;
pub mod cli;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod render;
pub mod resources;
pub mod scenes;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::WindowEvent;
