//! The demo scenes.

use clap::ValueEnum;

use crate::flow::SceneFlow;

pub mod load_3ds;
pub mod shading;

pub use load_3ds::Load3ds;
pub use shading::Shading;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// A 3DS model on a shadow receiving ground plane
    #[value(name = "load-3ds")]
    Load3ds,
    /// Textured primitives lit by two directional lights
    Shading,
}

pub fn create(kind: SceneKind) -> Box<dyn SceneFlow> {
    match kind {
        SceneKind::Load3ds => Box::new(Load3ds::new()),
        SceneKind::Shading => Box::new(Shading::new()),
    }
}
