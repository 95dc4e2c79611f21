use crate::{
    assets::{AssetKind, Role, Target},
    data_structures::scene_graph::NodeId,
};

/// A scene was wired incorrectly.
///
/// These errors point at a bug in the scene setup, not at the environment, so
/// they are never recovered from: the frame loop stops when it sees one.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown asset role `{0}`")]
    UnknownRole(String),
    #[error("the `mesh` role needs a light and shadow quality settings")]
    MissingShadowSetup,
    #[error("a {role} request cannot target {target:?}")]
    InvalidTarget { role: Role, target: Target },
    #[error("{0:?} does not exist in the scene graph")]
    UnknownTarget(Target),
    #[error("shadow light {0:?} is not a light node")]
    NotALight(NodeId),
    #[error("`{locator}` resolved to a {found:?} asset but was requested as {role}")]
    PayloadMismatch {
        locator: String,
        role: Role,
        found: AssetKind,
    },
}
