// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::{resources::LoaderContext, scenes::SceneKind};

#[derive(Parser, Debug, Clone)]
#[command(name = "flow-scenes")]
#[command(about = "Asset loading and hover camera demo scenes", long_about = None)]
pub struct Cli {
    /// Scene to run
    #[arg(long, value_enum, default_value = "shading")]
    pub scene: SceneKind,

    /// Directory the scene's assets are loaded from
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,
}

impl Cli {
    pub fn loader_context(&self) -> LoaderContext {
        LoaderContext::new(&self.assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_shading() {
        let cli = Cli::parse_from(["flow-scenes"]);
        assert_eq!(cli.scene, SceneKind::Shading);
        assert_eq!(cli.assets, PathBuf::from("assets"));
    }

    #[test]
    fn parses_scene_and_assets() {
        let cli = Cli::parse_from(["flow-scenes", "--scene", "load-3ds", "--assets", "demo/assets"]);
        assert_eq!(cli.scene, SceneKind::Load3ds);
        assert_eq!(cli.loader_context().base_path(), std::path::Path::new("demo/assets"));
    }

    #[test]
    fn rejects_unknown_scene() {
        assert!(Cli::try_parse_from(["flow-scenes", "--scene", "terrain"]).is_err());
    }
}
