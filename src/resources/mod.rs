use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use futures::{FutureExt, future::BoxFuture};

use crate::{assets::ResolvedAsset, resources::texture::load_texture};

/**
 * This module contains all logic for loading meshes/textures/etc. from external files.
 */
pub mod max3ds;
pub mod texture;

/// A load started by an [`AssetLoader`]. It resolves exactly once.
pub type LoadFuture = BoxFuture<'static, LoadNotification>;

/// Outcome of loading one locator.
#[derive(Debug)]
pub enum LoadNotification {
    /// Everything the locator produced: one texture, or every mesh of a model file.
    Loaded {
        locator: String,
        assets: Vec<ResolvedAsset>,
    },
    Failed {
        locator: String,
        error: anyhow::Error,
    },
}

impl LoadNotification {
    pub fn from_result(locator: &str, result: anyhow::Result<Vec<ResolvedAsset>>) -> Self {
        let locator = locator.to_string();
        match result {
            Ok(assets) => LoadNotification::Loaded { locator, assets },
            Err(error) => LoadNotification::Failed { locator, error },
        }
    }

    pub fn locator(&self) -> &str {
        match self {
            LoadNotification::Loaded { locator, .. } | LoadNotification::Failed { locator, .. } => {
                locator
            }
        }
    }
}

/// Something that can turn a locator into assets.
pub trait AssetLoader {
    fn load(&self, locator: &str, context: &LoaderContext) -> LoadFuture;
}

/// Where assets are read from and how locators are remapped on the way.
#[derive(Clone, Debug, PartialEq)]
pub struct LoaderContext {
    base_path: PathBuf,
    url_map: HashMap<String, String>,
}

impl LoaderContext {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            url_map: HashMap::new(),
        }
    }

    /// Load `to` whenever `from` is requested, including texture references
    /// found inside model files.
    pub fn map_url(&mut self, from: &str, to: &str) {
        self.url_map.insert(from.to_string(), to.to_string());
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// The url a locator is actually loaded from.
    ///
    /// Model files often store texture names in upper case, so a lower case
    /// mapping matches as well.
    pub fn resolve_url<'a>(&'a self, locator: &'a str) -> &'a str {
        self.url_map
            .get(locator)
            .or_else(|| self.url_map.get(&locator.to_ascii_lowercase()))
            .map(String::as_str)
            .unwrap_or(locator)
    }

    pub fn path_for(&self, locator: &str) -> PathBuf {
        self.base_path.join(self.resolve_url(locator))
    }
}

impl Default for LoaderContext {
    fn default() -> Self {
        Self::new(Path::new("./").join("assets"))
    }
}

/// Loads assets from the file system on a tokio runtime.
///
/// Each load runs as its own task; the returned future only waits for the task,
/// so it can be polled from the frame loop without blocking.
#[derive(Clone, Debug)]
pub struct FsLoader {
    runtime: tokio::runtime::Handle,
}

impl FsLoader {
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self { runtime }
    }
}

impl AssetLoader for FsLoader {
    fn load(&self, locator: &str, context: &LoaderContext) -> LoadFuture {
        let locator = locator.to_string();
        let context = context.clone();
        let task = {
            let locator = locator.clone();
            self.runtime
                .spawn(async move { load_asset(&locator, &context).await })
        };
        async move {
            match task.await {
                Ok(result) => LoadNotification::from_result(&locator, result),
                Err(join_error) => LoadNotification::Failed {
                    locator,
                    error: anyhow::anyhow!("load task did not finish: {}", join_error),
                },
            }
        }
        .boxed()
    }
}

/// Load `locator`, picking the decoder from its (remapped) file extension.
pub async fn load_asset(
    locator: &str,
    context: &LoaderContext,
) -> anyhow::Result<Vec<ResolvedAsset>> {
    let extension = extension_of(context.resolve_url(locator));
    match extension.as_deref() {
        Some("3ds") => max3ds::load_model(locator, context).await,
        Some("jpg" | "jpeg" | "png" | "bmp") => {
            let texture = load_texture(locator, context).await?;
            Ok(vec![ResolvedAsset::texture(locator, texture)])
        }
        _ => bail!("'{}' is neither a 3DS model nor a supported image", locator),
    }
}

pub(crate) fn extension_of(url: &str) -> Option<String> {
    Path::new(url)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("could not read {}", path.display()))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_remapped() {
        let mut context = LoaderContext::new("assets");
        context.map_url("texture.jpg", "soldier_ant.jpg");
        assert_eq!(context.resolve_url("texture.jpg"), "soldier_ant.jpg");
        assert_eq!(context.resolve_url("TEXTURE.JPG"), "soldier_ant.jpg");
        assert_eq!(context.resolve_url("other.jpg"), "other.jpg");
        assert_eq!(context.path_for("texture.jpg"), Path::new("assets").join("soldier_ant.jpg"));
    }

    #[test]
    fn default_root_is_assets_dir() {
        assert_eq!(LoaderContext::default().base_path(), Path::new("./assets"));
    }

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(extension_of("SOLDIER.3DS").as_deref(), Some("3ds"));
        assert_eq!(extension_of("noext"), None);
    }

    #[tokio::test]
    async fn missing_file_fails_the_load() {
        let context = LoaderContext::new("does/not/exist");
        let loader = FsLoader::new(tokio::runtime::Handle::current());
        let notification = loader.load("floor_diffuse.jpg", &context).await;
        assert!(matches!(notification, LoadNotification::Failed { ref locator, .. } if locator == "floor_diffuse.jpg"));
    }

    #[tokio::test]
    async fn unsupported_extension_fails() {
        let result = load_asset("readme.txt", &LoaderContext::default()).await;
        assert!(result.is_err());
    }
}
