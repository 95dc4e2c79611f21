#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use flow_scenes::{
    assets::ResolvedAsset,
    camera::CameraView,
    data_structures::{
        model::{MaterialAsset, MeshAsset, MeshData},
        scene_graph::SceneGraph,
        texture::Texture,
    },
    render::{Renderer, SceneSummary},
    resources::{AssetLoader, LoadFuture, LoadNotification, LoaderContext},
};
use futures::{FutureExt, channel::oneshot};

/// A 1x1 texture named after `locator`, with a colour derived from the name.
pub(crate) fn texture(locator: &str) -> Texture {
    let shade = locator.bytes().fold(0u8, |acc, b| acc.wrapping_add(b));
    Texture {
        name: locator.to_string(),
        width: 1,
        height: 1,
        rgba: vec![shade, shade, shade, 255],
    }
}

pub(crate) fn texture_asset(locator: &str) -> ResolvedAsset {
    ResolvedAsset::texture(locator, texture(locator))
}

/// A one-triangle mesh as a 3DS file would produce it.
pub(crate) fn mesh_asset(locator: &str, name: &str, texture_name: Option<&str>) -> ResolvedAsset {
    ResolvedAsset::mesh(
        locator,
        MeshAsset {
            name: name.to_string(),
            data: Arc::new(MeshData {
                positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                tex_coords: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
                indices: vec![0, 2, 1],
            }),
            material: Some(MaterialAsset {
                name: format!("{name}_material"),
                texture: texture_name.map(|name| Arc::new(texture(name))),
            }),
        },
    )
}

/// Resolves every load immediately from a fixed table; unknown locators fail.
#[derive(Default)]
pub(crate) struct MockLoader {
    assets: HashMap<String, Vec<ResolvedAsset>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockLoader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_texture(self, locator: &str) -> Self {
        self.with_assets(locator, vec![texture_asset(locator)])
    }

    pub(crate) fn with_textures(self, locators: &[&str]) -> Self {
        locators
            .iter()
            .fold(self, |loader, locator| loader.with_texture(locator))
    }

    pub(crate) fn with_assets(mut self, locator: &str, assets: Vec<ResolvedAsset>) -> Self {
        self.assets.insert(locator.to_string(), assets);
        self
    }

    /// Every locator `load` was called with, in call order.
    pub(crate) fn requested(&self) -> Arc<Mutex<Vec<String>>> {
        self.requested.clone()
    }
}

impl AssetLoader for MockLoader {
    fn load(&self, locator: &str, _context: &LoaderContext) -> LoadFuture {
        self.requested.lock().unwrap().push(locator.to_string());
        let notification = match self.assets.get(locator) {
            Some(assets) => LoadNotification::Loaded {
                locator: locator.to_string(),
                assets: assets.clone(),
            },
            None => LoadNotification::Failed {
                locator: locator.to_string(),
                error: anyhow::anyhow!("no such asset: {}", locator),
            },
        };
        futures::future::ready(notification).boxed()
    }
}

/// Loads only complete when the test calls [`DeferredLoader::complete`].
#[derive(Clone, Default)]
pub(crate) struct DeferredLoader {
    senders: Arc<Mutex<HashMap<String, oneshot::Sender<LoadNotification>>>>,
}

impl DeferredLoader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Finish the load of `notification.locator()`. Returns `false` if no such load is waiting.
    pub(crate) fn complete(&self, notification: LoadNotification) -> bool {
        let sender = self.senders.lock().unwrap().remove(notification.locator());
        match sender {
            Some(sender) => sender.send(notification).is_ok(),
            None => false,
        }
    }

    pub(crate) fn complete_texture(&self, locator: &str) -> bool {
        self.complete(LoadNotification::Loaded {
            locator: locator.to_string(),
            assets: vec![texture_asset(locator)],
        })
    }

    pub(crate) fn waiting(&self) -> Vec<String> {
        let mut locators: Vec<String> = self.senders.lock().unwrap().keys().cloned().collect();
        locators.sort();
        locators
    }
}

impl AssetLoader for DeferredLoader {
    fn load(&self, locator: &str, _context: &LoaderContext) -> LoadFuture {
        let (sender, receiver) = oneshot::channel();
        self.senders
            .lock()
            .unwrap()
            .insert(locator.to_string(), sender);
        let locator = locator.to_string();
        async move {
            receiver
                .await
                .unwrap_or_else(|_| LoadNotification::Failed {
                    locator,
                    error: anyhow::anyhow!("load was dropped"),
                })
        }
        .boxed()
    }
}

/// Keeps what every frame would have shown.
#[derive(Default)]
pub(crate) struct RecordingRenderer {
    pub(crate) frames: Vec<(SceneSummary, CameraView)>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, scene: &SceneGraph, camera: &CameraView) -> anyhow::Result<()> {
        self.frames.push((SceneSummary::of(scene), *camera));
        Ok(())
    }
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}
