//! Issues loads and routes their completions to the binding applier.

use std::collections::{HashMap, HashSet};

use futures::{FutureExt, StreamExt, stream::FuturesUnordered};
use log::{error, info, warn};

use crate::{
    assets::{
        AssetRequest, ConfigError, ResolvedAsset, binding,
        registry::{AssetRegistry, Binding},
    },
    data_structures::scene_graph::SceneGraph,
    resources::{AssetLoader, LoadFuture, LoadNotification, LoaderContext},
};

/// Owns the pending requests of one scene and the loads started for them.
///
/// Every distinct locator is handed to the loader once. Completions are
/// processed on the caller's thread, either by polling once per frame with
/// [`AssetDispatcher::poll_completions`] or by pushing notifications in with
/// [`AssetDispatcher::on_resolved`], [`AssetDispatcher::on_loaded`] and
/// [`AssetDispatcher::on_failed`].
pub struct AssetDispatcher {
    loader: Box<dyn AssetLoader>,
    context: LoaderContext,
    registry: AssetRegistry,
    in_flight: FuturesUnordered<LoadFuture>,
    failed: HashSet<String>,
}

impl AssetDispatcher {
    pub fn new(loader: Box<dyn AssetLoader>, context: LoaderContext) -> Self {
        Self {
            loader,
            context,
            registry: AssetRegistry::new(),
            in_flight: FuturesUnordered::new(),
            failed: HashSet::new(),
        }
    }

    pub fn context(&self) -> &LoaderContext {
        &self.context
    }

    /// Register `request` and start loading its locator if nobody asked for it yet.
    ///
    /// The target is checked against `scene` first; a request that could never be
    /// applied is a configuration error.
    pub fn issue(&mut self, scene: &SceneGraph, request: AssetRequest) -> Result<(), ConfigError> {
        binding::validate(scene, request.target, request.role)?;
        let locator = request.locator.clone();
        if self.registry.register(request) {
            info!("Loading '{}'", locator);
            self.in_flight.push(self.loader.load(&locator, &self.context));
        }
        Ok(())
    }

    pub fn issue_all(
        &mut self,
        scene: &SceneGraph,
        requests: impl IntoIterator<Item = AssetRequest>,
    ) -> Result<(), ConfigError> {
        for request in requests {
            self.issue(scene, request)?;
        }
        Ok(())
    }

    /// Process every load that has finished, without waiting for the rest.
    ///
    /// Returns the number of assets applied to the scene.
    pub fn poll_completions(&mut self, scene: &mut SceneGraph) -> Result<usize, ConfigError> {
        let mut applied = 0;
        while let Some(Some(notification)) = self.in_flight.next().now_or_never() {
            applied += self.handle(scene, notification)?;
        }
        Ok(applied)
    }

    /// Wait for every in-flight load and process it.
    pub async fn settle(&mut self, scene: &mut SceneGraph) -> Result<usize, ConfigError> {
        let mut applied = 0;
        while let Some(notification) = self.in_flight.next().await {
            applied += self.handle(scene, notification)?;
        }
        Ok(applied)
    }

    pub fn handle(
        &mut self,
        scene: &mut SceneGraph,
        notification: LoadNotification,
    ) -> Result<usize, ConfigError> {
        match notification {
            LoadNotification::Loaded { locator, assets } => {
                info!("Loaded '{}' ({} asset(s))", locator, assets.len());
                self.on_loaded(scene, &locator, assets)
            }
            LoadNotification::Failed { locator, error } => {
                self.on_failed(&locator, &error);
                Ok(0)
            }
        }
    }

    /// A single asset arrived.
    pub fn on_resolved(
        &mut self,
        scene: &mut SceneGraph,
        asset: ResolvedAsset,
    ) -> Result<usize, ConfigError> {
        self.on_batch(scene, vec![asset])
    }

    /// All assets produced by loading `locator` arrived together.
    ///
    /// Assets tagged with a different locator are routed by their own tag. An empty
    /// batch satisfies nothing, so the requests for `locator` stay pending.
    pub fn on_loaded(
        &mut self,
        scene: &mut SceneGraph,
        locator: &str,
        assets: Vec<ResolvedAsset>,
    ) -> Result<usize, ConfigError> {
        if assets.is_empty() {
            warn!("Loading '{}' produced no assets", locator);
        }
        self.on_batch(scene, assets)
    }

    /// Apply a batch of assets to every request waiting for their locators.
    ///
    /// A request is satisfied by the batch that carries its locator: every asset
    /// in that batch whose kind fits the request's role is applied, then the
    /// request is removed. Assets nobody is waiting for are logged and dropped.
    pub fn on_batch(
        &mut self,
        scene: &mut SceneGraph,
        assets: Vec<ResolvedAsset>,
    ) -> Result<usize, ConfigError> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<ResolvedAsset>> = HashMap::new();
        for asset in assets {
            if !groups.contains_key(&asset.locator) {
                order.push(asset.locator.clone());
            }
            groups.entry(asset.locator.clone()).or_default().push(asset);
        }

        let mut applied = 0;
        for locator in order {
            let Some(group) = groups.remove(&locator) else {
                continue;
            };
            if !self.registry.contains(&locator) {
                for asset in &group {
                    warn!(
                        "Discarding '{}' loaded from '{}': no pending request matches it",
                        asset.name(),
                        locator
                    );
                }
                continue;
            }
            for Binding { role, target } in self.registry.take(&locator) {
                let mut fitting = group.iter().filter(|asset| role.accepts(asset.kind())).peekable();
                if fitting.peek().is_none() {
                    return Err(ConfigError::PayloadMismatch {
                        locator,
                        role,
                        found: group[0].kind(),
                    });
                }
                for asset in fitting {
                    binding::apply(scene, target, role, asset)?;
                    applied += 1;
                }
            }
            self.failed.remove(&locator);
        }
        Ok(applied)
    }

    /// A load failed. The requests for `locator` stay pending; nothing is retried.
    pub fn on_failed(&mut self, locator: &str, error: &anyhow::Error) {
        error!("Failed to load '{}': {:#}", locator, error);
        self.failed.insert(locator.to_string());
    }

    /// Number of requests still waiting for an asset.
    pub fn pending(&self) -> usize {
        self.registry.len()
    }

    /// Number of loads that have not reported back yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// No load is running any more. Failed requests may still be pending.
    pub fn is_settled(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(String::as_str)
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }
}
