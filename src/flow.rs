//! Flow control and application event loop.
//!
//! A "flow" is one demo scene: it builds its scene graph, names the assets it
//! needs and animates itself every frame. The engine owns everything else.
//!
//! # User-facing types
//!
//! - [`SceneFlow`] is the trait scenes implement
//! - [`Stage`] runs one flow without a window (also what tests drive)
//! - [`run`] opens a window and drives a [`Stage`] from the winit event loop
//!
//! # Lifecycle Flow
//!
//! `on_init` is called once; the returned requests are issued to the loader.
//! Then, each frame:
//! 1. Forward window events to the camera controller and the flow
//! 2. Apply every asset load that finished since the last frame (never waits)
//! 3. Call `on_update` on the flow
//! 4. Ease the camera and recompute world transforms
//! 5. Hand the scene graph and camera view to the renderer

use std::sync::Arc;

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    assets::{AssetRequest, ConfigError, dispatcher::AssetDispatcher},
    context::Context,
    render::{Renderer, TitleRenderer},
    resources::{AssetLoader, FsLoader, LoaderContext},
};

/// Trait for implementing a demo scene.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once; build the scene graph, configure the camera
///    and url remapping, and return the assets the scene needs
/// 2. `on_window_events()` is called for each winit window event
/// 3. `on_update()` is called every frame
pub trait SceneFlow {
    fn name(&self) -> &str;

    /// Build the scene and return the assets it needs.
    ///
    /// This is the only place to configure the loader context.
    fn on_init(
        &mut self,
        ctx: &mut Context,
        loader: &mut LoaderContext,
    ) -> anyhow::Result<Vec<AssetRequest>>;

    /// Update state every frame.
    ///
    /// Called every frame with the elapsed time `dt`. Use for animations.
    fn on_update(&mut self, ctx: &mut Context, dt: Duration);

    /// Handle window events. The camera controller has already seen the event.
    fn on_window_events(&mut self, _ctx: &mut Context, _event: &WindowEvent) {}
}

/// One running flow together with its context and pending asset loads.
pub struct Stage {
    flow: Box<dyn SceneFlow>,
    ctx: Context,
    dispatcher: AssetDispatcher,
}

impl Stage {
    /// Initialize `flow` and start loading the assets it asks for.
    pub fn new(
        mut flow: Box<dyn SceneFlow>,
        loader: Box<dyn AssetLoader>,
        mut loader_ctx: LoaderContext,
    ) -> anyhow::Result<Self> {
        let mut ctx = Context::new(flow.name());
        let requests = flow.on_init(&mut ctx, &mut loader_ctx)?;
        log::info!("'{}' requests {} asset(s)", flow.name(), requests.len());

        let mut dispatcher = AssetDispatcher::new(loader, loader_ctx);
        dispatcher.issue_all(&ctx.scene, requests)?;
        ctx.scene.update_world_transforms();
        Ok(Self {
            flow,
            ctx,
            dispatcher,
        })
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        self.ctx.camera.handle_window_events(event);
        self.flow.on_window_events(&mut self.ctx, event);
    }

    /// Advance one frame and render it.
    pub fn frame(&mut self, dt: Duration, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
        self.dispatcher.poll_completions(&mut self.ctx.scene)?;
        self.flow.on_update(&mut self.ctx, dt);
        self.ctx.camera.update();
        self.ctx.scene.update_world_transforms();
        let view = self.ctx.camera.view(self.ctx.far);
        renderer.render(&self.ctx.scene, &view)
    }

    /// Wait until every started load has been applied (or has failed).
    pub async fn settle(&mut self) -> Result<usize, ConfigError> {
        let applied = self.dispatcher.settle(&mut self.ctx.scene).await?;
        self.ctx.scene.update_world_transforms();
        Ok(applied)
    }

    pub fn name(&self) -> &str {
        self.flow.name()
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn dispatcher(&self) -> &AssetDispatcher {
        &self.dispatcher
    }
}

struct App {
    async_runtime: tokio::runtime::Runtime,
    // The flow waits here until the window exists.
    // We use Option to `take()` it after use.
    pending: Option<(Box<dyn SceneFlow>, LoaderContext)>,
    stage: Option<Stage>,
    renderer: Option<TitleRenderer>,
    window: Option<Arc<Window>>,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(
        async_runtime: tokio::runtime::Runtime,
        flow: Box<dyn SceneFlow>,
        loader_ctx: LoaderContext,
    ) -> Self {
        Self {
            async_runtime,
            pending: Some((flow, loader_ctx)),
            stage: None,
            renderer: None,
            window: None,
            last_time: Instant::now(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some((flow, loader_ctx)) = self.pending.take() else {
            return;
        };
        let title = flow.name().to_string();
        let window_attributes = Window::default_attributes().with_title(title.as_str());
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let loader = FsLoader::new(self.async_runtime.handle().clone());
        match Stage::new(flow, Box::new(loader), loader_ctx) {
            Ok(stage) => self.stage = Some(stage),
            Err(e) => return self.fail(event_loop, e),
        }
        self.renderer = Some(TitleRenderer::new(Some(window.clone()), &title));
        self.last_time = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let (Some(stage), Some(renderer)) = (&mut self.stage, &mut self.renderer) else {
            return;
        };
        stage.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                if let Err(e) = stage.frame(dt, renderer) {
                    return self.fail(event_loop, e);
                }
                // invoke main render loop
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Open a window and run `flow` until the window is closed.
///
/// Configuration errors raised by the flow end the loop and are returned.
pub fn run(flow: Box<dyn SceneFlow>, loader_ctx: LoaderContext) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let async_runtime = tokio::runtime::Runtime::new()?;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(async_runtime, flow, loader_ctx);

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
