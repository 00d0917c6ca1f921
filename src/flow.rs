//! Application shell and event loop.
//!
//! [`App`] is the winit [`ApplicationHandler`] that ties the scene together.
//! It creates the window (or binds the page canvas on the web), builds the
//! GPU context and the renderer, starts the asset loads and drives the
//! [`RenderLoop`] from `RedrawRequested`.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and initialises [`AppState`]; natively
//!    by blocking on the tokio runtime, on the web through `spawn_local` and
//!    a [`SceneEvent::Initialized`] user event
//! 2. the render loop starts and requests the first frame
//! 3. every `RedrawRequested` polls the asset slots, then ticks the loop
//! 4. resize, scale factor, pointer and keyboard events update the state in
//!    between frames

use std::{fmt::Debug, iter, sync::Arc};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::Key,
    window::Window,
};

use crate::{
    assets::{self, AssetSlot, LoadState, Spawner},
    config::SceneConfig,
    context::Context,
    data_structures::{scene_graph::ModelNode, texture::Texture},
    debug_panel::{self, ControlValue, DebugPanel},
    error::SceneError,
    fireflies::FireflyField,
    frame_loop::{Clock, FrameTarget, RenderLoop, SystemClock},
    render::SceneRenderer,
    settings::{Colour, DEFAULT_CLEAR_COLOUR, Settings},
};

/// Clear colours cycled through by the `B` key.
const CLEAR_COLOUR_PRESETS: [Colour; 4] = [
    DEFAULT_CLEAR_COLOUR,
    Colour::rgb(0x0b, 0x10, 0x1f),
    Colour::BLACK,
    Colour::WHITE,
];

/// Step of the `[` and `]` keys.
const FIREFLY_SIZE_STEP: f32 = 10.0;

/// Everything that exists once the surface is up.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    pub renderer: SceneRenderer,
    pub settings: Settings,
    panel: Option<DebugPanel>,
    model: AssetSlot<ModelNode>,
    baked_texture: AssetSlot<Texture>,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(
        window: Arc<Window>,
        config: SceneConfig,
        spawner: Spawner,
        started: std::time::Duration,
    ) -> Result<Self, SceneError> {
        let ctx = Context::new(window, &config).await?;
        let mut settings = Settings::default();
        settings.set_show_stats(config.stats);

        let field = FireflyField::random(config.firefly_count);
        let renderer = SceneRenderer::new(
            &ctx.device,
            &ctx.queue,
            ctx.config.format,
            &field,
            &settings,
            &ctx.viewport,
            &config.camera,
        );

        log::info!(
            "loading {} and {} (decoder directory {})",
            config.model_path,
            config.texture_path,
            config.decoder_path
        );
        let model = assets::load_model(
            &spawner,
            &ctx.device,
            &config.model_path,
            started,
            config.load_timeout,
        );
        let baked_texture = assets::load_baked_texture(
            &spawner,
            &ctx.device,
            &ctx.queue,
            &config.texture_path,
            started,
            config.load_timeout,
        );

        let is_surface_configured = !ctx.viewport.is_empty();
        Ok(Self {
            ctx,
            renderer,
            settings,
            panel: config.debug_panel.then(DebugPanel::new),
            model,
            baked_texture,
            is_surface_configured,
        })
    }

    pub fn model(&self) -> Option<&ModelNode> {
        self.model.get()
    }

    fn resize(&mut self, physical: winit::dpi::PhysicalSize<u32>, scale_factor: f64) {
        if self.ctx.resize(physical, scale_factor) {
            self.is_surface_configured = true;
            self.renderer.resize(&self.ctx.viewport);
        }
    }

    /// Moves finished loads into the scene.
    fn poll_assets(&mut self, now: std::time::Duration) {
        self.model.poll(now);
        if self.baked_texture.poll(now) {
            if let LoadState::Bound(texture) = self.baked_texture.state() {
                self.renderer.set_baked_texture(&self.ctx.device, texture);
            }
        }
    }

    /// Applies a debug panel shortcut. Returns `true` if the key was bound.
    fn handle_key(&mut self, key: &Key) -> bool {
        let Some(panel) = &self.panel else {
            return false;
        };
        let Key::Character(text) = key else {
            return false;
        };
        let settings = &mut self.settings;
        let edited = match text.to_lowercase().as_str() {
            "]" => panel.nudge(settings, debug_panel::FIREFLY_SIZE, FIREFLY_SIZE_STEP),
            "[" => panel.nudge(settings, debug_panel::FIREFLY_SIZE, -FIREFLY_SIZE_STEP),
            "g" => {
                let start = settings.portal_colour_start();
                let end = settings.portal_colour_end();
                panel
                    .edit(settings, debug_panel::PORTAL_COLOUR_START, ControlValue::Colour(end))
                    .and_then(|_| {
                        panel.edit(settings, debug_panel::PORTAL_COLOUR_END, ControlValue::Colour(start))
                    })
            }
            "b" => {
                let current = settings.clear_colour();
                let next = CLEAR_COLOUR_PRESETS
                    .iter()
                    .position(|c| *c == current)
                    .map_or(0, |i| (i + 1) % CLEAR_COLOUR_PRESETS.len());
                panel.edit(
                    settings,
                    debug_panel::CLEAR_COLOUR,
                    ControlValue::Colour(CLEAR_COLOUR_PRESETS[next]),
                )
            }
            "f" => {
                settings.set_show_stats(!settings.show_stats());
                log::info!("stats overlay {}", if settings.show_stats() { "on" } else { "off" });
                return true;
            }
            "h" => {
                panel.log_values(settings);
                return true;
            }
            _ => return false,
        };
        if let Err(e) = edited {
            log::warn!("{}", e);
        }
        true
    }
}

impl FrameTarget for AppState {
    type Error = wgpu::CurrentSurfaceTexture;

    fn write_time(&mut self, elapsed: f32) {
        self.renderer
            .write_time(&self.ctx.queue, elapsed, &self.settings, &self.ctx.viewport);
    }

    fn update_controls(&mut self) {
        self.renderer.update_camera(&self.ctx.queue);
    }

    fn render(&mut self) -> Result<(), Self::Error> {
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(texture)
            | wgpu::CurrentSurfaceTexture::Suboptimal(texture) => texture,
            other => return Err(other),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.renderer.encode(
            &mut encoder,
            &view,
            self.ctx.depth_view(),
            self.settings.clear_colour().to_wgpu(),
            self.model.get(),
        );
        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub(crate) enum SceneEvent {
    #[allow(dead_code)]
    Initialized(Box<AppState>),
    #[allow(dead_code)]
    Failed(SceneError),
}

impl Debug for SceneEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<SceneEvent>,
    config: SceneConfig,
    state: Option<AppState>,
    render_loop: RenderLoop<SystemClock>,
    initialising: bool,
}

impl App {
    fn new(event_loop: &EventLoop<SceneEvent>, config: SceneConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        let mut render_loop = RenderLoop::new(SystemClock::new());
        render_loop.set_stats_enabled(config.stats);
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            state: None,
            render_loop,
            initialising: false,
        })
    }

    fn spawner(&self) -> Spawner {
        #[cfg(not(target_arch = "wasm32"))]
        {
            Spawner::new(self.async_runtime.handle().clone())
        }
        #[cfg(target_arch = "wasm32")]
        {
            Spawner::new()
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SceneError) {
        log::error!("{}", error);
        if error.is_fatal() {
            self.state = None;
            event_loop.exit();
        }
    }

    fn on_initialized(&mut self, mut app_state: AppState) {
        let window = app_state.ctx.window.clone();
        // The size may have changed while the device was requested
        app_state.resize(window.inner_size(), window.scale_factor());
        self.state = Some(app_state);
        self.render_loop.start(&*window);
    }
}

impl ApplicationHandler<SceneEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.initialising {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Portal");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| {
                    document
                        .query_selector(&self.config.canvas_selector)
                        .ok()
                        .flatten()
                })
                .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok());
            match canvas {
                Some(canvas) => window_attributes = window_attributes.with_canvas(Some(canvas)),
                None => {
                    let selector = self.config.canvas_selector.clone();
                    self.fail(event_loop, SceneError::Surface(format!("no canvas matches `{selector}`")));
                    return;
                }
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, SceneError::Surface(e.to_string()));
                return;
            }
        };

        let started = self.render_loop.clock().elapsed();
        let init_future = AppState::new(window, self.config.clone(), self.spawner(), started);
        self.initialising = true;

        #[cfg(not(target_arch = "wasm32"))]
        {
            let result = self.async_runtime.block_on(init_future);
            self.initialising = false;
            match result {
                Ok(app_state) => self.on_initialized(app_state),
                Err(e) => self.fail(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok(app_state) => SceneEvent::Initialized(Box::new(app_state)),
                    Err(e) => SceneEvent::Failed(e),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("the event loop closed before the scene was initialised");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: SceneEvent) {
        self.initialising = false;
        match event {
            // This is the message from our wasm `spawn_local`
            SceneEvent::Initialized(app_state) => self.on_initialized(*app_state),
            SceneEvent::Failed(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if state.renderer.camera.controller.handle_window_events(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let scale_factor = state.ctx.window.scale_factor();
                state.resize(size, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = state.ctx.window.inner_size();
                state.resize(size, scale_factor);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if state.handle_key(&logical_key) {
                    self.render_loop
                        .set_stats_enabled(state.settings.show_stats());
                }
            }
            WindowEvent::RedrawRequested => {
                state.poll_assets(self.render_loop.clock().elapsed());
                let window = state.ctx.window.clone();
                match self.render_loop.tick(&mut *state, &*window) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated) => {
                        state.ctx.reconfigure();
                    }
                    Err(e) => {
                        log::error!("Unable to render {:?}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Opens the scene and runs it until the window closes.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {}", e).into());
        }
    }

    let event_loop: EventLoop<SceneEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    #[cfg(not(target_arch = "wasm32"))]
    event_loop.run_app(&mut app)?;

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::EventLoopExtWebSys;
        event_loop.spawn_app(app);
    }

    Ok(())
}
