use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use facade_render::cli::Cli;
use facade_render::config::ViewerConfig;
use facade_render::core::{Button, Controller, GpuContext, Overlay, OverlayInfo, SurfaceRenderer, WinitController};
use facade_render::export::{DirectorySink, ExportStatus, Exporter};
use facade_render::material::MaterialKind;
use facade_render::render::{RenderTarget, TargetSize};
use facade_render::scenes::create_facade_scene;
use facade_render::viewport::Viewport;

const MATERIAL_KINDS: [MaterialKind; 5] = [
    MaterialKind::OpaqueRough,
    MaterialKind::TransmissiveGlazing,
    MaterialKind::MetallicReflective,
    MaterialKind::OpaqueWood,
    MaterialKind::EmissiveAccent,
];

/// Export asked for from the UI. It runs after one frame showing the busy
/// label has been presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingExport {
    Idle,
    Requested,
    Presented,
}

// === Presentation ===

struct Presenter {
    window: Arc<Window>,
    renderer: SurfaceRenderer,
    overlay: Overlay,
}

impl Presenter {
    async fn new(window: Arc<Window>, show_ui: bool) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create window surface")?;

        let gpu = GpuContext::new_with_surface(&instance, &surface)
            .await
            .map_err(|e| anyhow!("GPU initialisation failed: {e}"))?;
        let gpu = Arc::new(gpu);

        let size = window.inner_size();
        let renderer = SurfaceRenderer::new(surface, gpu.clone(), size.width, size.height)
            .map_err(|e| anyhow!("surface setup failed: {e}"))?;
        let overlay = Overlay::new(&window, &gpu, renderer.surface_format(), show_ui);

        Ok(Self {
            window,
            renderer,
            overlay,
        })
    }
}

// === Application ===

struct App {
    config: ViewerConfig,
    show_ui: bool,
    presenter: Option<Presenter>,
    viewport: Viewport,
    input: WinitController,
    exporter: Exporter,
    sink: DirectorySink,
    pending_export: PendingExport,
    status: Option<String>,
}

impl App {
    fn new(config: ViewerConfig, show_ui: bool) -> Self {
        let size = TargetSize::new(config.window.width, config.window.height);
        let viewport = Viewport::new(create_facade_scene(), size, config.render.min_pixel_ratio);
        let exporter = Exporter::new(config.export.settings());
        let sink = DirectorySink::new(&config.export.output_dir);

        Self {
            config,
            show_ui,
            presenter: None,
            viewport,
            input: WinitController::new(),
            exporter,
            sink,
            pending_export: PendingExport::Idle,
            status: None,
        }
    }

    /// Match the render target to the window's logical size and clamped density
    fn sync_viewport_size(&mut self) {
        let Some(presenter) = &self.presenter else {
            return;
        };
        let scale = presenter.window.scale_factor();
        let logical = presenter.window.inner_size().to_logical::<f64>(scale);
        let size = TargetSize::new(logical.width.round() as u32, logical.height.round() as u32);
        self.viewport.resize(size, self.config.render.clamp_pixel_ratio(scale));
    }

    fn request_export(&mut self) {
        if self.exporter.is_busy() || self.pending_export != PendingExport::Idle {
            log::debug!("export already pending, ignoring trigger");
            return;
        }
        self.pending_export = PendingExport::Requested;
    }

    fn advance_export(&mut self) {
        match self.pending_export {
            PendingExport::Idle => {}
            PendingExport::Requested => self.pending_export = PendingExport::Presented,
            PendingExport::Presented => {
                self.pending_export = PendingExport::Idle;
                self.run_export();
            }
        }
    }

    fn run_export(&mut self) {
        let status = self.viewport.export(&self.exporter, &mut self.sink);
        self.status = Some(match &status {
            ExportStatus::Completed(report) => {
                let saved = self
                    .sink
                    .last_saved()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| report.filename.clone());
                format!("Saved {} ({}×{})", saved, report.width, report.height)
            }
            ExportStatus::Rejected => "Export already running".to_string(),
            ExportStatus::Failed(err) => format!("Export failed: {err}"),
        });
    }

    fn overlay_info(&self) -> OverlayInfo {
        let scene = self.viewport.scene();
        OverlayInfo {
            title: self.config.window.title.clone(),
            materials: MATERIAL_KINDS
                .iter()
                .map(|&kind| (kind, scene.count_by_kind(kind)))
                .collect(),
            busy: self.pending_export != PendingExport::Idle || self.exporter.is_busy(),
            status: self.status.clone(),
        }
    }

    fn apply_input(&mut self) {
        let (dx, dy) = self.input.drag_delta();
        if dx != 0.0 || dy != 0.0 {
            self.viewport.orbit(dx, dy);
        }
        let steps = self.input.scroll_steps();
        if steps != 0.0 {
            self.viewport.zoom(steps);
        }
        if self.input.was_pressed(Button::KeyP) {
            self.request_export();
        }
        self.input.reset_deltas();
    }

    fn redraw(&mut self) {
        self.apply_input();

        let rendered = if self.viewport.target().drawing_buffer_size().is_empty() {
            false
        } else {
            match self.viewport.frame() {
                Ok(rendered) => rendered,
                Err(e) => {
                    log::error!("render failed: {e}");
                    false
                }
            }
        };

        let info = self.overlay_info();
        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };

        if rendered {
            let target = self.viewport.target();
            if let Err(e) = presenter.renderer.upload(target.as_bytes(), target.drawing_buffer_size()) {
                log::error!("frame upload failed: {e}");
            }
        }

        let Presenter {
            window,
            renderer,
            overlay,
        } = presenter;
        let window = window.clone();

        let mut clicked = false;
        if let Err(e) = renderer.render(|gpu, encoder, view| {
            clicked = overlay.paint(&window, gpu, encoder, view, &info);
        }) {
            log::error!("present failed: {e}");
        }

        if clicked {
            self.request_export();
        }
        self.advance_export();

        if self.viewport.is_animating() || self.pending_export != PendingExport::Idle {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.presenter.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(self.config.window.width, self.config.window.height));
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(Presenter::new(window.clone(), self.show_ui)) {
            Ok(presenter) => self.presenter = Some(presenter),
            Err(e) => {
                log::error!("failed to initialise viewer: {e:#}");
                event_loop.exit();
                return;
            }
        }

        self.sync_viewport_size();
        window.request_redraw();
        log::info!("viewer ready: drag to orbit, scroll to zoom, P to export, Esc to quit");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Let egui handle the event first; button releases always reach the controller
        let consumed = match &mut self.presenter {
            Some(presenter) => presenter.overlay.handle_event(&presenter.window, &event),
            None => false,
        };
        let is_release = matches!(
            event,
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            }
        );
        if !consumed || is_release {
            self.input.process_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::Resized(size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.renderer.resize(size.width, size.height);
                }
                self.sync_viewport_size();
            }
            WindowEvent::ScaleFactorChanged { .. } => self.sync_viewport_size(),
            _ => {}
        }

        if self.input.was_pressed(Button::Escape) {
            event_loop.exit();
            return;
        }

        if !matches!(event, WindowEvent::RedrawRequested) {
            if let Some(presenter) = &self.presenter {
                presenter.window.request_redraw();
            }
        }
    }
}

/// Export once without a window
fn run_headless(config: &ViewerConfig) -> Result<()> {
    let size = TargetSize::new(config.window.width, config.window.height);
    let mut viewport = Viewport::new(create_facade_scene(), size, 1.0);
    let exporter = Exporter::new(config.export.settings());
    let mut sink = DirectorySink::new(&config.export.output_dir);

    match viewport.export(&exporter, &mut sink) {
        ExportStatus::Completed(_) => Ok(()),
        ExportStatus::Rejected => Err(anyhow!("export rejected")),
        ExportStatus::Failed(err) => Err(err).context("headless export failed"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ViewerConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    let config = cli.apply(config);
    config.validate().context("invalid configuration")?;

    if cli.headless {
        return run_headless(&config);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, !cli.no_ui);
    event_loop.run_app(&mut app)?;

    Ok(())
}
