use winit::event::WindowEvent;
use winit::window::Window;

use super::gpu_context::GpuContext;
use crate::material::MaterialKind;

pub const EXPORT_LABEL: &str = "Export 8K PNG";
pub const EXPORT_BUSY_LABEL: &str = "Rendering 8K…";

/// What the overlay shows on a given frame
#[derive(Debug, Clone, Default)]
pub struct OverlayInfo {
    pub title: String,
    /// Material categories and how many primitives use each
    pub materials: Vec<(MaterialKind, usize)>,
    /// An export is queued or running; the button is disabled
    pub busy: bool,
    /// Outcome of the last export
    pub status: Option<String>,
}

/// egui title card and export button drawn over the presented frame
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    visible: bool,
}

impl Overlay {
    pub fn new(window: &Window, gpu: &GpuContext, format: wgpu::TextureFormat, visible: bool) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.max_texture_dimension() as usize),
        );
        let renderer = egui_wgpu::Renderer::new(gpu.device(), format, egui_wgpu::RendererOptions::default());

        Self {
            ctx,
            state,
            renderer,
            visible,
        }
    }

    /// Returns true when egui consumed the event
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.visible && self.state.on_window_event(window, event).consumed
    }

    /// Record the overlay into `encoder`. Returns whether the export button was clicked.
    pub fn paint(
        &mut self,
        window: &Window,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        info: &OverlayInfo,
    ) -> bool {
        if !self.visible {
            return false;
        }

        let mut clicked = false;
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| {
            clicked = Self::build_ui(ctx, info);
        });

        self.state.handle_platform_output(window, full_output.platform_output);

        let tris = self.ctx.tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(gpu.device(), gpu.queue(), *id, image_delta);
        }

        let size = window.inner_size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        self.renderer
            .update_buffers(gpu.device(), gpu.queue(), encoder, &tris, &screen_descriptor);

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        clicked
    }

    fn build_ui(ctx: &egui::Context, info: &OverlayInfo) -> bool {
        let mut clicked = false;

        egui::Window::new(info.title.as_str())
            .anchor(egui::Align2::LEFT_TOP, [12.0, 12.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                for (kind, count) in &info.materials {
                    ui.label(format!("{} × {}", material_label(*kind), count));
                }
                ui.separator();
                ui.label(
                    egui::RichText::new("Drag to orbit, scroll to zoom")
                        .size(11.0)
                        .color(egui::Color32::GRAY),
                );
            });

        egui::Window::new("export")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
            .show(ctx, |ui| {
                let label = if info.busy { EXPORT_BUSY_LABEL } else { EXPORT_LABEL };
                clicked = ui.add_enabled(!info.busy, egui::Button::new(label)).clicked();
                if let Some(status) = &info.status {
                    ui.label(egui::RichText::new(status).size(11.0));
                }
            });

        clicked
    }
}

pub fn material_label(kind: MaterialKind) -> &'static str {
    match kind {
        MaterialKind::OpaqueRough => "Concrete",
        MaterialKind::TransmissiveGlazing => "Glazing",
        MaterialKind::MetallicReflective => "Metal",
        MaterialKind::OpaqueWood => "Timber",
        MaterialKind::EmissiveAccent => "LED accent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(info: &OverlayInfo) -> bool {
        let ctx = egui::Context::default();
        let mut clicked = false;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            clicked = Overlay::build_ui(ctx, info);
        });
        clicked
    }

    #[test]
    fn test_build_ui_without_input_does_not_click() {
        let info = OverlayInfo {
            title: "Facade".to_string(),
            materials: vec![(MaterialKind::OpaqueRough, 4)],
            busy: false,
            status: Some("saved".to_string()),
        };
        assert!(!run(&info));
        assert!(!run(&OverlayInfo { busy: true, ..info }));
    }

    #[test]
    fn test_material_labels_are_distinct() {
        let kinds = [
            MaterialKind::OpaqueRough,
            MaterialKind::TransmissiveGlazing,
            MaterialKind::MetallicReflective,
            MaterialKind::OpaqueWood,
            MaterialKind::EmissiveAccent,
        ];
        let labels: std::collections::HashSet<_> = kinds.iter().map(|k| material_label(*k)).collect();
        assert_eq!(labels.len(), kinds.len());
    }
}
