//! Interactive view of the facade: scene, orbit controls and the render target
//! the window presents. Holds no GPU or windowing state.

use crate::camera::{CameraView, OrbitControls};
use crate::export::{ExportStatus, Exporter, ImageSink};
use crate::render::{RenderError, RenderTarget, SoftwareTarget, TargetSize};
use crate::scene::Scene;

pub struct Viewport {
    scene: Scene,
    controls: OrbitControls,
    target: SoftwareTarget,
    /// View of the frame currently held by `target`
    presented: Option<CameraView>,
}

impl Viewport {
    pub fn new(scene: Scene, size: TargetSize, pixel_ratio: f32) -> Self {
        let controls = OrbitControls::new(scene.camera());
        Self {
            scene,
            controls,
            target: SoftwareTarget::new(size, pixel_ratio),
            presented: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn target(&self) -> &SoftwareTarget {
        &self.target
    }

    pub fn view(&self) -> CameraView {
        self.controls.view()
    }

    /// Follow a window resize. `size` is logical, `pixel_ratio` already clamped.
    pub fn resize(&mut self, size: TargetSize, pixel_ratio: f32) {
        self.target.set_pixel_ratio(pixel_ratio);
        self.target.set_size(size);
    }

    /// Drag by (`dx`, `dy`) physical pixels
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let height = self.target.drawing_buffer_size().height as f32;
        self.controls.rotate(dx, dy, height);
    }

    pub fn zoom(&mut self, steps: f32) {
        self.controls.zoom(steps);
    }

    /// Whether the controls are still easing towards their goal
    pub fn is_animating(&self) -> bool {
        self.controls.is_settling()
    }

    /// Advance the controls and re-render if the view or buffer changed.
    /// Returns whether a new frame was drawn.
    pub fn frame(&mut self) -> Result<bool, RenderError> {
        self.controls.update();
        let view = self.controls.view();

        if self.target.has_frame() && self.presented == Some(view) {
            return Ok(false);
        }

        self.target.render(&self.scene, &view)?;
        self.presented = Some(view);
        Ok(true)
    }

    /// Export the current view through the shared render target
    pub fn export<S: ImageSink + ?Sized>(&mut self, exporter: &Exporter, sink: &mut S) -> ExportStatus {
        let view = self.controls.view();
        exporter.export(&mut self.target, &self.scene, &view, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::create_facade_scene;

    fn viewport() -> Viewport {
        Viewport::new(create_facade_scene(), TargetSize::new(32, 18), 1.0)
    }

    #[test]
    fn test_frame_renders_once_until_something_changes() {
        let mut viewport = viewport();
        assert!(viewport.frame().unwrap());
        assert!(!viewport.frame().unwrap());

        viewport.resize(TargetSize::new(40, 20), 1.0);
        assert!(viewport.frame().unwrap());
        assert_eq!(viewport.target().pixels().len(), 40 * 20);
    }

    #[test]
    fn test_orbit_triggers_rerender() {
        let mut viewport = viewport();
        viewport.frame().unwrap();

        viewport.orbit(30.0, 0.0);
        assert!(viewport.frame().unwrap());
    }

    #[test]
    fn test_pixel_ratio_scales_buffer() {
        let mut viewport = viewport();
        viewport.resize(TargetSize::new(32, 18), 2.0);
        viewport.frame().unwrap();
        assert_eq!(viewport.target().drawing_buffer_size(), TargetSize::new(64, 36));
    }
}
