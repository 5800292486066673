//! Window-side plumbing: GPU context, frame presentation, egui overlay and input.

pub mod controller;
pub mod gpu_context;
pub mod input_adapter;
pub mod overlay;
pub mod surface_renderer;

pub use controller::{Button, Controller};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use overlay::{Overlay, OverlayInfo};
pub use surface_renderer::SurfaceRenderer;
