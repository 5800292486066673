//! Render targets: the resizable pixel buffers a scene is drawn into.

mod raycast;
mod software;

pub use raycast::{Hit, Raycaster};
pub use software::{SoftwareTarget, MAX_BUFFER_PIXELS};

use crate::camera::CameraView;
use crate::scene::Scene;

/// Logical (CSS-style) dimensions of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Physical size for a pixel density of `ratio`, rounded to whole pixels
    pub fn scaled(self, ratio: f32) -> Self {
        let scale = |v: u32| (v as f32 * ratio).round().max(0.0) as u32;
        Self {
            width: scale(self.width),
            height: scale(self.height),
        }
    }

    pub fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A PNG produced from a target's drawing buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("drawing buffer has zero area ({width}x{height})")]
    EmptyTarget { width: u32, height: u32 },
    #[error("drawing buffer {width}x{height} exceeds the {max_pixels} pixel budget")]
    TooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },
    #[error("nothing has been rendered at the current size")]
    NoFrame,
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// A drawing surface whose density and logical size can be changed
/// independently of any window presenting it.
pub trait RenderTarget {
    fn pixel_ratio(&self) -> f32;

    fn set_pixel_ratio(&mut self, ratio: f32);

    fn size(&self) -> TargetSize;

    /// Resize the drawing buffer. Never resizes a presenting window.
    fn set_size(&mut self, size: TargetSize);

    /// Physical dimensions, `size × pixel_ratio`
    fn drawing_buffer_size(&self) -> TargetSize {
        self.size().scaled(self.pixel_ratio())
    }

    /// Synchronously draw `scene` from `view` at the current drawing-buffer size
    fn render(&mut self, scene: &Scene, view: &CameraView) -> Result<(), RenderError>;

    /// The last rendered frame as PNG
    fn encode_png(&self) -> Result<EncodedImage, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_rounds_to_whole_pixels() {
        let size = TargetSize::new(1280, 721);
        assert_eq!(size.scaled(1.0), size);
        assert_eq!(size.scaled(2.0), TargetSize::new(2560, 1442));
        assert_eq!(size.scaled(1.5), TargetSize::new(1920, 1082));
        assert_eq!(TargetSize::new(3, 3).scaled(1.25), TargetSize::new(4, 4));
    }

    #[test]
    fn test_empty_and_pixel_count() {
        assert!(TargetSize::new(0, 10).is_empty());
        assert!(!TargetSize::new(1, 1).is_empty());
        assert_eq!(TargetSize::new(7680, 4320).pixel_count(), 33_177_600);
    }
}
