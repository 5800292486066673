use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::raycast::Raycaster;
use super::{EncodedImage, RenderError, RenderTarget, TargetSize};
use crate::camera::CameraView;
use crate::scene::Scene;

/// Largest drawing buffer the software target will allocate (8192 x 8192)
pub const MAX_BUFFER_PIXELS: u64 = 8192 * 8192;

/// CPU render target holding an RGBA8 drawing buffer
#[derive(Debug, Clone)]
pub struct SoftwareTarget {
    size: TargetSize,
    pixel_ratio: f32,
    /// Drawing-buffer size of the frame in `pixels`, if any
    frame_size: Option<TargetSize>,
    pixels: Vec<[u8; 4]>,
    max_pixels: u64,
}

impl SoftwareTarget {
    pub fn new(size: TargetSize, pixel_ratio: f32) -> Self {
        Self {
            size,
            pixel_ratio,
            frame_size: None,
            pixels: Vec::new(),
            max_pixels: MAX_BUFFER_PIXELS,
        }
    }

    pub fn with_pixel_budget(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    /// Whether `pixels` holds a frame at the current drawing-buffer size
    pub fn has_frame(&self) -> bool {
        self.frame_size == Some(self.drawing_buffer_size())
    }

    /// Row-major RGBA8 pixels of the last frame
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Drop the frame once the drawing-buffer size no longer matches it
    fn invalidate_if_resized(&mut self) {
        if self.frame_size.is_some() && !self.has_frame() {
            self.frame_size = None;
            self.pixels = Vec::new();
        }
    }
}

impl RenderTarget for SoftwareTarget {
    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
        self.invalidate_if_resized();
    }

    fn size(&self) -> TargetSize {
        self.size
    }

    fn set_size(&mut self, size: TargetSize) {
        self.size = size;
        self.invalidate_if_resized();
    }

    fn render(&mut self, scene: &Scene, view: &CameraView) -> Result<(), RenderError> {
        let buffer = self.drawing_buffer_size();
        if buffer.is_empty() {
            return Err(RenderError::EmptyTarget {
                width: buffer.width,
                height: buffer.height,
            });
        }
        if buffer.pixel_count() > self.max_pixels {
            return Err(RenderError::TooLarge {
                width: buffer.width,
                height: buffer.height,
                max_pixels: self.max_pixels,
            });
        }

        let len = buffer.pixel_count() as usize;
        if self.pixels.len() != len {
            self.pixels = vec![[0; 4]; len];
        }

        let started = std::time::Instant::now();
        Raycaster::new(scene).render(view, buffer.width, buffer.height, &mut self.pixels);
        self.frame_size = Some(buffer);

        log::debug!(
            "rendered {}x{} in {:.1} ms",
            buffer.width,
            buffer.height,
            started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(())
    }

    fn encode_png(&self) -> Result<EncodedImage, RenderError> {
        let frame = match self.frame_size {
            Some(frame) if self.has_frame() => frame,
            _ => return Err(RenderError::NoFrame),
        };

        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            self.as_bytes(),
            frame.width,
            frame.height,
            ExtendedColorType::Rgba8,
        )?;

        Ok(EncodedImage {
            width: frame.width,
            height: frame.height,
            bytes,
        })
    }
}
