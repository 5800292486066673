//! One-shot high-resolution PNG export.
//!
//! An export temporarily drives the viewer's own render target at 8K,
//! then puts the target back exactly as it found it. Only one export may
//! run at a time; requests made while one is running are dropped.

mod guard;
mod sink;

pub use guard::{BusyFlag, BusyGuard, TargetState, TargetStateGuard};
pub use sink::{DirectorySink, ImageSink};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::camera::CameraView;
use crate::render::{RenderError, RenderTarget, TargetSize};
use crate::scene::Scene;

pub const EXPORT_WIDTH: u32 = 7680;
pub const EXPORT_HEIGHT: u32 = 4320;
pub const EXPORT_FILENAME: &str = "facade-8k.png";

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Logical size the target is set to for the export
    pub size: TargetSize,
    /// Pixel density used for the export; 1.0 makes the buffer equal `size`
    pub pixel_ratio: f32,
    pub filename: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            size: TargetSize::new(EXPORT_WIDTH, EXPORT_HEIGHT),
            pixel_ratio: 1.0,
            filename: EXPORT_FILENAME.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("render failed: {0}")]
    Render(#[source] RenderError),
    #[error("encode failed: {0}")]
    Encode(#[source] RenderError),
    #[error("failed to deliver {filename}: {source}")]
    Delivery {
        filename: String,
        #[source]
        source: std::io::Error,
    },
    #[error("export panicked: {0}")]
    Panicked(String),
}

/// What a finished export produced
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub enum ExportStatus {
    Completed(ExportReport),
    /// Another export was already running; nothing was touched
    Rejected,
    Failed(ExportError),
}

impl ExportStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, ExportStatus::Completed(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ExportStatus::Rejected)
    }

    pub fn error(&self) -> Option<&ExportError> {
        match self {
            ExportStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Runs export sequences, at most one at a time
#[derive(Debug, Default)]
pub struct Exporter {
    settings: ExportSettings,
    busy: BusyFlag,
}

impl Exporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            settings,
            busy: BusyFlag::new(),
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Render `scene` from `view` at export resolution and hand the PNG to `sink`.
    ///
    /// The target's pixel ratio and logical size are restored before this
    /// returns, whether the export completed, failed or panicked.
    pub fn export<T, S>(&self, target: &mut T, scene: &Scene, view: &CameraView, sink: &mut S) -> ExportStatus
    where
        T: RenderTarget + ?Sized,
        S: ImageSink + ?Sized,
    {
        let Some(_busy) = self.busy.try_acquire() else {
            log::warn!("export already in progress, ignoring request");
            return ExportStatus::Rejected;
        };

        log::info!(
            "exporting {}x{} to {}",
            self.settings.size.width,
            self.settings.size.height,
            self.settings.filename
        );

        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(target, scene, view, sink, started)));

        match outcome {
            Ok(Ok(report)) => {
                log::info!(
                    "export finished: {} ({}x{}, {} bytes) in {:.2}s",
                    report.filename,
                    report.width,
                    report.height,
                    report.bytes,
                    report.elapsed.as_secs_f64()
                );
                ExportStatus::Completed(report)
            }
            Ok(Err(err)) => {
                log::error!("export failed: {err}");
                ExportStatus::Failed(err)
            }
            Err(payload) => {
                let err = ExportError::Panicked(panic_message(payload.as_ref()));
                log::error!("{err}");
                ExportStatus::Failed(err)
            }
        }
    }

    fn run<T, S>(
        &self,
        target: &mut T,
        scene: &Scene,
        view: &CameraView,
        sink: &mut S,
        started: Instant,
    ) -> Result<ExportReport, ExportError>
    where
        T: RenderTarget + ?Sized,
        S: ImageSink + ?Sized,
    {
        let mut target = TargetStateGuard::capture(target);
        let saved = target.saved();
        log::debug!(
            "saved render target state {}x{} @ {}x",
            saved.size.width,
            saved.size.height,
            saved.pixel_ratio
        );

        target.set_pixel_ratio(self.settings.pixel_ratio);
        target.set_size(self.settings.size);

        target.render(scene, view).map_err(ExportError::Render)?;
        log::debug!("render pass complete");

        let image = target.encode_png().map_err(ExportError::Encode)?;
        log::debug!("encoded {} bytes", image.bytes.len());

        sink.deliver(&self.settings.filename, &image.bytes)
            .map_err(|source| ExportError::Delivery {
                filename: self.settings.filename.clone(),
                source,
            })?;

        Ok(ExportReport {
            filename: self.settings.filename.clone(),
            width: image.width,
            height: image.height,
            bytes: image.bytes.len(),
            elapsed: started.elapsed(),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
