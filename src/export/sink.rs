use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Receives an encoded image together with its suggested filename
pub trait ImageSink {
    fn deliver(&mut self, filename: &str, payload: &[u8]) -> io::Result<()>;
}

/// Saves images into a directory without overwriting earlier ones:
/// `facade-8k.png`, then `facade-8k (1).png`, `facade-8k (2).png`, ...
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    last_saved: Option<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_saved: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recent successful delivery
    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }

    fn available_path(&self, filename: &str) -> PathBuf {
        let candidate = self.dir.join(filename);
        if !candidate.exists() {
            return candidate;
        }

        let name = Path::new(filename);
        let stem = name.file_stem().and_then(|s| s.to_str()).unwrap_or(filename);
        let ext = name.extension().and_then(|s| s.to_str());

        (1u32..)
            .map(|n| match ext {
                Some(ext) => self.dir.join(format!("{stem} ({n}).{ext}")),
                None => self.dir.join(format!("{stem} ({n})")),
            })
            .find(|path| !path.exists())
            .unwrap_or(candidate)
    }
}

impl ImageSink for DirectorySink {
    fn deliver(&mut self, filename: &str, payload: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.available_path(filename);
        fs::write(&path, payload)?;
        log::info!("saved {} ({} bytes)", path.display(), payload.len());
        self.last_saved = Some(path);
        Ok(())
    }
}
