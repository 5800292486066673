// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::ViewerConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "facade-render")]
#[command(about = "Parametric facade viewer with 8K PNG export", long_about = None)]
pub struct Cli {
    /// JSON viewer configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory exported images are written to (overrides the config)
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Export once without opening a window, then exit
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Hide the overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

impl Cli {
    /// Fold command-line overrides into a loaded config
    pub fn apply(&self, mut config: ViewerConfig) -> ViewerConfig {
        if let Some(dir) = &self.output_dir {
            config.export.output_dir = dir.clone();
        }
        config
    }
}
