use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use yolo_launcher::LauncherConfig;
use yolo_launcher::config::{
    DEFAULT_DETECTOR_SCRIPT, DEFAULT_SOURCE, DEFAULT_THRESHOLD, DEFAULT_WEIGHTS, default_interpreter,
};

#[derive(Parser)]
#[command(name = "yolo-launcher")]
#[command(about = "Run a YOLO detector script on an image or video and watch its output")]
struct Cli {
    /// Detector script handed to the interpreter
    #[arg(long, env = "YOLO_DETECTOR_SCRIPT", default_value = DEFAULT_DETECTOR_SCRIPT)]
    detector_script: PathBuf,

    /// Interpreter used to run the detector (defaults to the active venv's python)
    #[arg(long, env = "YOLO_INTERPRETER")]
    interpreter: Option<PathBuf>,

    /// Initial source file, relative to the working directory
    #[arg(long, value_name = "FILE", default_value = DEFAULT_SOURCE)]
    source: PathBuf,

    /// Initial weights file, relative to the working directory
    #[arg(long, value_name = "FILE", default_value = DEFAULT_WEIGHTS)]
    weights: PathBuf,

    /// Initial confidence threshold
    #[arg(long, default_value = DEFAULT_THRESHOLD)]
    conf: String,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> LauncherConfig {
        LauncherConfig {
            interpreter: self.interpreter.unwrap_or_else(default_interpreter),
            detector_script: self.detector_script,
            default_source: self.source,
            default_weights: self.weights,
            default_threshold: self.conf,
            ..LauncherConfig::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("yolo_launcher={}", args.log_level))),
        )
        .init();

    let config = args.into_config();
    run(config)
}

#[cfg(feature = "gui")]
fn run(config: LauncherConfig) -> anyhow::Result<()> {
    yolo_launcher::gui::run(config).map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}

#[cfg(not(feature = "gui"))]
fn run(config: LauncherConfig) -> anyhow::Result<()> {
    let _ = config;
    anyhow::bail!("yolo-launcher was built without the `gui` feature")
}
