use std::path::{Path, PathBuf};

pub const DEFAULT_DETECTOR_SCRIPT: &str = "./yolov7/detect.py";
pub const DEFAULT_SOURCE: &str = "data/example.jpg";
pub const DEFAULT_WEIGHTS: &str = "weights/yolov7_x_640_sgd_best.pt";
pub const DEFAULT_THRESHOLD: &str = "0.25";
pub const DEFAULT_ICON: &str = "icons/logo.png";

/// Where things live and what the form starts out with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Runtime used to run the detector script.
    pub interpreter: PathBuf,
    pub detector_script: PathBuf,
    /// Directory the default paths are resolved against and pickers open in.
    pub working_dir: PathBuf,
    pub default_source: PathBuf,
    pub default_weights: PathBuf,
    pub default_threshold: String,
    pub icon_path: PathBuf,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            detector_script: PathBuf::from(DEFAULT_DETECTOR_SCRIPT),
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            default_source: PathBuf::from(DEFAULT_SOURCE),
            default_weights: PathBuf::from(DEFAULT_WEIGHTS),
            default_threshold: DEFAULT_THRESHOLD.to_string(),
            icon_path: PathBuf::from(DEFAULT_ICON),
        }
    }
}

impl LauncherConfig {
    /// Resolve `path` against the working directory unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.working_dir.join(path)
    }
}

/// The Python of the active virtual environment, if any, else `python3`.
pub fn default_interpreter() -> PathBuf {
    interpreter_for(std::env::var_os("VIRTUAL_ENV").map(PathBuf::from).as_deref())
}

fn interpreter_for(virtual_env: Option<&Path>) -> PathBuf {
    match virtual_env {
        Some(venv) if !venv.as_os_str().is_empty() => {
            if cfg!(windows) {
                venv.join("Scripts").join("python.exe")
            } else {
                venv.join("bin").join("python")
            }
        }
        _ => PathBuf::from("python3"),
    }
}
