//! Field values shown in the window and the fixed strings around them.

use std::path::Path;

use crate::config::LauncherConfig;
use crate::detection::OutputBuffer;

pub mod strings {
    pub const WINDOW_TITLE: &str = "YOLO Object Detector";

    pub const WEIGHTS_DIALOG_TITLE: &str = "Select weight file";
    pub const SOURCE_DIALOG_TITLE: &str = "Select source file";
    pub const OUTPUT_DIALOG_TITLE: &str = "Select a directory for detection results";

    pub const WEIGHTS_BUTTON: &str = "Weights";
    pub const SOURCE_BUTTON: &str = "Source";
    pub const THRESHOLD_LABEL: &str = "Confidence threshold";
    pub const DETECT_BUTTON: &str = "Detect objects";
    pub const SAVE_LABELS_BUTTON: &str = "Save labels";

    pub const DAMAGED_PATH: &str = "Project files damaged. Choose path manually.";
    pub const DETECTION_STARTED: &str = "Detection started...\n";
    pub const DECODE_ERROR: &str = "Unable to decode detector output.";
}

/// A file-type filter for the open-file dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

pub const WEIGHTS_FILTER: FileFilter = FileFilter {
    name: "PyTorch weights",
    extensions: &["pt"],
};

pub const SOURCE_FILTER: FileFilter = FileFilter {
    name: "Source file",
    extensions: &["jpg", "jpeg", "png", "avi", "mp4"],
};

#[derive(Debug, Clone)]
pub struct FormState {
    pub source_path: String,
    pub weights_path: String,
    pub threshold: String,
    pub output: OutputBuffer,
}

impl FormState {
    pub fn from_config(config: &LauncherConfig) -> Self {
        Self {
            source_path: initial_path(&config.resolve(&config.default_source)),
            weights_path: initial_path(&config.resolve(&config.default_weights)),
            threshold: config.default_threshold.clone(),
            output: OutputBuffer::new(),
        }
    }
}

/// The path itself with `/` separators if it is an existing file, otherwise
/// the "choose manually" placeholder.
pub fn initial_path(path: &Path) -> String {
    if path.is_file() {
        path.to_string_lossy().replace('\\', "/")
    } else {
        strings::DAMAGED_PATH.to_string()
    }
}
