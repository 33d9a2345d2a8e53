use std::path::PathBuf;

use futures::stream::{self, StreamExt};
use tempfile::TempDir;
use yolo_launcher::{Invocation, Launcher, LauncherConfig, ProcessBridge, ProcessEvent, ProcessEvents};

pub const TEST_WEIGHTS: &str = "weights/yolov7_x_640_sgd_best.pt";
pub const TEST_SOURCE: &str = "data/example.jpg";

/// Remembers every invocation and replays the same scripted events for each.
#[derive(Debug, Default)]
pub struct RecordingBridge {
    pub started: Vec<Invocation>,
    pub script: Vec<ProcessEvent>,
}

impl ProcessBridge for RecordingBridge {
    fn start(&mut self, invocation: &Invocation) -> ProcessEvents {
        self.started.push(invocation.clone());
        stream::iter(self.script.clone()).boxed()
    }
}

/// A working directory holding the default source and weights files.
/// Keep the returned TempDir alive for as long as the paths are used.
pub fn create_workspace() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory");
    for file in [TEST_WEIGHTS, TEST_SOURCE] {
        let path = dir.path().join(file);
        std::fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent dir");
        std::fs::write(&path, b"test").expect("Failed to write fixture file");
    }
    dir
}

pub fn test_config(working_dir: PathBuf) -> LauncherConfig {
    LauncherConfig {
        interpreter: PathBuf::from("/usr/bin/python3"),
        detector_script: PathBuf::from("./yolov7/detect.py"),
        working_dir,
        ..LauncherConfig::default()
    }
}

/// Launcher over a fresh workspace with a recording bridge.
pub fn create_test_launcher() -> (Launcher<RecordingBridge>, TempDir) {
    let dir = create_workspace();
    let launcher = Launcher::new(test_config(dir.path().to_path_buf()), RecordingBridge::default());
    (launcher, dir)
}
