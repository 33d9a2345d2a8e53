mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from yolo_launcher for tests
pub use yolo_launcher::{
    Invocation, Launcher, LauncherConfig, LauncherError, OutputStream, ProcessBridge,
    ProcessEvent, ProcessEvents, Validity, form::strings,
};
