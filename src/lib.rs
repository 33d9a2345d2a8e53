pub mod config;
pub mod detection;
pub mod error;
pub mod form;
pub mod launcher;
pub mod process;

pub use config::LauncherConfig;
pub use detection::{DetectionRequest, Invocation, OutputBuffer, OutputStream, Validity};
pub use error::LauncherError;
pub use form::FormState;
pub use launcher::{ActiveRun, Launcher};
pub use process::{ProcessBridge, ProcessEvent, ProcessEvents, SubprocessBridge};

#[cfg(feature = "gui")]
pub mod gui;
