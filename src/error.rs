use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the launcher core.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// A detection run was requested while the previous detector is still alive.
    #[error("a detection run is already in progress")]
    AlreadyRunning,

    #[error("failed to start {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Detector output was not valid UTF-8.
    #[error("detector output is not valid UTF-8 (at byte {valid_up_to})")]
    Decode { valid_up_to: usize },

    /// The detector exited in the middle of a multi-byte character.
    #[error("detector output ended with {pending} undecoded byte(s)")]
    Truncated { pending: usize },

    #[error("failed to format run timestamp: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error("failed to load window icon from {path:?}: {message}")]
    Icon { path: PathBuf, message: String },
}
