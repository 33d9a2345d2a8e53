use crate::{Launcher, LauncherConfig, SubprocessBridge};

#[derive(Debug)]
pub struct AppState {
    pub launcher: Launcher<SubprocessBridge>,
}

impl AppState {
    pub fn new(config: LauncherConfig) -> Self {
        Self {
            launcher: Launcher::new(config, SubprocessBridge),
        }
    }
}
