use std::path::PathBuf;

use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use crate::config::LauncherConfig;
use crate::detection::{DetectionRequest, Invocation, OutputStream, Validity, local_now, threshold};
use crate::error::LauncherError;
use crate::form::{FormState, strings};
use crate::process::{ProcessBridge, ProcessEvent, ProcessEvents};

/// The run currently owned by the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRun {
    pub invocation: Invocation,
    /// Known once the bridge reports the process as started.
    pub pid: Option<u32>,
}

/// Reacts to the user's actions and to the detector process.
///
/// Holds at most one detector run. Asking for another one while it is alive
/// is rejected with [`LauncherError::AlreadyRunning`].
#[derive(Debug)]
pub struct Launcher<B: ProcessBridge> {
    config: LauncherConfig,
    form: FormState,
    bridge: B,
    active: Option<ActiveRun>,
    status: Option<String>,
}

impl<B: ProcessBridge> Launcher<B> {
    pub fn new(config: LauncherConfig, bridge: B) -> Self {
        let form = FormState::from_config(&config);
        Self {
            config,
            form,
            bridge,
            active: None,
            status: None,
        }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    pub fn active_run(&self) -> Option<&ActiveRun> {
        self.active.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Whether a new run would be accepted right now.
    pub fn can_start(&self) -> bool {
        !self.is_running()
    }

    /// Last problem worth showing next to the buttons.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Apply the weights picker's result. Returns whether the field changed.
    pub fn choose_weights_file(&mut self, picked: Option<PathBuf>) -> bool {
        match existing_path(picked) {
            Some(path) => {
                debug!(%path, "weights selected");
                self.form.weights_path = path;
                true
            }
            None => false,
        }
    }

    /// Apply the source picker's result. Returns whether the field changed.
    pub fn choose_source_file(&mut self, picked: Option<PathBuf>) -> bool {
        match existing_path(picked) {
            Some(path) => {
                debug!(%path, "source selected");
                self.form.source_path = path;
                true
            }
            None => false,
        }
    }

    /// Input mask for the threshold field. Invalid edits leave the field as is.
    pub fn edit_threshold(&mut self, candidate: String) -> Validity {
        let validity = threshold::validate(&candidate);
        if validity.allows_edit() {
            self.form.threshold = candidate;
        }
        validity
    }

    /// Start the detector writing into `output_dir`.
    ///
    /// `None` means the directory picker was cancelled and nothing happens.
    pub fn run_detection(
        &mut self,
        output_dir: Option<PathBuf>,
    ) -> Result<Option<ProcessEvents>, LauncherError> {
        self.run_detection_at(output_dir, local_now())
    }

    pub fn run_detection_at(
        &mut self,
        output_dir: Option<PathBuf>,
        now: OffsetDateTime,
    ) -> Result<Option<ProcessEvents>, LauncherError> {
        let Some(output_dir) = output_dir else {
            return Ok(None);
        };
        if let Some(run) = &self.active {
            warn!(pid = ?run.pid, "detection requested while a run is active");
            let err = LauncherError::AlreadyRunning;
            self.status = Some(err.to_string());
            return Err(err);
        }

        let request = DetectionRequest::new(
            self.form.source_path.as_str(),
            self.form.weights_path.as_str(),
            self.form.threshold.as_str(),
            output_dir,
            now,
        )?;
        let invocation = request.invocation(&self.config.interpreter, &self.config.detector_script);
        info!(
            project = %request.project_path(),
            name = %request.run_name(),
            "starting detection"
        );

        let events = self.bridge.start(&invocation);
        self.active = Some(ActiveRun {
            invocation,
            pid: None,
        });
        self.status = None;
        Ok(Some(events))
    }

    /// Route a bridge event to its handler.
    pub fn handle_event(&mut self, event: ProcessEvent) {
        match event {
            ProcessEvent::Started { pid } => self.on_process_started(pid),
            ProcessEvent::Output { stream, bytes } => {
                self.on_output_available(stream, &bytes);
            }
            ProcessEvent::Finished { code } => self.on_process_finished(code),
            ProcessEvent::FailedToStart(reason) => self.on_process_failed(reason),
        }
    }

    pub fn on_process_started(&mut self, pid: Option<u32>) {
        if let Some(run) = self.active.as_mut() {
            run.pid = pid;
        }
        self.form.output.replace(strings::DETECTION_STARTED);
    }

    /// Decode and append a chunk of detector output. Returns false when the
    /// chunk was not text and the buffer now holds the decode error instead.
    pub fn on_output_available(&mut self, stream: OutputStream, bytes: &[u8]) -> bool {
        match self.form.output.push_bytes(stream, bytes) {
            Ok(_) => true,
            Err(e) => {
                warn!("{e}");
                self.form.output.replace(strings::DECODE_ERROR);
                false
            }
        }
    }

    pub fn on_process_finished(&mut self, code: Option<i32>) {
        if let Err(e) = self.form.output.finish() {
            warn!("{e}");
            self.form.output.replace(strings::DECODE_ERROR);
        }
        match self.active.take() {
            Some(run) => info!(pid = ?run.pid, ?code, "detection run ended"),
            None => debug!(?code, "finish reported without an active run"),
        }
    }

    pub fn on_process_failed(&mut self, reason: String) {
        error!(%reason, "detector could not be started");
        self.active = None;
        self.status = Some(reason);
    }
}

/// Keep a picker result only if it names something that exists.
fn existing_path(picked: Option<PathBuf>) -> Option<String> {
    let path = picked?;
    if path.as_os_str().is_empty() || !path.exists() {
        return None;
    }
    Some(path.to_string_lossy().into_owned())
}
