use std::path::{Path, PathBuf};

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::error::LauncherError;

/// Image size the detector is always run with.
pub const IMAGE_SIZE: &str = "640";

/// Suffix stripped from the weights file name to form the project name.
pub const WEIGHTS_SUFFIX: &str = ".pt";

/// Project name used when nothing usable is left of the weights file name.
pub const FALLBACK_PROJECT_NAME: &str = "weights";

const RUN_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[month]_[day]_[year]__[hour]_[minute]_[second]");

/// Everything the detector needs for one run.
///
/// Built fresh from the form each time "detect" is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionRequest {
    pub source_path: String,
    pub weights_path: String,
    pub confidence_threshold: String,
    pub output_directory: PathBuf,
    /// `MM_DD_YYYY__HH_MM_SS`
    pub timestamp: String,
}

/// A program plus its full argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl DetectionRequest {
    pub fn new(
        source_path: impl Into<String>,
        weights_path: impl Into<String>,
        confidence_threshold: impl Into<String>,
        output_directory: impl Into<PathBuf>,
        started_at: OffsetDateTime,
    ) -> Result<Self, LauncherError> {
        Ok(Self {
            source_path: source_path.into(),
            weights_path: weights_path.into(),
            confidence_threshold: confidence_threshold.into(),
            output_directory: output_directory.into(),
            timestamp: run_timestamp(started_at)?,
        })
    }

    pub fn project_name(&self) -> String {
        project_name(&self.weights_path)
    }

    /// `{output_directory}/{project}_detections`
    pub fn project_path(&self) -> String {
        let dir = self.output_directory.to_string_lossy();
        format!(
            "{}/{}_detections",
            dir.trim_end_matches(['/', '\\']),
            self.project_name()
        )
    }

    pub fn run_name(&self) -> String {
        format!("detection_{}", self.timestamp)
    }

    /// The 14 detector tokens, in the order the detector's argument parser expects.
    pub fn detector_args(&self) -> Vec<String> {
        vec![
            "--weights".to_string(),
            self.weights_path.clone(),
            "--conf".to_string(),
            self.confidence_threshold.clone(),
            "--img-size".to_string(),
            IMAGE_SIZE.to_string(),
            "--source".to_string(),
            self.source_path.clone(),
            "--no-trace".to_string(),
            "--save-txt".to_string(),
            "--project".to_string(),
            self.project_path(),
            "--name".to_string(),
            self.run_name(),
        ]
    }

    /// Runs `script` through `interpreter` with this request's arguments.
    pub fn invocation(&self, interpreter: &Path, script: &Path) -> Invocation {
        let mut args = Vec::with_capacity(15);
        args.push(script.to_string_lossy().into_owned());
        args.extend(self.detector_args());
        Invocation {
            program: interpreter.to_path_buf(),
            args,
        }
    }
}

/// Derive the output project name from a weights path.
///
/// Takes the file name after the last `/` or `\` and strips a trailing `.pt`.
/// Other files lose whatever extension they have; an empty result becomes
/// [`FALLBACK_PROJECT_NAME`].
pub fn project_name(weights_path: &str) -> String {
    let file_name = weights_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(weights_path);
    let stem = match file_name.strip_suffix(WEIGHTS_SUFFIX) {
        Some(stem) => stem,
        None => file_name
            .rsplit_once('.')
            .map_or(file_name, |(stem, _extension)| stem),
    };
    if stem.is_empty() {
        FALLBACK_PROJECT_NAME.to_string()
    } else {
        stem.to_string()
    }
}

pub fn run_timestamp(at: OffsetDateTime) -> Result<String, LauncherError> {
    Ok(at.format(RUN_TIMESTAMP)?)
}

/// Local wall-clock time, falling back to UTC when the offset is unknown.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
