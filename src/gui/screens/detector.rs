use std::path::PathBuf;

use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{button, column, row, text, text_input},
};
use rfd::AsyncFileDialog;
use tracing::warn;

use crate::{
    ProcessEvent,
    form::{FileFilter, SOURCE_FILTER, WEIGHTS_FILTER, strings},
    gui::{
        AppState,
        screens::Screen,
        widgets::{LABEL_WIDTH, output_panel, path_row},
    },
};

/// The single form: pick inputs, run the detector, watch its output.
#[derive(Debug, Clone, Default)]
pub struct DetectorScreen {
    /// A file or folder dialog is on screen; its buttons stay disabled.
    dialog_open: bool,
}

#[derive(Debug, Clone)]
pub enum DetectorMessage {
    PickWeights,
    WeightsPicked(Option<PathBuf>),
    PickSource,
    SourcePicked(Option<PathBuf>),
    ThresholdEdited(String),
    Detect,
    OutputDirPicked(Option<PathBuf>),
    Process(ProcessEvent),
}

impl Screen for DetectorScreen {
    type Message = DetectorMessage;

    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, DetectorMessage> {
        let launcher = &state.launcher;
        let form = launcher.form();
        let idle = !self.dialog_open;

        let threshold = row![
            text(strings::THRESHOLD_LABEL).width(Length::Fixed(LABEL_WIDTH)),
            text_input(&launcher.config().default_threshold, &form.threshold)
                .on_input(DetectorMessage::ThresholdEdited),
        ]
        .spacing(10)
        .align_y(Center);

        let actions = row![
            button(strings::DETECT_BUTTON).on_press_maybe(self.detect_action(state)),
            // Present in the layout but not wired to anything yet.
            button(strings::SAVE_LABELS_BUTTON),
        ]
        .spacing(10);

        column![
            path_row(
                strings::WEIGHTS_BUTTON,
                &form.weights_path,
                idle.then_some(DetectorMessage::PickWeights),
            ),
            path_row(
                strings::SOURCE_BUTTON,
                &form.source_path,
                idle.then_some(DetectorMessage::PickSource),
            ),
            threshold,
            actions,
            text(launcher.status().unwrap_or_default()),
            output_panel(form.output.text()),
        ]
        .spacing(10)
        .padding(20)
        .into()
    }

    fn update(&mut self, message: DetectorMessage, state: &mut AppState) -> Task<DetectorMessage> {
        let working_dir = state.launcher.config().working_dir.clone();
        match message {
            DetectorMessage::PickWeights => {
                self.dialog_open = true;
                Task::perform(
                    pick_file(strings::WEIGHTS_DIALOG_TITLE, WEIGHTS_FILTER, working_dir),
                    DetectorMessage::WeightsPicked,
                )
            }
            DetectorMessage::WeightsPicked(path) => {
                self.dialog_open = false;
                state.launcher.choose_weights_file(path);
                Task::none()
            }
            DetectorMessage::PickSource => {
                self.dialog_open = true;
                Task::perform(
                    pick_file(strings::SOURCE_DIALOG_TITLE, SOURCE_FILTER, working_dir),
                    DetectorMessage::SourcePicked,
                )
            }
            DetectorMessage::SourcePicked(path) => {
                self.dialog_open = false;
                state.launcher.choose_source_file(path);
                Task::none()
            }
            DetectorMessage::ThresholdEdited(value) => {
                state.launcher.edit_threshold(value);
                Task::none()
            }
            DetectorMessage::Detect => {
                self.dialog_open = true;
                Task::perform(
                    pick_folder(strings::OUTPUT_DIALOG_TITLE, working_dir),
                    DetectorMessage::OutputDirPicked,
                )
            }
            DetectorMessage::OutputDirPicked(dir) => {
                self.dialog_open = false;
                match state.launcher.run_detection(dir) {
                    Ok(Some(events)) => Task::run(events, DetectorMessage::Process),
                    Ok(None) => Task::none(),
                    Err(e) => {
                        warn!("detection not started: {e}");
                        Task::none()
                    }
                }
            }
            DetectorMessage::Process(event) => {
                state.launcher.handle_event(event);
                Task::none()
            }
        }
    }
}

impl DetectorScreen {
    /// "Detect objects" is only clickable with no dialog up and no run alive.
    fn detect_action(&self, state: &AppState) -> Option<DetectorMessage> {
        (!self.dialog_open && state.launcher.can_start()).then_some(DetectorMessage::Detect)
    }
}

async fn pick_file(title: &'static str, filter: FileFilter, directory: PathBuf) -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title(title)
        .set_directory(directory)
        .add_filter(filter.name, filter.extensions)
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

async fn pick_folder(title: &'static str, directory: PathBuf) -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title(title)
        .set_directory(directory)
        .pick_folder()
        .await
        .map(|handle| handle.path().to_path_buf())
}
