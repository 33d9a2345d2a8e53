use std::path::Path;

use iced::{Element, Size, Task, window};
use tracing::{info, warn};

use super::{AppState, Message};
use crate::{
    LauncherConfig, LauncherError,
    form::strings,
    gui::screens::{Screen, detector::DetectorScreen},
};

const WINDOW_SIZE: Size = Size::new(760.0, 600.0);

pub struct LauncherApp {
    state: AppState,
    screen: DetectorScreen,
}

impl LauncherApp {
    pub fn new(config: LauncherConfig) -> Self {
        Self {
            state: AppState::new(config),
            screen: DetectorScreen::default(),
        }
    }

    pub fn title(&self) -> String {
        strings::WINDOW_TITLE.to_string()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Detector(msg) => self
                .screen
                .update(msg, &mut self.state)
                .map(Message::Detector),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        self.screen.view(&self.state).map(Message::Detector)
    }
}

/// Open the window and run until it is closed.
pub fn run(config: LauncherConfig) -> iced::Result {
    let icon = match load_icon(&config.resolve(&config.icon_path)) {
        Ok(icon) => Some(icon),
        Err(e) => {
            warn!("{e}");
            None
        }
    };
    info!(
        interpreter = %config.interpreter.display(),
        script = %config.detector_script.display(),
        "opening launcher window"
    );

    iced::application(
        move || LauncherApp::new(config.clone()),
        LauncherApp::update,
        LauncherApp::view,
    )
    .title(LauncherApp::title)
    .window(window::Settings {
        size: WINDOW_SIZE,
        resizable: false,
        icon,
        ..window::Settings::default()
    })
    .run()
}

fn load_icon(path: &Path) -> Result<window::Icon, LauncherError> {
    let icon_error = |message: String| LauncherError::Icon {
        path: path.to_path_buf(),
        message,
    };
    let image = image::open(path)
        .map_err(|e| icon_error(e.to_string()))?
        .into_rgba8();
    let (width, height) = image.dimensions();
    window::icon::from_rgba(image.into_raw(), width, height).map_err(|e| icon_error(e.to_string()))
}
