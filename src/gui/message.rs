use crate::gui::screens::detector::DetectorMessage;

#[derive(Debug, Clone)]
pub enum Message {
    Detector(DetectorMessage),
}
