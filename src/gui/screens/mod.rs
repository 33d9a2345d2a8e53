pub mod detector;

use iced::{Element, Task};

use crate::gui::AppState;

pub trait Screen: Sized {
    type Message: std::fmt::Debug + Clone;

    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, Self::Message>;
    fn update(&mut self, message: Self::Message, state: &mut AppState) -> Task<Self::Message>;
}
