use iced::{
    Alignment::Center,
    Element, Font, Length,
    widget::{button, container, row, scrollable, text, text_input},
};
use iced_widget::container::bordered_box;

/// Width of the button/label column on the left of the form.
pub const LABEL_WIDTH: f32 = 160.0;

const OUTPUT_TEXT_SIZE: f32 = 13.0;

/// A picker button next to the path it filled in.
///
/// The path field is read-only; passing `None` disables the button.
pub fn path_row<'a, Message>(
    label: &'a str,
    path: &'a str,
    on_press: Option<Message>,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    row![
        button(label)
            .width(Length::Fixed(LABEL_WIDTH))
            .on_press_maybe(on_press),
        text_input("", path).width(Length::Fill),
    ]
    .spacing(10)
    .align_y(Center)
    .into()
}

/// Detector console output, kept scrolled to the newest line.
pub fn output_panel<'a, Message>(output: &'a str) -> Element<'a, Message>
where
    Message: 'a,
{
    container(
        scrollable(text(output).font(Font::MONOSPACE).size(OUTPUT_TEXT_SIZE))
            .anchor_bottom()
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .style(bordered_box)
    .padding(5)
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}
