pub mod dashboard;

use iced::widget::{column, container, row, space, text};
use iced::{Element, Length};

use crate::style;

/// Titled card shell shared by the dashboard panels.
pub fn card<'a, M: 'a>(
    title: &'a str,
    aside: Option<Element<'a, M>>,
    body: impl Into<Element<'a, M>>,
) -> Element<'a, M> {
    let mut header = row![text(title).size(13).style(style::muted_text), space::horizontal()]
        .align_y(iced::Alignment::Center);

    if let Some(aside) = aside {
        header = header.push(aside);
    }

    container(column![header, body.into()].spacing(12))
        .padding(16)
        .width(Length::Fill)
        .style(style::card)
        .into()
}

/// Placeholder block shown while a lookup is in flight.
pub fn skeleton<'a, M: 'a>(width: Length, height: Length) -> Element<'a, M> {
    container(text(""))
        .width(width)
        .height(height)
        .style(style::skeleton)
        .into()
}
