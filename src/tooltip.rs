use iced::Element;
use iced::widget::{container, text};

use crate::style;

pub use iced::widget::tooltip::Position;

/// Wraps `content` in a hint bubble when there is something to say.
pub fn tooltip<'a, Message: 'a>(
    content: impl Into<Element<'a, Message>>,
    hint: Option<String>,
    position: Position,
) -> Element<'a, Message> {
    match hint {
        Some(hint) => iced::widget::tooltip(
            content,
            container(text(hint).size(11)).style(style::tooltip).padding(8),
            position,
        )
        .into(),
        None => content.into(),
    }
}
