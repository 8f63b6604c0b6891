use iced::widget::{button, center, column, container, mouse_area, opaque, row, space, stack, text};
use iced::{Alignment, Color, Element};

use crate::style;

/// A failed lookup, as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    SymbolNotFound(String),
    RequestFailed,
    InvalidLookup(String),
}

impl Dialog {
    pub fn title(&self) -> &'static str {
        match self {
            Dialog::SymbolNotFound(_) => "Symbol Not Found",
            Dialog::RequestFailed => "Request Failed",
            Dialog::InvalidLookup(_) => "Check Your Lookup",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Dialog::SymbolNotFound(symbol) => format!(
                "We couldn't find \"{symbol}\". Please check the ticker and try again."
            ),
            Dialog::RequestFailed => {
                "An unexpected error occurred. Please double check your symbol.".to_string()
            }
            Dialog::InvalidLookup(reason) => reason.clone(),
        }
    }
}

pub fn dialog_modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    dialog: &Dialog,
    on_dismiss: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let content = container(
        column![
            text(dialog.title()).size(16),
            text(dialog.body()).style(style::muted_text),
            row![
                space::horizontal(),
                button(text("OK")).on_press(on_dismiss.clone()),
            ],
        ]
        .spacing(16)
        .align_x(Alignment::Start),
    )
    .width(360)
    .padding(24)
    .style(style::dialog);

    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| {
                container::Style {
                    background: Some(
                        Color {
                            a: 0.8,
                            ..Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_dismiss)
        )
    ]
    .into()
}
