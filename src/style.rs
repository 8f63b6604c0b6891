use data::stats::Intent;
use iced::theme::Palette;
use iced::widget::button::Status;
use iced::widget::container::Style;
use iced::{Border, Color, Shadow, Theme, widget};

pub fn custom_theme() -> Theme {
    Theme::custom(
        "KandleBoard".to_string(),
        Palette {
            background: Color::from_rgb8(15, 23, 42),
            text: Color::from_rgb8(226, 232, 240),
            primary: Color::from_rgb8(34, 211, 238),
            success: Color::from_rgb8(52, 211, 153),
            danger: Color::from_rgb8(251, 113, 133),
            warning: Color::from_rgb8(238, 216, 139),
        },
    )
}

pub fn branding_text(theme: &Theme) -> widget::text::Style {
    widget::text::Style {
        color: Some(theme.extended_palette().primary.base.color),
    }
}

pub fn muted_text(theme: &Theme) -> widget::text::Style {
    widget::text::Style {
        color: Some(theme.palette().text.scale_alpha(0.6)),
    }
}

pub fn delta_text(theme: &Theme, intent: Intent) -> widget::text::Style {
    let palette = theme.extended_palette();

    widget::text::Style {
        color: Some(match intent {
            Intent::Up => palette.success.base.color,
            Intent::Down => palette.danger.base.color,
            Intent::Neutral => palette.background.base.text.scale_alpha(0.7),
        }),
    }
}

// Tooltips
pub fn tooltip(theme: &Theme) -> Style {
    let palette = theme.extended_palette();

    Style {
        background: Some(palette.background.weakest.color.into()),
        border: Border {
            width: 1.0,
            color: palette.background.weak.color,
            radius: 4.0.into(),
        },
        ..Default::default()
    }
}

// Containers
pub fn card(theme: &Theme) -> Style {
    let palette = theme.extended_palette();

    Style {
        text_color: Some(palette.background.base.text),
        background: Some(palette.background.weakest.color.scale_alpha(0.6).into()),
        border: Border {
            width: 1.0,
            color: palette.background.weak.color,
            radius: 12.0.into(),
        },
        ..Default::default()
    }
}

pub fn inset(theme: &Theme) -> Style {
    let palette = theme.extended_palette();

    Style {
        background: Some(palette.background.weak.color.scale_alpha(0.3).into()),
        border: Border {
            width: 1.0,
            color: palette.background.weak.color,
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}

pub fn delta_badge(theme: &Theme, intent: Intent) -> Style {
    let palette = theme.extended_palette();

    let color = match intent {
        Intent::Up => palette.success.base.color,
        Intent::Down => palette.danger.base.color,
        Intent::Neutral => palette.background.strong.color,
    };

    Style {
        background: Some(color.scale_alpha(0.1).into()),
        border: Border {
            width: 1.0,
            color: color.scale_alpha(0.3),
            radius: 12.0.into(),
        },
        ..Default::default()
    }
}

pub fn skeleton(theme: &Theme) -> Style {
    Style {
        background: Some(theme.palette().text.scale_alpha(0.1).into()),
        border: Border {
            radius: 4.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn dialog(theme: &Theme) -> Style {
    let palette = theme.extended_palette();

    Style {
        text_color: Some(palette.background.base.text),
        background: Some(
            Color {
                a: 0.99,
                ..palette.background.base.color
            }
            .into(),
        ),
        border: Border {
            width: 1.0,
            color: palette.secondary.weak.color,
            radius: 6.0.into(),
        },
        shadow: Shadow {
            offset: iced::Vector { x: 0.0, y: 0.0 },
            blur_radius: 20.0,
            color: Color::BLACK.scale_alpha(if palette.is_dark { 0.4 } else { 0.2 }),
        },
        ..Default::default()
    }
}

// Buttons
pub fn range_button(theme: &Theme, status: Status, is_selected: bool) -> widget::button::Style {
    let palette = theme.extended_palette();

    let background = match (status, is_selected) {
        (Status::Disabled, _) => None,
        (_, true) => Some(palette.primary.weak.color.scale_alpha(0.4)),
        (Status::Hovered | Status::Pressed, false) => Some(palette.background.weak.color),
        (Status::Active, false) => None,
    };

    let text_color = if status == Status::Disabled {
        palette.background.base.text.scale_alpha(0.3)
    } else {
        palette.background.base.text
    };

    widget::button::Style {
        background: background.map(Into::into),
        text_color,
        border: Border {
            width: 1.0,
            color: if is_selected {
                palette.primary.base.color
            } else {
                palette.background.weak.color
            },
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}
