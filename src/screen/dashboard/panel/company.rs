use data::util::{MISSING, format_with_commas};
use exchange::Profile;
use iced::widget::{Column, column, container, row, rule, space, text};
use iced::{Element, Length};

use crate::screen::{card, skeleton};
use crate::style;

const NO_SUMMARY: &str = "No summary available yet.";

fn fact<'a, Message: 'a>(label: &'a str, value: String) -> Element<'a, Message> {
    row![
        text(label).size(12).style(style::muted_text),
        space::horizontal(),
        text(value).size(12),
    ]
    .into()
}

fn or_missing(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_string()
}

pub fn view<'a, Message: 'a>(profile: Option<&'a Profile>, is_loading: bool) -> Element<'a, Message> {
    let badge: Option<Element<'a, Message>> = profile
        .and_then(Profile::badge)
        .filter(|_| !is_loading)
        .map(|badge| {
            container(text(badge).size(11))
                .padding([2, 8])
                .style(style::inset)
                .into()
        });

    let body: Element<'a, Message> = match profile {
        Some(profile) if !is_loading => details(profile),
        _ => skeleton(Length::Fill, Length::Fixed(320.0)),
    };

    card("Company", badge, body)
}

fn details<'a, Message: 'a>(profile: &'a Profile) -> Element<'a, Message> {
    let mut content = Column::new().spacing(10).push(
        text(or_missing(profile.display_name()))
            .size(18)
            .style(style::branding_text),
    );

    if let Some(classification) = profile.classification() {
        content = content.push(text(classification).size(12).style(style::muted_text));
    }

    let facts = column![
        fact(
            "Employees",
            profile
                .employees
                .map_or_else(|| MISSING.to_string(), |n| format_with_commas(n as f64)),
        ),
        fact("Phone", or_missing(profile.phone.as_deref())),
        fact("Website", or_missing(profile.website_host())),
        fact("Key Officer", or_missing(profile.vip.as_deref())),
    ]
    .spacing(6);

    let headquarters = container(
        column![
            text("Headquarters").size(11).style(style::muted_text),
            text(profile.address_line().unwrap_or_else(|| MISSING.to_string())).size(12),
        ]
        .spacing(4),
    )
    .padding(10)
    .width(Length::Fill)
    .style(style::inset);

    content
        .push(rule::horizontal(1))
        .push(facts)
        .push(headquarters)
        .into()
}

/// Business summary card under the chart.
pub fn notes<'a, Message: 'a>(profile: Option<&'a Profile>) -> Element<'a, Message> {
    let body = match profile.and_then(|p| p.summary.as_deref()).map(str::trim) {
        Some(summary) if !summary.is_empty() => text(summary).size(13).line_height(1.6),
        _ => text(NO_SUMMARY).size(13).style(style::muted_text),
    };

    card("Notes", None, body)
}
