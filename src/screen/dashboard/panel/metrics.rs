use data::stats::{MetricCard, metric_cards};
use exchange::{Interval, Stats};
use iced::widget::{Column, Row, column, container, row, space, text};
use iced::{Alignment, Element, Length};

use crate::screen::skeleton;
use crate::style;

const CARDS_PER_ROW: usize = 3;

pub fn view<'a, Message: 'a>(
    stats: Option<&Stats>,
    interval: Interval,
    is_loading: bool,
) -> Element<'a, Message> {
    let cards = metric_cards(stats, interval);

    cards
        .chunks(CARDS_PER_ROW)
        .fold(Column::new().spacing(12), |rows, chunk| {
            rows.push(
                Row::with_children(chunk.iter().map(|card| metric(card, is_loading))).spacing(12),
            )
        })
        .into()
}

fn metric<'a, Message: 'a>(card: &MetricCard, is_loading: bool) -> Element<'a, Message> {
    let value: Element<'a, Message> = if is_loading {
        skeleton(Length::Fixed(112.0), Length::Fixed(28.0))
    } else {
        text(card.value.clone()).size(22).into()
    };

    let mut content = row![
        column![text(card.label).size(12).style(style::muted_text), value].spacing(6),
        space::horizontal(),
    ]
    .align_y(Alignment::Start);

    if let Some(delta) = card.delta.as_ref().filter(|_| !is_loading) {
        let intent = card.intent;

        content = content.push(
            container(
                text(delta.clone())
                    .size(11)
                    .style(move |theme| style::delta_text(theme, intent)),
            )
            .padding([2, 8])
            .style(move |theme| style::delta_badge(theme, intent)),
        );
    }

    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(style::card)
        .into()
}
