use data::LookupForm;
use exchange::{Interval, RangeOption};
use iced::widget::{Row, button, column, container, pick_list, row, space, text, text_input};
use iced::{Alignment, Element, Length};

use crate::style;
use crate::tooltip::{Position, tooltip};

#[derive(Debug, Clone)]
pub enum Message {
    SymbolChanged(String),
    EndChanged(String),
    IntervalPicked(Interval),
    RangePicked(RangeOption),
    Submit,
    Reset,
}

/// Applies a field edit to the form. Submit and reset are left to the caller.
pub fn apply(form: &mut LookupForm, message: Message) {
    match message {
        Message::SymbolChanged(symbol) => form.set_symbol(symbol),
        Message::EndChanged(end) => form.set_end(end),
        Message::IntervalPicked(interval) => form.pick_interval(interval),
        Message::RangePicked(range) => form.pick_range(range),
        Message::Submit | Message::Reset => {}
    }
}

fn field_label<'a>(label: &'a str) -> Element<'a, Message> {
    text(label).size(11).style(style::muted_text).into()
}

pub fn view(form: &LookupForm, is_loading: bool) -> Element<'_, Message> {
    let symbol = column![
        field_label("SYMBOL"),
        text_input("e.g., AAPL, MSFT, AMZN, BTC-USD", &form.symbol)
            .on_input(Message::SymbolChanged)
            .on_submit(Message::Submit)
            .padding(8),
    ]
    .spacing(4)
    .width(Length::FillPortion(3));

    let end = column![
        field_label("AS OF"),
        text_input("YYYY-MM-DD", &form.end)
            .on_input(Message::EndChanged)
            .on_submit(Message::Submit)
            .padding(8),
    ]
    .spacing(4)
    .width(Length::FillPortion(2));

    let interval = column![
        field_label("INTERVAL"),
        pick_list(&Interval::ALL[..], Some(form.interval), Message::IntervalPicked)
            .padding(8)
            .width(Length::Fill),
    ]
    .spacing(4)
    .width(Length::FillPortion(2));

    let ranges = Row::with_children(
        RangeOption::ALL
            .into_iter()
            .map(|range| range_button(form, range)),
    )
    .spacing(4);

    let load_label = if is_loading { "Loading…" } else { "Load" };

    let actions = row![
        button(text(load_label))
            .padding([6, 16])
            .on_press_maybe((form.can_submit() && !is_loading).then_some(Message::Submit)),
        button(text("Reset"))
            .padding([6, 16])
            .style(button::secondary)
            .on_press_maybe(form.is_dirty().then_some(Message::Reset)),
    ]
    .spacing(8);

    container(
        column![
            row![symbol, end, interval].spacing(12),
            row![
                column![field_label("RANGE"), ranges].spacing(4),
                space::horizontal(),
                actions,
            ]
            .align_y(Alignment::End),
        ]
        .spacing(12),
    )
    .padding(16)
    .style(style::card)
    .into()
}

fn range_button<'a>(form: &LookupForm, range: RangeOption) -> Element<'a, Message> {
    let is_allowed = range.allows(form.interval);
    let is_selected = form.range == range;

    let btn = button(text(range.to_string()).size(12))
        .padding([4, 10])
        .style(move |theme, status| style::range_button(theme, status, is_selected))
        .on_press_maybe(is_allowed.then_some(Message::RangePicked(range)));

    tooltip(
        btn,
        (!is_allowed).then(|| format!("Not available for {} interval", form.interval)),
        Position::Bottom,
    )
}
