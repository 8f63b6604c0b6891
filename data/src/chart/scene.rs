use exchange::{Candle, Interval};

use super::geometry::{CandleShape, Mapper, price_domain};
use super::hover::{HoverState, Tooltip};
use super::scale::{compute_ticks, label_for, select_ticks};
use super::{ChartConfig, Viewport};
use crate::util::{CalendarFormat, format_price};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub value: f64,
    pub y: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeTick {
    pub index: usize,
    pub x: f32,
    pub label: String,
}

/// Everything needed to draw one frame of the price chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    pub price_ticks: Vec<PriceTick>,
    pub time_ticks: Vec<TimeTick>,
    pub candles: Vec<CandleShape>,
}

impl Scene {
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            viewport,
            price_ticks: Vec::new(),
            time_ticks: Vec::new(),
            candles: Vec::new(),
        }
    }

    pub fn build<F: CalendarFormat + ?Sized>(
        series: &[Candle],
        interval: Interval,
        viewport: Viewport,
        config: &ChartConfig,
        fmt: &F,
    ) -> Self {
        let Some((low, high)) = price_domain(series) else {
            return Self::empty(viewport);
        };

        let ticks = compute_ticks(low, high, config.price_ticks.max(1));
        let (Some(&y_min), Some(&y_max)) = (ticks.first(), ticks.last()) else {
            return Self::empty(viewport);
        };

        let mapper = Mapper::new(viewport, (y_min, y_max), series.len());

        let price_ticks = ticks
            .iter()
            .map(|&value| PriceTick {
                value,
                y: mapper.y_for_value(value),
                label: format_price(value),
            })
            .collect();

        let time_ticks = select_ticks(
            series,
            interval,
            viewport.inner_width(),
            config.min_label_px,
            fmt,
        )
        .into_iter()
        .map(|index| TimeTick {
            index,
            x: mapper.x_for_index(index),
            label: label_for(interval, series[index].time, fmt),
        })
        .collect();

        let candles = series
            .iter()
            .enumerate()
            .filter_map(|(i, candle)| mapper.candle(i, candle))
            .collect();

        Self {
            viewport,
            price_ticks,
            time_ticks,
            candles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Index of the candle whose body contains the point.
    pub fn candle_at(&self, x: f32, y: f32) -> Option<usize> {
        self.candles
            .iter()
            .find(|shape| shape.body.contains(x, y))
            .map(|shape| shape.index)
    }

    pub fn shape(&self, index: usize) -> Option<&CandleShape> {
        self.candles.iter().find(|shape| shape.index == index)
    }

    pub fn tooltip<F: CalendarFormat + ?Sized>(
        &self,
        series: &[Candle],
        interval: Interval,
        hover: &HoverState,
        fmt: &F,
    ) -> Option<Tooltip> {
        let HoverState::Active { index, x, y } = *hover else {
            return None;
        };
        let candle = series.get(index)?;

        Some(Tooltip::new(candle, interval, &self.viewport, (x, y), fmt))
    }

    /// x of the dashed guide line drawn through the hovered candle.
    pub fn guide_x(&self, hover: &HoverState) -> Option<f32> {
        hover.index().and_then(|i| self.shape(i)).map(|shape| shape.x)
    }
}
