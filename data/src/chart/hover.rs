use exchange::{Candle, Interval};

use super::Viewport;
use super::scale::label_for;
use crate::util::{CalendarFormat, format_compact, format_price};

pub const TOOLTIP_WIDTH: f32 = 170.0;
pub const TOOLTIP_HEIGHT: f32 = 96.0;

const POINTER_OFFSET_X: f32 = 10.0;
const POINTER_OFFSET_Y: f32 = -40.0;

/// Which candle the pointer is over, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HoverState {
    #[default]
    Inactive,
    Active { index: usize, x: f32, y: f32 },
}

impl HoverState {
    pub fn enter(self, index: usize, x: f32, y: f32) -> Self {
        HoverState::Active { index, x, y }
    }

    /// Follows the pointer only while a target is already active.
    pub fn moved(self, x: f32, y: f32) -> Self {
        match self {
            HoverState::Active { index, .. } => HoverState::Active { index, x, y },
            HoverState::Inactive => HoverState::Inactive,
        }
    }

    pub fn leave(self) -> Self {
        HoverState::Inactive
    }

    /// Applies a pointer event given the candle under the pointer.
    pub fn pointer(self, hit: Option<usize>, x: f32, y: f32) -> Self {
        match (self, hit) {
            (HoverState::Active { index, .. }, Some(hit)) if index == hit => self.moved(x, y),
            (_, Some(hit)) => self.enter(hit, x, y),
            (_, None) => self.leave(),
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            HoverState::Active { index, .. } => Some(*index),
            HoverState::Inactive => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, HoverState::Active { .. })
    }
}

/// Top-left corner of the tooltip box, kept inside the padded plot.
pub fn tooltip_origin(viewport: &Viewport, pointer_x: f32, pointer_y: f32) -> (f32, f32) {
    let padding = viewport.padding;

    let x = (pointer_x + POINTER_OFFSET_X)
        .max(padding.left)
        .min(viewport.plot_right() - TOOLTIP_WIDTH);
    let y = (pointer_y + POINTER_OFFSET_Y)
        .max(padding.top)
        .min(viewport.plot_bottom() - TOOLTIP_HEIGHT);

    (x, y)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// `(label, value)` pairs in display order.
    pub rows: [(&'static str, String); 5],
}

impl Tooltip {
    pub fn new<F: CalendarFormat + ?Sized>(
        candle: &Candle,
        interval: Interval,
        viewport: &Viewport,
        pointer: (f32, f32),
        fmt: &F,
    ) -> Self {
        let (x, y) = tooltip_origin(viewport, pointer.0, pointer.1);

        Self {
            x,
            y,
            width: TOOLTIP_WIDTH,
            height: TOOLTIP_HEIGHT,
            title: label_for(interval, candle.time, fmt),
            rows: [
                ("O", format_price(candle.open)),
                ("H", format_price(candle.high)),
                ("L", format_price(candle.low)),
                ("C", format_price(candle.close)),
                ("Vol", format_compact(candle.volume)),
            ],
        }
    }
}
