use exchange::Candle;
use ordered_float::OrderedFloat;

use super::Viewport;
use super::scale::linear::MIN_SPAN;

const BODY_WIDTH_RATIO: f32 = 0.6;
const MIN_BODY_WIDTH: f32 = 2.0;
const MAX_BODY_WIDTH: f32 = 8.0;
const MIN_BODY_HEIGHT: f32 = 1.0;
/// Room left above the highest high, as a share of the price range.
const HEADROOM: f64 = 0.10;

/// `(min low, max high + headroom)` over bars with finite prices.
pub fn price_domain(series: &[Candle]) -> Option<(f64, f64)> {
    let finite = || series.iter().filter(|c| c.has_finite_prices());

    let low = finite().map(|c| OrderedFloat(c.low)).min()?.0;
    let high = finite().map(|c| OrderedFloat(c.high)).max()?.0;

    Some((low, high + (high - low) * HEADROOM))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleShape {
    pub index: usize,
    pub x: f32,
    pub body: Rect,
    pub wick_top: f32,
    pub wick_bottom: f32,
    pub is_up: bool,
}

/// Maps series positions and prices onto the viewport.
#[derive(Debug, Clone, Copy)]
pub struct Mapper {
    viewport: Viewport,
    y_min: f64,
    y_max: f64,
    step: f32,
}

impl Mapper {
    pub fn new(viewport: Viewport, (y_min, y_max): (f64, f64), len: usize) -> Self {
        let step = viewport.inner_width() / len.saturating_sub(1).max(1) as f32;

        Self {
            viewport,
            y_min,
            y_max,
            step,
        }
    }

    /// Horizontal distance between neighbouring bars.
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn x_for_index(&self, index: usize) -> f32 {
        self.viewport.padding.left + index as f32 * self.step
    }

    pub fn y_for_value(&self, value: f64) -> f32 {
        let span = (self.y_max - self.y_min).max(MIN_SPAN);
        let ratio = 1.0 - (value - self.y_min) / span;

        self.viewport.padding.top + (ratio * f64::from(self.viewport.inner_height())) as f32
    }

    pub fn body_width(&self) -> f32 {
        (self.step * BODY_WIDTH_RATIO).clamp(MIN_BODY_WIDTH, MAX_BODY_WIDTH)
    }

    /// `None` for bars with a non-finite price.
    pub fn candle(&self, index: usize, candle: &Candle) -> Option<CandleShape> {
        if !candle.has_finite_prices() {
            return None;
        }

        let x = self.x_for_index(index);
        let y_open = self.y_for_value(candle.open);
        let y_close = self.y_for_value(candle.close);
        let width = self.body_width();

        Some(CandleShape {
            index,
            x,
            body: Rect {
                x: x - width / 2.0,
                y: y_open.min(y_close),
                width,
                height: (y_open - y_close).abs().max(MIN_BODY_HEIGHT),
            },
            wick_top: self.y_for_value(candle.high),
            wick_bottom: self.y_for_value(candle.low),
            is_up: candle.is_up(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{a} != {b}");
    }

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle::new(0, open, high, low, close, 0.0)
    }

    #[test]
    fn x_positions_span_the_interior() {
        let mapper = Mapper::new(Viewport::new(600.0, 360.0), (0.0, 100.0), 10);

        assert_close(mapper.step(), 528.0 / 9.0);
        assert_close(mapper.x_for_index(0), 58.0);
        assert_close(mapper.x_for_index(9), 586.0);
    }

    #[test]
    fn single_bar_does_not_divide_by_zero() {
        let mapper = Mapper::new(Viewport::default(), (0.0, 1.0), 1);

        assert_close(mapper.step(), 528.0);
        assert_close(mapper.x_for_index(0), 58.0);
    }

    #[test]
    fn y_is_inverted() {
        let mapper = Mapper::new(Viewport::default(), (100.0, 200.0), 5);

        assert_close(mapper.y_for_value(200.0), 16.0);
        assert_close(mapper.y_for_value(100.0), 330.0);
        assert_close(mapper.y_for_value(150.0), 173.0);
        assert!(mapper.y_for_value(180.0) < mapper.y_for_value(120.0));
    }

    #[test]
    fn flat_domain_stays_finite() {
        let mapper = Mapper::new(Viewport::default(), (5.0, 5.0), 5);

        assert!(mapper.y_for_value(5.0).is_finite());
    }

    #[test]
    fn body_width_is_clamped() {
        let wide = Mapper::new(Viewport::default(), (0.0, 1.0), 3);
        let dense = Mapper::new(Viewport::default(), (0.0, 1.0), 2000);

        assert_close(wide.body_width(), 8.0);
        assert_close(dense.body_width(), 2.0);

        let mid = Mapper::new(Viewport::default(), (0.0, 1.0), 89);
        assert_close(mid.body_width(), 3.6);
    }

    #[test]
    fn doji_has_minimum_body_height() {
        let mapper = Mapper::new(Viewport::default(), (90.0, 110.0), 10);
        let shape = mapper.candle(3, &candle(100.0, 105.0, 95.0, 100.0)).unwrap();

        assert_eq!(shape.body.height, 1.0);
        assert!(shape.is_up);
        assert!(shape.wick_top < shape.body.y);
        assert!(shape.wick_bottom > shape.body.y);
    }

    #[test]
    fn body_spans_open_and_close() {
        let mapper = Mapper::new(Viewport::default(), (90.0, 110.0), 10);
        let shape = mapper.candle(0, &candle(105.0, 108.0, 92.0, 95.0)).unwrap();

        assert!(!shape.is_up);
        assert_close(shape.body.y, mapper.y_for_value(105.0));
        assert_close(
            shape.body.height,
            mapper.y_for_value(95.0) - mapper.y_for_value(105.0),
        );
        assert_close(shape.body.x + shape.body.width / 2.0, 58.0);
    }

    #[test]
    fn corrupt_bar_has_no_shape() {
        let mapper = Mapper::new(Viewport::default(), (90.0, 110.0), 10);

        assert!(mapper.candle(0, &candle(f64::NAN, 1.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn domain_adds_headroom_above_only() {
        let series = vec![
            candle(100.0, 110.0, 95.0, 105.0),
            candle(105.0, 120.0, 100.0, 118.0),
            candle(f64::NAN, 1e9, -1e9, 1.0),
        ];

        let (low, high) = price_domain(&series).unwrap();
        assert_eq!(low, 95.0);
        assert!((high - 122.5).abs() < 1e-9);

        assert!(price_domain(&[]).is_none());
    }
}
