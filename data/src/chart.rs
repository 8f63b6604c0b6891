pub mod geometry;
pub mod hover;
pub mod scale;
pub mod scene;

use serde::{Deserialize, Serialize};

pub use geometry::{CandleShape, Mapper};
pub use hover::{HoverState, Tooltip};
pub use scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            left: 58.0,
            right: 14.0,
            top: 16.0,
            bottom: 30.0,
        }
    }
}

/// Drawing area of the price chart, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub padding: Padding,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(600.0, 360.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            padding: Padding::default(),
        }
    }

    pub fn inner_width(&self) -> f32 {
        (self.width - self.padding.left - self.padding.right).max(0.0)
    }

    pub fn inner_height(&self) -> f32 {
        (self.height - self.padding.top - self.padding.bottom).max(0.0)
    }

    pub fn plot_right(&self) -> f32 {
        self.width - self.padding.right
    }

    pub fn plot_bottom(&self) -> f32 {
        self.height - self.padding.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    pub min_label_px: f32,
    pub price_ticks: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            min_label_px: scale::timeseries::MIN_LABEL_PX,
            price_ticks: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_viewport_interior() {
        let viewport = Viewport::default();

        assert_eq!(viewport.inner_width(), 528.0);
        assert_eq!(viewport.inner_height(), 314.0);
        assert_eq!(viewport.plot_right(), 586.0);
        assert_eq!(viewport.plot_bottom(), 330.0);
    }

    #[test]
    fn chart_config_fills_missing_fields() {
        let config: ChartConfig = serde_json::from_str(r#"{"price_ticks": 8}"#).unwrap();

        assert_eq!(config.price_ticks, 8);
        assert_eq!(config.min_label_px, 80.0);
    }
}
