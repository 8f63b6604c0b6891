use data::chart::{ChartConfig, HoverState, Scene, Tooltip, Viewport};
use data::UserTimezone;
use exchange::{Candle, Interval};
use iced::theme::palette::Extended;
use iced::widget::canvas::{self, Cache, Event, Frame, Geometry, LineDash, Path, Stroke};
use iced::{Alignment, Color, Point, Rectangle, Renderer, Size, Theme, mouse};

const AXIS_TEXT_SIZE: f32 = 10.0;
const TOOLTIP_TEXT_SIZE: f32 = 11.0;

/// Candlestick canvas over one loaded series.
pub struct CandleChart<'a> {
    pub series: &'a [Candle],
    pub interval: Interval,
    pub timezone: UserTimezone,
    pub config: ChartConfig,
    pub cache: &'a Cache,
}

impl CandleChart<'_> {
    fn scene(&self, size: Size) -> Scene {
        Scene::build(
            self.series,
            self.interval,
            Viewport::new(size.width, size.height),
            &self.config,
            &self.timezone,
        )
    }
}

impl<Message> canvas::Program<Message> for CandleChart<'_> {
    type State = HoverState;

    fn update(
        &self,
        hover: &mut HoverState,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let next = match event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => match cursor.position_in(bounds) {
                Some(position) => {
                    let hit = self.scene(bounds.size()).candle_at(position.x, position.y);
                    hover.pointer(hit, position.x, position.y)
                }
                None => hover.leave(),
            },
            Event::Mouse(mouse::Event::CursorLeft) => hover.leave(),
            _ => return None,
        };

        if next == *hover {
            return None;
        }

        *hover = next;
        Some(canvas::Action::request_redraw())
    }

    fn draw(
        &self,
        hover: &HoverState,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let size = bounds.size();
        if size.width == 0.0 || size.height == 0.0 {
            return vec![];
        }

        let palette = theme.extended_palette();
        let scene = self.scene(size);

        let base = self.cache.draw(renderer, size, |frame| {
            draw_grid(frame, &scene, palette);
            draw_candles(frame, &scene, palette);
        });

        let mut overlay = Frame::new(renderer, size);

        if let Some(x) = scene.guide_x(hover) {
            draw_guide(&mut overlay, &scene.viewport, x, palette);
        }
        if let Some(tooltip) = scene.tooltip(self.series, self.interval, hover, &self.timezone) {
            draw_tooltip(&mut overlay, &tooltip, palette);
        }

        vec![base, overlay.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        hover: &HoverState,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if hover.is_active() {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

fn grid_stroke(color: Color) -> Stroke<'static> {
    Stroke::with_color(
        Stroke {
            width: 1.0,
            ..Default::default()
        },
        color,
    )
}

fn draw_grid(frame: &mut Frame, scene: &Scene, palette: &Extended) {
    let viewport = &scene.viewport;
    let line_color = palette.background.strong.color.scale_alpha(0.25);
    let text_color = palette.background.base.text.scale_alpha(0.6);

    for tick in &scene.price_ticks {
        frame.stroke(
            &Path::line(
                Point::new(viewport.padding.left, tick.y),
                Point::new(viewport.plot_right(), tick.y),
            ),
            grid_stroke(line_color),
        );

        frame.fill_text(canvas::Text {
            content: tick.label.clone(),
            position: Point::new(viewport.padding.left - 6.0, tick.y),
            size: AXIS_TEXT_SIZE.into(),
            color: text_color,
            align_x: Alignment::End.into(),
            align_y: Alignment::Center.into(),
            ..canvas::Text::default()
        });
    }

    for tick in &scene.time_ticks {
        frame.stroke(
            &Path::line(
                Point::new(tick.x, viewport.padding.top),
                Point::new(tick.x, viewport.plot_bottom()),
            ),
            grid_stroke(line_color.scale_alpha(0.5)),
        );

        frame.fill_text(canvas::Text {
            content: tick.label.clone(),
            position: Point::new(tick.x, viewport.plot_bottom() + 8.0),
            size: AXIS_TEXT_SIZE.into(),
            color: text_color,
            align_x: Alignment::Center.into(),
            align_y: Alignment::Start.into(),
            ..canvas::Text::default()
        });
    }
}

fn draw_candles(frame: &mut Frame, scene: &Scene, palette: &Extended) {
    for shape in &scene.candles {
        let color = if shape.is_up {
            palette.success.base.color
        } else {
            palette.danger.base.color
        };

        frame.stroke(
            &Path::line(
                Point::new(shape.x, shape.wick_top),
                Point::new(shape.x, shape.wick_bottom),
            ),
            grid_stroke(color),
        );

        frame.fill_rectangle(
            Point::new(shape.body.x, shape.body.y),
            Size::new(shape.body.width, shape.body.height),
            color,
        );
    }
}

fn draw_guide(frame: &mut Frame, viewport: &Viewport, x: f32, palette: &Extended) {
    let dashed_line = Stroke::with_color(
        Stroke {
            width: 1.0,
            line_dash: LineDash {
                segments: &[4.0, 4.0],
                offset: 0,
            },
            ..Default::default()
        },
        palette.background.base.text.scale_alpha(0.4),
    );

    frame.stroke(
        &Path::line(
            Point::new(x, viewport.padding.top),
            Point::new(x, viewport.plot_bottom()),
        ),
        dashed_line,
    );
}

fn draw_tooltip(frame: &mut Frame, tooltip: &Tooltip, palette: &Extended) {
    let origin = Point::new(tooltip.x, tooltip.y);
    let size = Size::new(tooltip.width, tooltip.height);

    frame.fill(
        &Path::rounded_rectangle(origin, size, 6.0.into()),
        palette.background.weakest.color.scale_alpha(0.95),
    );
    frame.stroke(
        &Path::rounded_rectangle(origin, size, 6.0.into()),
        grid_stroke(palette.background.weak.color),
    );

    let text_color = palette.background.base.text;
    let padding = 8.0;
    let line_height = 14.0;

    frame.fill_text(canvas::Text {
        content: tooltip.title.clone(),
        position: Point::new(origin.x + padding, origin.y + padding),
        size: TOOLTIP_TEXT_SIZE.into(),
        color: text_color,
        ..canvas::Text::default()
    });

    for (i, (label, value)) in tooltip.rows.iter().enumerate() {
        let y = origin.y + padding + line_height * (i + 1) as f32;

        frame.fill_text(canvas::Text {
            content: (*label).to_string(),
            position: Point::new(origin.x + padding, y),
            size: TOOLTIP_TEXT_SIZE.into(),
            color: text_color.scale_alpha(0.6),
            ..canvas::Text::default()
        });
        frame.fill_text(canvas::Text {
            content: value.clone(),
            position: Point::new(origin.x + tooltip.width - padding, y),
            size: TOOLTIP_TEXT_SIZE.into(),
            color: text_color,
            align_x: Alignment::End.into(),
            ..canvas::Text::default()
        });
    }
}
