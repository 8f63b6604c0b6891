use exchange::{Candle, Interval, Stats};
use ordered_float::OrderedFloat;

use crate::util::{MISSING, format_compact};

/// Summary statistics computed from the bars themselves.
pub fn summarize(series: &[Candle], interval: Interval) -> Stats {
    let closes: Vec<f64> = series
        .iter()
        .map(|c| c.close)
        .filter(|v| v.is_finite())
        .collect();

    let (first, last) = (closes.first().copied(), closes.last().copied());

    let change_pct = match (first, last) {
        (Some(first), Some(last)) if first != 0.0 => Some((last / first - 1.0) * 100.0),
        _ => None,
    };

    let high = series
        .iter()
        .map(|c| c.high)
        .filter(|v| v.is_finite())
        .map(OrderedFloat)
        .max();
    let low = series
        .iter()
        .map(|c| c.low)
        .filter(|v| v.is_finite())
        .map(OrderedFloat)
        .min();

    Stats {
        price_end: last,
        change_pct,
        change_abs: first.zip(last).map(|(first, last)| last - first),
        range_high: high.map(|v| v.0),
        range_low: low.map(|v| v.0),
        avg_volume: mean(series.iter().map(|c| c.volume).filter(|v| v.is_finite())),
        volatility: volatility(&closes, interval),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Fewest log returns needed before volatility is reported.
fn min_observations(interval: Interval) -> usize {
    match interval {
        Interval::H1 => 20,
        _ => 10,
    }
}

/// Annualized sample standard deviation of log returns over positive closes.
pub fn volatility(closes: &[f64], interval: Interval) -> Option<f64> {
    let positive: Vec<f64> = closes
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();

    let returns: Vec<f64> = positive.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    if returns.len() < 2 || returns.len() < min_observations(interval) {
        return None;
    }

    let n = returns.len() as f64;
    let avg = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - avg).powi(2)).sum::<f64>() / (n - 1.0);

    Some(variance.sqrt() * interval.periods_per_year().sqrt())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Up,
    Down,
    Neutral,
}

/// One of the summary tiles above the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub delta: Option<String>,
    pub intent: Intent,
}

impl MetricCard {
    fn plain(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            delta: None,
            intent: Intent::Neutral,
        }
    }
}

fn dollars(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("${v:.2}"))
}

pub fn metric_cards(stats: Option<&Stats>, interval: Interval) -> Vec<MetricCard> {
    let stats = stats.copied().unwrap_or_default();

    let change = stats.change_pct;

    vec![
        MetricCard::plain("Price (end)", dollars(stats.price_end)),
        MetricCard {
            label: "Return (selected range)",
            value: change.map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}")),
            delta: change.map(|v| format!("{v:.2}%")),
            intent: if change.unwrap_or(0.0) >= 0.0 {
                Intent::Up
            } else {
                Intent::Down
            },
        },
        MetricCard::plain("High (selected range)", dollars(stats.range_high)),
        MetricCard::plain("Low (selected range)", dollars(stats.range_low)),
        MetricCard::plain(
            interval.volume_label(),
            stats
                .avg_volume
                .map_or_else(|| MISSING.to_string(), format_compact),
        ),
        MetricCard::plain(
            "Annualized Volatility",
            stats
                .volatility
                .map_or_else(|| MISSING.to_string(), |v| format!("{:.2}%", v * 100.0)),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(i as i64, c, c + 1.0, c - 1.0, c, 100.0 * (i + 1) as f64))
            .collect()
    }

    #[test]
    fn summarizes_series() {
        let stats = summarize(&bars(&[100.0, 90.0, 110.0]), Interval::D1);

        assert_eq!(stats.price_end, Some(110.0));
        assert!((stats.change_pct.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(stats.change_abs, Some(10.0));
        assert_eq!(stats.range_high, Some(111.0));
        assert_eq!(stats.range_low, Some(89.0));
        assert_eq!(stats.avg_volume, Some(200.0));
        assert_eq!(stats.volatility, None);
    }

    #[test]
    fn empty_series_has_no_stats() {
        assert_eq!(summarize(&[], Interval::D1), Stats::default());
    }

    #[test]
    fn volatility_needs_enough_returns() {
        let closes: Vec<f64> = (0..11).map(|i| 100.0 + i as f64).collect();
        assert!(volatility(&closes, Interval::D1).is_some());
        assert!(volatility(&closes, Interval::H1).is_none());
        assert!(volatility(&closes[..10], Interval::D1).is_none());
    }

    #[test]
    fn volatility_of_constant_growth_is_zero() {
        let closes: Vec<f64> = (0..12).map(|i| 100.0 * 1.01f64.powi(i)).collect();

        assert!(volatility(&closes, Interval::MO1).unwrap() < 1e-9);
    }

    #[test]
    fn volatility_is_annualized() {
        let closes = [100.0, 110.0, 100.0, 110.0, 100.0, 110.0, 100.0, 110.0, 100.0, 110.0, 100.0];
        let up = (1.1f64).ln();

        // alternating +up/-up returns, mean 0, ddof 1
        let sample_std = (10.0 * up * up / 9.0).sqrt();
        let expected = sample_std * 252f64.sqrt();

        assert!((volatility(&closes, Interval::D1).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn non_positive_closes_are_ignored() {
        let mut closes: Vec<f64> = (0..11).map(|i| 100.0 + i as f64).collect();
        closes.insert(3, 0.0);
        closes.insert(5, f64::NAN);

        assert_eq!(
            volatility(&closes, Interval::D1),
            volatility(&closes.iter().copied().filter(|c| *c > 0.0).collect::<Vec<_>>(), Interval::D1)
        );
    }

    #[test]
    fn cards_render_missing_values() {
        let cards = metric_cards(None, Interval::MO3);

        assert_eq!(cards.len(), 6);
        assert!(cards.iter().all(|c| c.value == MISSING));
        assert_eq!(cards[1].delta, None);
        assert_eq!(cards[1].intent, Intent::Up);
        assert_eq!(cards[4].label, "Avg Quarterly Volume");
    }

    #[test]
    fn cards_format_values() {
        let stats = Stats {
            price_end: Some(187.456),
            change_pct: Some(-3.14159),
            range_high: Some(199.62),
            range_low: Some(164.08),
            avg_volume: Some(52_340_000.0),
            volatility: Some(0.2345),
            ..Default::default()
        };

        let cards = metric_cards(Some(&stats), Interval::D1);

        assert_eq!(cards[0].value, "$187.46");
        assert_eq!(cards[1].value, "-3.14");
        assert_eq!(cards[1].delta.as_deref(), Some("-3.14%"));
        assert_eq!(cards[1].intent, Intent::Down);
        assert_eq!(cards[2].label, "High (selected range)");
        assert_eq!(cards[4].value, "52.34M");
        assert_eq!(cards[4].label, "Avg Daily Volume");
        assert_eq!(cards[5].value, "23.45%");
    }
}
