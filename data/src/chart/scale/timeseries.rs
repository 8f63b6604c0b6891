use exchange::{Candle, Interval};

use crate::util::{CalendarDate, CalendarFormat};

/// Narrowest horizontal room a time label is given.
pub const MIN_LABEL_PX: f32 = 80.0;

pub fn max_ticks_for_width(inner_width: f32, min_label_px: f32) -> usize {
    if !inner_width.is_finite() || !min_label_px.is_finite() || min_label_px <= 0.0 {
        return 2;
    }

    ((inner_width / min_label_px).floor().max(0.0) as usize).max(2)
}

/// `max_ticks` indices spread evenly over `0..n`, both ends included.
pub fn even_index_ticks(n: usize, max_ticks: usize) -> Vec<usize> {
    match n {
        0 => return Vec::new(),
        1 => return vec![0],
        _ => {}
    }

    let count = max_ticks.min(n).max(2);
    let last = (n - 1) as f64;

    let mut ticks: Vec<usize> = (0..count)
        .map(|i| (i as f64 * last / (count - 1) as f64).round() as usize)
        .collect();
    ticks.dedup();

    ticks
}

/// First index of every distinct calendar group, in series order.
fn group_starts<F, K>(series: &[Candle], fmt: &F, key: impl Fn(CalendarDate) -> K) -> Vec<usize>
where
    F: CalendarFormat + ?Sized,
    K: PartialEq,
{
    let mut starts = Vec::new();
    let mut current: Option<K> = None;

    for (i, candle) in series.iter().enumerate() {
        let Some(date) = fmt.calendar_date(candle.time) else {
            continue;
        };

        let group = key(date);
        if current.as_ref() != Some(&group) {
            starts.push(i);
            current = Some(group);
        }
    }

    starts
}

pub fn month_ticks<F: CalendarFormat + ?Sized>(series: &[Candle], fmt: &F) -> Vec<usize> {
    group_starts(series, fmt, |d| (d.year, d.month0))
}

pub fn quarter_ticks<F: CalendarFormat + ?Sized>(series: &[Candle], fmt: &F) -> Vec<usize> {
    group_starts(series, fmt, |d| (d.year, d.quarter()))
}

/// Keeps every `ceil(len / max)`-th entry, starting with the first.
pub fn cap_ticks(ticks: Vec<usize>, max: usize) -> Vec<usize> {
    if max == 0 || ticks.len() <= max {
        return ticks;
    }

    let step = ticks.len().div_ceil(max);
    ticks.into_iter().step_by(step).collect()
}

/// Indices of the series that get a time-axis label.
pub fn select_ticks<F: CalendarFormat + ?Sized>(
    series: &[Candle],
    interval: Interval,
    inner_width: f32,
    min_label_px: f32,
    fmt: &F,
) -> Vec<usize> {
    let max_ticks = max_ticks_for_width(inner_width, min_label_px);

    match interval {
        Interval::H1 | Interval::D1 => even_index_ticks(series.len(), max_ticks),
        Interval::MO1 => cap_ticks(month_ticks(series, fmt), max_ticks),
        Interval::MO3 => cap_ticks(quarter_ticks(series, fmt), max_ticks),
    }
}

fn label_pattern(interval: Interval) -> &'static str {
    match interval {
        Interval::H1 | Interval::D1 => "%b %-d",
        Interval::MO1 => "%b",
        Interval::MO3 => "%Y",
    }
}

pub fn label_for<F: CalendarFormat + ?Sized>(interval: Interval, timestamp_ms: i64, fmt: &F) -> String {
    fmt.format(timestamp_ms, label_pattern(interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::timezone::UserTimezone;
    use chrono::{Months, NaiveDate, TimeZone, Utc};

    const DAY_MS: i64 = 86_400_000;

    fn daily(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(i as i64 * DAY_MS, 1.0, 2.0, 0.5, 1.5, 10.0))
            .collect()
    }

    fn monthly(start: NaiveDate, months: u32) -> Vec<Candle> {
        (0..months)
            .filter_map(|i| start.checked_add_months(Months::new(i)))
            .map(|date| {
                let time = Utc
                    .from_utc_datetime(&date.and_time(Default::default()))
                    .timestamp_millis();
                Candle::new(time, 1.0, 2.0, 0.5, 1.5, 10.0)
            })
            .collect()
    }

    #[test]
    fn width_caps_density() {
        assert_eq!(max_ticks_for_width(800.0, 80.0), 10);
        assert_eq!(max_ticks_for_width(528.0, 80.0), 6);
        assert_eq!(max_ticks_for_width(100.0, 80.0), 2);
        assert_eq!(max_ticks_for_width(800.0, 0.0), 2);
    }

    #[test]
    fn even_ticks_small_series() {
        assert!(even_index_ticks(0, 10).is_empty());
        assert_eq!(even_index_ticks(1, 10), vec![0]);
        assert_eq!(even_index_ticks(2, 10), vec![0, 1]);
        assert_eq!(even_index_ticks(3, 10), vec![0, 1, 2]);
    }

    #[test]
    fn daily_hundred_points_at_eight_hundred_px() {
        let series = daily(100);
        let ticks = select_ticks(&series, Interval::D1, 800.0, 80.0, &UserTimezone::Utc);

        assert!(ticks.len() <= 10);
        assert_eq!(ticks.first(), Some(&0));
        assert_eq!(ticks.last(), Some(&99));
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ticks, vec![0, 11, 22, 33, 44, 55, 66, 77, 88, 99]);
    }

    #[test]
    fn empty_and_single_series() {
        for interval in Interval::ALL {
            assert!(select_ticks(&[], interval, 528.0, 80.0, &UserTimezone::Utc).is_empty());
            assert_eq!(
                select_ticks(&daily(1), interval, 528.0, 80.0, &UserTimezone::Utc),
                vec![0]
            );
        }
    }

    #[test]
    fn one_tick_per_month_transition() {
        let start = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        let series = monthly(start, 14);

        let ticks = month_ticks(&series, &UserTimezone::Utc);
        assert_eq!(ticks.len(), 14);
        assert_eq!(ticks, (0..14).collect::<Vec<_>>());

        let capped = select_ticks(&series, Interval::MO1, 528.0, 80.0, &UserTimezone::Utc);
        assert_eq!(capped, vec![0, 3, 6, 9, 12]);
    }

    #[test]
    fn daily_bars_group_by_month() {
        // Jan 30 .. Mar 2, 2024 crosses two month boundaries
        let start = Utc.with_ymd_and_hms(2024, 1, 30, 0, 0, 0).unwrap().timestamp_millis();
        let series: Vec<Candle> = (0..33)
            .map(|i| Candle::new(start + i * DAY_MS, 1.0, 1.0, 1.0, 1.0, 0.0))
            .collect();

        assert_eq!(month_ticks(&series, &UserTimezone::Utc), vec![0, 2, 31]);
    }

    #[test]
    fn quarters_group_three_months() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let series = monthly(start, 24);

        let ticks = quarter_ticks(&series, &UserTimezone::Utc);
        assert_eq!(ticks, vec![0, 3, 6, 9, 12, 15, 18, 21]);

        let capped = cap_ticks(ticks, 3);
        assert_eq!(capped, vec![0, 9, 18]);
    }

    #[test]
    fn cap_keeps_short_lists() {
        assert_eq!(cap_ticks(vec![1, 5, 9], 10), vec![1, 5, 9]);
        assert_eq!(cap_ticks(vec![0, 1, 2, 3, 4], 2), vec![0, 3]);
    }

    #[test]
    fn labels_per_interval() {
        let jan_5 = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap().timestamp_millis();

        assert_eq!(label_for(Interval::H1, jan_5, &UserTimezone::Utc), "Jan 5");
        assert_eq!(label_for(Interval::D1, jan_5, &UserTimezone::Utc), "Jan 5");
        assert_eq!(label_for(Interval::MO1, jan_5, &UserTimezone::Utc), "Jan");
        assert_eq!(label_for(Interval::MO3, jan_5, &UserTimezone::Utc), "2024");
    }
}
