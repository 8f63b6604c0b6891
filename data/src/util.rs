use chrono::{DateTime, Datelike, TimeZone};

/// Shown in place of a value that is absent or not a number.
pub const MISSING: &str = "—";

const COMPACT_UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Calendar fields of a timestamp in some time zone. `month0` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarDate {
    pub year: i32,
    pub month0: u32,
    pub day: u32,
}

impl CalendarDate {
    pub fn quarter(&self) -> u32 {
        self.month0 / 3
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for CalendarDate {
    fn from(dt: &DateTime<Tz>) -> Self {
        Self {
            year: dt.year(),
            month0: dt.month0(),
            day: dt.day(),
        }
    }
}

/// Converts epoch-millisecond timestamps into calendar fields and text.
pub trait CalendarFormat {
    fn calendar_date(&self, timestamp_ms: i64) -> Option<CalendarDate>;

    /// Formats with a chrono `strftime` pattern; empty when out of range.
    fn format(&self, timestamp_ms: i64, pattern: &str) -> String;
}

/// 0 decimals from 1000 upwards, 2 below.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }

    if value.abs() >= 1000.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// English compact notation, e.g. `1234567 -> "1.23M"`.
pub fn format_compact(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    let Some(unit) = COMPACT_UNITS.iter().position(|(size, _)| abs >= *size) else {
        let rounded = round2(abs);
        if rounded >= 1000.0 {
            return format!("{sign}1K");
        }
        return format!("{sign}{}", trim_decimals(rounded));
    };

    let (size, suffix) = COMPACT_UNITS[unit];
    let scaled = round2(abs / size);

    // 999.996K reads as 1M
    if scaled >= 1000.0 && unit > 0 {
        let (size, suffix) = COMPACT_UNITS[unit - 1];
        return format!("{sign}{}{suffix}", trim_decimals(round2(abs / size)));
    }

    format!("{sign}{}{suffix}", trim_decimals(scaled))
}

pub fn format_with_commas(num: f64) -> String {
    if !num.is_finite() {
        return MISSING.to_string();
    }

    let is_negative = num < 0.0 && num.abs() >= 0.0005;
    let s = trim_decimals_to(num.abs(), 3);

    let (integer_part, decimal_part) = match s.find('.') {
        Some(pos) => (&s[..pos], Some(&s[pos..])),
        None => (s.as_str(), None),
    };

    let num_commas = integer_part.len().saturating_sub(1) / 3;
    let decimal_len = decimal_part.map_or(0, str::len);
    let capacity = usize::from(is_negative) + integer_part.len() + num_commas + decimal_len;

    let mut result = String::with_capacity(capacity);

    if is_negative {
        result.push('-');
    }

    let digits_len = integer_part.len();
    for (i, ch) in integer_part.chars().enumerate() {
        result.push(ch);

        let pos_from_right = digits_len - i - 1;
        if i < digits_len - 1 && pos_from_right % 3 == 0 {
            result.push(',');
        }
    }

    if let Some(decimal) = decimal_part {
        result.push_str(decimal);
    }

    result
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn trim_decimals(value: f64) -> String {
    trim_decimals_to(value, 2)
}

fn trim_decimals_to(value: f64, decimals: usize) -> String {
    let s = format!("{value:.decimals$}");

    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_decimals_switch_at_thousand() {
        assert_eq!(format_price(999.994), "999.99");
        assert_eq!(format_price(1000.4), "1000");
        assert_eq!(format_price(-1234.6), "-1235");
        assert_eq!(format_price(0.5), "0.50");
        assert_eq!(format_price(f64::NAN), MISSING);
    }

    #[test]
    fn compact_notation() {
        assert_eq!(format_compact(1_234_567.0), "1.23M");
        assert_eq!(format_compact(1500.0), "1.5K");
        assert_eq!(format_compact(999.0), "999");
        assert_eq!(format_compact(12.345_6), "12.35");
        assert_eq!(format_compact(0.0), "0");
        assert_eq!(format_compact(2_000_000_000.0), "2B");
        assert_eq!(format_compact(3.2e12), "3.2T");
        assert_eq!(format_compact(-45_600.0), "-45.6K");
    }

    #[test]
    fn compact_rounds_up_into_next_unit() {
        assert_eq!(format_compact(999_999.0), "1M");
        assert_eq!(format_compact(999.999), "1K");
    }

    #[test]
    fn commas() {
        assert_eq!(format_with_commas(164_000.0), "164,000");
        assert_eq!(format_with_commas(1_234_567.891_2), "1,234,567.891");
        assert_eq!(format_with_commas(999.0), "999");
        assert_eq!(format_with_commas(-1000.5), "-1,000.5");
        assert_eq!(format_with_commas(0.0), "0");
    }

    #[test]
    fn quarter_from_month() {
        let date = CalendarDate {
            year: 2024,
            month0: 7,
            day: 1,
        };
        assert_eq!(date.quarter(), 2);
    }
}
