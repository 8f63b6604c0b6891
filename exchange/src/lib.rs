pub mod adapter;
pub mod fetcher;

pub use adapter::{AdapterError, SymbolData, SymbolQuery, fetch_symbol};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
pub enum Interval {
    #[serde(rename = "1h")]
    H1,
    #[default]
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "1mo")]
    MO1,
    #[serde(rename = "3mo")]
    MO3,
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Interval::H1 => "1h",
                Interval::D1 => "1d",
                Interval::MO1 => "1mo",
                Interval::MO3 => "3mo",
            }
        )
    }
}

impl Interval {
    pub const ALL: [Interval; 4] = [Interval::H1, Interval::D1, Interval::MO1, Interval::MO3];

    /// Bars per trading year, used to annualize volatility.
    pub fn periods_per_year(self) -> f64 {
        match self {
            Interval::H1 => 252.0 * 6.5,
            Interval::D1 => 252.0,
            Interval::MO1 => 12.0,
            Interval::MO3 => 4.0,
        }
    }

    pub fn volume_label(self) -> &'static str {
        match self {
            Interval::H1 => "Avg Hourly Volume",
            Interval::D1 => "Avg Daily Volume",
            Interval::MO1 => "Avg Monthly Volume",
            Interval::MO3 => "Avg Quarterly Volume",
        }
    }

    pub fn first_range(self) -> RangeOption {
        match self {
            Interval::H1 => RangeOption::D1,
            Interval::D1 => RangeOption::M3,
            Interval::MO1 | Interval::MO3 => RangeOption::Max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
pub enum RangeOption {
    #[serde(rename = "1D")]
    D1,
    #[default]
    #[serde(rename = "1W")]
    W1,
    #[serde(rename = "1M")]
    M1,
    #[serde(rename = "3M")]
    M3,
    #[serde(rename = "1Y")]
    Y1,
    #[serde(rename = "MAX")]
    Max,
}

impl std::fmt::Display for RangeOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RangeOption::D1 => "1D",
                RangeOption::W1 => "1W",
                RangeOption::M1 => "1M",
                RangeOption::M3 => "3M",
                RangeOption::Y1 => "1Y",
                RangeOption::Max => "MAX",
            }
        )
    }
}

impl RangeOption {
    pub const ALL: [RangeOption; 6] = [
        RangeOption::D1,
        RangeOption::W1,
        RangeOption::M1,
        RangeOption::M3,
        RangeOption::Y1,
        RangeOption::Max,
    ];

    pub fn allowed_intervals(self) -> &'static [Interval] {
        match self {
            RangeOption::D1 => &[Interval::H1],
            RangeOption::W1 | RangeOption::M1 => &[Interval::H1, Interval::D1],
            RangeOption::M3 => &[Interval::H1, Interval::D1, Interval::MO1, Interval::MO3],
            RangeOption::Y1 => &[Interval::D1, Interval::MO1, Interval::MO3],
            RangeOption::Max => &[Interval::MO1, Interval::MO3],
        }
    }

    pub fn allows(self, interval: Interval) -> bool {
        self.allowed_intervals().contains(&interval)
    }

    /// First calendar day of the window that ends at `as_of`.
    pub fn lookback_start(self, as_of: NaiveDate) -> NaiveDate {
        let days = match self {
            RangeOption::D1 => 2,
            RangeOption::W1 => 8,
            RangeOption::M1 => 32,
            RangeOption::M3 => 95,
            RangeOption::Y1 => 366,
            RangeOption::Max => {
                return NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
            }
        };

        as_of - Duration::days(days)
    }
}

/// One OHLCV bar. `time` is epoch milliseconds, UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn has_finite_prices(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }

    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Stats {
    pub price_end: Option<f64>,
    pub change_pct: Option<f64>,
    pub change_abs: Option<f64>,
    pub range_high: Option<f64>,
    pub range_low: Option<f64>,
    pub avg_volume: Option<f64>,
    pub volatility: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub symbol: Option<String>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub industry: Option<String>,
    pub sector: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub employees: Option<u64>,
    pub summary: Option<String>,
    pub vip: Option<String>,
}

impl Profile {
    pub fn display_name(&self) -> Option<&str> {
        non_empty(&self.long_name).or_else(|| non_empty(&self.short_name))
    }

    /// "Sector · Industry", skipping whichever is missing.
    pub fn classification(&self) -> Option<String> {
        join_present([&self.sector, &self.industry], " · ")
    }

    pub fn address_line(&self) -> Option<String> {
        join_present(
            [
                &self.address,
                &self.city,
                &self.state,
                &self.zip,
                &self.country,
            ],
            ", ",
        )
    }

    /// "SYMBOL · EXCHANGE · CURRENCY" badge shown next to the company header.
    pub fn badge(&self) -> Option<String> {
        join_present([&self.symbol, &self.exchange, &self.currency], " · ")
    }

    pub fn website_host(&self) -> Option<&str> {
        let url = non_empty(&self.website)?;

        Some(
            url.strip_prefix("https://")
                .or_else(|| url.strip_prefix("http://"))
                .unwrap_or(url),
        )
    }
}

fn join_present<const N: usize>(fields: [&Option<String>; N], sep: &str) -> Option<String> {
    let parts: Vec<&str> = fields.into_iter().filter_map(non_empty).collect();

    (!parts.is_empty()).then(|| parts.join(sep))
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a candle timestamp into epoch milliseconds.
///
/// Accepts RFC 3339, offset-less ISO date-times (read as UTC), plain dates
/// and epoch milliseconds written as digits.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.timestamp_millis());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive).timestamp_millis());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(
            Utc.from_utc_datetime(&date.and_time(Default::default()))
                .timestamp_millis(),
        );
    }

    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse::<i64>().ok();
    }

    None
}
