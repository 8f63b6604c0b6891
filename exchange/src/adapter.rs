use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

use super::{Candle, Interval, Profile, RangeOption, Stats, parse_timestamp};

#[derive(thiserror::Error, Debug)]
pub enum AdapterError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Symbol not found: {0}")]
    NotFound(String),
    #[error("Parsing error: {0}")]
    Parse(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Everything the symbol endpoint needs to answer one lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolQuery {
    pub symbol: String,
    pub as_of: Option<String>,
    pub range: RangeOption,
    pub interval: Interval,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolData {
    pub stats: Option<Stats>,
    pub candles: Vec<Candle>,
    pub profile: Option<Profile>,
}

#[derive(Deserialize)]
struct SymbolPayload {
    #[serde(default)]
    stats: Option<Stats>,
    #[serde(default)]
    candles: Option<CandlePayload>,
    #[serde(default)]
    profile: Option<Profile>,
}

/// Candles arrive either as records or keyed by their timestamp.
#[derive(Deserialize)]
#[serde(untagged)]
enum CandlePayload {
    Records(Vec<CandleRecord>),
    Keyed(HashMap<String, Ohlcv>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTime {
    Epoch(f64),
    Text(String),
}

impl RawTime {
    fn to_millis(&self) -> Option<i64> {
        match self {
            RawTime::Epoch(ms) if ms.is_finite() => Some(ms.round() as i64),
            RawTime::Epoch(_) => None,
            RawTime::Text(text) => parse_timestamp(text),
        }
    }
}

#[derive(Deserialize)]
struct CandleRecord {
    #[serde(rename = "Time", default)]
    time: Option<RawTime>,
    #[serde(rename = "Open", default = "nan", deserialize_with = "de_price")]
    open: f64,
    #[serde(rename = "High", default = "nan", deserialize_with = "de_price")]
    high: f64,
    #[serde(rename = "Low", default = "nan", deserialize_with = "de_price")]
    low: f64,
    #[serde(rename = "Close", default = "nan", deserialize_with = "de_price")]
    close: f64,
    #[serde(rename = "Volume", default, deserialize_with = "de_volume")]
    volume: f64,
}

#[derive(Deserialize)]
struct Ohlcv {
    #[serde(rename = "Open", default = "nan", deserialize_with = "de_price")]
    open: f64,
    #[serde(rename = "High", default = "nan", deserialize_with = "de_price")]
    high: f64,
    #[serde(rename = "Low", default = "nan", deserialize_with = "de_price")]
    low: f64,
    #[serde(rename = "Close", default = "nan", deserialize_with = "de_price")]
    close: f64,
    #[serde(rename = "Volume", default, deserialize_with = "de_volume")]
    volume: f64,
}

fn nan() -> f64 {
    f64::NAN
}

fn de_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn de_volume<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl CandlePayload {
    /// Canonical series: ascending by time, one bar per timestamp.
    fn into_series(self) -> Vec<Candle> {
        let mut candles: Vec<Candle> = match self {
            CandlePayload::Records(records) => records
                .into_iter()
                .filter_map(|r| {
                    let Some(time) = r.time.as_ref().and_then(RawTime::to_millis) else {
                        log::warn!("Dropping candle record with unreadable time");
                        return None;
                    };
                    Some(Candle::new(time, r.open, r.high, r.low, r.close, r.volume))
                })
                .collect(),
            CandlePayload::Keyed(map) => map
                .into_iter()
                .filter_map(|(key, v)| {
                    let Some(time) = parse_timestamp(&key) else {
                        log::warn!("Dropping candle keyed by unreadable time: {key}");
                        return None;
                    };
                    Some(Candle::new(time, v.open, v.high, v.low, v.close, v.volume))
                })
                .collect(),
        };

        candles.sort_by_key(|c| c.time);

        let mut series: Vec<Candle> = Vec::with_capacity(candles.len());
        for candle in candles {
            match series.last_mut() {
                Some(last) if last.time == candle.time => {
                    log::warn!("Duplicate candle at {}, keeping the later one", candle.time);
                    *last = candle;
                }
                _ => series.push(candle),
            }
        }

        series
    }
}

pub fn parse_symbol_payload(text: &str) -> Result<SymbolData, AdapterError> {
    let payload: SymbolPayload = serde_json::from_str(text)
        .map_err(|e| AdapterError::Parse(format!("Failed to parse symbol payload: {e}")))?;

    Ok(SymbolData {
        stats: payload.stats,
        candles: payload
            .candles
            .map(CandlePayload::into_series)
            .unwrap_or_default(),
        profile: payload.profile,
    })
}

pub fn symbol_url(api_base: &str, query: &SymbolQuery) -> Result<reqwest::Url, AdapterError> {
    let mut url = reqwest::Url::parse(api_base)
        .map_err(|e| AdapterError::InvalidRequest(format!("Bad API base {api_base:?}: {e}")))?;

    url.path_segments_mut()
        .map_err(|()| AdapterError::InvalidRequest(format!("API base cannot be a base: {api_base}")))?
        .pop_if_empty()
        .extend(["api", "symbol", query.symbol.as_str()]);

    {
        let mut pairs = url.query_pairs_mut();
        if let Some(as_of) = &query.as_of {
            pairs.append_pair("asOf", as_of);
        }
        pairs
            .append_pair("range_", &query.range.to_string())
            .append_pair("interval", &query.interval.to_string());
    }

    Ok(url)
}

pub async fn fetch_symbol(api_base: &str, query: &SymbolQuery) -> Result<SymbolData, AdapterError> {
    let url = symbol_url(api_base, query)?;

    let response = reqwest::get(url).await.map_err(AdapterError::Fetch)?;
    if !response.status().is_success() {
        log::warn!(
            "Lookup for {} answered with status {}",
            query.symbol,
            response.status()
        );
        return Err(AdapterError::NotFound(query.symbol.clone()));
    }

    let text = response.text().await.map_err(AdapterError::Fetch)?;

    parse_symbol_payload(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> SymbolQuery {
        SymbolQuery {
            symbol: "BRK.B".to_string(),
            as_of: Some("2024-01-05T00:00:00.000Z".to_string()),
            range: RangeOption::W1,
            interval: Interval::D1,
        }
    }

    #[test]
    fn builds_symbol_url() {
        let url = symbol_url("http://127.0.0.1:8000/", &query()).unwrap();

        assert_eq!(url.path(), "/api/symbol/BRK.B");
        assert_eq!(
            url.query(),
            Some("asOf=2024-01-05T00%3A00%3A00.000Z&range_=1W&interval=1d")
        );
    }

    #[test]
    fn rejects_bad_api_base() {
        assert!(matches!(
            symbol_url("not a url", &query()),
            Err(AdapterError::InvalidRequest(_))
        ));
    }

    #[test]
    fn normalizes_record_candles() {
        let text = r#"{
            "stats": {"price_end": 101.5, "change_pct": 1.5},
            "candles": [
                {"Time": "2024-01-03T00:00:00Z", "Open": 100, "High": 103, "Low": 99, "Close": 101.5, "Volume": 1000},
                {"Time": 1704153600000, "Open": 98, "High": 101, "Low": 97, "Close": 100, "Volume": 900},
                {"Time": "garbage", "Open": 1, "High": 1, "Low": 1, "Close": 1, "Volume": 1},
                {"Open": 1, "High": 1, "Low": 1, "Close": 1}
            ],
            "profile": {"longName": "Example Corp", "employees": 1200}
        }"#;

        let data = parse_symbol_payload(text).unwrap();

        assert_eq!(data.candles.len(), 2);
        assert_eq!(data.candles[0].time, 1_704_153_600_000);
        assert_eq!(data.candles[1].close, 101.5);
        assert_eq!(data.stats.unwrap().price_end, Some(101.5));
        assert_eq!(data.stats.unwrap().volatility, None);

        let profile = data.profile.unwrap();
        assert_eq!(profile.long_name.as_deref(), Some("Example Corp"));
        assert_eq!(profile.employees, Some(1200));
    }

    #[test]
    fn normalizes_keyed_candles() {
        let text = r#"{
            "candles": {
                "2024-01-05 00:00:00": {"Open": 3, "High": 4, "Low": 2, "Close": 3.5, "Volume": null},
                "2024-01-03 00:00:00": {"Open": 1, "High": 2, "Low": 0.5, "Close": 1.5, "Volume": 10},
                "2024-01-04T00:00:00Z": {"Open": 2, "High": null, "Low": 1, "Close": 2.5, "Volume": 20}
            }
        }"#;

        let data = parse_symbol_payload(text).unwrap();
        let times: Vec<i64> = data.candles.iter().map(|c| c.time).collect();

        assert!(times.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(data.candles.len(), 3);
        assert!(data.candles[1].high.is_nan());
        assert_eq!(data.candles[2].volume, 0.0);
        assert!(data.stats.is_none());
        assert!(data.profile.is_none());
    }

    #[test]
    fn duplicate_times_keep_later_record() {
        let text = r#"{"candles": [
            {"Time": "2024-01-03", "Open": 1, "High": 2, "Low": 1, "Close": 2, "Volume": 5},
            {"Time": "2024-01-03T00:00:00Z", "Open": 7, "High": 8, "Low": 6, "Close": 7, "Volume": 9}
        ]}"#;

        let data = parse_symbol_payload(text).unwrap();

        assert_eq!(data.candles.len(), 1);
        assert_eq!(data.candles[0].open, 7.0);
    }

    #[test]
    fn missing_candles_is_empty_series() {
        let data = parse_symbol_payload("{}").unwrap();
        assert!(data.candles.is_empty());

        assert!(matches!(
            parse_symbol_payload("[1, 2"),
            Err(AdapterError::Parse(_))
        ));
    }
}
