use serde::{Deserialize, Serialize};

use super::DEFAULT_API_BASE;
use super::timezone::UserTimezone;
use crate::chart::ChartConfig;
use crate::lookup::LookupRequest;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct State {
    pub api_base: String,
    pub timezone: UserTimezone,
    pub last_lookup: Option<LookupRequest>,
    pub chart: ChartConfig,
}

impl Default for State {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timezone: UserTimezone::default(),
            last_lookup: None,
            chart: ChartConfig::default(),
        }
    }
}

impl State {
    pub fn with_api_base(mut self, api_base: Option<String>) -> Self {
        if let Some(api_base) = api_base {
            self.api_base = api_base;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use exchange::{Interval, RangeOption};

    #[test]
    fn missing_fields_use_defaults() {
        let state: State = serde_json::from_str(r#"{"timezone": "Local"}"#).unwrap();

        assert_eq!(state.api_base, DEFAULT_API_BASE);
        assert_eq!(state.timezone, UserTimezone::Local);
        assert!(state.last_lookup.is_none());
        assert_eq!(state.chart, ChartConfig::default());
    }

    #[test]
    fn last_lookup_survives_a_save() {
        let state = State {
            last_lookup: Some(LookupRequest {
                symbol: "MSFT".to_string(),
                range: RangeOption::Y1,
                end: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                interval: Interval::MO1,
            }),
            ..State::default()
        };

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains(r#""range":"1Y""#));
        assert!(json.contains(r#""end":"2024-03-01""#));

        assert_eq!(serde_json::from_str::<State>(&json).unwrap(), state);
    }

    #[test]
    fn api_base_override_wins() {
        let state = State::default().with_api_base(Some("http://example.test".to_string()));
        assert_eq!(state.api_base, "http://example.test");

        assert_eq!(State::default().with_api_base(None).api_base, DEFAULT_API_BASE);
    }
}
