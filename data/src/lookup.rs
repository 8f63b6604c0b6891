use std::sync::LazyLock;

use chrono::{NaiveDate, SecondsFormat, TimeZone, Utc};
use exchange::{Interval, RangeOption, SymbolQuery};
use regex::Regex;
use serde::{Deserialize, Serialize};

static SYMBOL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9.^=\-]{1,15}$").expect("Symbol pattern is valid")
});

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Enter a symbol to look up")]
    EmptySymbol,
    #[error("\"{0}\" is not a valid ticker symbol")]
    InvalidSymbol(String),
    #[error("{interval} bars are not available for the {range} range")]
    IncompatibleInterval {
        range: RangeOption,
        interval: Interval,
    },
    #[error("\"{0}\" is not a date, expected YYYY-MM-DD")]
    InvalidEndDate(String),
}

/// A validated lookup, ready to be sent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LookupRequest {
    pub symbol: String,
    pub range: RangeOption,
    pub end: NaiveDate,
    pub interval: Interval,
}

impl LookupRequest {
    /// UTC midnight of the end date, e.g. `2024-01-05T00:00:00.000Z`.
    pub fn as_of(&self) -> String {
        Utc.from_utc_datetime(&self.end.and_time(Default::default()))
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn start(&self) -> NaiveDate {
        self.range.lookback_start(self.end)
    }

    pub fn to_query(&self) -> SymbolQuery {
        SymbolQuery {
            symbol: self.symbol.clone(),
            as_of: Some(self.as_of()),
            range: self.range,
            interval: self.interval,
        }
    }
}

/// Editable toolbar state.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupForm {
    pub symbol: String,
    pub end: String,
    pub range: RangeOption,
    pub interval: Interval,
    today: NaiveDate,
}

impl Default for LookupForm {
    fn default() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }
}

impl LookupForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            symbol: String::new(),
            end: today.format(DATE_FORMAT).to_string(),
            range: RangeOption::default(),
            interval: Interval::default(),
            today,
        }
    }

    /// Restores a previous request into the fields.
    pub fn from_request(request: &LookupRequest, today: NaiveDate) -> Self {
        let mut form = Self::new(today);
        form.symbol = request.symbol.clone();
        form.end = request.end.format(DATE_FORMAT).to_string();
        form.interval = request.interval;
        form.range = if request.range.allows(request.interval) {
            request.range
        } else {
            request.interval.first_range()
        };
        form
    }

    pub fn set_symbol(&mut self, symbol: String) {
        self.symbol = symbol.to_uppercase();
    }

    pub fn set_end(&mut self, end: String) {
        self.end = end;
    }

    pub fn pick_interval(&mut self, interval: Interval) {
        self.interval = interval;
        if !self.range.allows(interval) {
            self.range = interval.first_range();
        }
    }

    pub fn pick_range(&mut self, range: RangeOption) {
        self.range = if range.allows(self.interval) {
            range
        } else {
            self.interval.first_range()
        };
    }

    pub fn is_dirty(&self) -> bool {
        *self != Self::new(self.today)
    }

    pub fn can_submit(&self) -> bool {
        !self.symbol.trim().is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.today);
    }

    pub fn submit(&self) -> Result<LookupRequest, LookupError> {
        let symbol = self.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(LookupError::EmptySymbol);
        }
        if !SYMBOL_PATTERN.is_match(&symbol) {
            return Err(LookupError::InvalidSymbol(symbol));
        }

        let end = match self.end.trim() {
            "" => self.today,
            raw => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map_err(|_| LookupError::InvalidEndDate(raw.to_string()))?,
        };

        if !self.range.allows(self.interval) {
            return Err(LookupError::IncompatibleInterval {
                range: self.range,
                interval: self.interval,
            });
        }

        Ok(LookupRequest {
            symbol,
            range: self.range,
            end,
            interval: self.interval,
        })
    }
}
