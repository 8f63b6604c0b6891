use std::fmt;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::util::{CalendarDate, CalendarFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserTimezone {
    #[default]
    Utc,
    Local,
}

impl UserTimezone {
    pub const ALL: [UserTimezone; 2] = [UserTimezone::Utc, UserTimezone::Local];
}

impl CalendarFormat for UserTimezone {
    fn calendar_date(&self, timestamp_ms: i64) -> Option<CalendarDate> {
        let datetime = DateTime::from_timestamp_millis(timestamp_ms)?;

        Some(match self {
            UserTimezone::Local => CalendarDate::from(&datetime.with_timezone(&chrono::Local)),
            UserTimezone::Utc => CalendarDate::from(&datetime),
        })
    }

    fn format(&self, timestamp_ms: i64, pattern: &str) -> String {
        let Some(datetime) = DateTime::from_timestamp_millis(timestamp_ms) else {
            return String::new();
        };

        match self {
            UserTimezone::Local => datetime
                .with_timezone(&chrono::Local)
                .format(pattern)
                .to_string(),
            UserTimezone::Utc => datetime.format(pattern).to_string(),
        }
    }
}

impl fmt::Display for UserTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserTimezone::Utc => write!(f, "UTC"),
            UserTimezone::Local => {
                let local_offset = chrono::Local::now().offset().local_minus_utc();
                let hours = local_offset / 3600;
                let minutes = (local_offset % 3600).abs() / 60;
                write!(f, "Local (UTC {hours:+03}:{minutes:02})")
            }
        }
    }
}

impl<'de> Deserialize<'de> for UserTimezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let timezone_str = String::deserialize(deserializer)?;
        match timezone_str.to_lowercase().as_str() {
            "utc" => Ok(UserTimezone::Utc),
            "local" => Ok(UserTimezone::Local),
            _ => Err(serde::de::Error::custom("Invalid UserTimezone")),
        }
    }
}

impl Serialize for UserTimezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            UserTimezone::Utc => serializer.serialize_str("UTC"),
            UserTimezone::Local => serializer.serialize_str("Local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_5_2024: i64 = 1_704_412_800_000;

    #[test]
    fn utc_calendar_fields() {
        let date = UserTimezone::Utc.calendar_date(JAN_5_2024).unwrap();

        assert_eq!(
            date,
            CalendarDate {
                year: 2024,
                month0: 0,
                day: 5
            }
        );
        assert!(UserTimezone::Utc.calendar_date(i64::MAX).is_none());
    }

    #[test]
    fn utc_patterns() {
        assert_eq!(UserTimezone::Utc.format(JAN_5_2024, "%b %-d"), "Jan 5");
        assert_eq!(UserTimezone::Utc.format(JAN_5_2024, "%Y"), "2024");
        assert_eq!(UserTimezone::Utc.format(i64::MAX, "%Y"), "");
    }

    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&UserTimezone::Local).unwrap(),
            "\"Local\""
        );
        assert_eq!(
            serde_json::from_str::<UserTimezone>("\"utc\"").unwrap(),
            UserTimezone::Utc
        );
        assert!(serde_json::from_str::<UserTimezone>("\"Mars\"").is_err());
    }
}
