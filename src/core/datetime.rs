use crate::utils::error::{Result, StatsError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Field names that hold API timestamps.
pub const DATE_FIELDS: [&str; 4] = ["created", "expires", "lastModified", "lastChecked"];

static RE_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<year>[0-9]{4})-(?P<month>[01][0-9])-(?P<day>[0-3][0-9])T(?P<hour>[0-2][0-9]):(?P<minute>[0-5][0-9]):(?P<second>[0-5][0-9])(?:\.(?P<msecond>[0-9]{3}))?Z$",
    )
    .expect("datetime pattern is valid")
});

pub fn is_date_field(key: &str) -> bool {
    DATE_FIELDS.contains(&key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedTimestamp {
    /// Whole seconds, no zone; what spreadsheet importers read as a date.
    Naive(NaiveDateTime),
    /// Millisecond precision, explicit UTC.
    Utc(DateTime<Utc>),
}

impl fmt::Display for NormalizedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedTimestamp::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            NormalizedTimestamp::Utc(dt) => {
                write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.6f+00:00"))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatetimeNormalizer {
    pub full_precision: bool,
}

impl DatetimeNormalizer {
    pub fn new(full_precision: bool) -> Self {
        Self { full_precision }
    }

    /// Returns `None` when `raw` does not match the pattern or names an
    /// impossible calendar value.
    pub fn normalize(&self, raw: &str) -> Option<NormalizedTimestamp> {
        let caps = RE_DATETIME.captures(raw)?;
        let num = |name: &str| -> Option<u32> { caps.name(name)?.as_str().parse().ok() };

        let year: i32 = caps.name("year")?.as_str().parse().ok()?;
        let millis = match caps.name("msecond") {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };

        let date = NaiveDate::from_ymd_opt(year, num("month")?, num("day")?)?;
        let (hour, minute, second) = (num("hour")?, num("minute")?, num("second")?);

        if self.full_precision {
            let naive = date.and_hms_milli_opt(hour, minute, second, millis)?;
            Some(NormalizedTimestamp::Utc(naive.and_utc()))
        } else {
            Some(NormalizedTimestamp::Naive(date.and_hms_opt(hour, minute, second)?))
        }
    }

    /// Like [`normalize`](Self::normalize), but reports the row and field of a failure.
    pub fn normalize_field(&self, row: usize, field: &str, raw: &str) -> Result<NormalizedTimestamp> {
        self.normalize(raw).ok_or_else(|| {
            tracing::error!(
                "Failed to match datetime on row {} for {} with value {:?}",
                row,
                field,
                raw
            );
            StatsError::MalformedTimestamp {
                row,
                field: field.to_string(),
                value: raw.to_string(),
            }
        })
    }
}
