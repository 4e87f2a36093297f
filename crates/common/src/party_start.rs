use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Saturday Feb 15, 4pm Seattle time.
pub const DEFAULT_PARTY_START: &str = "2025-02-15T16:00:00-08:00";
pub const PARTY_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeUntil {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_ms: i64,
}

/// The instant the party gate opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartySchedule {
    starts_at: DateTime<Utc>,
}

impl Default for PartySchedule {
    fn default() -> Self {
        Self::parse(DEFAULT_PARTY_START).expect("default party start is valid RFC 3339")
    }
}

impl PartySchedule {
    pub fn new(starts_at: DateTime<Utc>) -> Self {
        Self { starts_at }
    }

    pub fn parse(iso: &str) -> Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(iso.trim())
            .map_err(|e| anyhow!("[PartySchedule::parse] invalid party start {:?}: {}", iso, e))?;
        Ok(Self::new(parsed.with_timezone(&Utc)))
    }

    /// `PARTY_START_ISO` overrides the default start, mostly for rehearsals.
    pub fn from_env() -> Result<Self> {
        match std::env::var("PARTY_START_ISO") {
            Ok(iso) if !iso.trim().is_empty() => Self::parse(&iso),
            _ => Ok(Self::default()),
        }
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    pub fn local_start(&self) -> DateTime<Tz> {
        self.starts_at.with_timezone(&PARTY_TIMEZONE)
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.starts_at
    }

    pub fn time_until(&self, now: DateTime<Utc>) -> TimeUntil {
        let total_ms = (self.starts_at - now).num_milliseconds().max(0);

        let mut remaining = total_ms;
        let days = remaining / MS_PER_DAY;
        remaining -= days * MS_PER_DAY;
        let hours = remaining / MS_PER_HOUR;
        remaining -= hours * MS_PER_HOUR;
        let minutes = remaining / MS_PER_MINUTE;
        remaining -= minutes * MS_PER_MINUTE;
        let seconds = remaining / MS_PER_SECOND;

        TimeUntil { days, hours, minutes, seconds, total_ms }
    }
}
