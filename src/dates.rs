use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Text shown for missing or unparsable timestamps.
pub const INVALID_DATE: &str = "Invalid Date";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Zone that "Added" timestamps are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    Utc,
    Local,
    Fixed(FixedOffset),
}

impl DisplayZone {
    /// Accepts `local`, `utc`, or an offset like `+01:00` / `-0530`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "local" => return Ok(DisplayZone::Local),
            "utc" | "z" => return Ok(DisplayZone::Utc),
            _ => {}
        }

        let (sign, rest) = match s.as_bytes().first() {
            Some(b'+') => (1, &s[1..]),
            Some(b'-') => (-1, &s[1..]),
            _ => return Err(anyhow!("Invalid timezone '{}': use local, utc or +HH:MM", s)),
        };
        if !rest.chars().all(|c| c.is_ascii_digit() || c == ':') {
            return Err(anyhow!("Invalid timezone offset '{}'", s));
        }
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        let (hours, minutes) = match digits.len() {
            1 | 2 => (digits.parse::<i32>().ok(), Some(0)),
            4 => (digits[..2].parse::<i32>().ok(), digits[2..].parse::<i32>().ok()),
            _ => (None, None),
        };
        let (Some(hours), Some(minutes)) = (hours, minutes) else {
            return Err(anyhow!("Invalid timezone offset '{}'", s));
        };
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(DisplayZone::Fixed)
            .ok_or_else(|| anyhow!("Timezone offset out of range: '{}'", s))
    }

    fn resolve_naive(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            DisplayZone::Utc => Some(naive.and_utc()),
            DisplayZone::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
            DisplayZone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    fn project(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            DisplayZone::Utc => instant.fixed_offset(),
            DisplayZone::Fixed(offset) => instant.with_timezone(offset),
            DisplayZone::Local => instant.with_timezone(&Local).fixed_offset(),
        }
    }
}

/// Formats timestamps as e.g. `Mon, 6 Jan 2025, 14:05 UTC`.
#[derive(Debug, Clone, Copy)]
pub struct DateFormatter {
    zone: DisplayZone,
}

impl DateFormatter {
    pub fn new(zone: DisplayZone) -> Self {
        Self { zone }
    }

    /// Timestamps without an offset are read as wall-clock time in the display
    /// zone; bare dates as midnight UTC.
    pub fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return self.zone.resolve_naive(naive);
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn format(&self, raw: Option<&str>) -> String {
        let Some(instant) = raw.and_then(|r| self.parse(r)) else {
            return INVALID_DATE.to_string();
        };
        let local = self.zone.project(instant);
        let zone_name = match self.zone {
            DisplayZone::Utc => "UTC".to_string(),
            _ => gmt_name(local.offset().local_minus_utc()),
        };
        format!("{} {}", local.format("%a, %-d %b %Y, %H:%M"), zone_name)
    }
}

fn gmt_name(offset_secs: i32) -> String {
    if offset_secs == 0 {
        return "UTC".to_string();
    }
    let sign = if offset_secs < 0 { '-' } else { '+' };
    let abs = offset_secs.abs();
    let (hours, minutes) = (abs / 3600, (abs % 3600) / 60);
    if minutes == 0 {
        format!("GMT{}{}", sign, hours)
    } else {
        format!("GMT{}{}:{:02}", sign, hours, minutes)
    }
}
