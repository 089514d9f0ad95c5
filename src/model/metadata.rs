//! Document information dictionary.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<FixedOffset>>,

    /// Last modification date
    pub modified: Option<DateTime<FixedOffset>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages
    pub page_count: u32,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

impl Metadata {
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: version.into(),
            ..Default::default()
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| Error::Other(format!("JSON serialization failed: {}", e)))
    }
}

/// Parse a PDF date string such as `D:20240115103045+05'30'`.
///
/// Missing trailing fields default to their minimum; a missing or `Z` zone
/// means UTC.
pub fn parse_pdf_date(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits < 4 {
        return None;
    }
    let (stamp, zone) = s.split_at(digits);

    let field = |range: std::ops::Range<usize>, default: u32| -> Option<u32> {
        match stamp.get(range) {
            Some(v) => v.parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = stamp.get(0..4)?.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, field(4..6, 1)?, field(6..8, 1)?)?;
    let naive = date.and_hms_opt(field(8..10, 0)?, field(10..12, 0)?, field(12..14, 0)?)?;

    naive.and_local_timezone(parse_zone(zone)?).single()
}

fn parse_zone(zone: &str) -> Option<FixedOffset> {
    let sign = match zone.as_bytes().first() {
        None | Some(b'Z') => return FixedOffset::east_opt(0),
        Some(b'+') => 1,
        Some(b'-') => -1,
        Some(_) => return None,
    };
    let mut parts = zone[1..].split('\'').filter(|p| !p.is_empty());
    let hours: i32 = parts.next().map_or(Some(0), |h| h.parse().ok())?;
    let minutes: i32 = parts.next().map_or(Some(0), |m| m.parse().ok())?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
