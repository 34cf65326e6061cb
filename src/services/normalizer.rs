//! Date normalization service
//!
//! Converts provider-native date strings into the canonical `YYYY-MM-DD`
//! key used to join the two daily series.

use chrono::NaiveDate;

/// Canonical date format and merge key
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Alternate provider formats, tried in order.
/// "%d" accepts non-padded days ("Feb 1, 2026").
const ALTERNATE_FORMATS: &[&str] = &[
    "%b %d, %Y", // Feb 11, 2026
    "%B %d, %Y", // February 11, 2026
    "%d %b %Y",  // 11 Feb 2026
    "%Y/%m/%d",  // 2026/02/11
    "%m/%d/%Y",  // 02/11/2026
    "%Y%m%d",    // 20260211
];

/// Result of normalizing one raw date.
///
/// `Unparsed` keeps the original string. It still works as a map key, so
/// one bad date never aborts a merge, but callers can see it degraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedDate {
    Parsed(NaiveDate),
    Unparsed(String),
}

impl NormalizedDate {
    /// Merge key for this date
    pub fn into_key(self) -> String {
        match self {
            NormalizedDate::Parsed(date) => date.format(CANONICAL_FORMAT).to_string(),
            NormalizedDate::Unparsed(raw) => raw,
        }
    }
}

/// Classify a raw provider date.
///
/// - Strings containing `-` are treated as already canonical and never
///   rewritten. They are `Parsed` only when they round-trip exactly.
/// - Otherwise the alternate formats are tried. Provider dates carry no
///   time or offset, so the parsed value is the local calendar day as-is.
/// - Anything else is `Unparsed` and passed through unchanged.
pub fn classify_date(raw: &str) -> NormalizedDate {
    if raw.contains('-') {
        return match NaiveDate::parse_from_str(raw, CANONICAL_FORMAT) {
            Ok(date) if date.format(CANONICAL_FORMAT).to_string() == raw => {
                NormalizedDate::Parsed(date)
            }
            _ => NormalizedDate::Unparsed(raw.to_string()),
        };
    }

    let trimmed = raw.trim();
    ALTERNATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(NormalizedDate::Parsed)
        .unwrap_or_else(|| NormalizedDate::Unparsed(raw.to_string()))
}

/// Normalize a raw provider date to its `YYYY-MM-DD` merge key.
///
/// Lossy by intent: unparsable input is returned unchanged.
///
/// # Examples
/// ```
/// use ai_usage_tracker::services::normalizer::normalize_date;
///
/// assert_eq!(normalize_date("Feb 11, 2026"), "2026-02-11");
/// assert_eq!(normalize_date("2026-02-11"), "2026-02-11");
/// assert_eq!(normalize_date("yesterday"), "yesterday");
/// ```
pub fn normalize_date(raw: &str) -> String {
    classify_date(raw).into_key()
}
