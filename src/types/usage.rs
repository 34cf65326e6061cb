//! Usage types for combined provider reports

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Result, TrackerError};

/// One provider's usage for one day, as emitted by `ccusage daily --json`.
///
/// Claude reports cost as `totalCost`, Codex as `costUSD`. Both are kept so
/// the provider can pick its field on merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    /// Provider-native date ("2026-02-11" or "Feb 11, 2026")
    pub date: String,
    pub total_tokens: Option<u64>,
    pub total_cost: Option<f64>,
    #[serde(rename = "costUSD")]
    pub cost_usd: Option<f64>,
}

/// Full payload from one provider command
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageData {
    #[serde(default)]
    daily: Option<Vec<DailyEntry>>,
    /// Provider totals, passed through to JSON output untouched
    #[serde(default)]
    pub totals: Option<serde_json::Value>,
}

impl UsageData {
    pub fn new(daily: Vec<DailyEntry>) -> Self {
        Self {
            daily: Some(daily),
            totals: None,
        }
    }

    /// Parse a provider payload.
    ///
    /// The top level must be a JSON object. `null`, arrays, scalars and empty
    /// output are rejected as [`TrackerError::InvalidInput`] so an absent
    /// series is never mistaken for an empty one. A missing or null `daily`
    /// array inside an object is an empty series.
    pub fn from_json(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(TrackerError::InvalidInput("empty usage payload".into()));
        }

        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| TrackerError::Parse(e.to_string()))?;

        if !value.is_object() {
            return Err(TrackerError::InvalidInput(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }

        serde_json::from_value(value).map_err(|e| TrackerError::Parse(e.to_string()))
    }

    /// Daily records; empty when the payload had no `daily` array
    pub fn daily(&self) -> &[DailyEntry] {
        self.daily.as_deref().unwrap_or(&[])
    }

    /// Totals object, or `{}` when the provider sent none
    pub fn totals_or_empty(&self) -> serde_json::Value {
        self.totals
            .clone()
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Both providers' usage for one canonical date.
/// A provider with no record for the date contributes zeros.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CombinedDayEntry {
    /// Canonical key; omitted from JSON since the table is keyed by it
    #[serde(skip)]
    pub date: String,
    pub claude_tokens: u64,
    pub claude_cost: f64,
    pub codex_tokens: u64,
    pub codex_cost: f64,
}

impl CombinedDayEntry {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.claude_tokens.saturating_add(self.codex_tokens)
    }

    pub fn total_cost(&self) -> f64 {
        self.claude_cost + self.codex_cost
    }
}

/// Canonical date → combined entry. Iterates in ascending key order.
pub type CombinedTable = BTreeMap<String, CombinedDayEntry>;

/// Sums over every entry of a [`CombinedTable`]
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GrandTotals {
    pub total_claude_tokens: u64,
    pub total_codex_tokens: u64,
    pub total_claude_cost: f64,
    pub total_codex_cost: f64,
    pub total_all_tokens: u64,
    pub total_all_cost: f64,
}

/// Per-day averages over a set of dates
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DailyAverages {
    pub day_count: usize,
    pub claude_tokens: f64,
    pub codex_tokens: f64,
    pub total_tokens: f64,
    pub claude_cost: f64,
    pub codex_cost: f64,
    pub total_cost: f64,
}

impl DailyAverages {
    /// Token average rounded to the nearest integer for display
    pub fn rounded(tokens: f64) -> u64 {
        tokens.round().max(0.0) as u64
    }
}

/// Everything derived from a combined table
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Aggregates {
    pub totals: GrandTotals,
    /// Averages excluding the most recent date (when more than one exists)
    pub complete_days: Option<DailyAverages>,
    /// Averages over every date, including the most recent
    pub all_days: Option<DailyAverages>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== DailyEntry ==========

    #[test]
    fn test_daily_entry_claude_shape() {
        let json = r#"{"date":"2026-02-11","inputTokens":10,"totalTokens":1234,"totalCost":1.25,"modelsUsed":["claude-opus-4-6"]}"#;
        let entry: DailyEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date, "2026-02-11");
        assert_eq!(entry.total_tokens, Some(1234));
        assert_eq!(entry.total_cost, Some(1.25));
        assert_eq!(entry.cost_usd, None);
    }

    #[test]
    fn test_daily_entry_codex_shape() {
        let json = r#"{"date":"Feb 11, 2026","totalTokens":50,"costUSD":0.5}"#;
        let entry: DailyEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date, "Feb 11, 2026");
        assert_eq!(entry.cost_usd, Some(0.5));
        assert_eq!(entry.total_cost, None);
    }

    #[test]
    fn test_daily_entry_missing_numbers_are_none() {
        let entry: DailyEntry = serde_json::from_str(r#"{"date":"2026-02-11"}"#).unwrap();
        assert_eq!(entry.total_tokens, None);
        assert_eq!(entry.total_cost, None);
    }

    #[test]
    fn test_daily_entry_requires_date() {
        assert!(serde_json::from_str::<DailyEntry>(r#"{"totalTokens":5}"#).is_err());
    }

    // ========== UsageData::from_json ==========

    #[test]
    fn test_from_json_with_totals() {
        let raw = r#"{"daily":[{"date":"2026-02-11","totalTokens":5}],"totals":{"totalTokens":5,"totalCost":0.1}}"#;
        let data = UsageData::from_json(raw).unwrap();
        assert_eq!(data.daily().len(), 1);
        assert_eq!(data.totals_or_empty()["totalTokens"], 5);
    }

    #[test]
    fn test_from_json_missing_daily_is_empty() {
        let data = UsageData::from_json(r#"{"totals":{}}"#).unwrap();
        assert!(data.daily().is_empty());
    }

    #[test]
    fn test_from_json_null_daily_is_empty() {
        let data = UsageData::from_json(r#"{"daily":null}"#).unwrap();
        assert!(data.daily().is_empty());
    }

    #[test]
    fn test_from_json_null_payload_is_invalid_input() {
        let err = UsageData::from_json("null").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
        assert!(err.to_string().contains("got null"));
    }

    #[test]
    fn test_from_json_array_payload_is_invalid_input() {
        let err = UsageData::from_json("[]").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
    }

    #[test]
    fn test_from_json_empty_output_is_invalid_input() {
        let err = UsageData::from_json("  \n").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
    }

    #[test]
    fn test_from_json_garbage_is_parse_error() {
        let err = UsageData::from_json("not json").unwrap_err();
        assert!(matches!(err, TrackerError::Parse(_)));
    }

    #[test]
    fn test_totals_or_empty_defaults_to_object() {
        let data = UsageData::new(Vec::new());
        assert_eq!(data.totals_or_empty(), serde_json::json!({}));
    }

    // ========== CombinedDayEntry ==========

    #[test]
    fn test_combined_entry_totals() {
        let entry = CombinedDayEntry {
            date: "2026-02-11".into(),
            claude_tokens: 100,
            claude_cost: 1.5,
            codex_tokens: 50,
            codex_cost: 0.5,
        };
        assert_eq!(entry.total_tokens(), 150);
        assert!((entry.total_cost() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_combined_entry_json_omits_date() {
        let entry = CombinedDayEntry::empty("2026-02-11");
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("date").is_none());
        assert_eq!(json["claude_tokens"], 0);
        assert_eq!(json["codex_cost"], 0.0);
    }

    #[test]
    fn test_rounded_tokens() {
        assert_eq!(DailyAverages::rounded(10.4), 10);
        assert_eq!(DailyAverages::rounded(10.5), 11);
        assert_eq!(DailyAverages::rounded(0.0), 0);
    }
}
