//! Usage-reporting providers
//!
//! Each provider is an external `ccusage`-family command that prints
//! pre-aggregated daily usage as JSON.

use std::fmt;

use crate::types::DailyEntry;

/// The two usage sources combined by the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Claude,
    Codex,
}

impl Provider {
    /// Short name used in output fields ("claude", "codex")
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Claude => "claude",
            Provider::Codex => "codex",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Claude => "Claude",
            Provider::Codex => "Codex",
        }
    }

    /// Default program on PATH
    pub fn default_program(&self) -> &'static str {
        match self {
            Provider::Claude => "ccusage",
            Provider::Codex => "ccusage-codex",
        }
    }

    /// npm package that installs [`Provider::default_program`]
    pub fn npm_package(&self) -> &'static str {
        match self {
            Provider::Claude => "ccusage",
            Provider::Codex => "@ccusage/codex",
        }
    }

    /// Arguments for a daily JSON report starting at `since` (YYYYMMDD)
    pub fn daily_args(since: &str) -> [&str; 6] {
        ["daily", "--since", since, "--order", "desc", "--json"]
    }

    /// Cost of one daily record.
    ///
    /// Claude reports `totalCost` and Codex `costUSD`. The other field is
    /// used when the preferred one is missing, then 0.
    pub fn cost_of(&self, entry: &DailyEntry) -> f64 {
        let (preferred, fallback) = match self {
            Provider::Claude => (entry.total_cost, entry.cost_usd),
            Provider::Codex => (entry.cost_usd, entry.total_cost),
        };
        preferred.or(fallback).unwrap_or(0.0)
    }

    /// Token count of one daily record, 0 when absent
    pub fn tokens_of(&self, entry: &DailyEntry) -> u64 {
        entry.total_tokens.unwrap_or(0)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
