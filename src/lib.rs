//! Combined Claude + Codex daily usage report
//!
//! Merges the daily JSON of `ccusage` and `ccusage-codex` into one
//! date-keyed table and derives totals and daily averages.

pub mod cli;
pub mod providers;
pub mod services;
pub mod types;
