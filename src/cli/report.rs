//! Text and JSON rendering of the combined report

use chrono::NaiveDate;
use serde::Serialize;

use crate::providers::Provider;
use crate::services::normalizer::CANONICAL_FORMAT;
use crate::types::{Aggregates, CombinedTable, DailyAverages, Result, TrackerError, UsageData};

/// Inner widths of the seven table columns
const COLUMN_WIDTHS: [usize; 7] = [12, 15, 12, 15, 12, 15, 12];

const HEADER: &str = "║    Date    ║ Claude Tokens ║ Claude $   ║ Codex Tokens  ║  Codex $   ║ Total Tokens  ║  Total $   ║";

/// Width of the `=` rules around the averages blocks
const RULE_WIDTH: usize = 90;

/// Format a number with thousand separators (e.g., 1234567 -> "1,234,567")
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Date column label: "MM-DD" for canonical keys, the raw key otherwise
fn date_label(key: &str) -> String {
    match NaiveDate::parse_from_str(key, CANONICAL_FORMAT) {
        Ok(date) => date.format("%m-%d").to_string(),
        Err(_) => key.to_string(),
    }
}

fn border(left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = COLUMN_WIDTHS.iter().map(|w| "═".repeat(*w)).collect();
    let mid = mid.to_string();
    format!("{left}{}{right}", segments.join(mid.as_str()))
}

fn row(
    label: &str,
    claude_tokens: u64,
    claude_cost: f64,
    codex_tokens: u64,
    codex_cost: f64,
) -> String {
    format!(
        "║ {:^10} ║ {:>13} ║ ${:>9.2} ║ {:>13} ║ ${:>9.2} ║ {:>13} ║ ${:>9.2} ║",
        label,
        format_number(claude_tokens),
        claude_cost,
        format_number(codex_tokens),
        codex_cost,
        format_number(claude_tokens.saturating_add(codex_tokens)),
        claude_cost + codex_cost,
    )
}

/// Box-drawn table, newest date first, with a TOTAL row
pub fn render_table(table: &CombinedTable, aggregates: &Aggregates) -> String {
    let mut lines = vec![
        String::new(),
        border('╔', '╦', '╗'),
        HEADER.to_string(),
        border('╠', '╬', '╣'),
    ];

    for (date, entry) in table.iter().rev() {
        lines.push(row(
            &date_label(date),
            entry.claude_tokens,
            entry.claude_cost,
            entry.codex_tokens,
            entry.codex_cost,
        ));
    }

    let t = &aggregates.totals;
    lines.push(border('╠', '╬', '╣'));
    lines.push(row(
        "TOTAL",
        t.total_claude_tokens,
        t.total_claude_cost,
        t.total_codex_tokens,
        t.total_codex_cost,
    ));
    lines.push(border('╚', '╩', '╝'));

    lines.join("\n")
}

fn average_lines(title: &str, avg: &DailyAverages) -> Vec<String> {
    let line = |label: &str, tokens: f64, cost: f64| {
        format!(
            "{:<9}{:>15} tokens/day  |  ${:>9.2}/day",
            label,
            format_number(DailyAverages::rounded(tokens)),
            cost
        )
    };

    vec![
        String::new(),
        "=".repeat(RULE_WIDTH),
        title.to_string(),
        "=".repeat(RULE_WIDTH),
        line(
            &format!("{}:", Provider::Claude.label()),
            avg.claude_tokens,
            avg.claude_cost,
        ),
        line(
            &format!("{}:", Provider::Codex.label()),
            avg.codex_tokens,
            avg.codex_cost,
        ),
        line("TOTAL:", avg.total_tokens, avg.total_cost),
    ]
}

/// Both averages blocks; empty when there are no dates
pub fn render_averages(aggregates: &Aggregates) -> String {
    let mut lines = Vec::new();

    if let Some(avg) = &aggregates.complete_days {
        lines.extend(average_lines(
            &format!("DAILY AVERAGES (Last {} complete days)", avg.day_count),
            avg,
        ));
    }

    if let Some(avg) = &aggregates.all_days {
        lines.extend(average_lines(
            &format!("DAILY AVERAGES (All {} days including today)", avg.day_count),
            avg,
        ));
        lines.push("=".repeat(RULE_WIDTH));
    }

    lines.join("\n")
}

/// Table followed by averages
pub fn render_text(table: &CombinedTable, aggregates: &Aggregates) -> String {
    let averages = render_averages(aggregates);
    if averages.is_empty() {
        render_table(table, aggregates)
    } else {
        format!("{}\n{}", render_table(table, aggregates), averages)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    combined_daily: &'a CombinedTable,
    claude_totals: serde_json::Value,
    codex_totals: serde_json::Value,
}

/// JSON report: combined days by date plus each provider's raw totals
pub fn render_json(
    table: &CombinedTable,
    claude: &UsageData,
    codex: &UsageData,
) -> Result<String> {
    let report = JsonReport {
        combined_daily: table,
        claude_totals: claude.totals_or_empty(),
        codex_totals: codex.totals_or_empty(),
    };
    serde_json::to_string_pretty(&report).map_err(|e| TrackerError::Parse(e.to_string()))
}
