//! Aggregator service for computing totals and daily averages

use crate::types::{Aggregates, CombinedDayEntry, CombinedTable, DailyAverages, GrandTotals};

/// Aggregator for combined usage statistics
pub struct Aggregator;

impl Aggregator {
    /// Compute grand totals and both daily averages.
    ///
    /// The most recent date is usually still accruing usage, so
    /// `complete_days` leaves it out whenever more than one date exists.
    /// `all_days` includes it. An empty table yields no averages.
    pub fn compute(table: &CombinedTable) -> Aggregates {
        let totals = Self::totals(table);

        if table.is_empty() {
            return Aggregates {
                totals,
                complete_days: None,
                all_days: None,
            };
        }

        // BTreeMap keys are already ascending
        let entries: Vec<&CombinedDayEntry> = table.values().collect();
        let complete = if entries.len() > 1 {
            &entries[..entries.len() - 1]
        } else {
            &entries[..]
        };

        Aggregates {
            totals,
            complete_days: Self::averages(complete),
            all_days: Self::averages(&entries),
        }
    }

    /// Sum every field across the table
    pub fn totals(table: &CombinedTable) -> GrandTotals {
        let mut totals = table
            .values()
            .fold(GrandTotals::default(), |mut acc, entry| {
                acc.total_claude_tokens =
                    acc.total_claude_tokens.saturating_add(entry.claude_tokens);
                acc.total_codex_tokens =
                    acc.total_codex_tokens.saturating_add(entry.codex_tokens);
                acc.total_claude_cost += entry.claude_cost;
                acc.total_codex_cost += entry.codex_cost;
                acc
            });

        totals.total_all_tokens = totals
            .total_claude_tokens
            .saturating_add(totals.total_codex_tokens);
        totals.total_all_cost = totals.total_claude_cost + totals.total_codex_cost;
        totals
    }

    /// Per-field averages over `entries`; `None` when empty
    pub fn averages(entries: &[&CombinedDayEntry]) -> Option<DailyAverages> {
        if entries.is_empty() {
            return None;
        }

        let (claude_tokens, codex_tokens, claude_cost, codex_cost) = entries.iter().fold(
            (0u64, 0u64, 0.0f64, 0.0f64),
            |(ct, xt, cc, xc), e| {
                (
                    ct.saturating_add(e.claude_tokens),
                    xt.saturating_add(e.codex_tokens),
                    cc + e.claude_cost,
                    xc + e.codex_cost,
                )
            },
        );

        let n = entries.len() as f64;
        Some(DailyAverages {
            day_count: entries.len(),
            claude_tokens: claude_tokens as f64 / n,
            codex_tokens: codex_tokens as f64 / n,
            total_tokens: claude_tokens.saturating_add(codex_tokens) as f64 / n,
            claude_cost: claude_cost / n,
            codex_cost: codex_cost / n,
            total_cost: (claude_cost + codex_cost) / n,
        })
    }
}
