//! Combiner service for merging two provider series by date

use tracing::debug;

use crate::providers::Provider;
use crate::services::normalizer::{classify_date, NormalizedDate};
use crate::types::{CombinedDayEntry, CombinedTable, DailyEntry, UsageData};

/// Combiner for merging per-provider daily series
pub struct Combiner;

impl Combiner {
    /// Merge Claude and Codex daily records into one table keyed by
    /// canonical date.
    ///
    /// Every date seen in either series gets exactly one entry. The provider
    /// without a record for that date contributes zeros.
    ///
    /// Within one series, two records that normalize to the same date are
    /// last-write-wins, not summed. ccusage emits one record per day, so a
    /// collision means the source data is already suspect.
    pub fn combine(claude: &[DailyEntry], codex: &[DailyEntry]) -> CombinedTable {
        let tagged = claude
            .iter()
            .map(|e| (Provider::Claude, e))
            .chain(codex.iter().map(|e| (Provider::Codex, e)));

        tagged.fold(CombinedTable::new(), |mut table, (provider, entry)| {
            let key = Self::date_key(entry);
            let tokens = provider.tokens_of(entry);
            let cost = provider.cost_of(entry);

            match provider {
                // Claude overwrites the whole entry; Codex fields are filled
                // later since every Claude record is folded first.
                Provider::Claude => {
                    table.insert(
                        key.clone(),
                        CombinedDayEntry {
                            date: key,
                            claude_tokens: tokens,
                            claude_cost: cost,
                            codex_tokens: 0,
                            codex_cost: 0.0,
                        },
                    );
                }
                Provider::Codex => {
                    let slot = table
                        .entry(key.clone())
                        .or_insert_with(|| CombinedDayEntry::empty(key));
                    slot.codex_tokens = tokens;
                    slot.codex_cost = cost;
                }
            }
            table
        })
    }

    /// [`Combiner::combine`] over two full provider payloads
    pub fn combine_usage(claude: &UsageData, codex: &UsageData) -> CombinedTable {
        let table = Self::combine(claude.daily(), codex.daily());
        debug!(
            claude_records = claude.daily().len(),
            codex_records = codex.daily().len(),
            dates = table.len(),
            "combined daily usage"
        );
        table
    }

    fn date_key(entry: &DailyEntry) -> String {
        let normalized = classify_date(&entry.date);
        if let NormalizedDate::Unparsed(raw) = &normalized {
            if !raw.contains('-') {
                debug!(date = %raw, "unrecognized date format, using raw value as key");
            }
        }
        normalized.into_key()
    }
}
