pub mod report;

use chrono::{Duration, Local};
use clap::Parser;

use crate::providers::Provider;
use crate::services::{dependencies, fetch_both, Aggregator, Combiner, Config};

/// Combined Claude + Codex token usage report
#[derive(Parser, Debug)]
#[command(name = "ai-usage-tracker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of days to include in report [default: 7]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    days: Option<u32>,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Install missing ccusage tools without prompting
    #[arg(short = 'y', long)]
    yes: bool,

    /// Show debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load();
        let days = config.resolve_days(self.days);
        let claude = config.source(Provider::Claude);
        let codex = config.source(Provider::Codex);

        dependencies::ensure_installed(&[&claude, &codex], self.yes)?;

        let since = since_date(days);
        eprintln!("Fetching Claude and Codex usage data in parallel...");
        let (claude_data, codex_data) = fetch_both(&claude, &codex, &since).await?;

        let table = Combiner::combine_usage(&claude_data, &codex_data);

        if self.json {
            println!("{}", report::render_json(&table, &claude_data, &codex_data)?);
        } else {
            let aggregates = Aggregator::compute(&table);
            println!("{}", report::render_text(&table, &aggregates));
        }
        Ok(())
    }
}

/// `--since` argument: local today minus `days`, as YYYYMMDD
pub fn since_date(days: u32) -> String {
    (Local::now().date_naive() - Duration::days(i64::from(days)))
        .format("%Y%m%d")
        .to_string()
}
