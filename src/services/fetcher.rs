//! Provider fetch service
//!
//! Runs the two `ccusage`-family commands concurrently and parses their
//! JSON output. The combine step is the join point: both results are
//! required and the first failure aborts the run.

use std::process::{Output, Stdio};

use tokio::process::Command;
use tracing::debug;

use crate::providers::Provider;
use crate::types::{Result, TrackerError, UsageData};

/// One provider and the program used to query it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSource {
    pub provider: Provider,
    pub program: String,
}

impl UsageSource {
    pub fn new(provider: Provider, program: impl Into<String>) -> Self {
        Self {
            provider,
            program: program.into(),
        }
    }

    /// Source using the provider's default program
    pub fn default_for(provider: Provider) -> Self {
        Self::new(provider, provider.default_program())
    }

    /// Display form of the full command line
    pub fn command_line(&self, since: &str) -> String {
        std::iter::once(self.program.as_str())
            .chain(Provider::daily_args(since))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the program is the provider's default (npm-installable)
    pub fn is_default_program(&self) -> bool {
        self.program == self.provider.default_program()
    }

    /// npm package that provides this provider's tool
    pub fn package(&self) -> &'static str {
        self.provider.npm_package()
    }

    /// Run the daily report since `since` (YYYYMMDD) and parse it
    pub async fn fetch(&self, since: &str) -> Result<UsageData> {
        debug!(provider = %self.provider, command = %self.command_line(since), "spawning");

        let output = Command::new(&self.program)
            .args(Provider::daily_args(since))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TrackerError::CommandNotFound {
                    program: self.program.clone(),
                    package: self.package().to_string(),
                },
                _ => TrackerError::Io(e),
            })?;

        self.parse_output(since, output)
    }

    /// Check exit status and parse stdout
    pub fn parse_output(&self, since: &str, output: Output) -> Result<UsageData> {
        if !output.status.success() {
            return Err(TrackerError::CommandFailed {
                command: self.command_line(since),
                code: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let data = UsageData::from_json(&stdout).map_err(|e| match e {
            TrackerError::InvalidInput(msg) => {
                TrackerError::InvalidInput(format!("{}: {}", self.provider, msg))
            }
            TrackerError::Parse(msg) => TrackerError::Parse(format!("{}: {}", self.provider, msg)),
            other => other,
        })?;

        debug!(provider = %self.provider, records = data.daily().len(), "fetched");
        Ok(data)
    }
}

/// Fetch both providers concurrently.
///
/// Neither result is used unless both succeed.
pub async fn fetch_both(
    claude: &UsageSource,
    codex: &UsageSource,
    since: &str,
) -> Result<(UsageData, UsageData)> {
    tokio::try_join!(claude.fetch(since), codex.fetch(since))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn output(code: i32, stdout: &str, stderr: &str) -> Output {
        use std::os::unix::process::ExitStatusExt;
        Output {
            // Wait status: exit code lives in the high byte
            status: std::process::ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_command_line() {
        let source = UsageSource::default_for(Provider::Codex);
        assert_eq!(
            source.command_line("20260204"),
            "ccusage-codex daily --since 20260204 --order desc --json"
        );
    }

    #[test]
    fn test_package_for_custom_program() {
        let source = UsageSource::new(Provider::Claude, "/opt/bin/ccusage");
        assert_eq!(source.package(), "ccusage");
        assert!(!source.is_default_program());

        let codex = UsageSource::default_for(Provider::Codex);
        assert_eq!(codex.package(), "@ccusage/codex");
        assert!(codex.is_default_program());
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_output_success() {
        let source = UsageSource::default_for(Provider::Claude);
        let out = output(
            0,
            r#"{"daily":[{"date":"2026-02-11","totalTokens":10,"totalCost":0.1}],"totals":{"totalTokens":10}}"#,
            "",
        );
        let data = source.parse_output("20260204", out).unwrap();
        assert_eq!(data.daily().len(), 1);
        assert_eq!(data.totals_or_empty()["totalTokens"], 10);
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_output_nonzero_exit() {
        let source = UsageSource::default_for(Provider::Claude);
        let err = source
            .parse_output("20260204", output(1, "", "no data dir\n"))
            .unwrap_err();
        match err {
            TrackerError::CommandFailed { command, stderr, .. } => {
                assert!(command.starts_with("ccusage daily"));
                assert_eq!(stderr, "no data dir");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_output_null_is_invalid_input() {
        let source = UsageSource::default_for(Provider::Codex);
        let err = source.parse_output("20260204", output(0, "null", "")).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(ref m) if m.starts_with("codex:")));
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_output_bad_json() {
        let source = UsageSource::default_for(Provider::Codex);
        let err = source.parse_output("20260204", output(0, "{oops", "")).unwrap_err();
        assert!(matches!(err, TrackerError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_missing_program() {
        let source = UsageSource::new(Provider::Claude, "ai-usage-tracker-no-such-program");
        let err = source.fetch("20260204").await.unwrap_err();
        assert!(matches!(err, TrackerError::CommandNotFound { .. }));
    }

    #[tokio::test]
    async fn test_fetch_both_fails_if_either_fails() {
        let claude = UsageSource::new(Provider::Claude, "ai-usage-tracker-no-such-program");
        let codex = UsageSource::new(Provider::Codex, "ai-usage-tracker-no-such-program-2");
        assert!(fetch_both(&claude, &codex, "20260204").await.is_err());
    }
}
