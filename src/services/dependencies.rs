//! Dependency check for the provider commands
//!
//! Finds missing programs on PATH and offers to install them with npm.

use std::path::PathBuf;
use std::process::Command;

use dialoguer::Confirm;
use tracing::debug;

use crate::services::fetcher::UsageSource;
use crate::types::{Result, TrackerError};

/// Sources whose program is not installed
pub fn missing_sources<'a>(sources: &[&'a UsageSource]) -> Vec<&'a UsageSource> {
    sources
        .iter()
        .copied()
        .filter(|s| {
            let found: Option<PathBuf> = which::which(&s.program).ok();
            debug!(program = %s.program, found = ?found, "dependency check");
            found.is_none()
        })
        .collect()
}

/// npm command that installs `packages`
pub fn install_command(packages: &[&str]) -> String {
    format!("npm install -g {}", packages.join(" "))
}

/// Ask on stderr. No terminal, EOF or interrupt declines.
fn confirm_install(install: &str) -> bool {
    Confirm::new()
        .with_prompt(format!("Install them now? ({install})"))
        .default(true)
        .interact_opt()
        .ok()
        .flatten()
        .unwrap_or(false)
}

/// Make sure every source program is installed.
///
/// Missing default programs are installed via npm after a prompt (skipped
/// when `assume_yes`). A missing configured program cannot be installed
/// and is reported instead. Declining or a failed install is an error.
pub fn ensure_installed(sources: &[&UsageSource], assume_yes: bool) -> Result<()> {
    let missing = missing_sources(sources);
    if missing.is_empty() {
        return Ok(());
    }

    let names: Vec<&str> = missing.iter().map(|s| s.program.as_str()).collect();
    eprintln!("Error: Required commands not found: {}\n", names.join(", "));

    let custom: Vec<&str> = missing
        .iter()
        .filter(|s| !s.is_default_program())
        .map(|s| s.program.as_str())
        .collect();
    if !custom.is_empty() {
        return Err(TrackerError::Config(format!(
            "configured commands not found: {}. Check claude_command / codex_command",
            custom.join(", ")
        )));
    }

    let packages: Vec<&str> = missing.iter().map(|s| s.package()).collect();
    let install = install_command(&packages);

    if !(assume_yes || confirm_install(&install)) {
        eprintln!("Install manually with:\n  {install}");
        return Err(TrackerError::Config(format!(
            "missing required commands: {}",
            names.join(", ")
        )));
    }

    eprintln!("Running: {install}");
    let status = Command::new("npm")
        .args(["install", "-g"])
        .args(&packages)
        .status()
        .map_err(|e| TrackerError::Config(format!("failed to run npm: {e}")))?;

    if !status.success() {
        return Err(TrackerError::Config(format!(
            "installation failed ({status}). Try manually: {install}"
        )));
    }

    let still_missing: Vec<&str> = missing_sources(&missing)
        .iter()
        .map(|s| s.program.as_str())
        .collect();
    if !still_missing.is_empty() {
        return Err(TrackerError::Config(format!(
            "commands still not found after install: {}",
            still_missing.join(", ")
        )));
    }

    eprintln!("Dependencies installed successfully.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Provider;
    use tempfile::TempDir;

    // ========== install_command ==========

    #[test]
    fn test_install_command() {
        assert_eq!(
            install_command(&["ccusage", "@ccusage/codex"]),
            "npm install -g ccusage @ccusage/codex"
        );
    }

    // ========== PATH lookup ==========

    #[cfg(unix)]
    #[test]
    fn test_which_in_finds_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("ccusage");
        std::fs::write(&bin, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let found = which::which_in("ccusage", Some(dir.path()), dir.path()).unwrap();
        assert_eq!(found, bin);
    }

    #[cfg(unix)]
    #[test]
    fn test_which_in_skips_non_executable() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("ccusage"), "").unwrap();

        assert!(which::which_in("ccusage", Some(dir.path()), dir.path()).is_err());
    }

    #[test]
    fn test_missing_sources_reports_unknown_program() {
        let source = UsageSource::new(Provider::Codex, "ai-usage-tracker-no-such-program");
        let missing = missing_sources(&[&source]);
        assert_eq!(missing.len(), 1);
    }

    // ========== ensure_installed ==========

    #[test]
    fn test_ensure_installed_noop_when_present() {
        // An absolute path to an existing executable counts as installed
        let exe = std::env::current_exe().unwrap();
        let source = UsageSource::new(Provider::Claude, exe.to_string_lossy().to_string());
        assert!(ensure_installed(&[&source], false).is_ok());
    }

    #[test]
    fn test_missing_custom_program_is_not_installed() {
        let dir = TempDir::new().unwrap();
        let program = dir.path().join("ccusage");
        let source = UsageSource::new(Provider::Claude, program.to_string_lossy().to_string());

        // assume_yes would run npm for a default program; a custom path errors first
        let err = ensure_installed(&[&source], true).unwrap_err();
        match err {
            TrackerError::Config(msg) => {
                assert!(msg.contains("configured commands not found"));
                assert!(msg.contains(&source.program));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
