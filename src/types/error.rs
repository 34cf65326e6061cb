use thiserror::Error;

/// ai-usage-tracker error types
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Provider payload is structurally absent (null, non-object, empty)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Failed to parse provider JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// File or process I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider tool is not installed
    #[error("command not found: {program}\n  npm install -g {package}")]
    CommandNotFound { program: String, package: String },

    /// Provider tool exited with a non-zero status
    #[error("command `{command}` exited with {code}\n{stderr}")]
    CommandFailed {
        command: String,
        code: String,
        stderr: String,
    },

    /// Configuration or dependency setup error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for ai-usage-tracker
pub type Result<T> = std::result::Result<T, TrackerError>;
